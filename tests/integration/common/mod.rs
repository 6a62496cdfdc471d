//! Common test utilities and fixtures for integration tests
//!
//! This module provides shared infrastructure for all integration tests including:
//! - An in-memory application (repositories, sessions, identity provider, mail)
//! - A cookie-carrying client that drives the router without a socket
//! - Login helpers for the provider and password flows
//! - Job fixtures

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use jobtrack_app::{create_router, AppContext};
use jobtrack_auth::{mock::MockIdentityProvider, AuthBackend, AuthConfig, MemorySessionStore};
use jobtrack_email::mock::MockEmailService;
use jobtrack_jobs::{Job, JobRepository, MemoryJobRepository, NewJob};
use jobtrack_users::{MemoryUserRepository, User, UserRepository};
use tower::ServiceExt;

static NEXT_CODE: AtomicUsize = AtomicUsize::new(1);

/// Test application wired entirely to in-memory backends
pub struct TestApp {
    pub users: MemoryUserRepository,
    pub jobs: MemoryJobRepository,
    pub sessions: MemorySessionStore,
    pub provider: MockIdentityProvider,
    pub email: MockEmailService,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let users = MemoryUserRepository::new();
        let jobs = MemoryJobRepository::new();
        let sessions = MemorySessionStore::default();
        let provider = MockIdentityProvider::new();
        let email = MockEmailService::new();

        let config = AuthConfig::new(
            "idp.mock",
            "test-client",
            "test-secret",
            "http://localhost:3000",
            false,
        );
        let auth = AuthBackend::new(
            config,
            Arc::new(sessions.clone()),
            Arc::new(provider.clone()),
        );

        let ctx = AppContext {
            users: Arc::new(users.clone()),
            jobs: Arc::new(jobs.clone()),
            auth,
            email: Arc::new(email.clone()),
        };

        Self {
            users,
            jobs,
            sessions,
            provider,
            email,
            router: create_router(ctx),
        }
    }

    /// A fresh browser with no cookies
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// A browser logged in through the identity provider
    pub async fn logged_in(&self, email: &str, name: &str) -> (TestClient, User) {
        let mut client = self.client();
        let response = client.login(&self.provider, email, name).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), "/dashboard");

        let user = self
            .users
            .find_by_email(email)
            .await
            .unwrap()
            .expect("login should create the account");
        (client, user)
    }

    /// Insert a job directly, bypassing the handlers
    pub async fn seed_job(&self, position: &str, owner_id: i64) -> Job {
        let new_job = NewJob::new(position, "Acme", "hr@acme.com");
        self.jobs
            .create(&new_job, owner_id)
            .await
            .unwrap()
            .job()
            .clone()
    }

    pub async fn job(&self, id: i64) -> Option<Job> {
        self.jobs.find(id).await.unwrap()
    }
}

/// Response with the body read into a string
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }
}

/// Drives the router like a browser that keeps the session cookie
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    pub fn has_session_cookie(&self) -> bool {
        self.cookie.is_some()
    }

    /// The `name=value` cookie pair this browser currently sends
    pub fn session_cookie(&self) -> Option<String> {
        self.cookie.clone()
    }

    /// Make this browser send `cookie`, as if it had been planted
    pub fn set_session_cookie(&mut self, cookie: Option<String>) {
        self.cookie = cookie;
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request(Method::GET, uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).unwrap();
        let request = self
            .request(Method::POST, uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Walk through `/login` and `/callback` with a freshly registered code
    pub async fn login(
        &mut self,
        provider: &MockIdentityProvider,
        email: &str,
        name: &str,
    ) -> TestResponse {
        let code = next_code();
        provider.register_code(&code, email, name);
        self.complete_provider_login(&code).await
    }

    /// Same as `login`, but the provider has not verified the email
    pub async fn login_unverified(
        &mut self,
        provider: &MockIdentityProvider,
        email: &str,
        name: &str,
    ) -> TestResponse {
        let code = next_code();
        provider.register_unverified_code(&code, email, name);
        self.complete_provider_login(&code).await
    }

    async fn complete_provider_login(&mut self, code: &str) -> TestResponse {
        let response = self.get("/login").await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        let state = query_param(response.location(), "state").expect("state in redirect");

        self.get(&format!("/callback?code={}&state={}", code, state))
            .await
    }

    fn request(&self, method: Method, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let pair = value.split(';').next().unwrap_or("").trim();
            let expired = value.contains("Max-Age=0") || pair.ends_with('=');
            self.cookie = if expired {
                None
            } else {
                Some(pair.to_string())
            };
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}

fn next_code() -> String {
    format!("code-{}", NEXT_CODE.fetch_add(1, Ordering::SeqCst))
}

/// Read a query parameter from an absolute or relative URL
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url)
        .or_else(|_| reqwest::Url::parse("http://localhost").and_then(|base| base.join(url)))
        .ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
