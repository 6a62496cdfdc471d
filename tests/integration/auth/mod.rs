//! Login, callback and logout flow tests

use axum::http::StatusCode;
use jobtrack_auth::mock::{MOCK_AUTHORIZE_URL, MOCK_LOGOUT_URL};
use jobtrack_common::hash_password;
use jobtrack_users::UserRepository;

use crate::common::{query_param, TestApp};

#[test_log::test(tokio::test)]
async fn test_login_redirects_to_provider_with_state() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = client.get("/login").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(response.location().starts_with(MOCK_AUTHORIZE_URL));
    assert!(query_param(response.location(), "state").is_some());
    assert!(client.has_session_cookie());
    assert_eq!(app.sessions.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_callback_creates_account_and_opens_dashboard() {
    let app = TestApp::new();
    let (mut client, user) = app.logged_in("a@x.com", "a").await;

    assert_eq!(user.email, "a@x.com");
    assert_eq!(user.username, "a");

    let response = client.get("/dashboard").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Jobs for a"));
}

#[test_log::test(tokio::test)]
async fn test_repeat_login_reuses_account() {
    let app = TestApp::new();

    let (_first, user) = app.logged_in("a@x.com", "a").await;
    let (_second, again) = app.logged_in("a@x.com", "a").await;

    assert_eq!(user.id, again.id);
    assert_eq!(app.users.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_callback_with_forged_state_is_rejected() {
    let app = TestApp::new();
    let mut client = app.client();
    app.provider.register_code("forged-code", "a@x.com", "a");

    client.get("/login").await;
    let response = client
        .get("/callback?code=forged-code&state=not-the-issued-state")
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.provider.exchanged_codes().is_empty());
    assert!(app.users.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_failed_callback_spends_the_state() {
    let app = TestApp::new();
    let mut client = app.client();
    app.provider.register_code("real-code", "a@x.com", "a");

    let response = client.get("/login").await;
    let issued = query_param(response.location(), "state").unwrap();

    let response = client
        .get("/callback?code=real-code&state=not-the-issued-state")
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = client
        .get(&format!("/callback?code=real-code&state={}", issued))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.provider.exchanged_codes().is_empty());
    assert!(app.users.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_callback_missing_code_spends_the_state() {
    let app = TestApp::new();
    let mut client = app.client();
    app.provider.register_code("real-code", "a@x.com", "a");

    let response = client.get("/login").await;
    let issued = query_param(response.location(), "state").unwrap();

    let response = client.get(&format!("/callback?state={}", issued)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = client
        .get(&format!("/callback?code=real-code&state={}", issued))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.users.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_login_replaces_planted_session_cookie() {
    let app = TestApp::new();

    let mut attacker = app.client();
    attacker.get("/login").await;
    let planted = attacker.session_cookie();
    assert!(planted.is_some());

    let mut victim = app.client();
    victim.set_session_cookie(planted.clone());
    let response = victim.login(&app.provider, "a@x.com", "a").await;
    assert_eq!(response.location(), "/dashboard");
    assert_ne!(victim.session_cookie(), planted);

    let response = attacker.get("/dashboard").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/login");

    let response = victim.get("/dashboard").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Jobs for a"));
    assert_eq!(app.sessions.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_password_login_replaces_planted_session_cookie() {
    let app = TestApp::new();
    let hash = hash_password("hunter22").await.unwrap();
    app.users
        .create("legacy@x.com", "legacy", &hash)
        .await
        .unwrap();

    let mut attacker = app.client();
    attacker.get("/login").await;
    let planted = attacker.session_cookie();

    let mut victim = app.client();
    victim.set_session_cookie(planted.clone());
    let response = victim
        .post_form(
            "/login",
            &[("email", "legacy@x.com"), ("password", "hunter22")],
        )
        .await;
    assert_eq!(response.location(), "/dashboard");
    assert_ne!(victim.session_cookie(), planted);

    let response = attacker.get("/dashboard").await;
    assert_eq!(response.location(), "/login");
}

#[test_log::test(tokio::test)]
async fn test_unverified_email_is_rejected() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = client
        .login_unverified(&app.provider, "a@x.com", "a")
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.users.is_empty());
    let response = client.get("/dashboard").await;
    assert_eq!(response.location(), "/login");
}

#[test_log::test(tokio::test)]
async fn test_unverified_email_cannot_take_over_account() {
    let app = TestApp::new();
    let (_owner, user) = app.logged_in("a@x.com", "a").await;

    let mut intruder = app.client();
    let response = intruder
        .login_unverified(&app.provider, "a@x.com", "mallory")
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.users.len(), 1);
    let response = intruder.get("/dashboard").await;
    assert_eq!(response.location(), "/login");
    assert_eq!(app.users.find(user.id).await.unwrap().unwrap().username, "a");
}

#[test_log::test(tokio::test)]
async fn test_callback_without_code_is_rejected() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = client.get("/callback?state=abc").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.users.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_provider_error_is_flashed() {
    let app = TestApp::new();
    let mut client = app.client();

    client.get("/login").await;
    let response = client
        .get("/callback?error=access_denied&error_description=User%20cancelled%20login")
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/");

    let page = client.get("/").await;
    assert!(page.body.contains("User cancelled login"));
    assert!(app.users.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_provider_outage_is_service_unavailable() {
    let app = TestApp::new();
    let mut client = app.client();
    app.provider.set_unavailable(true);

    let response = client.login(&app.provider, "a@x.com", "a").await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(app.users.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_login_while_logged_in_goes_to_dashboard() {
    let app = TestApp::new();
    let (mut client, _user) = app.logged_in("a@x.com", "a").await;

    let response = client.get("/login").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/dashboard");
}

#[test_log::test(tokio::test)]
async fn test_guarded_routes_redirect_to_login() {
    let app = TestApp::new();
    let mut client = app.client();

    for uri in ["/dashboard", "/job/add", "/update/1", "/delete/1", "/send_email/1"] {
        let response = client.get(uri).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(response.location(), "/login", "{}", uri);
    }

    let response = client
        .post_form("/job/add", &[("position", "Engineer"), ("company", "Acme")])
        .await;
    assert_eq!(response.location(), "/login");
    assert!(app.jobs.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_logout_destroys_session() {
    let app = TestApp::new();
    let (mut client, _user) = app.logged_in("a@x.com", "a").await;
    assert_eq!(app.sessions.len(), 1);

    let response = client.get("/logout").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(response.location().starts_with(MOCK_LOGOUT_URL));
    assert!(app.sessions.is_empty());
    assert!(!client.has_session_cookie());

    let response = client.get("/dashboard").await;
    assert_eq!(response.location(), "/login");
}

#[test_log::test(tokio::test)]
async fn test_password_login() {
    let app = TestApp::new();
    let hash = hash_password("hunter22").await.unwrap();
    app.users
        .create("legacy@x.com", "legacy", &hash)
        .await
        .unwrap();

    let mut client = app.client();
    let response = client
        .post_form(
            "/login",
            &[("email", "legacy@x.com"), ("password", "hunter22")],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/dashboard");

    let dashboard = client.get("/dashboard").await;
    assert!(dashboard.body.contains("Jobs for legacy"));
}

#[test_log::test(tokio::test)]
async fn test_password_login_rejects_wrong_password() {
    let app = TestApp::new();
    let hash = hash_password("hunter22").await.unwrap();
    app.users
        .create("legacy@x.com", "legacy", &hash)
        .await
        .unwrap();

    let mut client = app.client();
    let response = client
        .post_form("/login", &[("email", "legacy@x.com"), ("password", "wrong")])
        .await;
    assert_eq!(response.location(), "/");

    let page = client.get("/").await;
    assert!(page.body.contains("Invalid email or password"));

    let response = client.get("/dashboard").await;
    assert_eq!(response.location(), "/login");
}
