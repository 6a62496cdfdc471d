//! Contact email endpoint tests

use axum::http::StatusCode;

use crate::common::TestApp;

#[test_log::test(tokio::test)]
async fn test_email_form_shows_contact() {
    let app = TestApp::new();
    let (mut client, user) = app.logged_in("a@x.com", "a").await;
    let job = app.seed_job("Engineer", user.id).await;

    let response = client.get(&format!("/send_email/{}", job.id)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Email hr@acme.com"));
    assert!(response.body.contains("name=\"subject\""));
}

#[test_log::test(tokio::test)]
async fn test_send_email_to_contact() {
    let app = TestApp::new();
    let (mut client, user) = app.logged_in("a@x.com", "a").await;
    let job = app.seed_job("Engineer", user.id).await;

    let response = client
        .post_form(
            &format!("/send_email/{}", job.id),
            &[
                ("subject", "Engineer application"),
                ("body", "Hello, I would like to apply."),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/dashboard");

    let sent = app.email.get_emails_for_recipient("hr@acme.com");
    assert_eq!(sent.len(), 1);
    let message = &sent[0].message;
    assert_eq!(message.subject, "Engineer application");
    assert_eq!(message.reply_to.as_deref(), Some("a@x.com"));
    assert!(message.body_text.starts_with("Hello, I would like to apply."));
    assert!(message.body_text.contains("a <a@x.com>"));
    assert_eq!(sent[0].job_id(), Some(job.id));

    let dashboard = client.get("/dashboard").await;
    assert!(dashboard.body.contains("Email sent to hr@acme.com"));
}

#[test_log::test(tokio::test)]
async fn test_blank_subject_is_not_sent() {
    let app = TestApp::new();
    let (mut client, user) = app.logged_in("a@x.com", "a").await;
    let job = app.seed_job("Engineer", user.id).await;

    let response = client
        .post_form(
            &format!("/send_email/{}", job.id),
            &[("subject", "  "), ("body", "Hello")],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Subject is required"));
    assert_eq!(app.email.email_count(), 0);
}

#[test_log::test(tokio::test)]
async fn test_relay_failure_is_service_unavailable() {
    let app = TestApp::new();
    let (mut client, user) = app.logged_in("a@x.com", "a").await;
    let job = app.seed_job("Engineer", user.id).await;
    app.email.set_failing(true);

    let response = client
        .post_form(
            &format!("/send_email/{}", job.id),
            &[("subject", "Engineer application"), ("body", "Hello")],
        )
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.body.contains("temporarily unavailable"));
    assert_eq!(app.email.email_count(), 0);
    assert_eq!(app.job(job.id).await.unwrap().status, job.status);
}

#[test_log::test(tokio::test)]
async fn test_cannot_email_about_another_users_job() {
    let app = TestApp::new();
    let (_alice, alice_user) = app.logged_in("a@x.com", "a").await;
    let (mut bob, _bob_user) = app.logged_in("b@x.com", "b").await;
    let job = app.seed_job("Engineer", alice_user.id).await;

    let response = bob
        .post_form(
            &format!("/send_email/{}", job.id),
            &[("subject", "Hi"), ("body", "Hello")],
        )
        .await;

    assert_eq!(response.location(), "/dashboard");
    assert_eq!(app.email.email_count(), 0);

    let dashboard = bob.get("/dashboard").await;
    assert!(dashboard.body.contains("Job not found"));
}
