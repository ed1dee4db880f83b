use super::common::*;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::contacts::{contacts_router, contacts_router_with_throttle, CaptchaError};
use crate::throttle::{ClientThrottle, Rate};

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("cf-connecting-ip", "203.0.113.5")
        .body(Body::from(serde_json::to_vec(&body).expect("body")))
        .expect("request")
}

fn contact(body: Value) -> Request<Body> {
    post("/api/v1/contacts/contact-form/", body)
}

fn newsletter(body: Value) -> Request<Body> {
    post("/api/v1/contacts/newsletter/", body)
}

#[tokio::test]
async fn contact_form_acknowledges_submission() {
    let harness = harness();
    let router = contacts_router(harness.service.clone());

    let response = router
        .oneshot(contact(valid_contact_json()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body, json!({ "message": "Message sent successfully!" }));
    let stored = harness.repository.submissions();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].client_ip.as_deref(), Some("203.0.113.5"));
}

#[tokio::test]
async fn contact_form_reports_field_errors() {
    let harness = harness();
    let router = contacts_router(harness.service.clone());
    let mut body = valid_contact_json();
    body["phone"] = json!("abc-def-ghij");
    body["gdprConsent"] = json!(false);

    let response = router.oneshot(contact(body)).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["phone"][0], "Please enter a valid phone number.");
    assert_eq!(
        body["gdprConsent"][0],
        "You must agree to the processing of personal data."
    );
    assert!(harness.repository.submissions().is_empty());
}

#[tokio::test]
async fn mistyped_consent_is_a_field_error() {
    let harness = harness();
    let router = contacts_router(harness.service.clone());
    let mut body = valid_contact_json();
    body["gdprConsent"] = json!("yes");

    let response = router.oneshot(contact(body)).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        body["gdprConsent"][0],
        "invalid type: string \"yes\", expected a boolean"
    );
    assert!(harness.repository.submissions().is_empty());
}

#[tokio::test]
async fn empty_body_asks_for_the_captcha_first() {
    let router = contacts_router(harness().service);

    let response = router.oneshot(contact(json!({}))).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        body,
        json!({ "turnstileToken": ["Turnstile verification is required."] })
    );
}

#[tokio::test]
async fn captcha_failure_is_a_field_error() {
    let harness = harness_with(
        MemoryContacts::default(),
        RecordingMailer::default(),
        StubCaptcha::answering(Err(CaptchaError::MalformedToken)),
    );
    let router = contacts_router(harness.service.clone());

    let response = router
        .oneshot(newsletter(json!({
            "email": "subscriber@example.com",
            "turnstileToken": "bad"
        })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["turnstileToken"][0], "Invalid token format.");
}

#[tokio::test]
async fn mail_failure_answers_generic_500() {
    let harness = harness_with(
        MemoryContacts::default(),
        RecordingMailer::failing(),
        StubCaptcha::accepting(),
    );
    let router = contacts_router(harness.service.clone());

    let response = router
        .clone()
        .oneshot(contact(valid_contact_json()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "An error occurred while sending the message. Please try again later."
    );

    let response = router
        .oneshot(newsletter(json!({
            "email": "subscriber@example.com",
            "turnstileToken": "valid-token"
        })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "An error occurred during subscription. Please try again later."
    );
}

#[tokio::test]
async fn newsletter_acknowledges_subscription() {
    let harness = harness();
    let router = contacts_router(harness.service.clone());

    let response = router
        .oneshot(newsletter(json!({
            "email": "subscriber@example.com",
            "turnstileToken": "valid-token"
        })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(
        body,
        json!({ "message": "Successfully subscribed to newsletter!" })
    );
    assert!(harness.repository.subscriber("subscriber@example.com").is_some());
}

#[tokio::test]
async fn only_the_contact_form_is_throttled() {
    let harness = harness();
    let router = contacts_router_with_throttle(
        harness.service.clone(),
        ClientThrottle::new(
            "test",
            Rate {
                requests: 1,
                period: Duration::from_secs(3600),
            },
        ),
    );

    let first = router
        .clone()
        .oneshot(contact(valid_contact_json()))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = router
        .clone()
        .oneshot(contact(valid_contact_json()))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key(header::RETRY_AFTER));

    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(newsletter(json!({
                "email": "subscriber@example.com",
                "turnstileToken": "valid-token"
            })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(harness.repository.submissions().len(), 1);
}
