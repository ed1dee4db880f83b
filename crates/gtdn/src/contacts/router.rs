use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use super::captcha::CaptchaVerifier;
use super::form::{ContactRequest, NewsletterRequest};
use super::mailer::Mailer;
use super::repository::ContactRepository;
use super::service::ContactService;
use crate::error::AppError;
use crate::request::{ClientIp, JsonBody};
use crate::throttle::ClientThrottle;

pub const CONTACT_SUCCESS: &str = "Message sent successfully!";
pub const CONTACT_FAILURE: &str =
    "An error occurred while sending the message. Please try again later.";
pub const NEWSLETTER_SUCCESS: &str = "Successfully subscribed to newsletter!";
pub const NEWSLETTER_FAILURE: &str =
    "An error occurred during subscription. Please try again later.";

pub struct ContactRoutes<R, M, C> {
    pub service: Arc<ContactService<R, M, C>>,
    pub throttle: ClientThrottle,
}

#[derive(Debug, Serialize)]
pub(crate) struct Acknowledgement {
    message: &'static str,
}

pub fn contacts_router<R, M, C>(service: Arc<ContactService<R, M, C>>) -> Router
where
    R: ContactRepository + 'static,
    M: Mailer + 'static,
    C: CaptchaVerifier + 'static,
{
    contacts_router_with_throttle(service, ClientThrottle::contact_form())
}

/// The contact form is throttled per client; the newsletter is not.
pub fn contacts_router_with_throttle<R, M, C>(
    service: Arc<ContactService<R, M, C>>,
    throttle: ClientThrottle,
) -> Router
where
    R: ContactRepository + 'static,
    M: Mailer + 'static,
    C: CaptchaVerifier + 'static,
{
    let state = Arc::new(ContactRoutes { service, throttle });

    Router::new()
        .route(
            "/api/v1/contacts/contact-form/",
            post(contact_form_handler::<R, M, C>),
        )
        .route(
            "/api/v1/contacts/newsletter/",
            post(newsletter_handler::<R, M, C>),
        )
        .with_state(state)
}

pub(crate) async fn contact_form_handler<R, M, C>(
    State(routes): State<Arc<ContactRoutes<R, M, C>>>,
    client: ClientIp,
    JsonBody(request): JsonBody<ContactRequest>,
) -> Result<Json<Acknowledgement>, AppError>
where
    R: ContactRepository + 'static,
    M: Mailer + 'static,
    C: CaptchaVerifier + 'static,
{
    routes.throttle.check(client.as_str())?;
    routes
        .service
        .submit_contact(&request, &client)
        .await
        .map_err(|err| err.reported_as(CONTACT_FAILURE))?;
    Ok(Json(Acknowledgement {
        message: CONTACT_SUCCESS,
    }))
}

pub(crate) async fn newsletter_handler<R, M, C>(
    State(routes): State<Arc<ContactRoutes<R, M, C>>>,
    client: ClientIp,
    JsonBody(request): JsonBody<NewsletterRequest>,
) -> Result<Json<Acknowledgement>, AppError>
where
    R: ContactRepository + 'static,
    M: Mailer + 'static,
    C: CaptchaVerifier + 'static,
{
    routes
        .service
        .subscribe(&request, &client)
        .await
        .map_err(|err| err.reported_as(NEWSLETTER_FAILURE))?;
    Ok(Json(Acknowledgement {
        message: NEWSLETTER_SUCCESS,
    }))
}
