//! Notification mails sent to the form recipient.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::form::ContactForm;
use crate::config::MailConfig;

/// Subject with plain-text and HTML bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, notification: Notification) -> Result<(), MailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail sender or recipient is not configured")]
    NotConfigured,
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("message could not be built: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// `YYYY-MM-DD HH:MM` in UTC.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn contact_notification(form: &ContactForm, sent_at: DateTime<Utc>) -> Notification {
    let timestamp = format_timestamp(sent_at);

    let html = format!(
        "<h2>New contact form message</h2>\
<p><strong>Name:</strong> {}</p>\
<p><strong>Surname:</strong> {}</p>\
<p><strong>Email:</strong> {}</p>\
<p><strong>Phone:</strong> {}</p>\
<p><strong>Message:</strong></p>\
<p>{}</p>\
<p><em>Sent: {timestamp}</em></p>",
        escape_html(&form.name),
        escape_html(&form.surname),
        escape_html(&form.email),
        escape_html(&form.phone),
        escape_html(&form.message).replace('\n', "<br>"),
    );

    let text = format!(
        "New contact form message\n\n\
Name: {}\n\
Surname: {}\n\
Email: {}\n\
Phone: {}\n\
Message: {}\n\n\
Sent: {timestamp}",
        form.name, form.surname, form.email, form.phone, form.message,
    );

    Notification {
        subject: format!("New contact form message from {} {}", form.name, form.surname),
        text,
        html,
    }
}

pub fn newsletter_notification(email: &str, subscribed_at: DateTime<Utc>) -> Notification {
    let timestamp = format_timestamp(subscribed_at);
    Notification {
        subject: format!("New newsletter subscription - {email}"),
        text: format!("New newsletter subscription\n\nEmail: {email}\n\nSubscribed: {timestamp}"),
        html: format!(
            "<h2>New newsletter subscription</h2>\
<p><strong>Email:</strong> {}</p>\
<p><em>Subscribed: {timestamp}</em></p>",
            escape_html(email)
        ),
    }
}

/// SMTP delivery through lettre's tokio transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    from_address: String,
    recipient: String,
}

impl SmtpMailer {
    /// Implicit TLS on 465, STARTTLS on 587, plain SMTP on any other port.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let builder = match config.port {
            465 => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            587 => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?,
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };
        let mut builder = builder.port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            sender: config.sender(),
            from_address: config.from_address.clone(),
            recipient: config.recipient.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, notification: Notification) -> Result<(), MailError> {
        if self.from_address.is_empty() || self.recipient.is_empty() {
            return Err(MailError::NotConfigured);
        }
        let from: Mailbox = self.sender.parse()?;
        let to: Mailbox = self.recipient.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(notification.subject)
            .multipart(MultiPart::alternative_plain_html(
                notification.text,
                notification.html,
            ))?;

        self.transport.send(message).await?;
        Ok(())
    }
}
