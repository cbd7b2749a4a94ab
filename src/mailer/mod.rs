//! Outgoing email delivery.

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};
use thiserror::Error;

use crate::config::SmtpConfig;


/// Port on which SMTP servers expect an implicit TLS connection.
const SMTPS_PORT: u16 = 465;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),
    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// A fully addressed HTML email.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    /// Display name shown in the `From` header.
    pub from_name: String,
    pub from_address: String,
    pub reply_to: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Sink for outgoing emails.
pub trait Mailer: Send + Sync {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Delivers emails through an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let builder = if config.port == SMTPS_PORT {
            SmtpTransport::relay(&config.host)?
        } else {
            SmtpTransport::starttls_relay(&config.host)?
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(email)?;
        self.transport.send(&message)?;
        Ok(())
    }
}

/// Writes emails to the log instead of delivering them.
///
/// Used when no SMTP relay is configured.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        log::info!(
            "SMTP is not configured; dropping email to {} with subject `{}`",
            email.to,
            email.subject
        );
        log::debug!("Email body: {}", email.html_body);
        Ok(())
    }
}

fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
    let from = Mailbox::new(Some(email.from_name.clone()), email.from_address.parse()?);

    let message = Message::builder()
        .from(from)
        .reply_to(email.reply_to.parse()?)
        .to(email.to.parse()?)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(email.html_body.clone())?;

    Ok(message)
}
