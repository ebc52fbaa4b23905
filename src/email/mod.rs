//! Email delivery of generated certificates over SMTP.
//!
//! With `SKIP_EMAIL=true` the service never touches the network and reports a
//! synthetic success, which keeps local development offline.

pub mod template;

use std::path::Path;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::certificate::models::{CertificateArtifact, Recipient};
use crate::config::{AppConfig, EmailConfig};

pub const SKIPPED_MESSAGE_ID: &str = "dev-mode-skipped";

type Mailer = AsyncSmtpTransport<Tokio1Executor>;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email transport is not initialized")]
    TransportUnavailable,
    #[error("SMTP server rejected the {0} connection test")]
    ConnectionRejected(String),
    #[error("EMAIL_USER and EMAIL_PASS must be set")]
    MissingCredentials,
    #[error("sender address is not configured")]
    MissingSender,
    #[error("invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),
    #[error("invalid attachment content type: {0}")]
    ContentType(String),
    #[error("failed to read attachment {path}: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("{0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Outcome of a send attempt.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailResult {
    pub success: bool,
    #[schema(example = "<3f1c8a0e-7d4b-4b8e-9a53-1f2f6c0f8e11@certificate-generator>")]
    pub message_id: String,
    #[schema(example = "250 2.0.0 OK")]
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl EmailResult {
    pub fn skipped() -> Self {
        Self {
            success: true,
            message_id: SKIPPED_MESSAGE_ID.to_string(),
            response: "Email skipped in development mode".to_string(),
            note: Some("Check certificates/ folder for generated files".to_string()),
        }
    }
}

/// A named SMTP setup tried at startup.
struct SmtpProfile {
    name: &'static str,
    relay: &'static str,
    port: u16,
}

const SMTP_PROFILES: [SmtpProfile; 1] = [SmtpProfile {
    name: "Gmail Standard",
    relay: "smtp.gmail.com",
    port: 587,
}];

enum EmailMode {
    Disabled,
    Smtp {
        transport: Option<Mailer>,
        config: EmailConfig,
    },
}

pub struct EmailService {
    mode: EmailMode,
}

impl EmailService {
    /// Service that skips every send.
    pub fn disabled() -> Self {
        Self {
            mode: EmailMode::Disabled,
        }
    }

    /// Build the service once at startup. A failed connection leaves the
    /// transport unset; sends then fail instead of retrying.
    pub async fn from_config(config: &AppConfig) -> Self {
        if config.skip_email {
            info!("Email service disabled (SKIP_EMAIL=true)");
            return Self::disabled();
        }

        let transport = initialize_transport(&config.email).await;
        Self {
            mode: EmailMode::Smtp {
                transport,
                config: config.email.clone(),
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.mode, EmailMode::Smtp { .. })
    }

    /// True when sends can go out: disabled mode, or an initialized transport.
    pub fn is_ready(&self) -> bool {
        match &self.mode {
            EmailMode::Disabled => true,
            EmailMode::Smtp { transport, .. } => transport.is_some(),
        }
    }

    /// Mail both files of `artifact` to the recipient.
    pub async fn send_certificate(
        &self,
        recipient: &Recipient,
        artifact: &CertificateArtifact,
    ) -> Result<EmailResult, EmailError> {
        let (transport, config) = match &self.mode {
            EmailMode::Disabled => {
                info!("Email sending skipped (development mode)");
                info!("Certificate files generated:");
                info!("   PDF: {}", artifact.pdf_path.display());
                info!("   JPG: {}", artifact.jpg_path.display());
                return Ok(EmailResult::skipped());
            }
            EmailMode::Smtp { transport, config } => {
                (transport.as_ref().ok_or(EmailError::TransportUnavailable)?, config)
            }
        };

        let message_id = format!("<{}@certificate-generator>", Uuid::new_v4());
        let message = build_message(config, recipient, artifact, &message_id).await?;

        info!("Sending email to {}...", recipient.email);
        let response = transport.send(message).await.map_err(|e| {
            error!("Email sending error: {}", e);
            EmailError::Smtp(e)
        })?;

        let response = format!(
            "{} {}",
            response.code(),
            response.message().collect::<Vec<_>>().join(" ")
        );
        info!("Email sent successfully: {}", message_id);

        Ok(EmailResult {
            success: true,
            message_id,
            response,
            note: None,
        })
    }
}

async fn initialize_transport(config: &EmailConfig) -> Option<Mailer> {
    for profile in SMTP_PROFILES.iter() {
        info!("Trying {} configuration...", profile.name);
        match connect(profile, config).await {
            Ok(transport) => {
                info!("{} configuration successful", profile.name);
                return Some(transport);
            }
            Err(e) => warn!("{} failed: {}", profile.name, e),
        }
    }

    error!("All email configurations failed, certificate emails will not be sent");
    None
}

/// STARTTLS relay for `profile`, authenticated with the configured login.
fn build_transport(profile: &SmtpProfile, config: &EmailConfig) -> Result<Mailer, EmailError> {
    let (user, pass) = match (&config.user, &config.pass) {
        (Some(user), Some(pass)) => (user.clone(), pass.clone()),
        _ => return Err(EmailError::MissingCredentials),
    };

    let transport: Mailer = Mailer::starttls_relay(profile.relay)?
        .port(profile.port)
        .credentials(Credentials::new(user, pass))
        .build();
    Ok(transport)
}

async fn connect(profile: &SmtpProfile, config: &EmailConfig) -> Result<Mailer, EmailError> {
    let transport = build_transport(profile, config)?;
    debug!("Testing {} connection to {}:{}", profile.name, profile.relay, profile.port);
    if transport.test_connection().await? {
        Ok(transport)
    } else {
        Err(EmailError::ConnectionRejected(profile.name.to_string()))
    }
}

async fn build_message(
    config: &EmailConfig,
    recipient: &Recipient,
    artifact: &CertificateArtifact,
    message_id: &str,
) -> Result<Message, EmailError> {
    let from_address: Address = config.from_address().ok_or(EmailError::MissingSender)?.parse()?;
    let from = Mailbox::new(Some(config.from_name.clone()), from_address);
    let to = Mailbox::new(Some(recipient.name.clone()), recipient.email.parse()?);

    let pdf = attachment(&artifact.pdf_path, format!("{}.pdf", artifact.filename)).await?;
    let jpg = attachment(&artifact.jpg_path, format!("{}.jpg", artifact.filename)).await?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(template::certificate_subject(&recipient.name))
        .message_id(Some(message_id.to_string()))
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::html(template::certificate_email_body(&recipient.name)))
                .singlepart(pdf)
                .singlepart(jpg),
        )?;
    Ok(message)
}

async fn attachment(path: &Path, filename: String) -> Result<SinglePart, EmailError> {
    let body = tokio::fs::read(path).await.map_err(|source| EmailError::Attachment {
        path: path.display().to_string(),
        source,
    })?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let content_type = ContentType::parse(mime.essence_str()).map_err(|e| EmailError::ContentType(e.to_string()))?;
    debug!("Attaching {} ({}, {} bytes)", filename, mime, body.len());
    Ok(Attachment::new(filename).body(body, content_type))
}
