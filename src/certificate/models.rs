use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::email::EmailResult;

/// Business details a certificate is issued for. Values are trimmed and non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "27AAAAA0000A1Z5")]
    pub gst_number: String,
    #[schema(example = "Acme Trading Co.")]
    pub business_name: String,
    #[schema(example = "1 Main St, Mumbai")]
    pub business_address: String,
}

/// Body of the resend endpoint: an existing artifact and who to send it to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResendRequest {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "certificate_jane_doe_1760572800000")]
    pub filename: String,
}

/// A rendered PDF/JPEG pair on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateArtifact {
    #[schema(example = "certificate_jane_doe_1760572800000")]
    pub filename: String,
    #[schema(value_type = String, example = "certificates/pdf/certificate_jane_doe_1760572800000.pdf")]
    pub pdf_path: PathBuf,
    #[schema(value_type = String, example = "certificates/jpg/certificate_jane_doe_1760572800000.jpg")]
    pub jpg_path: PathBuf,
}

/// Person an artifact is mailed to.
#[derive(Debug, Clone)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

impl From<&CertificateRequest> for Recipient {
    fn from(request: &CertificateRequest) -> Self {
        Self {
            name: request.name.clone(),
            email: request.email.clone(),
        }
    }
}

impl From<&ResendRequest> for Recipient {
    fn from(request: &ResendRequest) -> Self {
        Self {
            name: request.name.clone(),
            email: request.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAndSendData {
    pub filename: String,
    pub email_sent: bool,
    pub message_id: String,
}

impl GenerateAndSendData {
    pub fn new(artifact: &CertificateArtifact, email: &EmailResult) -> Self {
        Self {
            filename: artifact.filename.clone(),
            email_sent: email.success,
            message_id: email.message_id.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: String,
    #[schema(example = "2026-10-16T09:30:00.000Z")]
    pub timestamp: String,
    #[schema(example = "Certificate Generator API")]
    pub service: String,
}
