//! Generator module - turns certificate requests into PDF/JPEG artifacts.
//!
//! - `common` - filename, escaping and date helpers
//! - `engine` - headless Chrome rendering of an HTML page
//! - `certificate` - template population and artifact persistence

pub mod certificate;
pub mod common;
pub mod engine;

pub use certificate::CertificateGenerator;
pub use engine::{ChromeRenderEngine, RenderOptions, RenderedCertificate};

use async_trait::async_trait;
use thiserror::Error;

use crate::certificate::models::{CertificateArtifact, CertificateRequest};

/// Errors that can occur during certificate generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to load certificate template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("failed to write page source: {0}")]
    WriteHtml(#[source] std::io::Error),
    #[error("failed to launch browser: {0}")]
    BrowserLaunch(#[source] anyhow::Error),
    #[error("failed to render page: {0}")]
    Render(#[source] anyhow::Error),
    #[error("failed to write PDF: {0}")]
    WritePdf(#[source] std::io::Error),
    #[error("failed to write JPEG: {0}")]
    WriteJpg(#[source] std::io::Error),
    #[error("render task failed: {0}")]
    Blocking(String),
}

/// Produces a certificate artifact for a validated request.
#[async_trait]
pub trait CertificateRenderer: Send + Sync {
    async fn generate(&self, request: &CertificateRequest) -> Result<CertificateArtifact, GeneratorError>;
}
