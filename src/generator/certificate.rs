//! Certificate generator backed by the Chrome engine.

use std::fs;
use std::path::PathBuf;

use actix_web::web;
use async_trait::async_trait;
use chrono::Utc;

use super::common::{certificate_filename, populate_template, today};
use super::engine::{ChromeRenderEngine, RenderedCertificate};
use super::{CertificateRenderer, GeneratorError};
use crate::certificate::models::{CertificateArtifact, CertificateRequest};
use crate::storage::CertificateStorage;

/// Fills the HTML template and writes the rendered pair to storage.
#[derive(Debug, Clone)]
pub struct CertificateGenerator {
    template_path: PathBuf,
    storage: CertificateStorage,
    engine: ChromeRenderEngine,
}

impl CertificateGenerator {
    pub fn new(
        template_path: impl Into<PathBuf>,
        storage: CertificateStorage,
        engine: ChromeRenderEngine,
    ) -> Self {
        Self {
            template_path: template_path.into(),
            storage,
            engine,
        }
    }

    /// Read the template (never cached) and substitute the request values.
    pub fn populate(&self, request: &CertificateRequest, date: &str) -> Result<String, GeneratorError> {
        let template = fs::read_to_string(&self.template_path).map_err(GeneratorError::TemplateIo)?;
        Ok(populate_template(
            &template,
            &[
                ("name", request.name.as_str()),
                ("email", request.email.as_str()),
                ("businessName", request.business_name.as_str()),
                ("businessAddress", request.business_address.as_str()),
                ("gstNumber", request.gst_number.as_str()),
                ("date", date),
            ],
        ))
    }

    /// Render and persist synchronously; runs a browser on the current thread.
    pub fn generate_blocking(&self, request: &CertificateRequest) -> Result<CertificateArtifact, GeneratorError> {
        let filename = certificate_filename(&request.name, Utc::now().timestamp_millis());
        let html = self.populate(request, &today())?;

        log::info!("Rendering certificate {}", filename);
        let rendered = self.engine.render(&html)?;

        self.persist(&filename, &rendered)
    }

    /// Write both files of a render. A PDF left without its JPEG is removed.
    pub fn persist(
        &self,
        filename: &str,
        rendered: &RenderedCertificate,
    ) -> Result<CertificateArtifact, GeneratorError> {
        let artifact = self.storage.artifact(filename);
        fs::write(&artifact.pdf_path, &rendered.pdf).map_err(GeneratorError::WritePdf)?;
        if let Err(e) = fs::write(&artifact.jpg_path, &rendered.jpg) {
            if let Err(cleanup) = fs::remove_file(&artifact.pdf_path) {
                log::warn!("Failed to remove orphaned PDF {}: {}", artifact.pdf_path.display(), cleanup);
            }
            return Err(GeneratorError::WriteJpg(e));
        }

        log::info!(
            "Certificate written: {} / {}",
            artifact.pdf_path.display(),
            artifact.jpg_path.display()
        );
        Ok(artifact)
    }
}

#[async_trait]
impl CertificateRenderer for CertificateGenerator {
    async fn generate(&self, request: &CertificateRequest) -> Result<CertificateArtifact, GeneratorError> {
        let generator = self.clone();
        let request = request.clone();
        web::block(move || generator.generate_blocking(&request))
            .await
            .map_err(|e| GeneratorError::Blocking(e.to_string()))?
    }
}
