#![allow(dead_code, unused_macros)]

use std::sync::Arc;

use async_trait::async_trait;
use certificate_generator_server::certificate::models::{CertificateArtifact, CertificateRequest};
use certificate_generator_server::email::EmailService;
use certificate_generator_server::generator::common::certificate_filename;
use certificate_generator_server::generator::{CertificateRenderer, GeneratorError};
use certificate_generator_server::storage::CertificateStorage;
use certificate_generator_server::{AppConfig, AppState};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

/// Build an actix test service with the production routes.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .app_data(certificate_generator_server::json_config())
                .configure(certificate_generator_server::routes)
                .default_service(actix_web::web::to(certificate_generator_server::not_found)),
        )
        .await
    };
}

/// Writes placeholder files instead of launching a browser.
pub struct StubRenderer {
    pub storage: CertificateStorage,
}

#[async_trait]
impl CertificateRenderer for StubRenderer {
    async fn generate(&self, request: &CertificateRequest) -> Result<CertificateArtifact, GeneratorError> {
        let filename = certificate_filename(&request.name, chrono::Utc::now().timestamp_millis());
        let artifact = self.storage.artifact(&filename);
        std::fs::write(&artifact.pdf_path, b"%PDF-1.4\n%stub\n").map_err(GeneratorError::WritePdf)?;
        std::fs::write(&artifact.jpg_path, [0xFF, 0xD8, 0xFF, 0xD9]).map_err(GeneratorError::WriteJpg)?;
        Ok(artifact)
    }
}

pub struct FailingRenderer;

#[async_trait]
impl CertificateRenderer for FailingRenderer {
    async fn generate(&self, _request: &CertificateRequest) -> Result<CertificateArtifact, GeneratorError> {
        Err(GeneratorError::BrowserLaunch(anyhow::anyhow!("could not find chrome binary")))
    }
}

/// Panics on the blocking pool, the way a crashed render task would.
pub struct PanickingRenderer;

#[async_trait]
impl CertificateRenderer for PanickingRenderer {
    async fn generate(&self, _request: &CertificateRequest) -> Result<CertificateArtifact, GeneratorError> {
        actix_web::web::block(|| -> Result<CertificateArtifact, GeneratorError> { panic!("renderer crashed") })
            .await
            .map_err(|e| GeneratorError::Blocking(e.to_string()))?
    }
}

pub fn temp_storage() -> (TempDir, CertificateStorage) {
    let dir = tempdir().unwrap();
    let storage = CertificateStorage::new(dir.path().join("certificates"));
    storage.ensure_directories().unwrap();
    (dir, storage)
}

pub fn panicking_state() -> (TempDir, AppState) {
    let (dir, storage) = temp_storage();
    (dir, AppState::new(Arc::new(PanickingRenderer), EmailService::disabled(), storage))
}

/// Stub renderer, email skipped.
pub fn stub_state() -> (TempDir, AppState) {
    let (dir, storage) = temp_storage();
    let renderer = Arc::new(StubRenderer {
        storage: storage.clone(),
    });
    (dir, AppState::new(renderer, EmailService::disabled(), storage))
}

pub fn failing_state() -> (TempDir, AppState) {
    let (dir, storage) = temp_storage();
    (dir, AppState::new(Arc::new(FailingRenderer), EmailService::disabled(), storage))
}

/// Email enabled but without credentials, so the transport never initializes.
pub async fn unconfigured_email_state() -> (TempDir, AppState) {
    let (dir, storage) = temp_storage();
    let config = AppConfig::from_lookup(|_| None).unwrap();
    let email = EmailService::from_config(&config).await;
    let renderer = Arc::new(StubRenderer {
        storage: storage.clone(),
    });
    (dir, AppState::new(renderer, email, storage))
}

pub fn valid_body() -> Value {
    json!({
        "name": "Jane Doe",
        "email": "jane@x.com",
        "gstNumber": "27AAAAA0000A1Z5",
        "businessName": "Acme",
        "businessAddress": "1 Main St"
    })
}

pub fn count_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
