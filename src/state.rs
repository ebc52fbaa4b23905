use std::sync::Arc;

use crate::config::AppConfig;
use crate::email::EmailService;
use crate::generator::{CertificateGenerator, CertificateRenderer, ChromeRenderEngine, RenderOptions};
use crate::storage::CertificateStorage;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<dyn CertificateRenderer>,
    pub email: Arc<EmailService>,
    pub storage: CertificateStorage,
}

impl AppState {
    pub fn new(
        renderer: Arc<dyn CertificateRenderer>,
        email: EmailService,
        storage: CertificateStorage,
    ) -> Self {
        Self {
            renderer,
            email: Arc::new(email),
            storage,
        }
    }

    /// Prepare output directories, the Chrome-backed renderer and the notifier.
    pub async fn from_config(config: &AppConfig) -> std::io::Result<Self> {
        let storage = CertificateStorage::new(&config.certificates_dir);
        storage.ensure_directories()?;

        let engine = ChromeRenderEngine::new(RenderOptions {
            chrome_path: config.chrome_path.clone(),
            ..RenderOptions::default()
        });
        let renderer = CertificateGenerator::new(&config.template_path, storage.clone(), engine);
        let email = EmailService::from_config(config).await;

        Ok(Self::new(Arc::new(renderer), email, storage))
    }
}
