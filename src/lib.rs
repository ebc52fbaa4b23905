use std::io;

use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{error, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod certificate;
pub mod config;
pub mod email;
pub mod generator;
pub mod state;
pub mod storage;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

use crate::certificate::models::HealthResponse;

pub const SERVICE_NAME: &str = "Certificate Generator API";
const JSON_LIMIT: usize = 1024 * 1024;

/// Envelope shared by every JSON response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(error.into()),
            details: None,
            path: None,
        }
    }

    pub fn success(message: impl Into<String>, data: impl Serialize) -> Self {
        let data = serde_json::to_value(data)
            .map_err(|e| log::error!("Failed to serialize response data: {}", e))
            .ok();
        Self {
            success: true,
            message: Some(message.into()),
            data,
            error: None,
            details: None,
            path: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::failure(message)
    }

    pub fn validation_failed(details: Vec<String>) -> Self {
        Self {
            details: Some(details),
            ..Self::failure("Validation failed")
        }
    }

    pub fn invalid_payload(detail: impl Into<String>) -> Self {
        Self {
            details: Some(vec![detail.into()]),
            ..Self::failure("Invalid JSON payload")
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::failure("Route not found")
        }
    }

    pub fn internal_error() -> Self {
        Self::failure("Something went wrong!")
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Health",
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        service: SERVICE_NAME.to_string(),
    })
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    log::debug!("No route for {} {}", req.method(), req.uri());
    HttpResponse::NotFound().json(ApiResponse::not_found(req.uri().to_string()))
}

/// JSON extractor settings; malformed bodies become 400 envelopes.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            let detail = err.to_string();
            log::warn!("Rejected request body: {}", detail);
            let response = HttpResponse::BadRequest().json(ApiResponse::invalid_payload(detail));
            error::InternalError::from_response(err, response).into()
        })
}

/// Register the `/api` routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(certificate::config)
            .service(
                web::resource("/health")
                    .route(web::get().to(health_check))
                    .default_service(web::to(not_found)),
            ),
    );
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::certificate::handlers::generate_and_send_certificate,
        crate::certificate::handlers::generate_certificate,
        crate::certificate::handlers::send_certificate_email,
        crate::health_check
    ),
    components(
        schemas(
            ApiResponse,
            HealthResponse,
            certificate::models::CertificateRequest,
            certificate::models::ResendRequest,
            certificate::models::CertificateArtifact,
            certificate::models::GenerateAndSendData,
            certificate::validation::ValidationOutcome,
            email::EmailResult,
        )
    ),
    tags(
        (name = "Certificate Service", description = "Certificate generation and delivery endpoints."),
        (name = "Health", description = "Liveness probe.")
    )
)]
pub struct ApiDoc;

pub async fn run() -> io::Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let app_state = match AppState::from_config(&config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!(
                "Failed to prepare certificate directories under {}: {}",
                config.certificates_dir.display(),
                e
            );
            return Err(e);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("certificate_generator")
        .endpoint("/metrics")
        .build()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    log::info!("Certificate Generator API running on port {}", config.port);
    log::info!("API Endpoints:");
    log::info!("   POST /api/certificate/generate-and-send");
    log::info!("   POST /api/certificate/generate");
    log::info!("   POST /api/certificate/send-email");
    log::info!("   GET  /api/health");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(Cors::permissive())
            .app_data(app_state.clone())
            .app_data(json_config())
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .default_service(web::to(not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
