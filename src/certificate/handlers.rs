use actix_web::{web, HttpResponse, Responder};
use log::{error, info, warn};
use serde_json::Value;

use crate::certificate::models::{CertificateRequest, GenerateAndSendData, Recipient, ResendRequest};
use crate::generator::GeneratorError;
use crate::{ApiResponse, AppState};

fn generation_failed(err: GeneratorError) -> HttpResponse {
    error!("Certificate generation error: {}", err);
    match err {
        // The render task died without returning an error of its own.
        GeneratorError::Blocking(_) => HttpResponse::InternalServerError().json(ApiResponse::internal_error()),
        err => HttpResponse::InternalServerError()
            .json(ApiResponse::error(format!("Failed to generate certificate: {}", err))),
    }
}

fn validation_failed(errors: Vec<String>) -> HttpResponse {
    warn!("Request rejected: {}", errors.join("; "));
    HttpResponse::BadRequest().json(ApiResponse::validation_failed(errors))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Certificate Service",
    post,
    path = "/certificate/generate-and-send",
    request_body = CertificateRequest,
    responses(
        (status = 200, description = "Certificate generated and emailed; data is GenerateAndSendData", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 500, description = "Generation or email delivery failed", body = ApiResponse)
    )
)]
pub async fn generate_and_send_certificate(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> impl Responder {
    let request = match CertificateRequest::from_value(&body) {
        Ok(request) => request,
        Err(outcome) => return validation_failed(outcome.errors),
    };

    info!("Generating certificate for: {}", request.name);
    let artifact = match state.renderer.generate(&request).await {
        Ok(artifact) => artifact,
        Err(e) => return generation_failed(e),
    };

    info!("Sending email to: {}", request.email);
    match state
        .email
        .send_certificate(&Recipient::from(&request), &artifact)
        .await
    {
        Ok(result) => HttpResponse::Ok().json(ApiResponse::success(
            "Certificate generated and sent successfully",
            GenerateAndSendData::new(&artifact, &result),
        )),
        Err(e) => {
            error!("Email sending error for {}: {}", artifact.filename, e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error(format!("Failed to send email: {}", e)))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Certificate Service",
    post,
    path = "/certificate/generate",
    request_body = CertificateRequest,
    responses(
        (status = 200, description = "Certificate generated; data is CertificateArtifact", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 500, description = "Generation failed", body = ApiResponse)
    )
)]
pub async fn generate_certificate(state: web::Data<AppState>, body: web::Json<Value>) -> impl Responder {
    let request = match CertificateRequest::from_value(&body) {
        Ok(request) => request,
        Err(outcome) => return validation_failed(outcome.errors),
    };

    info!("Generating certificate for: {}", request.name);
    match state.renderer.generate(&request).await {
        Ok(artifact) => {
            HttpResponse::Ok().json(ApiResponse::success("Certificate generated successfully", artifact))
        }
        Err(e) => generation_failed(e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Certificate Service",
    post,
    path = "/certificate/send-email",
    request_body = ResendRequest,
    responses(
        (status = 200, description = "Existing certificate emailed; data is EmailResult", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "Certificate files not found", body = ApiResponse),
        (status = 500, description = "Email delivery failed", body = ApiResponse)
    )
)]
pub async fn send_certificate_email(state: web::Data<AppState>, body: web::Json<Value>) -> impl Responder {
    let request = match ResendRequest::from_value(&body) {
        Ok(request) => request,
        Err(outcome) => return validation_failed(outcome.errors),
    };

    let artifact = state.storage.artifact(&request.filename);
    if !state.storage.artifact_exists(&artifact) {
        warn!("Resend requested for missing certificate {}", artifact.filename);
        return HttpResponse::NotFound().json(ApiResponse::error("Certificate files not found"));
    }

    info!("Resending {} to {}", artifact.filename, request.email);
    match state
        .email
        .send_certificate(&Recipient::from(&request), &artifact)
        .await
    {
        Ok(result) => HttpResponse::Ok().json(ApiResponse::success("Certificate sent successfully", result)),
        Err(e) => {
            error!("Email sending error for {}: {}", artifact.filename, e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error(format!("Failed to send email: {}", e)))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/certificate/generate-and-send")
            .route(web::post().to(generate_and_send_certificate))
            .default_service(web::to(crate::not_found)),
    )
    .service(
        web::resource("/certificate/generate")
            .route(web::post().to(generate_certificate))
            .default_service(web::to(crate::not_found)),
    )
    .service(
        web::resource("/certificate/send-email")
            .route(web::post().to(send_certificate_email))
            .default_service(web::to(crate::not_found)),
    );
}
