/// Liveness and readiness probes
use crate::AppState;
use actix_web::{web, HttpResponse};
use std::time::Instant;

pub async fn health_summary(state: web::Data<AppState>) -> HttpResponse {
    match state.repo.health_check().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "forum-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "service": "forum-service"
            }))
        }
    }
}

pub async fn readiness_check(state: web::Data<AppState>) -> HttpResponse {
    let start = Instant::now();
    let result = state.repo.health_check().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "ready": true,
            "storage": { "status": "healthy", "latency_ms": latency_ms }
        })),
        Err(e) => {
            tracing::warn!(error = %e, latency_ms, "readiness check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "ready": false,
                "storage": { "status": "unhealthy", "latency_ms": latency_ms }
            }))
        }
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
