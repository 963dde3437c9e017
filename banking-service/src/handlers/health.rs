use axum::{http::header, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use service_core::error::AppError;

use crate::services::get_metrics;

pub const SERVICE_NAME: &str = "banking-service";

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "UP",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Banking Services API Mock",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "metrics": "/metrics",
            "accounts": "/accounts",
            "transactions": "/transactions",
            "payments": "/payments",
            "beneficiaries": "/beneficiaries",
            "statements": "/statements"
        }
    }))
}

/// Prometheus metrics endpoint.
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

pub async fn not_found() -> AppError {
    AppError::not_found("NOT_FOUND", "The requested resource was not found")
}
