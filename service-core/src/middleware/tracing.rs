use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use chrono::{SecondsFormat, Utc};
use std::future::Future;
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
pub const REQUEST_TIMESTAMP_HEADER: &str = "x-request-timestamp";

tokio::task_local! {
    static CORRELATION_ID: String;
}

/// Correlation ID of the request currently being served, if any.
pub fn current_correlation_id() -> Option<String> {
    CORRELATION_ID.try_with(|id| id.clone()).ok()
}

/// Run `fut` with `id` as the current correlation ID.
pub async fn with_correlation_id<F: Future>(id: String, fut: F) -> F::Output {
    CORRELATION_ID.scope(id, fut).await
}

pub async fn correlation_id_middleware(mut req: Request, next: Next) -> Response {
    let correlation_id = req
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let received_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    if let Ok(header_value) = HeaderValue::from_str(&correlation_id) {
        req.headers_mut().insert(CORRELATION_ID_HEADER, header_value);
    }

    let credentials = credential_kinds(&req);
    tracing::info!(
        correlation_id = %correlation_id,
        method = %req.method(),
        path = %req.uri().path(),
        credentials = %credentials,
        "Request received"
    );

    let mut response = with_correlation_id(correlation_id.clone(), next.run(req)).await;

    if let Ok(header_value) = HeaderValue::from_str(&correlation_id) {
        response
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, header_value);
    }
    if let Ok(header_value) = HeaderValue::from_str(&received_at) {
        response
            .headers_mut()
            .insert(REQUEST_TIMESTAMP_HEADER, header_value);
    }

    response
}

// Names only; credential values never reach the logs.
fn credential_kinds(req: &Request) -> String {
    let kinds: Vec<&str> = [
        ("authorization", "bearer"),
        ("x-api-key", "api-key"),
        ("x-ibm-client-id", "client-id"),
    ]
    .into_iter()
    .filter(|(header, _)| req.headers().contains_key(*header))
    .map(|(_, kind)| kind)
    .collect();

    if kinds.is_empty() {
        "none".to_string()
    } else {
        kinds.join(",")
    }
}
