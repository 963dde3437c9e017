//! Mock credential check for the banking mock services.
//!
//! Accepts any Bearer token, API key or client ID that is long enough. No
//! credential is verified against an identity provider.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const CLIENT_ID_HEADER: &str = "x-ibm-client-id";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
    pub min_credential_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_credential_length: 10,
        }
    }
}

/// Caller identity attached to authenticated requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub customer_id: String,
    pub scopes: Vec<&'static str>,
}

const MOCK_SCOPES: &[&str] = &[
    "accounts:read",
    "accounts:write",
    "transactions:read",
    "payments:read",
    "payments:write",
    "beneficiaries:read",
    "beneficiaries:write",
    "statements:read",
];

impl AuthContext {
    fn mock() -> Self {
        let token = Uuid::new_v4().simple().to_string();
        Self {
            user_id: format!("user-{}", &token[..8]),
            customer_id: format!("cust-{}", &token[8..16]),
            scopes: MOCK_SCOPES.to_vec(),
        }
    }
}

/// Validate the presence and shape of the request credentials.
pub fn check_credentials(headers: &HeaderMap, config: &AuthConfig) -> Result<AuthContext, AppError> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
    };

    let authorization = header(AUTHORIZATION.as_str());
    let api_key = header(API_KEY_HEADER);
    let client_id = header(CLIENT_ID_HEADER);

    if authorization.is_none() && api_key.is_none() && client_id.is_none() {
        return Err(AppError::unauthorized(
            "UNAUTHORIZED",
            "Authentication required. Please provide a valid Bearer token, API key, or Client ID.",
        ));
    }

    if let Some(value) = authorization {
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if token.len() < config.min_credential_length {
            return Err(AppError::unauthorized(
                "INVALID_TOKEN",
                "Invalid or expired authentication token",
            ));
        }
    }

    let too_short = |value: Option<&str>| {
        value.is_some_and(|value| value.len() < config.min_credential_length)
    };
    if too_short(api_key) || too_short(client_id) {
        return Err(AppError::unauthorized(
            "INVALID_CREDENTIALS",
            "Invalid API key or Client ID",
        ));
    }

    Ok(AuthContext::mock())
}

pub async fn mock_auth_middleware(
    State(config): State<AuthConfig>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if config.enabled {
        let context = check_credentials(req.headers(), &config)?;
        tracing::debug!(user_id = %context.user_id, "Request authenticated");
        req.extensions_mut().insert(context);
    }

    Ok(next.run(req).await)
}
