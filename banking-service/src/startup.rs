//! Application startup and lifecycle management.

use axum::{
    http::{HeaderName, HeaderValue},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    auth::mock_auth_middleware,
    metrics::metrics_middleware,
    tracing::{correlation_id_middleware, CORRELATION_ID_HEADER},
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::Config;
use crate::handlers::{self, accounts, beneficiaries, payments, statements, transactions};
use crate::AppState;

pub const API_VERSION: &str = "1.0.0";
pub const API_VERSION_HEADER: &str = "x-api-version";

/// Build the full HTTP router: resource routes behind the credential check,
/// service endpoints open, and the shared middleware stack around both.
pub fn build_router(state: AppState) -> Router {
    let resources = Router::new()
        .route("/accounts", get(accounts::list_accounts))
        .route("/accounts/:account_id", get(accounts::get_account))
        .route("/accounts/:account_id/balance", get(accounts::get_balance))
        .route(
            "/accounts/:account_id/transactions",
            get(accounts::list_account_transactions),
        )
        .route(
            "/accounts/:account_id/statements",
            get(accounts::list_account_statements),
        )
        .route("/transactions", get(transactions::list_transactions))
        .route(
            "/transactions/:transaction_id",
            get(transactions::get_transaction),
        )
        .route("/payments", post(payments::create_payment))
        .route("/payments/:payment_id", get(payments::get_payment))
        .route("/payments/:payment_id/cancel", put(payments::cancel_payment))
        .route(
            "/beneficiaries",
            get(beneficiaries::list_beneficiaries).post(beneficiaries::create_beneficiary),
        )
        .route(
            "/beneficiaries/:beneficiary_id",
            get(beneficiaries::get_beneficiary)
                .put(beneficiaries::update_beneficiary)
                .delete(beneficiaries::delete_beneficiary),
        )
        .route(
            "/statements/:statement_id/download",
            get(statements::download_statement),
        )
        // route_layer: unmatched paths fall through to the 404 handler
        // without a credential check.
        .route_layer(from_fn_with_state(
            state.config.auth.clone(),
            mock_auth_middleware,
        ));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .merge(resources)
        .fallback(handlers::not_found)
        .layer(from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderValue::from_static(API_VERSION),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let correlation_id = request
                    .headers()
                    .get(CORRELATION_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    correlation_id = %correlation_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost, so every layer and handler above sees the correlation ID.
        .layer(from_fn(correlation_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Seed the stores and bind the listener (port 0 picks a free port).
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let state = AppState::new(config);
        let router = build_router(state);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        tracing::info!("Banking service listening on port {}", self.port);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
