//! Payment endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use service_core::error::{AppError, FieldError};
use service_core::middleware::auth::AuthContext;

use crate::{
    dtos::{CancelPaymentRequest, CreatePaymentRequest},
    models::{CancelError, CancelOutcome, Payment, PaymentStatus},
    services::metrics::{record_payment_cancelled, record_payment_created},
    utils::{ApiJson, IdKind},
    AppState,
};

/// Create a payment. New payments start PENDING unless status
/// randomisation is switched on.
pub async fn create_payment(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    ApiJson(payload): ApiJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let order = payload.into_order(&state.config.payments)?;

    let status = (!state.config.payments.randomize_status).then_some(PaymentStatus::Pending);
    let payment = state.generator.lock().await.payment(order, status, None);
    state.payments.insert(payment.clone()).await;

    tracing::info!(
        payment_id = %payment.payment_id,
        customer_id = auth.as_ref().map(|Extension(ctx)| ctx.customer_id.as_str()).unwrap_or("-"),
        from_account_id = %payment.from_account_id,
        amount = payment.amount,
        status = %payment.status,
        "Created payment"
    );
    record_payment_created(payment.status.as_str());

    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<Payment>, AppError> {
    IdKind::Payment.validate(&payment_id)?;

    let payment = state
        .payments
        .get(&payment_id)
        .await
        .ok_or_else(|| IdKind::Payment.not_found(&payment_id))?;

    Ok(Json(payment))
}

/// Cancel a payment. Cancelling an already cancelled payment returns it
/// unchanged; completed payments cannot be cancelled.
pub async fn cancel_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    ApiJson(payload): ApiJson<CancelPaymentRequest>,
) -> Result<Json<Payment>, AppError> {
    IdKind::Payment.validate(&payment_id)?;
    let reason = payload.into_reason()?;

    let now = Utc::now();
    let result = state
        .payments
        .update(&payment_id, |payment| {
            payment
                .cancel(reason.as_deref(), now)
                .map(|outcome| (outcome, payment.clone()))
        })
        .await
        .ok_or_else(|| IdKind::Payment.not_found(&payment_id))?;

    match result {
        Ok((CancelOutcome::Cancelled, payment)) => {
            tracing::info!(payment_id = %payment_id, "Cancelled payment");
            record_payment_cancelled();
            Ok(Json(payment))
        }
        Ok((CancelOutcome::AlreadyCancelled, payment)) => {
            tracing::debug!(payment_id = %payment_id, "Payment already cancelled");
            Ok(Json(payment))
        }
        Err(err @ CancelError::AlreadyCompleted) => {
            tracing::warn!(payment_id = %payment_id, "Refused to cancel completed payment");
            Err(AppError::unprocessable(
                "PAYMENT_ALREADY_COMPLETED",
                err.to_string(),
            ))
        }
        Err(err @ CancelError::ReasonTooShort) => {
            Err(AppError::validation(vec![FieldError::new("reason", err.to_string())]))
        }
    }
}
