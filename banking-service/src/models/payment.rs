//! Outgoing payment model and its cancellation rules.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::{query::Filterable, store::Entity};

code_enum! {
    pub enum PaymentType {
        Domestic => "DOMESTIC",
        International => "INTERNATIONAL",
        Internal => "INTERNAL",
    }
}

code_enum! {
    pub enum Urgency {
        Normal => "NORMAL",
        High => "HIGH",
        Urgent => "URGENT",
    }
}

code_enum! {
    pub enum PaymentStatus {
        Pending => "PENDING",
        Processing => "PROCESSING",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
        Failed => "FAILED",
    }
}

/// Shortest cancellation reason accepted.
pub const MIN_CANCELLATION_REASON_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub payment_id: String,
    pub status: PaymentStatus,
    pub from_account_id: String,
    pub to_beneficiary_id: String,
    pub amount: f64,
    pub currency: String,
    pub payment_type: PaymentType,
    pub reference: String,
    pub scheduled_date: NaiveDate,
    pub urgency: Urgency,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub estimated_completion_date: NaiveDate,
    pub transaction_id: Option<String>,
    pub cancellation_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    AlreadyCancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CancelError {
    #[error("Cannot cancel a completed payment")]
    AlreadyCompleted,
    #[error("Cancellation reason must be at least 5 characters")]
    ReasonTooShort,
}

impl Payment {
    /// Move the payment to CANCELLED.
    ///
    /// COMPLETED is terminal. A payment that is already CANCELLED is left
    /// untouched, whatever reason is given.
    pub fn cancel(
        &mut self,
        reason: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<CancelOutcome, CancelError> {
        match self.status {
            PaymentStatus::Completed => return Err(CancelError::AlreadyCompleted),
            PaymentStatus::Cancelled => return Ok(CancelOutcome::AlreadyCancelled),
            _ => {}
        }

        let reason = reason
            .map(str::trim)
            .filter(|reason| reason.chars().count() >= MIN_CANCELLATION_REASON_LEN)
            .ok_or(CancelError::ReasonTooShort)?;

        self.status = PaymentStatus::Cancelled;
        self.cancelled_at = Some(at);
        self.cancellation_reason = Some(reason.to_string());
        Ok(CancelOutcome::Cancelled)
    }
}

impl Entity for Payment {
    const KIND: &'static str = "payment";

    fn id(&self) -> &str {
        &self.payment_id
    }
}

impl Filterable for Payment {
    fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            "accountId" | "fromAccountId" => Some(&self.from_account_id),
            "beneficiaryId" | "toBeneficiaryId" => Some(&self.to_beneficiary_id),
            "paymentType" => Some(self.payment_type.as_str()),
            _ => None,
        }
    }

    fn event_date(&self) -> Option<NaiveDate> {
        Some(self.scheduled_date)
    }

    fn magnitude(&self) -> Option<f64> {
        Some(self.amount.abs())
    }

    fn sort_key(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}
