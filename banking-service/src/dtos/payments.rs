use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use service_core::error::AppError;
use validator::Validate;

use crate::config::PaymentConfig;
use crate::models::{round_cents, PaymentType, Urgency};
use crate::services::query::parse_iso_date;
use crate::services::PaymentOrder;
use crate::utils::{FieldErrors, IdKind, JsonBody, JsonKind};

static CURRENCY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency pattern is valid"));

const FIELD_ORDER: &[&str] = &[
    "fromAccountId",
    "toBeneficiaryId",
    "amount",
    "currency",
    "paymentType",
    "reference",
    "scheduledDate",
    "urgency",
];

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[validate(required(message = "From account ID is required"))]
    pub from_account_id: Option<String>,

    #[validate(required(message = "To beneficiary ID is required"))]
    pub to_beneficiary_id: Option<String>,

    #[validate(required(message = "Amount is required"))]
    pub amount: Option<f64>,

    #[validate(required(message = "Currency is required"))]
    pub currency: Option<String>,

    #[validate(required(message = "Payment type is required"))]
    pub payment_type: Option<String>,

    #[validate(
        required(message = "Reference is required"),
        length(min = 1, max = 140, message = "Reference must be between 1 and 140 characters")
    )]
    pub reference: Option<String>,

    pub scheduled_date: Option<String>,

    pub urgency: Option<String>,

    #[serde(skip)]
    pub type_errors: FieldErrors,
}

impl JsonBody for CreatePaymentRequest {
    const FIELDS: &'static [(&'static str, JsonKind, &'static str)] = &[
        ("fromAccountId", JsonKind::String, "From account ID must be a string"),
        ("toBeneficiaryId", JsonKind::String, "To beneficiary ID must be a string"),
        ("amount", JsonKind::Number, "Amount must be a number"),
        ("currency", JsonKind::String, "Currency must be a string"),
        ("paymentType", JsonKind::String, "Payment type must be a string"),
        ("reference", JsonKind::String, "Reference must be a string"),
        ("scheduledDate", JsonKind::String, "Scheduled date must be a string"),
        ("urgency", JsonKind::String, "Urgency must be a string"),
    ];

    fn set_type_errors(&mut self, errors: FieldErrors) {
        self.type_errors = errors;
    }
}

impl CreatePaymentRequest {
    /// Check every field, then the amount sign.
    ///
    /// Field problems are reported together as `VALIDATION_ERROR`; a
    /// well-formed request whose amount rounds to zero or less is
    /// `INVALID_AMOUNT`. Amounts are compared after rounding to cents, the
    /// precision they are stored with.
    pub fn into_order(mut self, config: &PaymentConfig) -> Result<PaymentOrder, AppError> {
        let mut errors = std::mem::take(&mut self.type_errors);
        errors.merge_derived(self.validate());

        if let Some(id) = &self.from_account_id {
            if !IdKind::Account.is_valid(id) {
                errors.push(
                    "fromAccountId",
                    "Invalid account ID format. Expected format: acc-XXXXXXXXX",
                );
            }
        }
        if let Some(id) = &self.to_beneficiary_id {
            if !IdKind::Beneficiary.is_valid(id) {
                errors.push(
                    "toBeneficiaryId",
                    "Invalid beneficiary ID format. Expected format: ben-<id>",
                );
            }
        }
        let amount = self.amount.map(round_cents);
        if let Some(amount) = amount {
            if !amount.is_finite() {
                errors.push("amount", "Amount must be a number");
            } else if amount > config.max_amount {
                errors.push(
                    "amount",
                    format!("Amount exceeds maximum payment limit of {}", config.max_amount),
                );
            }
        }
        if let Some(currency) = &self.currency {
            if !CURRENCY_CODE.is_match(currency) {
                errors.push("currency", "Currency must be a 3-letter ISO 4217 code");
            }
        }

        let payment_type = self.payment_type.as_deref().and_then(|raw| {
            let parsed = raw.parse::<PaymentType>().ok();
            if parsed.is_none() {
                errors.push(
                    "paymentType",
                    format!("Payment type must be one of: {}", PaymentType::expected()),
                );
            }
            parsed
        });

        let scheduled_date = match self.scheduled_date.as_deref() {
            None => None,
            Some(raw) => {
                let parsed = parse_iso_date(raw);
                if parsed.is_none() {
                    errors.push("scheduledDate", "Scheduled date must be in format YYYY-MM-DD");
                }
                parsed
            }
        };

        let urgency = match self.urgency.as_deref() {
            None => Some(Urgency::Normal),
            Some(raw) => {
                let parsed = raw.parse::<Urgency>().ok();
                if parsed.is_none() {
                    errors.push(
                        "urgency",
                        format!("Urgency must be one of: {}", Urgency::expected()),
                    );
                }
                parsed
            }
        };

        errors.finish(FIELD_ORDER)?;

        // `finish` succeeded, so every required field is present and valid.
        let (
            Some(from_account_id),
            Some(to_beneficiary_id),
            Some(amount),
            Some(currency),
            Some(payment_type),
            Some(urgency),
        ) = (
            self.from_account_id,
            self.to_beneficiary_id,
            amount,
            self.currency,
            payment_type,
            urgency,
        )
        else {
            return Err(AppError::InternalError(anyhow::anyhow!(
                "validated payment request is missing a field"
            )));
        };

        if amount <= 0.0 {
            return Err(AppError::unprocessable(
                "INVALID_AMOUNT",
                "Amount must be greater than zero",
            ));
        }

        Ok(PaymentOrder {
            from_account_id,
            to_beneficiary_id,
            amount,
            currency,
            payment_type,
            reference: self.reference,
            scheduled_date,
            urgency,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelPaymentRequest {
    pub reason: Option<String>,

    #[serde(skip)]
    pub type_errors: FieldErrors,
}

impl JsonBody for CancelPaymentRequest {
    const FIELDS: &'static [(&'static str, JsonKind, &'static str)] =
        &[("reason", JsonKind::String, "Cancellation reason must be a string")];

    fn set_type_errors(&mut self, errors: FieldErrors) {
        self.type_errors = errors;
    }
}

impl CancelPaymentRequest {
    /// The reason, or the type error recorded for it.
    pub fn into_reason(self) -> Result<Option<String>, AppError> {
        self.type_errors.finish(&["reason"])?;
        Ok(self.reason)
    }
}
