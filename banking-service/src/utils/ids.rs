//! Resource ID formats and the errors tied to them.

use once_cell::sync::Lazy;
use regex::Regex;
use service_core::error::AppError;

static ACCOUNT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^acc-\d{9}$").expect("account ID pattern is valid"));

static PREFIXED_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<prefix>[a-z]+)-[A-Za-z0-9-]+$").expect("prefixed ID pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Account,
    Transaction,
    Payment,
    Beneficiary,
    Statement,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Account => "acc",
            Self::Transaction => "txn",
            Self::Payment => "pmt",
            Self::Beneficiary => "ben",
            Self::Statement => "stmt",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Transaction => "Transaction",
            Self::Payment => "Payment",
            Self::Beneficiary => "Beneficiary",
            Self::Statement => "Statement",
        }
    }

    fn invalid_code(&self) -> &'static str {
        match self {
            Self::Account => "INVALID_ACCOUNT_ID",
            Self::Transaction => "INVALID_TRANSACTION_ID",
            Self::Payment => "INVALID_PAYMENT_ID",
            Self::Beneficiary => "INVALID_BENEFICIARY_ID",
            Self::Statement => "INVALID_STATEMENT_ID",
        }
    }

    fn not_found_code(&self) -> &'static str {
        match self {
            Self::Account => "ACCOUNT_NOT_FOUND",
            Self::Transaction => "TRANSACTION_NOT_FOUND",
            Self::Payment => "PAYMENT_NOT_FOUND",
            Self::Beneficiary => "BENEFICIARY_NOT_FOUND",
            Self::Statement => "STATEMENT_NOT_FOUND",
        }
    }

    pub fn is_valid(&self, id: &str) -> bool {
        match self {
            Self::Account => ACCOUNT_ID.is_match(id),
            _ => PREFIXED_ID
                .captures(id)
                .is_some_and(|captures| &captures["prefix"] == self.prefix()),
        }
    }

    /// `INVALID_<KIND>_ID` unless `id` has this kind's format.
    pub fn validate(&self, id: &str) -> Result<(), AppError> {
        if self.is_valid(id) {
            return Ok(());
        }

        let expected = match self {
            Self::Account => "acc-XXXXXXXXX".to_string(),
            _ => format!("{}-<id>", self.prefix()),
        };
        Err(AppError::bad_request(
            self.invalid_code(),
            format!(
                "Invalid {} ID format. Expected format: {expected}",
                self.label().to_lowercase()
            ),
        ))
    }

    pub fn not_found(&self, id: &str) -> AppError {
        AppError::not_found(self.not_found_code(), format!("{} {id} not found", self.label()))
    }
}
