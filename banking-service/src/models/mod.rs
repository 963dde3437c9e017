use thiserror::Error;

/// Declares a wire-level code enum: SCREAMING_SNAKE_CASE on the wire, with
/// `as_str`, `Display`, `FromStr` and the list of accepted codes.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $code:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $code)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Accepted codes, comma separated, for validation messages.
            pub fn expected() -> String {
                Self::ALL
                    .iter()
                    .map(|value| value.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownCode;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($code => Ok($name::$variant),)+
                    other => Err($crate::models::UnknownCode(other.to_string())),
                }
            }
        }
    };
}

pub mod account;
pub mod beneficiary;
pub mod payment;
pub mod statement;
pub mod transaction;

pub use account::{Account, AccountStatus, AccountType, Branch};
pub use beneficiary::{
    BankAddress, Beneficiary, BeneficiaryChanges, BeneficiaryStatus, BeneficiaryType,
};
pub use payment::{CancelError, CancelOutcome, Payment, PaymentStatus, PaymentType, Urgency};
pub use statement::{Statement, StatementFormat, StatementPeriod, StatementStatus};
pub use transaction::{
    Channel, Merchant, Transaction, TransactionMetadata, TransactionStatus, TransactionType,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown code: {0}")]
pub struct UnknownCode(pub String);

/// Round a monetary value to whole cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
