//! Customer account model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::services::{query::Filterable, store::Entity};

code_enum! {
    /// Product type of an account.
    pub enum AccountType {
        Checking => "CHECKING",
        Savings => "SAVINGS",
        Business => "BUSINESS",
    }
}

code_enum! {
    pub enum AccountStatus {
        Active => "ACTIVE",
        Dormant => "DORMANT",
        Closed => "CLOSED",
    }
}

impl AccountType {
    /// Display name given to freshly opened accounts.
    pub fn default_nickname(&self) -> &'static str {
        match self {
            Self::Checking => "Main Account",
            Self::Savings => "Savings Account",
            Self::Business => "Business Account",
        }
    }

    pub fn overdraft_limit(&self) -> f64 {
        match self {
            Self::Checking => 1000.0,
            Self::Savings | Self::Business => 0.0,
        }
    }

    pub fn interest_rate(&self) -> f64 {
        match self {
            Self::Savings => 2.5,
            Self::Checking | Self::Business => 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub branch_id: String,
    pub branch_name: String,
    pub branch_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: String,
    /// Masked number, e.g. `****1234`.
    pub account_number: String,
    pub full_account_number: String,
    pub account_type: AccountType,
    pub currency: String,
    pub status: AccountStatus,
    pub nickname: String,
    pub opened_date: NaiveDate,
    pub branch: Branch,
    pub available_balance: f64,
    pub current_balance: f64,
    pub overdraft_limit: f64,
    pub interest_rate: f64,
    pub last_transaction_date: DateTime<Utc>,
}

impl Entity for Account {
    const KIND: &'static str = "account";

    fn id(&self) -> &str {
        &self.account_id
    }
}

impl Filterable for Account {
    fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "accountType" => Some(self.account_type.as_str()),
            "status" => Some(self.status.as_str()),
            "currency" => Some(&self.currency),
            _ => None,
        }
    }

    fn event_date(&self) -> Option<NaiveDate> {
        Some(self.opened_date)
    }
}
