use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{Account, AccountStatus, AccountType, Statement, Transaction};
use crate::services::Pagination;

/// Account as shown in list responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_id: String,
    pub account_number: String,
    pub account_type: AccountType,
    pub currency: String,
    pub status: AccountStatus,
    pub nickname: String,
    pub opened_date: NaiveDate,
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.account_id,
            account_number: account.account_number,
            account_type: account.account_type,
            currency: account.currency,
            status: account.status,
            nickname: account.nickname,
            opened_date: account.opened_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountListResponse {
    pub accounts: Vec<AccountSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub account_id: String,
    pub currency: String,
    pub available_balance: f64,
    pub current_balance: f64,
    pub pending_balance: f64,
    pub overdraft_limit: f64,
    pub last_updated: DateTime<Utc>,
}

impl BalanceResponse {
    pub fn new(account: Account, last_updated: DateTime<Utc>) -> Self {
        Self {
            account_id: account.account_id,
            currency: account.currency,
            available_balance: account.available_balance,
            current_balance: account.current_balance,
            pending_balance: 0.0,
            overdraft_limit: account.overdraft_limit,
            last_updated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct StatementListResponse {
    pub statements: Vec<Statement>,
    pub pagination: Pagination,
}
