//! Account endpoints.
//!
//! Accounts are read-only. Transactions and statements under an account are
//! generated fresh on every request.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Datelike, Utc};
use service_core::error::AppError;
use std::collections::HashMap;

use crate::{
    dtos::{
        AccountListResponse, AccountSummary, BalanceResponse, StatementListResponse,
        TransactionListResponse,
    },
    models::{Account, Statement, StatementPeriod},
    services::{query::paginate, CollectionQuery, PageRequest, QuerySpec},
    utils::{IdKind, QueryParams},
    AppState,
};

/// Transactions generated per account transaction listing.
pub const ACCOUNT_TRANSACTION_COUNT: usize = 50;
/// Monthly statements generated per account statement listing.
pub const ACCOUNT_STATEMENT_MONTHS: u32 = 12;

const ACCOUNT_QUERY: QuerySpec = QuerySpec::exact(&["accountType"]);

const ACCOUNT_TRANSACTION_QUERY: QuerySpec = QuerySpec {
    exact: &["transactionType"],
    date_range: true,
    amount_range: true,
    newest_first: true,
};

async fn find_account(state: &AppState, account_id: &str) -> Result<Account, AppError> {
    IdKind::Account.validate(account_id)?;
    state
        .accounts
        .get(account_id)
        .await
        .ok_or_else(|| IdKind::Account.not_found(account_id))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    QueryParams(params): QueryParams,
) -> Result<Json<AccountListResponse>, AppError> {
    let query = CollectionQuery::parse(&params, &ACCOUNT_QUERY)?;
    let page = query.execute(state.accounts.list().await);

    tracing::info!(
        returned = page.items.len(),
        total = page.pagination.total_records,
        "Listing accounts"
    );

    Ok(Json(AccountListResponse {
        accounts: page.items.into_iter().map(AccountSummary::from).collect(),
        pagination: page.pagination,
    }))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<Account>, AppError> {
    let account = find_account(&state, &account_id).await?;
    tracing::info!(account_id = %account_id, "Fetched account");
    Ok(Json(account))
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account = find_account(&state, &account_id).await?;
    Ok(Json(BalanceResponse::new(account, Utc::now())))
}

pub async fn list_account_transactions(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    QueryParams(params): QueryParams,
) -> Result<Json<TransactionListResponse>, AppError> {
    let account = find_account(&state, &account_id).await?;
    let query = CollectionQuery::parse(&params, &ACCOUNT_TRANSACTION_QUERY)?;

    let generated: Vec<_> = {
        let mut generator = state.generator.lock().await;
        (0..ACCOUNT_TRANSACTION_COUNT)
            .map(|_| generator.transaction(&account.account_id, None))
            .collect()
    };
    let page = query.execute(generated);

    tracing::info!(
        account_id = %account_id,
        returned = page.items.len(),
        total = page.pagination.total_records,
        "Listing account transactions"
    );

    Ok(Json(TransactionListResponse {
        transactions: page.items,
        pagination: page.pagination,
    }))
}

fn parse_year(params: &HashMap<String, String>) -> Result<Option<i32>, AppError> {
    let Some(raw) = params.get("year").map(|v| v.trim()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::invalid_parameter(format!(
            "Invalid year '{raw}': expected a four-digit year"
        )));
    }
    raw.parse()
        .map(Some)
        .map_err(|_| AppError::invalid_parameter(format!("Invalid year '{raw}'")))
}

fn parse_month(params: &HashMap<String, String>) -> Result<Option<u32>, AppError> {
    let Some(raw) = params.get("month").map(|v| v.trim()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<u32>()
        .ok()
        .filter(|month| (1..=12).contains(month))
        .map(Some)
        .ok_or_else(|| {
            AppError::invalid_parameter(format!(
                "Invalid month '{raw}': must be an integer between 1 and 12"
            ))
        })
}

pub async fn list_account_statements(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    QueryParams(params): QueryParams,
) -> Result<Json<StatementListResponse>, AppError> {
    let account = find_account(&state, &account_id).await?;
    let page_request = PageRequest::parse(&params)?;
    let year = parse_year(&params)?;
    let month = parse_month(&params)?;

    let statements: Vec<Statement> = {
        let mut generator = state.generator.lock().await;
        let today = generator.now().date_naive();
        (0..ACCOUNT_STATEMENT_MONTHS)
            .filter_map(|back| StatementPeriod::months_before(today, back))
            .map(|period| generator.statement(&account.account_id, period, None))
            .collect()
    };

    let matching: Vec<Statement> = statements
        .into_iter()
        .filter(|statement| year.map_or(true, |year| statement.period.start_date.year() == year))
        .filter(|statement| {
            month.map_or(true, |month| statement.period.start_date.month() == month)
        })
        .collect();
    let page = paginate(matching, page_request);

    tracing::info!(
        account_id = %account_id,
        returned = page.items.len(),
        "Listing account statements"
    );

    Ok(Json(StatementListResponse {
        statements: page.items,
        pagination: page.pagination,
    }))
}
