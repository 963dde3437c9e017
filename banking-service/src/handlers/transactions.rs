use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::TransactionListResponse,
    models::Transaction,
    services::{CollectionQuery, QuerySpec},
    utils::{IdKind, QueryParams},
    AppState,
};

const TRANSACTION_QUERY: QuerySpec = QuerySpec {
    exact: &["accountId", "transactionType"],
    date_range: true,
    amount_range: true,
    newest_first: true,
};

/// List stored transactions, newest first.
pub async fn list_transactions(
    State(state): State<AppState>,
    QueryParams(params): QueryParams,
) -> Result<Json<TransactionListResponse>, AppError> {
    let query = CollectionQuery::parse(&params, &TRANSACTION_QUERY)?;
    let page = query.execute(state.transactions.list().await);

    tracing::info!(
        filters = ?query.exact,
        returned = page.items.len(),
        total = page.pagination.total_records,
        "Listing transactions"
    );

    Ok(Json(TransactionListResponse {
        transactions: page.items,
        pagination: page.pagination,
    }))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, AppError> {
    IdKind::Transaction.validate(&transaction_id)?;

    let transaction = state
        .transactions
        .get(&transaction_id)
        .await
        .ok_or_else(|| IdKind::Transaction.not_found(&transaction_id))?;

    tracing::info!(transaction_id = %transaction_id, "Fetched transaction");
    Ok(Json(transaction))
}
