use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use service_core::error::AppError;

use crate::{
    models::StatementFormat,
    services::{documents, metrics::record_statement_download},
    utils::{IdKind, QueryParams},
    AppState,
};

/// Download a stored statement as PDF (default) or CSV.
pub async fn download_statement(
    State(state): State<AppState>,
    Path(statement_id): Path<String>,
    QueryParams(params): QueryParams,
) -> Result<impl IntoResponse, AppError> {
    IdKind::Statement.validate(&statement_id)?;

    let statement = state
        .statements
        .get(&statement_id)
        .await
        .ok_or_else(|| IdKind::Statement.not_found(&statement_id))?;

    let format = match params.get("format").map(|raw| raw.trim()).filter(|raw| !raw.is_empty()) {
        None => StatementFormat::Pdf,
        Some(raw) => StatementFormat::from_query(raw).ok_or_else(|| {
            AppError::bad_request("INVALID_FORMAT", "Format must be either pdf or csv")
        })?,
    };

    let body = documents::render(&statement, format)?;

    tracing::info!(
        statement_id = %statement_id,
        format = %format,
        size = body.len(),
        "Statement download completed"
    );
    record_statement_download(format.as_str());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                documents::content_disposition(&statement, format),
            ),
        ],
        body,
    ))
}
