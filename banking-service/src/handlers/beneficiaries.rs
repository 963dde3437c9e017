//! Beneficiary endpoints. Beneficiaries are the only resource clients can
//! create, edit and delete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{
        BeneficiaryListResponse, BeneficiarySummary, CreateBeneficiaryRequest,
        UpdateBeneficiaryRequest,
    },
    models::Beneficiary,
    services::{
        metrics::{record_beneficiary_created, record_beneficiary_deleted},
        CollectionQuery, QuerySpec,
    },
    utils::{ApiJson, IdKind, QueryParams},
    AppState,
};

const BENEFICIARY_QUERY: QuerySpec = QuerySpec::exact(&["beneficiaryType", "status"]);

pub async fn list_beneficiaries(
    State(state): State<AppState>,
    QueryParams(params): QueryParams,
) -> Result<Json<BeneficiaryListResponse>, AppError> {
    let query = CollectionQuery::parse(&params, &BENEFICIARY_QUERY)?;
    let page = query.execute(state.beneficiaries.list().await);

    Ok(Json(BeneficiaryListResponse {
        beneficiaries: page
            .items
            .into_iter()
            .map(BeneficiarySummary::from)
            .collect(),
        pagination: page.pagination,
    }))
}

pub async fn create_beneficiary(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateBeneficiaryRequest>,
) -> Result<(StatusCode, Json<Beneficiary>), AppError> {
    let new_beneficiary = payload.validated()?;

    let mut beneficiary = state.generator.lock().await.beneficiary(None);
    new_beneficiary.apply_to(&mut beneficiary);
    state.beneficiaries.insert(beneficiary.clone()).await;

    tracing::info!(
        beneficiary_id = %beneficiary.beneficiary_id,
        beneficiary_type = %beneficiary.beneficiary_type,
        "Created beneficiary"
    );
    record_beneficiary_created();

    Ok((StatusCode::CREATED, Json(beneficiary)))
}

pub async fn get_beneficiary(
    State(state): State<AppState>,
    Path(beneficiary_id): Path<String>,
) -> Result<Json<Beneficiary>, AppError> {
    IdKind::Beneficiary.validate(&beneficiary_id)?;

    state
        .beneficiaries
        .get(&beneficiary_id)
        .await
        .map(Json)
        .ok_or_else(|| IdKind::Beneficiary.not_found(&beneficiary_id))
}

/// Update nickname, email or phone. Fields left out of the body keep their
/// current value.
pub async fn update_beneficiary(
    State(state): State<AppState>,
    Path(beneficiary_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateBeneficiaryRequest>,
) -> Result<Json<Beneficiary>, AppError> {
    IdKind::Beneficiary.validate(&beneficiary_id)?;
    let changes = payload.into_changes()?;

    let updated = state
        .beneficiaries
        .update(&beneficiary_id, |beneficiary| {
            beneficiary.apply(changes);
            beneficiary.clone()
        })
        .await
        .ok_or_else(|| IdKind::Beneficiary.not_found(&beneficiary_id))?;

    tracing::info!(beneficiary_id = %beneficiary_id, "Updated beneficiary");
    Ok(Json(updated))
}

/// Delete a beneficiary. Deletion is unconditional.
pub async fn delete_beneficiary(
    State(state): State<AppState>,
    Path(beneficiary_id): Path<String>,
) -> Result<StatusCode, AppError> {
    IdKind::Beneficiary.validate(&beneficiary_id)?;

    state
        .beneficiaries
        .remove(&beneficiary_id)
        .await
        .ok_or_else(|| IdKind::Beneficiary.not_found(&beneficiary_id))?;

    tracing::info!(beneficiary_id = %beneficiary_id, "Deleted beneficiary");
    record_beneficiary_deleted();

    Ok(StatusCode::NO_CONTENT)
}
