// handlers/protected/companies.rs - /api/companies CRUD handlers

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    Extension, Json,
};

use super::utils::{parse_id, ListParams};
use crate::database::models::company::{Companies, Company, CompanyPayload};
use crate::filter::{ListQuery, Page};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::routes::AppState;

/// GET /api/companies - paginated list, newest first
pub async fn companies_list(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Page<Company>> {
    let Query(params) = query?;
    let page = params.page_request::<Companies>(state.config.listing.default_page_size)?;

    let result = state.db.companies().list(&ListQuery::new(page)).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/companies/:id
pub async fn companies_get(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Company> {
    let id = parse_id(path, "company")?;
    let company = state.db.companies().select_404(id).await?;
    Ok(ApiResponse::success(company))
}

/// POST /api/companies - name required; domain, description, website optional
pub async fn companies_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<CompanyPayload>, JsonRejection>,
) -> ApiResult<Company> {
    let Json(payload) = body?;
    let input = payload.validate()?;

    let company = state.db.companies().create(&input).await?;
    tracing::info!(user_id = user.id, company_id = company.id, "created company");
    Ok(ApiResponse::created(company))
}

/// PUT /api/companies/:id - full replace
pub async fn companies_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<CompanyPayload>, JsonRejection>,
) -> ApiResult<Company> {
    let id = parse_id(path, "company")?;
    let Json(payload) = body?;
    let input = payload.validate()?;

    let company = state.db.companies().update(id, &input).await?;
    tracing::info!(user_id = user.id, company_id = id, "updated company");
    Ok(ApiResponse::success(company))
}

/// DELETE /api/companies/:id - dependent leads keep existing with companyId cleared
pub async fn companies_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<()> {
    let id = parse_id(path, "company")?;
    state.db.companies().delete(id).await?;
    tracing::info!(user_id = user.id, company_id = id, "deleted company");
    Ok(ApiResponse::<()>::no_content())
}
