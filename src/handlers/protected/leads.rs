// handlers/protected/leads.rs - /api/leads CRUD handlers

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    Extension, Json,
};

use super::utils::{parse_id, ListParams};
use crate::database::models::lead::{Lead, LeadPayload, LeadStatus, Leads};
use crate::filter::{FilterCondition, FilterError, ListQuery, Page, SqlParam};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::routes::AppState;

/// GET /api/leads - paginated list, newest first, optional `status` filter
pub async fn leads_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Page<Lead>> {
    let Query(params) = query?;
    let page = params.page_request::<Leads>(state.config.listing.default_page_size)?;

    let mut list = ListQuery::new(page);
    if let Some(raw) = params.status() {
        let status: LeadStatus = raw.parse().map_err(|_| FilterError::InvalidFilterValue {
            column: "status".to_string(),
            value: raw.to_string(),
        })?;
        list = list.with_filter(FilterCondition::eq("status", SqlParam::Text(status.as_str().to_string())));
    }

    let result = state.db.leads().list(&list).await?;
    tracing::debug!(
        user_id = user.id,
        page = result.pagination.page,
        total = result.pagination.total,
        "listed leads"
    );
    Ok(ApiResponse::success(result))
}

/// GET /api/leads/:id - single lead with its company nested (or null)
pub async fn leads_get(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Lead> {
    let id = parse_id(path, "lead")?;
    let lead = state.db.leads().select_404(id).await?;
    Ok(ApiResponse::success(lead))
}

/// POST /api/leads - requires name, email, companyId (may be null) and status
pub async fn leads_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<LeadPayload>, JsonRejection>,
) -> ApiResult<Lead> {
    let Json(payload) = body?;
    let input = payload.validate_create()?;

    let lead = state.db.leads().create(&input).await?;
    tracing::info!(user_id = user.id, lead_id = lead.id, "created lead");
    Ok(ApiResponse::created(lead))
}

/// PUT /api/leads/:id - full replace; omitted status keeps the stored one
pub async fn leads_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<LeadPayload>, JsonRejection>,
) -> ApiResult<Lead> {
    let id = parse_id(path, "lead")?;
    let Json(payload) = body?;
    let input = payload.validate_update()?;

    let lead = state.db.leads().update(id, &input).await?;
    tracing::info!(user_id = user.id, lead_id = id, "updated lead");
    Ok(ApiResponse::success(lead))
}

/// DELETE /api/leads/:id - 204 on success, 404 if already gone
pub async fn leads_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<()> {
    let id = parse_id(path, "lead")?;
    state.db.leads().delete(id).await?;
    tracing::info!(user_id = user.id, lead_id = id, "deleted lead");
    Ok(ApiResponse::<()>::no_content())
}
