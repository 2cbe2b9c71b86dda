// handlers/public/login.rs - POST /api/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::auth::{self, LoginRequest, LoginResponse};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::routes::AppState;

/// POST /api/login - exchange email and password for a bearer token
///
/// Success: `200 {"token": "...", "user": {"id", "email", "full_name"}}`.
/// Missing fields are 400; unknown email and wrong password are the same 401.
pub async fn login_post(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!("Rejected login body: {}", rejection.body_text());
        ApiError::bad_request("email and password are required")
    })?;

    let response = auth::login(&state.db, &state.tokens, request).await?;
    Ok(ApiResponse::success(response))
}
