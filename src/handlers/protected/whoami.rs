// handlers/protected/whoami.rs - GET /api/auth/whoami handler

use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::database::models::user::PublicUser;

/// GET /api/auth/whoami - identity carried by the presented token
pub async fn whoami_get(Extension(user): Extension<AuthUser>) -> ApiResult<PublicUser> {
    Ok(ApiResponse::success(PublicUser {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
    }))
}
