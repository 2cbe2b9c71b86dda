use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::{SessionClaims, TokenError, TokenService};
use crate::error::ApiError;
use crate::routes::AppState;

/// Authenticated user context extracted from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub full_name: String,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            full_name: claims.full_name,
        }
    }
}

/// Internal reason a request was turned away at the gate
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("Authorization header is not a Bearer token")]
    NotBearer,

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<AuthRejection> for ApiError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::MissingHeader | AuthRejection::NotBearer => ApiError::unauthorized("Unauthorized"),
            AuthRejection::Token(_) => ApiError::unauthorized("Invalid or expired token"),
        }
    }
}

/// Bearer-token gate for every protected route
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    match authorize(&headers, &state.tokens) {
        Ok(claims) => {
            let auth_user = AuthUser::from(claims);
            tracing::debug!(user_id = auth_user.id, "request authorized");
            request.extensions_mut().insert(auth_user);
            next.run(request).await
        }
        Err(rejection) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "rejected request: {}",
                rejection
            );
            ApiError::from(rejection).into_response()
        }
    }
}

/// Run the header through the gate's states: no header, wrong scheme, then token verification.
pub fn authorize(headers: &HeaderMap, tokens: &TokenService) -> Result<SessionClaims, AuthRejection> {
    let token = extract_jwt_from_headers(headers)?;
    Ok(tokens.verify(token)?)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let auth_header = headers.get(AUTHORIZATION).ok_or(AuthRejection::MissingHeader)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthRejection::NotBearer)?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthRejection::NotBearer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TOKEN_TTL_SECS;
    use crate::database::models::user::User;
    use axum::http::HeaderValue;

    fn tokens() -> TokenService {
        TokenService::new("gate-secret", TOKEN_TTL_SECS)
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn token() -> String {
        let user = User {
            id: 3,
            email: "laura@leadblocks.com".into(),
            full_name: "Laura".into(),
            password_hash: String::new(),
            created_at: String::new(),
        };
        tokens().issue(&user).unwrap()
    }

    #[test]
    fn missing_header() {
        assert_eq!(authorize(&HeaderMap::new(), &tokens()), Err(AuthRejection::MissingHeader));
    }

    #[test]
    fn non_bearer_scheme() {
        assert_eq!(authorize(&headers("Basic abc"), &tokens()), Err(AuthRejection::NotBearer));
        assert_eq!(authorize(&headers(&token()), &tokens()), Err(AuthRejection::NotBearer));
    }

    #[test]
    fn bearer_token_is_verified() {
        let claims = authorize(&headers(&format!("Bearer {}", token())), &tokens()).unwrap();
        assert_eq!(claims.id, 3);

        let rejection = authorize(&headers("Bearer garbage"), &tokens()).unwrap_err();
        assert_eq!(rejection, AuthRejection::Token(TokenError::Malformed));
    }

    #[test]
    fn client_message_hides_reason() {
        let expired: ApiError = AuthRejection::Token(TokenError::Expired).into();
        let forged: ApiError = AuthRejection::Token(TokenError::InvalidSignature).into();
        assert_eq!(expired, forged);
        assert_eq!(expired.status_code(), 401);

        let missing: ApiError = AuthRejection::MissingHeader.into();
        assert_eq!(missing.message(), "Unauthorized");
    }
}
