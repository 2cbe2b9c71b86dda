use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::password::{verify_against_dummy, verify_password, PasswordError};
use crate::auth::token::{TokenError, TokenService};
use crate::database::credentials::CredentialStore;
use crate::database::manager::DatabaseError;
use crate::database::models::user::PublicUser;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("email and password are required")]
    MissingCredentials,

    /// Unknown email and wrong password share this variant
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] DatabaseError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Check credentials and issue a session token.
pub async fn login(
    store: &dyn CredentialStore,
    tokens: &TokenService,
    request: LoginRequest,
) -> Result<LoginResponse, LoginError> {
    let email = request.email.filter(|e| !e.is_empty());
    let password = request.password.filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(LoginError::MissingCredentials);
    };

    let Some(user) = store.find_user_by_email(&email).await? else {
        verify_against_dummy(&password);
        tracing::warn!(email = %email, "login rejected: unknown email");
        return Err(LoginError::InvalidCredentials);
    };

    if !verify_password(&password, &user.password_hash)? {
        tracing::warn!(email = %email, "login rejected: password mismatch");
        return Err(LoginError::InvalidCredentials);
    }

    let token = tokens.issue(&user)?;
    tracing::info!(user_id = user.id, "login succeeded");

    Ok(LoginResponse {
        token,
        user: PublicUser::from(&user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::auth::token::TOKEN_TTL_SECS;
    use crate::database::models::user::User;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MemoryStore(HashMap<String, User>);

    #[async_trait]
    impl CredentialStore for MemoryStore {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
            Ok(self.0.get(email).cloned())
        }
    }

    fn store() -> MemoryStore {
        let user = User {
            id: 1,
            email: "laura@leadblocks.com".into(),
            full_name: "Laura".into(),
            password_hash: hash_password("correct horse", 4).unwrap(),
            created_at: "2024-01-01 00:00:00".into(),
        };
        MemoryStore(HashMap::from([(user.email.clone(), user)]))
    }

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn valid_credentials_issue_a_verifiable_token() {
        let tokens = TokenService::new("secret", TOKEN_TTL_SECS);
        let response = login(&store(), &tokens, request("laura@leadblocks.com", "correct horse"))
            .await
            .unwrap();

        assert_eq!(response.user.email, "laura@leadblocks.com");
        assert_eq!(response.user.full_name, "Laura");
        assert_eq!(tokens.verify(&response.token).unwrap().id, 1);
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_look_the_same() {
        let tokens = TokenService::new("secret", TOKEN_TTL_SECS);

        let unknown = login(&store(), &tokens, request("who@leadblocks.com", "correct horse"))
            .await
            .unwrap_err();
        let wrong = login(&store(), &tokens, request("laura@leadblocks.com", "nope"))
            .await
            .unwrap_err();

        assert!(matches!(unknown, LoginError::InvalidCredentials));
        assert!(matches!(wrong, LoginError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn unknown_email_still_runs_a_hash_check() {
        let tokens = TokenService::new("secret", TOKEN_TTL_SECS);

        let err = login(&store(), &tokens, request("ghost@leadblocks.com", "Pass12@rd!"))
            .await
            .unwrap_err();

        assert!(matches!(err, LoginError::InvalidCredentials));
        assert!(crate::auth::password::dummy_hash_computed());
    }

    #[tokio::test]
    async fn missing_fields_are_a_bad_request() {
        let tokens = TokenService::new("secret", TOKEN_TTL_SECS);

        let err = login(&store(), &tokens, LoginRequest::default()).await.unwrap_err();
        assert!(matches!(err, LoginError::MissingCredentials));

        let err = login(&store(), &tokens, request("laura@leadblocks.com", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::MissingCredentials));
    }
}
