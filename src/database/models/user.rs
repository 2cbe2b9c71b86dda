use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored credential record. Not `Serialize`: the password hash never leaves
/// the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Redacted view returned to clients after login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub full_name: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
        }
    }
}
