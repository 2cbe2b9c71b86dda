use async_trait::async_trait;

use crate::database::manager::{Database, DatabaseError};
use crate::database::models::user::User;

/// Read-only user lookup used by the login flow
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact-match lookup by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
}

#[async_trait]
impl CredentialStore for Database {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, password_hash, created_at
             FROM users
             WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::manager::SEED_ADMIN_EMAIL;

    #[tokio::test]
    async fn finds_seeded_admin_by_exact_email() {
        let db = Database::open_in_memory().await.unwrap();
        db.seed_admin(4).await.unwrap();

        let user = db.find_user_by_email(SEED_ADMIN_EMAIL).await.unwrap().unwrap();
        assert_eq!(user.full_name, "Laura");

        assert!(db.find_user_by_email("ADMIN@leadblocks.com").await.unwrap().is_none());
        assert!(db.find_user_by_email("nobody@leadblocks.com").await.unwrap().is_none());
    }
}
