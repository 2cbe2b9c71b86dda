use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::auth::password;
use crate::config::DatabaseConfig;
use crate::database::models::company::Companies;
use crate::database::models::lead::Leads;
use crate::database::repository::Repository;
use crate::filter::FilterError;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A foreign key points at a row that does not exist. Carries the public
    /// name of the offending field.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Seed error: {0}")]
    Seed(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::InvalidReference("reference".to_string());
            }
        }
        DatabaseError::Sqlx(err)
    }
}

impl DatabaseError {
    /// Name the field behind a foreign key violation; other errors pass through.
    pub fn for_reference(self, field: &str) -> Self {
        match self {
            DatabaseError::InvalidReference(_) => DatabaseError::InvalidReference(field.to_string()),
            other => other,
        }
    }
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        domain TEXT,
        description TEXT,
        website TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leads (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        company_id INTEGER REFERENCES companies(id) ON DELETE SET NULL,
        status TEXT NOT NULL DEFAULT 'active',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status)",
    "CREATE INDEX IF NOT EXISTS idx_leads_company_id ON leads(company_id)",
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        full_name TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
];

pub const SEED_ADMIN_EMAIL: &str = "admin@leadblocks.com";
pub const SEED_ADMIN_NAME: &str = "Laura";
pub const SEED_ADMIN_PASSWORD: &str = "Pass12@rd!";

/// Shared storage handle. Opened once at startup and handed to the router;
/// cloning shares the underlying pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database file described by `config` and apply the schema.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Io(e.to_string()))?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        info!(path = %config.path.display(), "Database opened");

        let db = Self { pool };
        db.apply_schema().await?;
        Ok(db)
    }

    /// Open a private in-memory database. Every call yields an isolated store.
    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DatabaseError::Connection(e.to_string()))?
            .foreign_keys(true);

        // A single connection that never idles out keeps the memory database alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        let db = Self { pool };
        db.apply_schema().await?;
        Ok(db)
    }

    async fn apply_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert the default admin account when no users exist yet.
    /// Returns `true` when a user was created.
    pub async fn seed_admin(&self, password_cost: u32) -> Result<bool, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(false);
        }

        let hash = password::hash_password(SEED_ADMIN_PASSWORD, password_cost)
            .map_err(|e| DatabaseError::Seed(e.to_string()))?;

        self.insert_user(SEED_ADMIN_EMAIL, SEED_ADMIN_NAME, &hash).await?;
        info!(email = SEED_ADMIN_EMAIL, "Seeded default admin user");
        Ok(true)
    }

    /// Insert a user with an already-hashed password; returns the new id.
    pub async fn insert_user(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
    ) -> Result<i64, DatabaseError> {
        let result = sqlx::query("INSERT INTO users (email, full_name, password_hash) VALUES (?, ?, ?)")
            .bind(email)
            .bind(full_name)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub fn leads(&self) -> Repository<Leads> {
        Repository::new(self.pool.clone())
    }

    pub fn companies(&self) -> Repository<Companies> {
        Repository::new(self.pool.clone())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
