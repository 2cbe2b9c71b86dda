use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{non_blank, ValidationError};
use crate::database::manager::DatabaseError;
use crate::database::repository::Repository;
use crate::database::resource::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub created_at: String,
}

/// Marker for the `companies` table
pub struct Companies;

impl Resource for Companies {
    const TABLE: &'static str = "companies";
    const LABEL: &'static str = "Company";
    const SELECT: &'static str = "companies.id AS id, companies.name AS name, companies.domain AS domain, \
         companies.description AS description, companies.website AS website, companies.created_at AS created_at";
    const MAX_PAGE_SIZE: u32 = 100;

    type Row = Company;
    type Record = Company;
}

/// Raw JSON body for create and update
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CompanyPayload {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

/// Validated company fields; update replaces the whole record with these
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyInput {
    pub name: String,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

impl CompanyPayload {
    pub fn validate(self) -> Result<CompanyInput, ValidationError> {
        let name = non_blank(self.name).ok_or_else(|| ValidationError::new("name is required"))?;

        Ok(CompanyInput {
            name,
            domain: non_blank(self.domain),
            description: non_blank(self.description),
            website: non_blank(self.website),
        })
    }
}

impl Repository<Companies> {
    pub async fn create(&self, input: &CompanyInput) -> Result<Company, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO companies (name, domain, description, website) VALUES (?, ?, ?, ?)",
        )
        .bind(input.name.as_str())
        .bind(input.domain.as_deref())
        .bind(input.description.as_deref())
        .bind(input.website.as_deref())
        .execute(self.pool())
        .await?;

        self.select_404(result.last_insert_rowid()).await
    }

    pub async fn update(&self, id: i64, input: &CompanyInput) -> Result<Company, DatabaseError> {
        let result = sqlx::query(
            "UPDATE companies SET name = ?, domain = ?, description = ?, website = ? WHERE id = ?",
        )
        .bind(input.name.as_str())
        .bind(input.domain.as_deref())
        .bind(input.description.as_deref())
        .bind(input.website.as_deref())
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.not_found());
        }
        self.select_404(id).await
    }
}
