use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::company::Company;
use super::{deserialize_present, non_blank, ValidationError};
use crate::database::manager::DatabaseError;
use crate::database::repository::Repository;
use crate::database::resource::Resource;

/// Closed set of lead pipeline states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    Active,
    Inactive,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Converted,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 8] = [
        LeadStatus::Active,
        LeadStatus::Inactive,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Proposal,
        LeadStatus::Negotiation,
        LeadStatus::Converted,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Active => "active",
            LeadStatus::Inactive => "inactive",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::Converted => "converted",
            LeadStatus::Lost => "lost",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::new("Invalid status"))
    }
}

/// Lead as returned to clients, with its company joined in at read time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub company_id: Option<i64>,
    pub status: LeadStatus,
    pub created_at: String,
    pub company: Option<Company>,
}

/// Flat row produced by the `leads LEFT JOIN companies` select
#[derive(Debug, FromRow)]
pub struct LeadRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub company_id: Option<i64>,
    pub status: LeadStatus,
    pub created_at: String,
    pub company_name: Option<String>,
    pub company_domain: Option<String>,
    pub company_description: Option<String>,
    pub company_website: Option<String>,
    pub company_created_at: Option<String>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        let company = match (row.company_id, row.company_name) {
            (Some(id), Some(name)) => Some(Company {
                id,
                name,
                domain: row.company_domain,
                description: row.company_description,
                website: row.company_website,
                created_at: row.company_created_at.unwrap_or_default(),
            }),
            _ => None,
        };

        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            company_id: row.company_id,
            status: row.status,
            created_at: row.created_at,
            company,
        }
    }
}

/// Marker for the `leads` table
pub struct Leads;

impl Resource for Leads {
    const TABLE: &'static str = "leads";
    const LABEL: &'static str = "Lead";
    const SELECT: &'static str = "leads.id AS id, leads.name AS name, leads.email AS email, \
         leads.company_id AS company_id, leads.status AS status, leads.created_at AS created_at, \
         companies.name AS company_name, companies.domain AS company_domain, \
         companies.description AS company_description, companies.website AS company_website, \
         companies.created_at AS company_created_at";
    const JOIN: &'static str = "LEFT JOIN companies ON companies.id = leads.company_id";
    const MAX_PAGE_SIZE: u32 = 100;
    const FILTERS: &'static [&'static str] = &["status"];

    type Row = LeadRow;
    type Record = Lead;
}

/// Raw JSON body for create and update.
///
/// `companyId` must be present on both; an explicit `null` means "no company".
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, alias = "company_id", deserialize_with = "deserialize_present")]
    pub company_id: Option<Option<i64>>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadInput {
    pub name: String,
    pub email: String,
    pub company_id: Option<i64>,
    pub status: LeadStatus,
}

/// Full-record replacement; `status: None` keeps the stored status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadUpdate {
    pub name: String,
    pub email: String,
    pub company_id: Option<i64>,
    pub status: Option<LeadStatus>,
}

impl LeadPayload {
    pub fn validate_create(self) -> Result<LeadInput, ValidationError> {
        let missing = || ValidationError::new("name, email, companyId and status are required");

        let name = non_blank(self.name).ok_or_else(missing)?;
        let email = non_blank(self.email).ok_or_else(missing)?;
        let company_id = self.company_id.ok_or_else(missing)?;
        let status = non_blank(self.status).ok_or_else(missing)?.parse()?;

        Ok(LeadInput {
            name,
            email,
            company_id,
            status,
        })
    }

    pub fn validate_update(self) -> Result<LeadUpdate, ValidationError> {
        let missing = || ValidationError::new("name, email and companyId are required");

        let name = non_blank(self.name).ok_or_else(missing)?;
        let email = non_blank(self.email).ok_or_else(missing)?;
        let company_id = self.company_id.ok_or_else(missing)?;
        let status = non_blank(self.status).map(|s| s.parse()).transpose()?;

        Ok(LeadUpdate {
            name,
            email,
            company_id,
            status,
        })
    }
}

impl Repository<Leads> {
    pub async fn create(&self, input: &LeadInput) -> Result<Lead, DatabaseError> {
        let result = sqlx::query("INSERT INTO leads (name, email, company_id, status) VALUES (?, ?, ?, ?)")
            .bind(input.name.as_str())
            .bind(input.email.as_str())
            .bind(input.company_id)
            .bind(input.status.as_str())
            .execute(self.pool())
            .await
            .map_err(|e| DatabaseError::from(e).for_reference("companyId"))?;

        self.select_404(result.last_insert_rowid()).await
    }

    pub async fn update(&self, id: i64, input: &LeadUpdate) -> Result<Lead, DatabaseError> {
        let existing = self.select_404(id).await?;
        let status = input.status.unwrap_or(existing.status);

        let result = sqlx::query("UPDATE leads SET name = ?, email = ?, company_id = ?, status = ? WHERE id = ?")
            .bind(input.name.as_str())
            .bind(input.email.as_str())
            .bind(input.company_id)
            .bind(status.as_str())
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| DatabaseError::from(e).for_reference("companyId"))?;

        if result.rows_affected() == 0 {
            return Err(self.not_found());
        }
        self.select_404(id).await
    }
}
