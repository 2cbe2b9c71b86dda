//! HTTP client for the LeadBlocks API.
//!
//! Attaches the bearer token to authenticated calls, drops absent query
//! values, and surfaces the server's `error` string verbatim on failure.

pub mod state;

pub use state::{RequestState, Ticket};

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::auth::LoginResponse;
use crate::database::models::company::Company;
use crate::database::models::lead::{Lead, LeadStatus};
use crate::database::models::user::PublicUser;
use crate::filter::Page;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response; `message` is the server's `error` text when present
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    #[serde(default)]
    pub database: Option<String>,
}

/// Page/filter options for list calls; `None` values are left off the query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<LeadStatus>,
}

impl ListOptions {
    fn query(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("page", self.page.map(|p| p.to_string())),
            ("pageSize", self.page_size.map(|p| p.to_string())),
            ("status", self.status.map(|s| s.to_string())),
        ]
    }
}

/// Lead body for create and update. `companyId` is always sent, as `null`
/// when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDraft {
    pub name: String,
    pub email: String,
    pub company_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompanyDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: Url::parse(&with_trailing_slash(base_url))?,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `path` to the base URL (keeping any base path prefix) and add
    /// the present query values.
    pub fn endpoint(&self, path: &str, query: &[(&str, Option<String>)]) -> Result<Url, ClientError> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        let present: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v)))
            .collect();
        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }
        Ok(url)
    }

    // =========================================================================
    // Public endpoints
    // =========================================================================

    /// POST /api/login. On success the returned token is kept for later calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response: LoginResponse = self
            .request(Method::POST, "/api/login", &[], Some(&body), false)
            .await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.request::<HealthResponse, ()>(Method::GET, "/api/health", &[], None, false)
            .await
    }

    pub async fn whoami(&self) -> Result<PublicUser, ClientError> {
        self.request::<PublicUser, ()>(Method::GET, "/api/auth/whoami", &[], None, true)
            .await
    }

    // =========================================================================
    // Leads
    // =========================================================================

    pub async fn list_leads(&self, options: &ListOptions) -> Result<Page<Lead>, ClientError> {
        self.request::<_, ()>(Method::GET, "/api/leads", &options.query(), None, true)
            .await
    }

    pub async fn get_lead(&self, id: i64) -> Result<Lead, ClientError> {
        self.request::<_, ()>(Method::GET, &format!("/api/leads/{}", id), &[], None, true)
            .await
    }

    pub async fn create_lead(&self, draft: &LeadDraft) -> Result<Lead, ClientError> {
        self.request(Method::POST, "/api/leads", &[], Some(draft), true).await
    }

    pub async fn update_lead(&self, id: i64, draft: &LeadDraft) -> Result<Lead, ClientError> {
        self.request(Method::PUT, &format!("/api/leads/{}", id), &[], Some(draft), true)
            .await
    }

    pub async fn delete_lead(&self, id: i64) -> Result<(), ClientError> {
        self.send::<()>(Method::DELETE, &format!("/api/leads/{}", id), &[], None, true)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Companies
    // =========================================================================

    pub async fn list_companies(&self, options: &ListOptions) -> Result<Page<Company>, ClientError> {
        let query = ListOptions {
            status: None,
            ..options.clone()
        }
        .query();
        self.request::<_, ()>(Method::GET, "/api/companies", &query, None, true)
            .await
    }

    pub async fn get_company(&self, id: i64) -> Result<Company, ClientError> {
        self.request::<_, ()>(Method::GET, &format!("/api/companies/{}", id), &[], None, true)
            .await
    }

    pub async fn create_company(&self, draft: &CompanyDraft) -> Result<Company, ClientError> {
        self.request(Method::POST, "/api/companies", &[], Some(draft), true)
            .await
    }

    pub async fn update_company(&self, id: i64, draft: &CompanyDraft) -> Result<Company, ClientError> {
        self.request(Method::PUT, &format!("/api/companies/{}", id), &[], Some(draft), true)
            .await
    }

    pub async fn delete_company(&self, id: i64) -> Result<(), ClientError> {
        self.send::<()>(Method::DELETE, &format!("/api/companies/{}", id), &[], None, true)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Transport
    // =========================================================================

    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, Option<String>)],
        body: Option<&B>,
        auth: bool,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, query, body, auth).await?;
        Ok(response.json().await?)
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, Option<String>)],
        body: Option<&B>,
        auth: bool,
    ) -> Result<reqwest::Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path, query)?;
        let mut builder = self.http.request(method.clone(), url);

        if auth {
            if let Some(token) = &self.token {
                builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
            }
        }

        // GET and DELETE never carry a body
        if let Some(body) = body {
            if method != Method::GET && method != Method::DELETE {
                builder = builder.json(body);
            }
        }

        let response = builder.send().await?;
        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(status, &text),
        })
    }
}

/// Prefer the body's `error`, then `message`, then the status reason phrase.
/// `Url::join` replaces the last path segment unless the base ends in `/`
fn with_trailing_slash(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(String::from))
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_drops_absent_query_values() {
        let client = ApiClient::new("http://localhost:3000").unwrap();
        let options = ListOptions {
            page: Some(2),
            page_size: None,
            status: Some(LeadStatus::Qualified),
        };

        let url = client.endpoint("/api/leads", &options.query()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/leads?page=2&status=qualified");

        let bare = client.endpoint("/api/leads", &ListOptions::default().query()).unwrap();
        assert_eq!(bare.as_str(), "http://localhost:3000/api/leads");
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client = ApiClient::new("http://gw.test/crm").unwrap();
        let url = client.endpoint("/api/leads", &[]).unwrap();
        assert_eq!(url.as_str(), "http://gw.test/crm/api/leads");

        let slashed = ApiClient::new("http://gw.test/crm/").unwrap();
        let url = slashed.endpoint("/api/leads/7", &[]).unwrap();
        assert_eq!(url.as_str(), "http://gw.test/crm/api/leads/7");
    }

    #[test]
    fn error_message_prefers_server_text() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error":"Invalid companyId"}"#),
            "Invalid companyId"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message":"nope"}"#),
            "nope"
        );
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
        assert_eq!(error_message(StatusCode::UNAUTHORIZED, "<html>"), "Unauthorized");
    }

    #[test]
    fn lead_draft_always_sends_company_id() {
        let draft = LeadDraft {
            name: "Ada".into(),
            email: "ada@x.test".into(),
            company_id: None,
            status: None,
        };
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({ "name": "Ada", "email": "ada@x.test", "companyId": null })
        );
    }
}
