#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use leadblocks_api::auth::{TokenService, TOKEN_TTL_SECS};
use leadblocks_api::config::AppConfig;
use leadblocks_api::database::manager::{SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD};
use leadblocks_api::database::models::user::User;
use leadblocks_api::database::{CredentialStore, Database};
use leadblocks_api::{build_router, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Router over a fresh in-memory database with the admin user seeded
pub struct TestApp {
    pub router: Router,
    pub db: Database,
    pub tokens: TokenService,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        db.seed_admin(4).await?;

        let tokens = TokenService::new(TEST_SECRET, TOKEN_TTL_SECS);
        let state = AppState::new(db.clone(), tokens.clone(), AppConfig::default());

        Ok(Self {
            router: build_router(state),
            db,
            tokens,
        })
    }

    /// Send a request and return (status, parsed JSON body or Null when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .with_context(|| format!("non-JSON body: {}", String::from_utf8_lossy(&bytes)))?
        };

        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Log in as the seeded admin and return the bearer token
    pub async fn login(&self) -> Result<String> {
        let body = serde_json::json!({ "email": SEED_ADMIN_EMAIL, "password": SEED_ADMIN_PASSWORD });
        let (status, value) = self.send(Method::POST, "/api/login", None, Some(body)).await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, value);
        value["token"]
            .as_str()
            .map(String::from)
            .context("login response has no token")
    }

    pub async fn admin(&self) -> Result<User> {
        self.db
            .find_user_by_email(SEED_ADMIN_EMAIL)
            .await?
            .context("seeded admin missing")
    }

    /// Create a company and return its id
    pub async fn company(&self, token: &str, name: &str) -> Result<i64> {
        let (status, value) = self
            .post("/api/companies", token, serde_json::json!({ "name": name }))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "company create failed: {}", value);
        value["id"].as_i64().context("company has no id")
    }

    /// Create a lead and return the response body
    pub async fn lead(&self, token: &str, name: &str, company_id: Option<i64>, status: &str) -> Result<Value> {
        let body = serde_json::json!({
            "name": name,
            "email": format!("{}@leads.test", name.to_lowercase()),
            "companyId": company_id,
            "status": status,
        });
        let (code, value) = self.post("/api/leads", token, body).await?;
        anyhow::ensure!(code == StatusCode::CREATED, "lead create failed: {}", value);
        Ok(value)
    }
}

/// A real listener on a free port, serving the same router as [`TestApp`]
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let app = TestApp::new().await?;
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], port)))
            .await
            .context("failed to bind test listener")?;
        let router = app.router;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self { port, base_url, handle };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/api/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
