// handlers/public/root.rs - GET / handler

use axum::Json;
use serde_json::{json, Value};

/// GET / - service name, version and endpoint index
pub async fn root_get() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "LeadBlocks API",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "health": "/api/health (public)",
            "login": "/api/login (public - token acquisition)",
            "whoami": "/api/auth/whoami (protected)",
            "leads": "/api/leads[/:id] (protected)",
            "companies": "/api/companies[/:id] (protected)",
        }
    }))
}
