use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::Database;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

/// Everything a handler can reach. Built once in `main` (or a test) and
/// cloned per request; no handler touches global state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, tokens: TokenService, config: AppConfig) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        // Public
        .merge(public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root_get))
        .route("/api/health", get(public::health_get))
        .route("/api/login", post(public::login_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/whoami", get(protected::whoami_get))
        .route(
            "/api/leads",
            get(protected::leads_list).post(protected::leads_post),
        )
        .route(
            "/api/leads/:id",
            get(protected::leads_get)
                .put(protected::leads_put)
                .delete(protected::leads_delete),
        )
        .route(
            "/api/companies",
            get(protected::companies_list).post(protected::companies_post),
        )
        .route(
            "/api/companies/:id",
            get(protected::companies_get)
                .put(protected::companies_put)
                .delete(protected::companies_delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// An empty origin list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
