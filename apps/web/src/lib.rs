//! # barber-web
//!
//! axum server for the shop counter: login, sale registration, history
//! with day/month totals, and CSV download.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Browser                                                                │
//! │     │  form POST / GET                                                  │
//! │     ▼                                                                   │
//! │  TraceLayer ──► Router ──► Session extractor (cookie → JWT → User)      │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                  routes::*  ──► barber-core (parse, scope, CSV)         │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                  barber-db SaleRepository ──► SQLite                    │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                  render::* (maud) ──► HTML                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod render;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use barber_db::Database;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::auth::{SessionManager, UserDirectory};
use crate::config::AppConfig;

/// Shared handler state. Cloned per request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub users: Arc<UserDirectory>,
    pub sessions: Arc<SessionManager>,
    pub products: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(config: &AppConfig, db: Database) -> Self {
        AppState {
            db,
            users: Arc::new(UserDirectory::from_entries(&config.users)),
            sessions: Arc::new(SessionManager::new(
                config.secret_key.clone(),
                config.session_ttl_secs,
            )),
            products: Arc::new(config.products.clone()),
        }
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::login_form).post(routes::login))
        .route("/login", get(routes::login_form).post(routes::login))
        .route("/logout", get(routes::logout))
        .route(
            "/registrar",
            get(routes::register_form).post(routes::register),
        )
        .route("/historico", get(routes::history))
        .route("/download", get(routes::download))
        .route("/vendas/{id}/excluir", post(routes::delete_sale))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initializes logging.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,barber=debug,sqlx=warn,tower_http=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
