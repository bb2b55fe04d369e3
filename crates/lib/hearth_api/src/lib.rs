//! # hearth_api
//!
//! HTTP API library for Hearth.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use hearth_core::gemini::ModelClient;
use hearth_core::ledger::LoginLedger;
use hearth_core::preferences::PreferenceStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ApiConfig;
use crate::handlers::{chat, login, preferences};

/// Page served at `/`, relative to the static directory.
pub const ENTRY_PAGE: &str = "Log_in.html";

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Household preferences the persona prompt is rendered from.
    pub preferences: Arc<PreferenceStore>,
    /// Captured login attempts.
    pub ledger: Arc<LoginLedger>,
    /// Upstream generative model.
    pub model: Arc<dyn ModelClient>,
}

impl AppState {
    /// State with default preferences and an empty ledger.
    pub fn new(config: ApiConfig, model: Arc<dyn ModelClient>) -> Self {
        Self {
            config,
            preferences: Arc::new(PreferenceStore::new()),
            ledger: Arc::new(LoginLedger::new()),
            model,
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.static_dir.clone();
    let entry_page = ServeFile::new(static_dir.join(ENTRY_PAGE));

    let api = Router::new()
        .route(routes::POST_API_CHAT, post(chat::chat_handler))
        .route(
            routes::GET_API_PREFERENCES,
            get(preferences::get_preferences_handler),
        )
        .route(
            routes::POST_API_PREFERENCES,
            post(preferences::update_preferences_handler),
        )
        .route(routes::POST_API_LOGIN, post(login::login_handler))
        .route(
            routes::GET_API_LOGIN_RECORDS,
            get(login::list_login_records_handler),
        )
        .route(
            routes::DELETE_API_LOGIN_RECORDS,
            delete(login::clear_login_records_handler),
        )
        .route(
            routes::GET_API_LOGIN_RECORDS_RECENT,
            get(login::recent_login_records_handler),
        )
        .route(
            routes::GET_API_LOGIN_RECORDS_RECENT_COUNT,
            get(login::recent_login_records_count_handler),
        )
        .route(routes::GET_API_LOGIN_STATS, get(login::login_stats_handler));

    Router::new()
        .merge(api)
        .route_service(routes::GET_ROOT, entry_page)
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .with_state(state)
}
