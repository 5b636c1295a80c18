use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::{extract::State, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::games::backend_buddy_game::create_router as create_buddy_router;
use crate::games::backend_punishment_wheel::create_router as create_punishment_router;
use crate::games::backend_reward_wheel::create_router as create_reward_router;
use crate::session::{create_session, get_session, SessionStore};

mod config;
mod error;
mod games;
mod logging;
mod session;

#[derive(Clone)]
pub struct AppState {
    sessions: SessionStore,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            sessions: SessionStore::new(config.session_expiry),
            config: Arc::new(config),
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "sessions": state.sessions.len().await }))
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/health_check", get(health_check))
        .route("/api/session", post(create_session).get(get_session))
        .nest("/api/reward", create_reward_router())
        .nest("/api/punishment", create_punishment_router())
        .nest("/api/buddy", create_buddy_router())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::from_path(".env").ok();
    logging::setup()?;

    let config = Config::from_env();
    let addr = config.bind_addr;
    let app = app(AppState::new(config));

    info!("listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
