use axum::{
    debug_handler,
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use party_core::constants::{BUDDY_ALREADY_PAIRED_ERROR, PAIR_CONFIRM_REQUIRED, PAIR_SELECTION_REQUIRED};
use party_core::party_state::SessionQuery;
use party_core::shared_buddy_game::*;
use tracing::info;

use crate::error::Error;
use crate::AppState;

const PAIR_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/lists", post(update_lists))
        .route("/select", post(select))
        .route("/pair", post(pair))
        .route("/reset", post(reset_pairs))
        .route("/view", get(get_view))
}

#[debug_handler]
async fn update_lists(
    State(state): State<AppState>,
    Json(request): Json<BuddyListsRequest>,
) -> Result<Json<BuddyView>, Error> {
    let view = state
        .sessions
        .with_session(&request.session_id, |party| {
            if let Some(text) = &request.buddies {
                // Buddies are also the punishment wheel's players.
                party.update_roster(text);
            }
            if let Some(text) = &request.budders {
                party.buddy.set_budders(text);
            }
            party.buddy.view()
        })
        .await?;
    Ok(Json(view))
}

#[debug_handler]
async fn select(
    State(state): State<AppState>,
    Json(request): Json<BuddySelectRequest>,
) -> Result<Json<BuddyView>, Error> {
    let view = state
        .sessions
        .with_session(&request.session_id, |party| {
            party.buddy.select(request.side, request.name.clone())?;
            Ok::<_, Error>(party.buddy.view())
        })
        .await??;
    Ok(Json(view))
}

#[debug_handler]
async fn pair(
    State(state): State<AppState>,
    Json(request): Json<PairRequest>,
) -> Result<Json<PairResponse>, Error> {
    let timestamp = chrono::Local::now().format(PAIR_TIMESTAMP_FORMAT).to_string();
    let response = state
        .sessions
        .with_session(&request.session_id, |party| {
            let (success, message, pair) = match party.buddy.request_pair(timestamp) {
                PairAttempt::Paired(pair) => {
                    info!("🤝 Paired {} ↔ {}", pair.buddy, pair.budder);
                    let message = format!("Paired {} ↔ {}", pair.buddy, pair.budder);
                    (true, message, Some(pair))
                }
                PairAttempt::NeedsConfirmation => (false, PAIR_CONFIRM_REQUIRED.to_string(), None),
                PairAttempt::BuddyAlreadyPaired => (false, BUDDY_ALREADY_PAIRED_ERROR.to_string(), None),
                PairAttempt::Incomplete => (false, PAIR_SELECTION_REQUIRED.to_string(), None),
            };
            PairResponse {
                success,
                message: Some(message),
                pair,
                view: party.buddy.view(),
            }
        })
        .await?;
    Ok(Json(response))
}

#[debug_handler]
async fn reset_pairs(
    State(state): State<AppState>,
    Json(request): Json<PairRequest>,
) -> Result<Json<BuddyView>, Error> {
    let view = state
        .sessions
        .with_session(&request.session_id, |party| {
            party.buddy.reset_pairs();
            info!("Cleared all pairs");
            party.buddy.view()
        })
        .await?;
    Ok(Json(view))
}

#[debug_handler]
async fn get_view(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<BuddyView>, Error> {
    let view = state
        .sessions
        .with_session(&query.session_id, |party| party.buddy.view())
        .await?;
    Ok(Json(view))
}
