use axum::{
    debug_handler,
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use party_core::party_state::SessionQuery;
use party_core::shared_wheel_game::*;
use party_core::wheel_layout::WheelView;
use rand::rngs::OsRng;
use tracing::info;

use crate::error::Error;
use crate::session::animation_seed;
use crate::AppState;

type RewardSpinResponse = WheelSpinResponse<RewardWheelView, u32>;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/reset", post(reset_pool))
        .route("/remove-after", post(set_remove_after))
        .route("/spin", post(spin_wheel))
        .route("/view", get(get_view))
}

#[debug_handler]
async fn reset_pool(
    State(state): State<AppState>,
    Json(request): Json<RewardResetRequest>,
) -> Result<Json<RewardWheelView>, Error> {
    let seed = animation_seed();
    let view = state
        .sessions
        .with_session(&request.session_id, |party| {
            party.reward.reset(request.size)?;
            info!("🎁 Reward pool reset to 1..={}", request.size);
            Ok::<_, Error>(party.reward.view(&mut OsRng, seed))
        })
        .await??;
    Ok(Json(view))
}

#[debug_handler]
async fn set_remove_after(
    State(state): State<AppState>,
    Json(request): Json<RemoveAfterRequest>,
) -> Result<Json<RewardWheelView>, Error> {
    let seed = animation_seed();
    let view = state
        .sessions
        .with_session(&request.session_id, |party| {
            party.reward.set_remove_after(request.enabled);
            party.reward.view(&mut OsRng, seed)
        })
        .await?;
    Ok(Json(view))
}

#[debug_handler]
async fn spin_wheel(
    State(state): State<AppState>,
    Json(request): Json<WheelSpinRequest>,
) -> Result<Json<RewardSpinResponse>, Error> {
    let seed = animation_seed();
    let response = state
        .sessions
        .with_session(&request.session_id, |party| {
            let mut rng = OsRng;
            match party.spin_reward(&mut rng) {
                Ok(spin) => {
                    info!(
                        "🎡 REWARD SPIN: slot {} of {} → {} ({} left)",
                        spin.result.winner_index,
                        spin.labels.len(),
                        spin.outcome,
                        party.reward.pool.len()
                    );
                    let mut view = party.reward.view(&mut rng, seed);
                    // Draw the slots the winner came from, not the rebuilt ones.
                    view.wheel =
                        WheelView::new(&spin.labels, Some(spin.result.winner_index), spin.animation_seed);
                    RewardSpinResponse {
                        success: true,
                        message: Some(format!("You won reward #{}! 🎉", spin.outcome)),
                        view,
                        result: Some(spin),
                    }
                }
                Err(refusal) => RewardSpinResponse {
                    success: false,
                    message: Some(refusal.message().to_string()),
                    view: party.reward.view(&mut rng, seed),
                    result: None,
                },
            }
        })
        .await?;
    Ok(Json(response))
}

#[debug_handler]
async fn get_view(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<RewardWheelView>, Error> {
    let seed = animation_seed();
    let view = state
        .sessions
        .with_session(&query.session_id, |party| party.reward.view(&mut OsRng, seed))
        .await?;
    Ok(Json(view))
}
