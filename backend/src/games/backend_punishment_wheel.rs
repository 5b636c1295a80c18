use axum::{
    debug_handler,
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use party_core::party_state::{PunishmentPanelView, RosterRequest, SelectPlayerRequest, SessionQuery};
use party_core::shared_wheel_game::*;
use party_core::wheel_layout::WheelView;
use rand::rngs::OsRng;
use tracing::info;

use crate::error::Error;
use crate::session::animation_seed;
use crate::AppState;

type PunishmentSpinResponse = WheelSpinResponse<PunishmentPanelView, PunishmentOutcome>;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/player", post(select_player))
        .route("/roster", post(update_roster))
        .route("/items", post(add_item))
        .route("/items/update", post(update_item))
        .route("/items/delete", post(delete_item))
        .route("/remove-after", post(set_remove_after))
        .route("/spin", post(spin_wheel))
        .route("/view", get(get_view))
}

#[debug_handler]
async fn select_player(
    State(state): State<AppState>,
    Json(request): Json<SelectPlayerRequest>,
) -> Result<Json<PunishmentPanelView>, Error> {
    let seed = animation_seed();
    let view = state
        .sessions
        .with_session(&request.session_id, |party| {
            party.select_player(request.player.clone())?;
            Ok::<_, Error>(party.punishment_view(&mut OsRng, seed))
        })
        .await??;
    Ok(Json(view))
}

#[debug_handler]
async fn update_roster(
    State(state): State<AppState>,
    Json(request): Json<RosterRequest>,
) -> Result<Json<PunishmentPanelView>, Error> {
    let seed = animation_seed();
    let view = state
        .sessions
        .with_session(&request.session_id, |party| {
            party.update_roster(&request.text);
            info!("👥 Player roster updated ({} players)", party.players().len());
            party.punishment_view(&mut OsRng, seed)
        })
        .await?;
    Ok(Json(view))
}

#[debug_handler]
async fn add_item(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<PunishmentPanelView>, Error> {
    let seed = animation_seed();
    let item = WeightedItem::from_raw(request.label.trim(), request.seconds, request.weight);
    let view = state
        .sessions
        .with_session(&request.session_id, |party| {
            party.punishment.add_item(item)?;
            Ok::<_, Error>(party.punishment_view(&mut OsRng, seed))
        })
        .await??;
    Ok(Json(view))
}

#[debug_handler]
async fn update_item(
    State(state): State<AppState>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<PunishmentPanelView>, Error> {
    let seed = animation_seed();
    let item = WeightedItem::from_raw(request.label.trim(), request.seconds, request.weight);
    let view = state
        .sessions
        .with_session(&request.session_id, |party| {
            party.punishment.update_item(request.index, item)?;
            Ok::<_, Error>(party.punishment_view(&mut OsRng, seed))
        })
        .await??;
    Ok(Json(view))
}

#[debug_handler]
async fn delete_item(
    State(state): State<AppState>,
    Json(request): Json<DeleteItemRequest>,
) -> Result<Json<PunishmentPanelView>, Error> {
    let seed = animation_seed();
    let view = state
        .sessions
        .with_session(&request.session_id, |party| {
            let removed = party.punishment.remove_item(request.index)?;
            info!("🗑️ Removed punishment {:?}", removed.label);
            Ok::<_, Error>(party.punishment_view(&mut OsRng, seed))
        })
        .await??;
    Ok(Json(view))
}

#[debug_handler]
async fn set_remove_after(
    State(state): State<AppState>,
    Json(request): Json<RemoveAfterRequest>,
) -> Result<Json<PunishmentPanelView>, Error> {
    let seed = animation_seed();
    let view = state
        .sessions
        .with_session(&request.session_id, |party| {
            party.punishment.set_remove_after(request.enabled);
            party.punishment_view(&mut OsRng, seed)
        })
        .await?;
    Ok(Json(view))
}

#[debug_handler]
async fn spin_wheel(
    State(state): State<AppState>,
    Json(request): Json<WheelSpinRequest>,
) -> Result<Json<PunishmentSpinResponse>, Error> {
    let seed = animation_seed();
    let response = state
        .sessions
        .with_session(&request.session_id, |party| {
            let mut rng = OsRng;
            match party.spin_punishment(&mut rng) {
                Ok(spin) => {
                    info!(
                        "🎯 PUNISHMENT SPIN: slot {} of {} → {}",
                        spin.result.winner_index,
                        spin.labels.len(),
                        spin.outcome.message
                    );
                    if spin.removed > 0 {
                        info!("Removed {:?} from the punishment pool", spin.outcome.label);
                    }
                    let mut view = party.punishment_view(&mut rng, seed);
                    // The wheel stops on the drawn slot, even for the exempt player.
                    view.wheel.wheel =
                        WheelView::new(&spin.labels, Some(spin.result.winner_index), spin.animation_seed);
                    PunishmentSpinResponse {
                        success: true,
                        message: Some(spin.outcome.message.clone()),
                        view,
                        result: Some(spin),
                    }
                }
                Err(refusal) => PunishmentSpinResponse {
                    success: false,
                    message: Some(refusal.message().to_string()),
                    view: party.punishment_view(&mut rng, seed),
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
) -> Result<Json<PunishmentPanelView>, Error> {
    let seed = animation_seed();
    let view = state
        .sessions
        .with_session(&query.session_id, |party| party.punishment_view(&mut OsRng, seed))
        .await?;
    Ok(Json(view))
}
