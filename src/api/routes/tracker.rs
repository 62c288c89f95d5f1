//! Monthly wins tracking for the configured player.

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::pace_message;
use crate::models::HistoryTally;

fn tracked_player(state: &AppState) -> Result<&str, ApiError> {
    let id = state.tracker.player_id.as_str();
    if id.is_empty() {
        return Err(ApiError::Internal(
            "tracker.player_id is not configured".to_string(),
        ));
    }
    Ok(id)
}

async fn tally(state: &AppState) -> Result<HistoryTally, ApiError> {
    let player_id = tracked_player(state)?;
    Ok(state
        .stats
        .history_tally(player_id, state.tracker.since_timestamp)
        .await?)
}

pub async fn wins(State(state): State<AppState>) -> Result<Json<HistoryTally>, ApiError> {
    Ok(Json(tally(&state).await?))
}

pub async fn media(State(state): State<AppState>) -> Result<String, ApiError> {
    let tally = tally(&state).await?;
    let pace = state.stats.goal_pace(
        tally.wins,
        state.tracker.goal_wins,
        Utc::now(),
        state.tracker.hour_offset,
    )?;
    Ok(pace_message(&state.tracker.display_name, &pace))
}
