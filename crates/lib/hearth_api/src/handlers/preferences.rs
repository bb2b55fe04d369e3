//! Preference handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use hearth_core::preferences::{PreferenceUpdate, Preferences};
use tracing::info;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{PreferenceUpdateRequest, PreferenceUpdateResponse};

/// `GET /api/preferences` — current preference snapshot.
pub async fn get_preferences_handler(State(state): State<AppState>) -> Json<Preferences> {
    Json(state.preferences.get())
}

/// `POST /api/preferences` — replace the temperature or the device list.
pub async fn update_preferences_handler(
    State(state): State<AppState>,
    payload: Result<Json<PreferenceUpdateRequest>, JsonRejection>,
) -> AppResult<Json<PreferenceUpdateResponse>> {
    let Json(body) = payload?;
    let update = PreferenceUpdate::parse(&body.kind, body.value)?;
    info!(field = %body.kind, "updating preferences");

    let preferences = state.preferences.update(update);
    Ok(Json(PreferenceUpdateResponse {
        success: true,
        preferences,
    }))
}
