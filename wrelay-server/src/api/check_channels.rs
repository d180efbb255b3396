use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use wrelay_core::telegram::membership::verify_channels;

use super::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct CheckChannelsRequest {
    user_id: Option<i64>,
    channels: Option<Vec<String>>,
}

/// `POST /check_channels`: verify a user has joined the required channels.
///
/// Channels the bot itself cannot inspect are reported separately so the
/// caller can distinguish a user problem from a bot setup problem.
pub(super) async fn check_channels(
    state: State<AppState>,
    Json(body): Json<CheckChannelsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user_id, channels) = match (body.user_id, body.channels) {
        (Some(user_id), Some(channels)) if !channels.is_empty() => (user_id, channels),
        _ => return Err(ApiError::missing(&["user_id or channels"])),
    };

    let (not_joined, bot_missing) = verify_channels(&state.telegram, user_id, &channels).await;

    if !bot_missing.is_empty() {
        return Ok(Json(json!({
            "ok": false,
            "bot_error": true,
            "bot_missing_channels": bot_missing,
            "message": "Bot is not admin in some channels",
        })));
    }

    Ok(Json(json!({
        "ok": true,
        "joined": not_joined.is_empty(),
        "missing_channels": not_joined,
    })))
}
