use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;

use super::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct ConnectLinkRequest {
    user_id: Option<String>,
    xid: Option<String>,
}

/// `POST /check-id`: issue a one-time Telegram connect link.
///
/// The returned link opens the bot with the code as the `/start` payload;
/// redeeming it stores the user's Telegram id on their wallet profile.
pub(super) async fn connect_link(
    state: State<AppState>,
    Json(body): Json<ConnectLinkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = match body.user_id {
        Some(user_id) if !user_id.is_empty() => user_id,
        _ => return Err(ApiError::missing(&["user_id"])),
    };
    let display_name = body.xid.unwrap_or_else(|| "User".to_string());

    let code = state
        .connect_codes
        .issue(user_id, display_name, OffsetDateTime::now_utc());

    let link = {
        let bot = state.config.bot.read().await;
        format!("https://t.me/{}?start={}", bot.username, code)
    };

    Ok(Json(json!({ "ok": true, "link": link, "code": code })))
}
