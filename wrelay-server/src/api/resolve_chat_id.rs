use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use super::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct ResolveChatIdRequest {
    invite_link: Option<String>,
}

/// `POST /resolve_chat_id`: resolve an invite link or username to a chat id.
///
/// A failed lookup is reported in the body rather than via the status code
/// so the admin frontend can show the Telegram error verbatim.
pub(super) async fn resolve_chat_id(
    state: State<AppState>,
    Json(body): Json<ResolveChatIdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let invite_link = match body.invite_link {
        Some(invite_link) if !invite_link.is_empty() => invite_link,
        _ => return Err(ApiError::missing(&["invite_link"])),
    };

    match state.telegram.get_chat(&invite_link).await {
        Ok(chat) => Ok(Json(json!({
            "ok": true,
            "chat_id": chat.id,
            "title": chat.title,
        }))),
        Err(e) => Ok(Json(json!({ "ok": false, "error": e.to_string() }))),
    }
}
