use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use wrelay_core::events::types::NotificationEvent;

use super::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct AdminAlertRequest {
    message: Option<String>,
}

/// `POST /admin`: queue a free-form alert to the admin chat.
pub(super) async fn admin_alert(
    state: State<AppState>,
    Json(body): Json<AdminAlertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = match body.message {
        Some(message) if !message.is_empty() => message,
        _ => return Err(ApiError::missing(&["message"])),
    };

    state
        .notify_tx
        .send(NotificationEvent::Admin { message })
        .await
        .map_err(|_| ApiError::QueueClosed)?;

    Ok(Json(json!({ "ok": true })))
}
