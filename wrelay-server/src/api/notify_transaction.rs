use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use wrelay_core::events::types::{NotificationEvent, TransactionNotice};

use super::ApiError;
use crate::state::AppState;

/// `POST /notify_transaction` request body.
///
/// Amounts and balances arrive as strings formatted by the web backend and
/// are relayed into the message verbatim.
#[derive(Debug, Deserialize)]
pub(super) struct NotifyTransactionRequest {
    user_id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    amount: Option<String>,
    status: Option<String>,
    sender: Option<String>,
    comment: Option<String>,
    balance: Option<String>,
}

/// `POST /notify_transaction`: queue a transaction alert for delivery.
///
/// Responds as soon as the event is queued; delivery itself is fire and
/// forget.
pub(super) async fn notify_transaction(
    state: State<AppState>,
    Json(body): Json<NotifyTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut missing = Vec::new();
    if body.user_id.is_none() {
        missing.push("user_id");
    }
    if body.kind.is_none() {
        missing.push("type");
    }
    if body.amount.is_none() {
        missing.push("amount");
    }
    if body.status.is_none() {
        missing.push("status");
    }
    if !missing.is_empty() {
        return Err(ApiError::missing(&missing));
    }

    let notice = TransactionNotice {
        chat_id: body.user_id.unwrap_or_default(),
        kind: body.kind.unwrap_or_default(),
        amount: body.amount.unwrap_or_default(),
        status: body.status.unwrap_or_default(),
        sender: body.sender.unwrap_or_else(|| "N/A".to_string()),
        comment: body.comment.unwrap_or_else(|| "No comment".to_string()),
        balance: body.balance.unwrap_or_else(|| "0".to_string()),
    };

    state
        .notify_tx
        .send(NotificationEvent::Transaction(notice))
        .await
        .map_err(|_| ApiError::QueueClosed)?;

    Ok(Json(json!({ "ok": true })))
}
