use axum::{Json, extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;
use wrelay_core::sessions::{DEPOSIT_SESSION_TTL, NewDepositSession};

use super::ApiError;
use crate::state::AppState;

/// `POST /start_deposit_session` request body.
///
/// `xid` is the user's display handle in the wallet app.
#[derive(Debug, Deserialize)]
pub(super) struct StartDepositSessionRequest {
    request_id: Option<String>,
    user_id: Option<String>,
    xid: Option<String>,
    amount: Option<Decimal>,
    telegram_id: Option<String>,
}

/// `POST /start_deposit_session`: open a deposit-matching window.
///
/// Called when the user clicks "I've Paid". The inbox watcher will try to
/// match a payment email to this session until the window closes.
pub(super) async fn start_deposit_session(
    state: State<AppState>,
    Json(body): Json<StartDepositSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut missing = Vec::new();
    if body.request_id.is_none() {
        missing.push("request_id");
    }
    if body.user_id.is_none() {
        missing.push("user_id");
    }
    if body.xid.is_none() {
        missing.push("xid");
    }
    if body.amount.is_none() {
        missing.push("amount");
    }
    if !missing.is_empty() {
        return Err(ApiError::missing(&missing));
    }

    let request_id = body.request_id.unwrap_or_default();
    let amount = body.amount.unwrap_or_default();

    state.deposit_sessions.start(
        request_id.clone(),
        NewDepositSession {
            user_id: body.user_id.unwrap_or_default(),
            display_name: body.xid.unwrap_or_default(),
            amount,
            telegram_id: body.telegram_id,
        },
        OffsetDateTime::now_utc(),
    );

    tracing::info!(request_id = %request_id, amount = %amount, "Deposit session started");
    Ok(Json(json!({
        "ok": true,
        "expires_in": DEPOSIT_SESSION_TTL.whole_seconds(),
    })))
}
