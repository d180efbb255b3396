//! Inbound HTTP API handlers.
//!
//! These endpoints are called by the wallet web app backend.
//!
//! # Endpoints
//!
//! - `POST /notify_transaction`    - queue a transaction alert to a user
//! - `POST /admin`                 - queue a free-form admin alert
//! - `POST /start_deposit_session` - open a deposit-matching window
//! - `POST /check-id`              - issue a one-time Telegram connect link
//! - `POST /check_channels`        - verify channel membership for a user
//! - `POST /resolve_chat_id`       - resolve an invite link to a chat id

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;

use crate::state::AppState;

mod admin_alert;
mod check_channels;
mod connect_link;
mod notify_transaction;
mod resolve_chat_id;
mod start_deposit_session;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/notify_transaction",
            post(notify_transaction::notify_transaction),
        )
        .route("/admin", post(admin_alert::admin_alert))
        .route(
            "/start_deposit_session",
            post(start_deposit_session::start_deposit_session),
        )
        .route("/check-id", post(connect_link::connect_link))
        .route("/check_channels", post(check_channels::check_channels))
        .route("/resolve_chat_id", post(resolve_chat_id::resolve_chat_id))
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in API handlers.
#[derive(Debug)]
pub(super) enum ApiError {
    /// Required request fields are absent.
    MissingFields(String),
    /// The notification queue is gone, so messages cannot be delivered.
    QueueClosed,
}

impl ApiError {
    /// Build a `MissingFields` error from the absent field names.
    fn missing(fields: &[&str]) -> Self {
        Self::MissingFields(fields.join(", "))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Missing: {fields}") })),
            )
                .into_response(),
            ApiError::QueueClosed => {
                tracing::error!("Notification queue is closed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "error": "Bot failed to start" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::server::build_router;
    use crate::state::AppState;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;
    use url::Url;
    use wrelay_core::config::{BotConfig, SharedConfig};
    use wrelay_core::events::{NotificationEvent, NotificationReceiver, notification_channel};
    use wrelay_core::sessions::{ConnectCodeStore, DepositSessionStore};
    use wrelay_core::telegram::TelegramClient;

    fn test_state() -> (AppState, NotificationReceiver) {
        let (notify_tx, notify_rx) = notification_channel();
        let state = AppState {
            telegram: Arc::new(TelegramClient::new("test-token")),
            config: SharedConfig::new(BotConfig {
                username: "TestWalletBot".to_string(),
                admin_chat_id: "123".to_string(),
                admin_group_id: "-456".to_string(),
                miniapp_url: Url::parse("https://wallet.example.com").unwrap(),
            }),
            connect_codes: Arc::new(ConnectCodeStore::new()),
            deposit_sessions: Arc::new(DepositSessionStore::new()),
            notify_tx,
        };
        (state, notify_rx)
    }

    async fn post_json(state: AppState, uri: &str, body: Value) -> (StatusCode, Value) {
        let router = build_router(state);
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn status_reports_active_sessions() {
        let (state, _rx) = test_state();
        let router = build_router(state);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "online");
        assert_eq!(body["active_sessions"], 0);
    }

    #[tokio::test]
    async fn notify_transaction_rejects_missing_fields() {
        let (state, _rx) = test_state();
        let (status, body) = post_json(
            state,
            "/notify_transaction",
            json!({ "user_id": "42", "amount": "10" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing: type, status");
    }

    #[tokio::test]
    async fn notify_transaction_queues_an_event() {
        let (state, mut rx) = test_state();
        let (status, body) = post_json(
            state,
            "/notify_transaction",
            json!({
                "user_id": "42",
                "type": "addfund",
                "amount": "100",
                "status": "Success",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);

        let event = rx.recv().await.unwrap();
        let NotificationEvent::Transaction(notice) = event else {
            panic!("expected a Transaction event");
        };
        assert_eq!(notice.chat_id, "42");
        assert_eq!(notice.sender, "N/A");
        assert_eq!(notice.balance, "0");
    }

    #[tokio::test]
    async fn start_deposit_session_opens_a_window() {
        let (state, _rx) = test_state();
        let sessions = state.deposit_sessions.clone();
        let (status, body) = post_json(
            state,
            "/start_deposit_session",
            json!({
                "request_id": "req-1",
                "user_id": "user-1",
                "xid": "XID123",
                "amount": "150.00",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["expires_in"], 300);

        let session = sessions.get("req-1").unwrap();
        assert_eq!(session.display_name, "XID123");
        assert!(session.telegram_id.is_none());
    }

    #[tokio::test]
    async fn connect_link_embeds_the_bot_username() {
        let (state, _rx) = test_state();
        let codes = state.connect_codes.clone();
        let (status, body) = post_json(state, "/check-id", json!({ "user_id": "user-1" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);

        let code = body["code"].as_str().unwrap();
        assert_eq!(
            body["link"],
            format!("https://t.me/TestWalletBot?start={code}")
        );
        let pending = codes.take(code, time::OffsetDateTime::now_utc()).unwrap();
        assert_eq!(pending.user_id, "user-1");
        assert_eq!(pending.display_name, "User");
    }

    #[tokio::test]
    async fn admin_alert_requires_a_message() {
        let (state, _rx) = test_state();
        let (status, body) = post_json(state, "/admin", json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing: message");
    }
}
