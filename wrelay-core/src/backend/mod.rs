//! REST client for the wallet backend.
//!
//! The backend is a Postgres database fronted by a REST layer (PostgREST
//! conventions: `?column=eq.value` filters, `Prefer` headers, `/rpc/` for
//! stored procedures). All access is authenticated with a service key sent
//! both as an `apikey` header and a bearer token.
//!
//! Callers follow a uniform best-effort policy: a failed call is logged at
//! the call site and surfaces as a sentinel; there is no retry here.

pub mod types;

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use rust_decimal::Decimal;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use types::{FundRequestStatus, GameRoundRow, NewTransaction, ProfileBalance, RoundResult};
use url::Url;
use uuid::Uuid;

/// Fixed wall-clock timeout for backend calls.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Errors from backend REST calls.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport error
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded
    #[error("response decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Timestamp could not be formatted for the wire
    #[error("timestamp formatting error: {0}")]
    TimeFormat(#[from] time::error::Format),
}

/// Bearer-token REST client for the wallet backend.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl BackendClient {
    pub fn new(base_url: &Url, service_key: String) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            service_key,
        }
    }

    /// Read a user's current balance. `Ok(None)` when the profile is missing.
    pub async fn fetch_balance(&self, user_id: &str) -> Result<Option<Decimal>, BackendError> {
        let path = format!("profiles?user_id=eq.{user_id}&select=balance");
        let response = self.send(Method::GET, &path, None, None).await?;
        let rows: Vec<ProfileBalance> = response.json().await?;
        Ok(rows.into_iter().next().map(|row| row.balance))
    }

    /// Overwrite a user's balance.
    pub async fn set_balance(&self, user_id: &str, balance: Decimal) -> Result<(), BackendError> {
        let path = format!("profiles?user_id=eq.{user_id}");
        let body = serde_json::json!({ "balance": balance });
        self.send(Method::PATCH, &path, Some(&body), Some("return=minimal"))
            .await?;
        Ok(())
    }

    /// Store the Telegram chat id on a user's profile after a connect.
    pub async fn link_telegram_id(
        &self,
        user_id: &str,
        telegram_id: i64,
    ) -> Result<(), BackendError> {
        let path = format!("profiles?user_id=eq.{user_id}");
        let body = serde_json::json!({ "telegram_id": telegram_id.to_string() });
        self.send(Method::PATCH, &path, Some(&body), Some("return=minimal"))
            .await?;
        Ok(())
    }

    /// Move an add-fund request to a terminal status.
    pub async fn set_fund_request_status(
        &self,
        request_id: &str,
        status: FundRequestStatus,
    ) -> Result<(), BackendError> {
        let path = format!("add_fund_requests?id=eq.{request_id}");
        let body = serde_json::json!({ "status": status });
        self.send(Method::PATCH, &path, Some(&body), Some("return=minimal"))
            .await?;
        Ok(())
    }

    /// Append a transaction to the ledger.
    pub async fn insert_transaction(&self, tx: &NewTransaction) -> Result<(), BackendError> {
        let body = serde_json::to_value(tx)?;
        self.send(Method::POST, "transactions", Some(&body), Some("return=minimal"))
            .await?;
        Ok(())
    }

    /// Open a new big/small game round. `Ok(None)` when the backend returned
    /// no row for the insert.
    pub async fn create_game_round(
        &self,
        ends_at: OffsetDateTime,
    ) -> Result<Option<Uuid>, BackendError> {
        let body = serde_json::json!({
            "game": "big_small",
            "status": "betting",
            "ends_at": ends_at.format(&Rfc3339)?,
        });
        let response = self
            .send(
                Method::POST,
                "game_rounds",
                Some(&body),
                Some("return=representation"),
            )
            .await?;
        let rows: Vec<GameRoundRow> = response.json().await?;
        Ok(rows.into_iter().next().map(|row| row.id))
    }

    /// Resolve a round via the `resolve_round` stored procedure.
    pub async fn resolve_round(
        &self,
        round_id: Uuid,
        result: RoundResult,
    ) -> Result<(), BackendError> {
        let body = serde_json::json!({ "p_round_id": round_id, "p_result": result });
        let url = format!("{}/rest/v1/rpc/resolve_round", self.base_url);
        let response = self.request(Method::POST, url, Some(&body), None).await?;
        self.check_status(response).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<&serde_json::Value>,
        prefer: Option<&str>,
    ) -> Result<reqwest::Response, BackendError> {
        let url = format!("{}/rest/v1/{}", self.base_url, path_and_query);
        let response = self.request(method, url, body, prefer).await?;
        self.check_status(response).await
    }

    async fn request(
        &self,
        method: Method,
        url: String,
        body: Option<&serde_json::Value>,
        prefer: Option<&str>,
    ) -> Result<reqwest::Response, BackendError> {
        let mut request = self
            .http
            .request(method, url)
            .header("apikey", &self.service_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.service_key));
        if let Some(prefer) = prefer {
            request = request.header("Prefer", prefer);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
