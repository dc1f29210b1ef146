//! REST access to the lending backend.
//!
//! [`ApiClient`] is the concrete reqwest client. The aggregator, reconciler
//! and receipt renderer only need a handful of calls, so they depend on the
//! narrower [`LendingBackend`] trait instead.

pub mod auth;
pub mod customers;
pub mod dues;
pub mod loans;
pub mod notifications;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::{LendingError, Result};
use crate::models::{Due, DueFilter, Page, ReceiptPayload, SettlementRequest, SettlementSummary};
use crate::session::{Session, SessionStore};
use crate::types::LoanId;

pub use auth::{LoginResponse, Registration};

/// backend calls the workflow components depend on
#[async_trait]
pub trait LendingBackend: Send + Sync {
    /// one page of dues falling on `date`
    async fn fetch_dues(
        &self,
        date: NaiveDate,
        page: u32,
        limit: u32,
        filter: &DueFilter,
    ) -> Result<Page<Due>>;

    async fn fetch_settlement_summary(&self, loan_id: LoanId) -> Result<SettlementSummary>;

    async fn settle_loan(&self, loan_id: LoanId, request: &SettlementRequest) -> Result<()>;

    /// receipt payload for a loan, or for one partial due when `due_date` is set
    async fn fetch_receipt(
        &self,
        loan_id: LoanId,
        due_date: Option<NaiveDate>,
    ) -> Result<ReceiptPayload>;
}

/// JSON client for the lending backend
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    upload_timeout: Duration,
    session: Option<Session>,
}

/// some endpoints wrap their payload in `{"data": ...}`
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| LendingError::InvalidConfiguration {
                message: format!("cannot build http client: {e}"),
            })?;
        Ok(Self {
            http,
            base_url: config.base_url()?,
            upload_timeout: config.upload_timeout(),
            session: None,
        })
    }

    /// client carrying whatever session the store holds
    pub fn from_store(config: &ClientConfig, store: &dyn SessionStore) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.session = store.load()?;
        Ok(client)
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| LendingError::InvalidConfiguration {
                message: format!("bad endpoint {path:?}: {e}"),
            })
    }

    /// request without credentials (login, registration)
    fn public(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.http.request(method, self.url(path)?))
    }

    /// request carrying the bearer token; fails before sending when signed out
    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let session = self.session.as_ref().ok_or(LendingError::NotAuthenticated)?;
        Ok(self
            .http
            .request(method, self.url(path)?)
            .header(reqwest::header::AUTHORIZATION, session.bearer()))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = Self::check(request.send().await?).await?;
        let bytes = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.into_inner())
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        Self::check(request.send().await?).await?;
        Ok(())
    }

    /// turn a non-2xx response into `LendingError::Api` with the body's message
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body).unwrap_or_else(|| fallback_message(status));
        if status == StatusCode::UNAUTHORIZED {
            warn!(%url, "backend rejected credentials");
        } else {
            debug!(%url, status = status.as_u16(), %message, "backend returned error");
        }
        Err(LendingError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// best-effort message from an error body: `message`, `error`, `msg` or `detail`
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => ["message", "error", "msg", "detail"]
            .iter()
            .find_map(|key| match value.get(*key) {
                Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Some(serde_json::Value::Object(inner)) => inner
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string),
                _ => None,
            }),
        // plain-text bodies are shown only when short enough for an alert
        Err(_) if trimmed.len() <= 200 && !trimmed.starts_with('<') => Some(trimmed.to_string()),
        Err(_) => None,
    }
}

fn fallback_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("Request failed ({} {})", status.as_u16(), reason),
        None => format!("Request failed ({})", status.as_u16()),
    }
}

#[async_trait]
impl LendingBackend for ApiClient {
    async fn fetch_dues(
        &self,
        date: NaiveDate,
        page: u32,
        limit: u32,
        filter: &DueFilter,
    ) -> Result<Page<Due>> {
        self.dues_by_date(date, page, limit, filter).await
    }

    async fn fetch_settlement_summary(&self, loan_id: LoanId) -> Result<SettlementSummary> {
        self.settlement_summary(loan_id).await
    }

    async fn settle_loan(&self, loan_id: LoanId, request: &SettlementRequest) -> Result<()> {
        self.settle(loan_id, request).await
    }

    async fn fetch_receipt(
        &self,
        loan_id: LoanId,
        due_date: Option<NaiveDate>,
    ) -> Result<ReceiptPayload> {
        self.receipt_data(loan_id, due_date).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::ClientConfig;
    use crate::session::Session;
    use crate::types::Role;
    use wiremock::MockServer;

    use super::ApiClient;

    pub fn session() -> Session {
        Session {
            token: "test-token".to_string(),
            role: Role::Admin,
            user_id: 1,
            profile: None,
        }
    }

    pub fn client(server: &MockServer) -> ApiClient {
        let config = ClientConfig::production(format!("{}/api", server.uri()));
        ApiClient::new(&config).unwrap().with_session(session())
    }
}
