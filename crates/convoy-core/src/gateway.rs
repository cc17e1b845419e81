//! HTTP gateway to the Convoy API.
//!
//! A thin wrapper around `reqwest` that attaches the bearer token, unwraps
//! the server's `{status, message, data}` envelope, and normalizes failures
//! into [`GatewayError`]. A 401 response tears down the persisted session
//! (process-wide policy) before the error is returned; every other failure
//! propagates to the caller unmodified, with no automatic retry.

use std::fmt;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::session::{Session, SessionStore};
use crate::types::ServerResponse;

/// Standard User-Agent header for convoy client requests.
pub const USER_AGENT: &str = concat!("convoy-cli/", env!("CARGO_PKG_VERSION"));

/// Categories of gateway errors for consistent error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// 401: the session is invalid and has been torn down.
    Unauthorized,
    /// Other HTTP status error (4xx, 5xx)
    HttpStatus,
    /// Connection timeout or request timeout
    Timeout,
    /// Connection-level failure (DNS, refused, reset)
    Transport,
    /// Failed to parse the response body
    Parse,
    /// Envelope-level error returned by the server (`status: false`)
    Api,
}

impl fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayErrorKind::Unauthorized => write!(f, "unauthorized"),
            GatewayErrorKind::HttpStatus => write!(f, "http_status"),
            GatewayErrorKind::Timeout => write!(f, "timeout"),
            GatewayErrorKind::Transport => write!(f, "transport"),
            GatewayErrorKind::Parse => write!(f, "parse"),
            GatewayErrorKind::Api => write!(f, "api_error"),
        }
    }
}

/// Structured error from the gateway with kind and details.
#[derive(Debug, Clone)]
pub struct GatewayError {
    /// Error category
    pub kind: GatewayErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an HTTP status error, extracting the server's message when
    /// the body carries the usual envelope.
    pub fn http_status(status: u16, body: &str) -> Self {
        let message = format!("HTTP {status}");
        let details = if body.is_empty() {
            None
        } else {
            if let Ok(json) = serde_json::from_str::<Value>(body)
                && let Some(msg) = json.get("message").and_then(|v| v.as_str())
            {
                return Self {
                    kind: GatewayErrorKind::HttpStatus,
                    message: format!("HTTP {status}: {msg}"),
                    details: Some(body.to_string()),
                };
            }
            Some(body.to_string())
        };
        Self {
            kind: GatewayErrorKind::HttpStatus,
            message,
            details,
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(
            GatewayErrorKind::Unauthorized,
            "Session expired or invalid; logged out",
        )
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Timeout, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Transport, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Parse, message)
    }

    /// Creates an envelope-level API error (`status: false`).
    pub fn api(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Api, message)
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for GatewayError {}

/// Result type for gateway operations.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Authenticated HTTP client for a single Convoy deployment.
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    session: Session,
    /// Cleared when the server reports the session invalid (401).
    store: Option<SessionStore>,
}

impl Gateway {
    /// Creates a gateway for the given base URL and session.
    ///
    /// `timeout_secs` of 0 disables the request timeout. The session store,
    /// when present, is cleared on the first 401 so a dead token is never
    /// reused on the next invocation.
    pub fn new(
        base_url: impl Into<String>,
        session: Session,
        timeout_secs: u32,
        store: Option<SessionStore>,
    ) -> Self {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(u64::from(timeout_secs)));
        }
        Self {
            // Client::builder() only fails on TLS backend misconfiguration;
            // fall back to the default client rather than failing construction.
            http: builder.build().unwrap_or_default(),
            base_url: base_url.into(),
            session,
            store,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a request and deserializes the envelope's `data` field.
    ///
    /// # Errors
    /// Any transport, status, parse, or envelope failure, normalized into
    /// [`GatewayError`]. No retry is attempted here.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> GatewayResult<T> {
        self.request_with(method, path, query, body, |builder| builder)
            .await
    }

    /// Like [`Gateway::request`], with a hook for per-request headers
    /// (e.g. an idempotency key on retry mutations).
    pub async fn request_with<T, F>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        customize: F,
    ) -> GatewayResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let envelope = self.send(method, path, query, body, customize).await?;
        envelope
            .data
            .ok_or_else(|| GatewayError::parse("Response envelope has no data field"))
    }

    /// Issues a mutation where only the envelope's message matters.
    ///
    /// # Errors
    /// Same failure modes as [`Gateway::request`].
    pub async fn execute<F>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        customize: F,
    ) -> GatewayResult<String>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let envelope: ServerResponse<Value> =
            self.send(method, path, &[], body, customize).await?;
        Ok(envelope.message)
    }

    async fn send<T, F>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        customize: F,
    ) -> GatewayResult<ServerResponse<T>>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = format!("{}{}", self.base_url, path);

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.session.token),
            )
            .query(query);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder = customize(builder);

        tracing::debug!(%method, %url, "convoy api request");

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::timeout(format!("Request to {url} timed out"))
            } else {
                GatewayError::transport(format!("Request to {url} failed: {e}"))
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.teardown_session();
            return Err(GatewayError::unauthorized());
        }

        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::transport(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(GatewayError::http_status(status.as_u16(), &text));
        }

        let envelope: ServerResponse<T> = serde_json::from_str(&text)
            .map_err(|e| GatewayError::parse(format!("Failed to parse response: {e}")))?;

        if !envelope.status {
            return Err(GatewayError::api(envelope.message));
        }

        Ok(envelope)
    }

    /// Global 401 policy: drop the persisted session so the next invocation
    /// starts logged out.
    fn teardown_session(&self) {
        tracing::warn!("Received 401 from server; clearing persisted session");
        if let Some(store) = &self.store
            && let Err(e) = store.clear()
        {
            tracing::error!("Failed to clear session: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::types::Event;

    fn session() -> Session {
        Session::new("test-token", "project-1")
    }

    /// Test: successful responses unwrap the envelope's data field and the
    /// bearer token is attached.
    #[tokio::test]
    async fn test_request_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "message": "events fetched",
                "data": [{
                    "uid": "evt-1",
                    "event_type": "invoice.created",
                    "created_at": "2024-01-05T10:00:00Z"
                }]
            })))
            .mount(&server)
            .await;

        let gateway = Gateway::new(server.uri(), session(), 5, None);
        let events: Vec<Event> = gateway
            .request(Method::GET, "/events", &[], None)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid, "evt-1");
    }

    /// Test: a `status: false` envelope surfaces as an Api error carrying
    /// the server's message.
    #[tokio::test]
    async fn test_envelope_failure_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": false,
                "message": "an error occurred while fetching events"
            })))
            .mount(&server)
            .await;

        let gateway = Gateway::new(server.uri(), session(), 5, None);
        let err = gateway
            .request::<Vec<Event>>(Method::GET, "/events", &[], None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, GatewayErrorKind::Api);
        assert!(err.message.contains("fetching events"));
    }

    /// Test: non-401 HTTP errors propagate with the server message, and the
    /// session survives.
    #[tokio::test]
    async fn test_http_error_preserves_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"status": false, "message": "boom"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        store.save(&session()).unwrap();

        let gateway = Gateway::new(server.uri(), session(), 5, Some(store.clone()));
        let err = gateway
            .request::<Vec<Event>>(Method::GET, "/events", &[], None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, GatewayErrorKind::HttpStatus);
        assert!(err.message.contains("boom"));
        assert!(store.load().unwrap().is_some());
    }

    /// Test: 401 clears the persisted session (global logout policy).
    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        store.save(&session()).unwrap();

        let gateway = Gateway::new(server.uri(), session(), 5, Some(store.clone()));
        let err = gateway
            .request::<Vec<Event>>(Method::GET, "/events", &[], None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, GatewayErrorKind::Unauthorized);
        assert_eq!(store.load().unwrap(), None);
    }

    /// Test: malformed bodies surface as Parse errors, not panics.
    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let gateway = Gateway::new(server.uri(), session(), 5, None);
        let err = gateway
            .request::<Vec<Event>>(Method::GET, "/events", &[], None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, GatewayErrorKind::Parse);
    }
}
