//! Ticket search API HTTP client.
//!
//! Two endpoints: `GET /search` opens a session and `GET /tickets` returns
//! the next page of results for it. The API emits transient 500s mid-stream
//! as part of normal operation, so a 500 from `/tickets` is an empty,
//! non-final page rather than an error.

use tracing::debug;

use super::convert::convert_payload;
use super::error::{SearchApiError, TransportError};
use super::source::{Page, SessionId, TicketSource};
use super::types::{SearchIdResponse, TicketsPayload};

/// Default base URL for the ticket search API.
pub const DEFAULT_BASE_URL: &str = "https://aviasales-test-api.kata.academy";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How much of an unparseable body to keep for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the search client.
#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    /// Base URL for the API (defaults to the public test API)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SearchClientConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Search API client.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl SearchClient {
    /// Create a new search client with the given configuration.
    pub fn new(config: SearchClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_session(&self) -> Result<SessionId, TransportError> {
        let url = format!("{}/search", self.base_url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: SearchIdResponse =
            serde_json::from_str(&body).map_err(|e| json_error(e, &body))?;

        if parsed.search_id.trim().is_empty() {
            return Err(TransportError::Json {
                message: "empty searchId".to_string(),
                body: Some(snippet(&body)),
            });
        }

        Ok(SessionId::new(parsed.search_id))
    }

    async fn request_page(&self, session: &SessionId) -> Result<Page, TransportError> {
        let url = format!("{}/tickets", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("searchId", session.as_str())])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR {
            debug!(%session, "server returned 500, treating as empty page");
            return Ok(Page::pending());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let payload: TicketsPayload =
            serde_json::from_str(&body).map_err(|e| json_error(e, &body))?;

        Ok(convert_payload(payload))
    }
}

impl TicketSource for SearchClient {
    async fn open_session(&self) -> Result<SessionId, SearchApiError> {
        self.request_session()
            .await
            .map_err(SearchApiError::SessionOpen)
    }

    async fn fetch_page(&self, session: &SessionId) -> Result<Page, SearchApiError> {
        self.request_page(session)
            .await
            .map_err(SearchApiError::PageFetch)
    }
}

fn json_error(err: serde_json::Error, body: &str) -> TransportError {
    TransportError::Json {
        message: err.to_string(),
        body: Some(snippet(body)),
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base_url: &str) -> SearchClient {
        SearchClient::new(SearchClientConfig::new().with_base_url(base_url)).unwrap()
    }

    fn ticket_json(price: u32) -> serde_json::Value {
        json!({
            "price": price,
            "carrier": "S7",
            "segments": [{
                "origin": "MOW",
                "destination": "HKT",
                "date": "2024-05-04T12:00:00.000Z",
                "duration": 600,
                "stops": []
            }]
        })
    }

    #[test]
    fn config_builder() {
        let config = SearchClientConfig::new()
            .with_base_url("http://localhost:8080")
            .with_timeout(60);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = SearchClientConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn trailing_slash_trimmed() {
        let client = client("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn opens_session() {
        let router = Router::new().route("/search", get(|| async { Json(json!({"searchId": "4niyd"})) }));
        let base = serve(router).await;

        let session = client(&base).open_session().await.unwrap();
        assert_eq!(session.as_str(), "4niyd");
    }

    #[tokio::test]
    async fn session_open_failure_is_typed() {
        let router = Router::new().route(
            "/search",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let base = serve(router).await;

        let err = client(&base).open_session().await.unwrap_err();
        assert!(matches!(
            err,
            SearchApiError::SessionOpen(TransportError::Api { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn session_open_rejects_empty_id() {
        let router = Router::new().route("/search", get(|| async { Json(json!({"searchId": ""})) }));
        let base = serve(router).await;

        let err = client(&base).open_session().await.unwrap_err();
        assert!(matches!(
            err,
            SearchApiError::SessionOpen(TransportError::Json { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_server_fails_session_open() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}"))
            .open_session()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SearchApiError::SessionOpen(TransportError::Http(_))
        ));
    }

    #[tokio::test]
    async fn fetches_page_for_session() {
        let router = Router::new().route(
            "/tickets",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("searchId").map(String::as_str), Some("abc"));
                Json(json!({
                    "tickets": [ticket_json(100), ticket_json(200)],
                    "stop": true
                }))
            }),
        );
        let base = serve(router).await;

        let page = client(&base)
            .fetch_page(&SessionId::new("abc"))
            .await
            .unwrap();
        assert_eq!(page.tickets.len(), 2);
        assert!(page.done);
    }

    #[tokio::test]
    async fn internal_error_is_empty_pending_page() {
        let router = Router::new().route(
            "/tickets",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "try again") }),
        );
        let base = serve(router).await;

        let page = client(&base)
            .fetch_page(&SessionId::new("abc"))
            .await
            .unwrap();
        assert_eq!(page, Page::pending());
    }

    #[tokio::test]
    async fn other_error_status_is_page_fetch_error() {
        let router = Router::new().route(
            "/tickets",
            get(|| async { (StatusCode::NOT_FOUND, "no such search") }),
        );
        let base = serve(router).await;

        let err = client(&base)
            .fetch_page(&SessionId::new("abc"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SearchApiError::PageFetch(TransportError::Api { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_page_fetch_error() {
        let router = Router::new().route("/tickets", get(|| async { "<html>not json</html>" }));
        let base = serve(router).await;

        let err = client(&base)
            .fetch_page(&SessionId::new("abc"))
            .await
            .unwrap_err();
        match err {
            SearchApiError::PageFetch(TransportError::Json { body, .. }) => {
                assert_eq!(body.as_deref(), Some("<html>not json</html>"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_ticket_list_is_coerced() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let router = Router::new().route(
            "/tickets",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "tickets": {"not": "an array"}, "stop": "yes" }))
                }
            }),
        );
        let base = serve(router).await;

        let page = client(&base)
            .fetch_page(&SessionId::new("abc"))
            .await
            .unwrap();
        assert!(page.tickets.is_empty());
        assert!(!page.done);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
