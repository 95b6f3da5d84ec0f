//! Search API error types.

/// Low-level failure talking to a ticket source.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// A non-HTTP source (e.g. a scripted fixture) refused the request
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the two search API operations.
///
/// The operation is part of the type because the two failures are handled
/// very differently: a session that cannot be opened ends the search, while
/// a failed page fetch is retried with back-off.
#[derive(Debug, thiserror::Error)]
pub enum SearchApiError {
    /// Opening the search session failed
    #[error("could not open search session: {0}")]
    SessionOpen(#[source] TransportError),

    /// Fetching one page of tickets failed
    #[error("could not fetch ticket page: {0}")]
    PageFetch(#[source] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SearchApiError::SessionOpen(TransportError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        });
        assert_eq!(
            err.to_string(),
            "could not open search session: API error 503: Service Unavailable"
        );

        let err = SearchApiError::PageFetch(TransportError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        });
        assert!(err.to_string().contains("could not fetch ticket page"));
        assert!(err.to_string().contains("expected value"));
    }
}
