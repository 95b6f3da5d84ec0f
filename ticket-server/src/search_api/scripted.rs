//! Scripted ticket source for offline development and tests.
//!
//! Serves a fixed sequence of pages (or failures) as if they were live API
//! responses. Fixtures can be loaded from a JSON file holding an array of
//! `/tickets` payloads.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::convert::convert_payload;
use super::error::{SearchApiError, TransportError};
use super::source::{Page, SessionId, TicketSource};
use super::types::TicketsPayload;

/// One scripted response to `fetch_page`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Serve this page.
    Page(Page),
    /// Fail with a page fetch error carrying this message.
    Fail(String),
}

impl ScriptStep {
    fn respond(self) -> Result<Page, SearchApiError> {
        match self {
            ScriptStep::Page(page) => Ok(page),
            ScriptStep::Fail(message) => Err(SearchApiError::PageFetch(
                TransportError::Unavailable(message),
            )),
        }
    }
}

/// Ticket source that replays a script.
///
/// Once the script runs out, every further fetch gets the fallback step,
/// which defaults to an empty final page. By default the script is shared
/// by all sessions; a source built with [`ScriptedSource::per_session`]
/// restarts it each time a session is opened.
#[derive(Debug)]
pub struct ScriptedSource {
    steps: Mutex<VecDeque<ScriptStep>>,
    /// Full script, kept when every session should see it from the start.
    restart: Option<Vec<ScriptStep>>,
    fallback: ScriptStep,
    open_failure: Option<String>,
    sessions_opened: AtomicUsize,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    /// Create a source that serves `steps` in order.
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            restart: None,
            fallback: ScriptStep::Page(Page {
                tickets: Vec::new(),
                done: true,
            }),
            open_failure: None,
            sessions_opened: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A source whose every page fetch fails.
    pub fn always_failing(message: impl Into<String>) -> Self {
        Self::new(Vec::new()).then_repeat(ScriptStep::Fail(message.into()))
    }

    /// Load pages from a JSON file containing an array of `/tickets`
    /// payloads, e.g. `[{"tickets": [...], "stop": false}, ...]`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|e| {
            TransportError::Unavailable(format!("failed to read {}: {e}", path.display()))
        })?;

        let payloads: Vec<TicketsPayload> =
            serde_json::from_str(&json).map_err(|e| TransportError::Json {
                message: format!("failed to parse {}: {e}", path.display()),
                body: None,
            })?;

        if payloads.is_empty() {
            return Err(TransportError::Unavailable(format!(
                "no pages in fixture {}",
                path.display()
            )));
        }

        Ok(Self::new(
            payloads
                .into_iter()
                .map(|p| ScriptStep::Page(convert_payload(p))),
        )
        .per_session())
    }

    /// Restart the script from its first step on every `open_session`.
    pub fn per_session(mut self) -> Self {
        let script = self
            .steps
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        self.restart = Some(script);
        self
    }

    /// Use `step` for every fetch after the script is exhausted.
    pub fn then_repeat(mut self, step: ScriptStep) -> Self {
        self.fallback = step;
        self
    }

    /// Make `open_session` fail with this message.
    pub fn failing_open(mut self, message: impl Into<String>) -> Self {
        self.open_failure = Some(message.into());
        self
    }

    /// Number of sessions opened so far.
    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }

    /// Number of page fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> ScriptStep {
        let mut steps = self.steps.lock().unwrap_or_else(PoisonError::into_inner);
        steps.pop_front().unwrap_or_else(|| self.fallback.clone())
    }
}

impl TicketSource for ScriptedSource {
    async fn open_session(&self) -> Result<SessionId, SearchApiError> {
        if let Some(message) = &self.open_failure {
            return Err(SearchApiError::SessionOpen(TransportError::Unavailable(
                message.clone(),
            )));
        }

        if let Some(script) = &self.restart {
            let mut steps = self.steps.lock().unwrap_or_else(PoisonError::into_inner);
            *steps = script.iter().cloned().collect();
        }

        let n = self.sessions_opened.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SessionId::new(format!("scripted-{n}")))
    }

    async fn fetch_page(&self, _session: &SessionId) -> Result<Page, SearchApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.next_step().respond()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FIXTURE: &str = r#"[
        {
            "tickets": [{
                "price": 5000,
                "carrier": "EY",
                "segments": [{
                    "origin": "MOW",
                    "destination": "HKT",
                    "date": "2024-05-04T12:00:00.000Z",
                    "duration": 700,
                    "stops": ["AUH"]
                }]
            }],
            "stop": false
        },
        { "tickets": [], "stop": true }
    ]"#;

    #[tokio::test]
    async fn replays_script_then_fallback() {
        let source = ScriptedSource::new([
            ScriptStep::Fail("flaky".into()),
            ScriptStep::Page(Page::pending()),
        ]);
        let session = source.open_session().await.unwrap();
        assert_eq!(session.as_str(), "scripted-1");

        assert!(source.fetch_page(&session).await.is_err());
        assert_eq!(source.fetch_page(&session).await.unwrap(), Page::pending());

        let last = source.fetch_page(&session).await.unwrap();
        assert!(last.done);
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn always_failing_never_succeeds() {
        let source = ScriptedSource::always_failing("down");
        let session = source.open_session().await.unwrap();

        for _ in 0..10 {
            let err = source.fetch_page(&session).await.unwrap_err();
            assert!(matches!(err, SearchApiError::PageFetch(_)));
        }
    }

    #[tokio::test]
    async fn failing_open() {
        let source = ScriptedSource::new(Vec::new()).failing_open("no route");
        let err = source.open_session().await.unwrap_err();
        assert!(matches!(err, SearchApiError::SessionOpen(_)));
        assert_eq!(source.sessions_opened(), 0);
    }

    #[tokio::test]
    async fn loads_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let source = ScriptedSource::from_json_file(file.path()).unwrap();
        let session = source.open_session().await.unwrap();

        let first = source.fetch_page(&session).await.unwrap();
        assert_eq!(first.tickets.len(), 1);
        assert_eq!(first.tickets[0].carrier().as_str(), "EY");
        assert!(!first.done);

        let second = source.fetch_page(&session).await.unwrap();
        assert!(second.tickets.is_empty());
        assert!(second.done);
    }

    #[tokio::test]
    async fn bundled_fixture_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/tickets.json");
        let source = ScriptedSource::from_json_file(path).unwrap();
        let session = source.open_session().await.unwrap();

        let first = source.fetch_page(&session).await.unwrap();
        assert_eq!(first.tickets.len(), 2);
        assert!(!first.done);

        let second = source.fetch_page(&session).await.unwrap();
        assert_eq!(second.tickets.len(), 3);
        assert!(second.done);
    }

    #[tokio::test]
    async fn per_session_restarts_script() {
        let source = ScriptedSource::new([ScriptStep::Page(Page {
            tickets: Vec::new(),
            done: false,
        })])
        .per_session();

        for _ in 0..2 {
            let session = source.open_session().await.unwrap();
            assert!(!source.fetch_page(&session).await.unwrap().done);
            assert!(source.fetch_page(&session).await.unwrap().done);
        }
        assert_eq!(source.sessions_opened(), 2);
    }

    #[test]
    fn missing_fixture_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ScriptedSource::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(result, Err(TransportError::Unavailable(_))));
    }

    #[test]
    fn empty_fixture_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[]").unwrap();

        let result = ScriptedSource::from_json_file(file.path());
        assert!(matches!(result, Err(TransportError::Unavailable(_))));
    }
}
