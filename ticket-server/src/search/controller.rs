//! Search session controller.
//!
//! Owns one search lifecycle at a time: opens the session, runs the poller
//! in a background task, holds the accumulated tickets and the consumer's
//! view selection (filter, sort mode, display window), and exposes the
//! resulting view.
//!
//! All mutable state lives behind one mutex. The poll task re-checks its
//! lifecycle's cancellation token while holding that mutex before every
//! mutation, and [`SessionController::stop`] cancels the token under the
//! same mutex, so a response that arrives after teardown is never applied.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{DisplayWindow, SortMode, StopFilter, StopFlag, Ticket};
use crate::search_api::TicketSource;

use super::accumulator::TicketAccumulator;
use super::config::PollConfig;
use super::poller::{PageSink, PollState, Poller};
use super::query::{TicketView, query_tickets};

/// Externally visible lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl SearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStatus::Idle => "idle",
            SearchStatus::Loading => "loading",
            SearchStatus::Succeeded => "succeeded",
            SearchStatus::Failed => "failed",
        }
    }
}

/// Why a search failed. The `Display` text is what the consumer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchFailure {
    /// The session could not be opened
    #[error("search could not start")]
    SessionOpen,

    /// Every retry failed before any ticket arrived
    #[error("failed to load tickets")]
    RetryExhausted,
}

/// Error from a consumer control.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// The display window can only grow by a positive amount
    #[error("display window must grow by at least one ticket")]
    ZeroGrowth,
}

/// Everything the presentation layer reads, taken under one lock.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub status: SearchStatus,
    pub error: Option<String>,
    pub tickets: Arc<[Arc<Ticket>]>,
    /// Tickets passing the filter (visible or not).
    pub matching: usize,
    /// All tickets accumulated this lifecycle.
    pub total: usize,
    pub filter: StopFilter,
    pub sort: SortMode,
    pub display_window: usize,
}

/// Memo key for the last computed view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ViewKey {
    lifecycle: u64,
    ticket_count: usize,
    filter: StopFilter,
    sort: SortMode,
    window: usize,
}

#[derive(Debug, Clone)]
struct CachedView {
    key: ViewKey,
    tickets: Arc<[Arc<Ticket>]>,
    matching: usize,
}

#[derive(Debug)]
struct SessionState {
    status: SearchStatus,
    failure: Option<SearchFailure>,
    accumulator: TicketAccumulator,
    filter: StopFilter,
    sort: SortMode,
    window: DisplayWindow,
    /// Bumped on every `start`; part of the memo key.
    lifecycle: u64,
    cancel: CancellationToken,
    cached_view: Option<CachedView>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            status: SearchStatus::Idle,
            failure: None,
            accumulator: TicketAccumulator::new(),
            filter: StopFilter::default(),
            sort: SortMode::default(),
            window: DisplayWindow::new(),
            lifecycle: 0,
            cancel: CancellationToken::new(),
            cached_view: None,
        }
    }

    /// Reset per-lifecycle state. Filter and sort selections carry over.
    fn begin_lifecycle(&mut self) -> CancellationToken {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.lifecycle += 1;
        self.status = SearchStatus::Loading;
        self.failure = None;
        self.accumulator.clear();
        self.window = DisplayWindow::new();
        self.cached_view = None;
        self.cancel.clone()
    }

    fn fail(&mut self, failure: SearchFailure) {
        self.status = SearchStatus::Failed;
        self.failure = Some(failure);
    }

    fn view(&mut self) -> CachedView {
        let key = ViewKey {
            lifecycle: self.lifecycle,
            ticket_count: self.accumulator.len(),
            filter: self.filter,
            sort: self.sort,
            window: self.window.size(),
        };

        if let Some(cached) = &self.cached_view {
            if cached.key == key {
                return cached.clone();
            }
        }

        let TicketView { tickets, matching } =
            query_tickets(self.accumulator.all(), &self.filter, self.sort, key.window);
        let view = CachedView {
            key,
            tickets: tickets.into(),
            matching,
        };
        self.cached_view = Some(view.clone());
        view
    }
}

/// Controller for one search at a time.
///
/// Cheap to share: the HTTP layer holds it in an `Arc`.
pub struct SessionController<S> {
    source: Arc<S>,
    config: PollConfig,
    state: Arc<Mutex<SessionState>>,
}

impl<S: TicketSource> SessionController<S> {
    pub fn new(source: S, config: PollConfig) -> Self {
        Self::with_shared_source(Arc::new(source), config)
    }

    /// Create a controller over a source the caller keeps a handle to.
    pub fn with_shared_source(source: Arc<S>, config: PollConfig) -> Self {
        Self {
            source,
            config,
            state: Arc::new(Mutex::new(SessionState::new())),
        }
    }

    /// Start a new search lifecycle.
    ///
    /// Returns `None` without doing anything if a search is already
    /// loading. Otherwise discards the previous lifecycle's tickets, resets
    /// the display window, and spawns the search on the current tokio
    /// runtime; the returned handle resolves to the final status.
    pub fn start(&self) -> Option<JoinHandle<SearchStatus>> {
        let (token, lifecycle) = {
            let mut state = lock(&self.state);
            if state.status == SearchStatus::Loading {
                debug!("search already loading, ignoring start");
                return None;
            }
            let token = state.begin_lifecycle();
            (token, state.lifecycle)
        };

        info!(lifecycle, "starting ticket search");

        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.state);
        let config = self.config.clone();

        Some(tokio::spawn(async move {
            run_lifecycle(source, shared, config, token).await
        }))
    }

    /// Tear down the running search, if any.
    ///
    /// Pending back-off timers and in-flight fetches are abandoned and
    /// nothing they produce is applied. Tickets gathered so far stay
    /// visible: the status becomes `Succeeded` if there are any, `Idle`
    /// otherwise.
    pub fn stop(&self) {
        let mut state = lock(&self.state);
        state.cancel.cancel();

        if state.status == SearchStatus::Loading {
            state.status = if state.accumulator.is_empty() {
                SearchStatus::Idle
            } else {
                SearchStatus::Succeeded
            };
            info!(tickets = state.accumulator.len(), "ticket search stopped");
        }
    }

    pub fn status(&self) -> SearchStatus {
        lock(&self.state).status
    }

    /// The user-facing error message, if the last search failed.
    pub fn error(&self) -> Option<String> {
        lock(&self.state).failure.map(|f| f.to_string())
    }

    pub fn failure(&self) -> Option<SearchFailure> {
        lock(&self.state).failure
    }

    /// Reveal `by` more tickets. Returns the new window size.
    pub fn grow_display_window(&self, by: usize) -> Result<usize, ControlError> {
        let by = NonZeroUsize::new(by).ok_or(ControlError::ZeroGrowth)?;
        let mut state = lock(&self.state);
        state.window.grow(by);
        Ok(state.window.size())
    }

    pub fn display_window(&self) -> usize {
        lock(&self.state).window.size()
    }

    /// Set one stop-count flag. Returns the resulting filter.
    pub fn set_filter(&self, flag: StopFlag, value: bool) -> StopFilter {
        let mut state = lock(&self.state);
        state.filter.set(flag, value);
        state.filter
    }

    /// Flip one stop-count flag. Returns the resulting filter.
    pub fn toggle_filter(&self, flag: StopFlag) -> StopFilter {
        let mut state = lock(&self.state);
        state.filter.toggle(flag);
        state.filter
    }

    /// Flip the "all" checkbox. Returns the resulting filter.
    pub fn toggle_all(&self) -> StopFilter {
        let mut state = lock(&self.state);
        state.filter.toggle_all();
        state.filter
    }

    pub fn filters(&self) -> StopFilter {
        lock(&self.state).filter
    }

    pub fn set_sort_mode(&self, mode: SortMode) {
        lock(&self.state).sort = mode;
    }

    pub fn sort_mode(&self) -> SortMode {
        lock(&self.state).sort
    }

    /// Number of distinct tickets accumulated this lifecycle.
    pub fn ticket_count(&self) -> usize {
        lock(&self.state).accumulator.len()
    }

    /// The filtered, sorted, windowed tickets.
    pub fn visible_tickets(&self) -> Arc<[Arc<Ticket>]> {
        lock(&self.state).view().tickets
    }

    /// One consistent read of everything the presentation layer needs.
    pub fn snapshot(&self) -> SessionSnapshot {
        let mut state = lock(&self.state);
        let view = state.view();

        SessionSnapshot {
            status: state.status,
            error: state.failure.map(|f| f.to_string()),
            tickets: view.tickets,
            matching: view.matching,
            total: state.accumulator.len(),
            filter: state.filter,
            sort: state.sort,
            display_window: state.window.size(),
        }
    }
}

impl<S> Drop for SessionController<S> {
    fn drop(&mut self) {
        lock(&self.state).cancel.cancel();
    }
}

fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Feeds pages into the shared state while the lifecycle is active.
struct LifecycleSink<'a> {
    state: &'a Mutex<SessionState>,
    token: &'a CancellationToken,
}

impl PageSink for LifecycleSink<'_> {
    fn accept(&self, tickets: Vec<Ticket>) -> bool {
        let mut state = lock(self.state);
        if self.token.is_cancelled() {
            return false;
        }

        let candidates = tickets.len();
        let added = state.accumulator.merge(tickets);
        debug!(
            candidates,
            new = added.len(),
            total = state.accumulator.len(),
            "merged page"
        );
        true
    }
}

async fn run_lifecycle<S: TicketSource>(
    source: Arc<S>,
    shared: Arc<Mutex<SessionState>>,
    config: PollConfig,
    token: CancellationToken,
) -> SearchStatus {
    let opened = tokio::select! {
        biased;
        _ = token.cancelled() => return lock(&shared).status,
        opened = source.open_session() => opened,
    };

    let session = match opened {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "failed to open search session");
            let mut state = lock(&shared);
            if !token.is_cancelled() {
                state.fail(SearchFailure::SessionOpen);
            }
            return state.status;
        }
    };

    info!(%session, "search session opened");

    let sink = LifecycleSink {
        state: &shared,
        token: &token,
    };
    let mut poller = Poller::new(config);
    let outcome = poller.run(&*source, &session, &token, &sink).await;

    let mut state = lock(&shared);
    if token.is_cancelled() {
        return state.status;
    }

    match outcome {
        PollState::Completed => {
            state.status = SearchStatus::Succeeded;
        }
        PollState::Exhausted if !state.accumulator.is_empty() => {
            warn!(
                tickets = state.accumulator.len(),
                "retries exhausted, keeping partial results"
            );
            state.status = SearchStatus::Succeeded;
        }
        PollState::Exhausted => {
            warn!("retries exhausted with no tickets");
            state.fail(SearchFailure::RetryExhausted);
        }
        PollState::Idle | PollState::Polling | PollState::Cancelled => {}
    }

    info!(
        status = state.status.as_str(),
        tickets = state.accumulator.len(),
        "ticket search finished"
    );
    state.status
}
