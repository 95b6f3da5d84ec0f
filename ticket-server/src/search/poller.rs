//! Page polling engine.
//!
//! Drives repeated page fetches for one session until the server reports
//! completion or consecutive failures exhaust the retry budget. Fetches
//! never overlap: the next one is only issued once the previous one has
//! resolved.
//!
//! ```text
//! Idle --begin--> Polling --done page--> Completed
//!                   |  ^
//!             error |  | delay (0 after a page, back-off after an error)
//!                   v  |
//!                 (retry) --max retries--> Exhausted
//! ```
//!
//! Any state can move to `Cancelled` when the session's cancellation token
//! fires.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::Ticket;
use crate::search_api::{SessionId, TicketSource};

use super::config::PollConfig;

/// Where the poller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    /// The server sent a final page.
    Completed,
    /// Too many consecutive fetch failures.
    Exhausted,
    /// Stopped from outside; no further results are applied.
    Cancelled,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollState::Completed | PollState::Exhausted | PollState::Cancelled
        )
    }
}

/// What the poller wants to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// Wait `delay`, then fetch the next page.
    Fetch { delay: Duration },
    /// Stop in this terminal state.
    Finish(PollState),
}

/// Receives the tickets of each successful page.
///
/// Returns `false` when the session is no longer active, in which case the
/// poller stops without applying anything further.
pub trait PageSink {
    fn accept(&self, tickets: Vec<Ticket>) -> bool;
}

/// Retry/back-off state machine for one session.
#[derive(Debug)]
pub struct Poller {
    config: PollConfig,
    state: PollState,
    error_count: u32,
    pages: usize,
}

impl Poller {
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            state: PollState::Idle,
            error_count: 0,
            pages: 0,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Consecutive failures since the last successful fetch.
    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    /// Successful fetches so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Enter `Polling`; the first fetch happens immediately.
    pub fn begin(&mut self) -> PollStep {
        if self.state != PollState::Idle {
            return self.current_step();
        }
        self.state = PollState::Polling;
        PollStep::Fetch {
            delay: Duration::ZERO,
        }
    }

    /// A fetch succeeded. Any success clears the failure count, even an
    /// empty page.
    pub fn on_page(&mut self, done: bool) -> PollStep {
        if self.state != PollState::Polling {
            return self.current_step();
        }

        self.pages += 1;
        self.error_count = 0;

        if done {
            self.state = PollState::Completed;
            return PollStep::Finish(PollState::Completed);
        }

        PollStep::Fetch {
            delay: Duration::ZERO,
        }
    }

    /// A fetch failed.
    pub fn on_error(&mut self) -> PollStep {
        if self.state != PollState::Polling {
            return self.current_step();
        }

        self.error_count += 1;

        if self.error_count >= self.config.max_retries {
            self.state = PollState::Exhausted;
            return PollStep::Finish(PollState::Exhausted);
        }

        PollStep::Fetch {
            delay: self.config.retry_delay(self.error_count),
        }
    }

    /// Stop from outside. Terminal states are left alone.
    pub fn cancel(&mut self) {
        if !self.state.is_terminal() {
            self.state = PollState::Cancelled;
        }
    }

    fn current_step(&self) -> PollStep {
        match self.state {
            PollState::Idle | PollState::Polling => PollStep::Fetch {
                delay: Duration::ZERO,
            },
            terminal => PollStep::Finish(terminal),
        }
    }

    /// Poll `session` to a terminal state, feeding each page into `sink`.
    ///
    /// Back-off sleeps and in-flight fetches both race against `cancel`; a
    /// fetch that loses the race is dropped and its result never reaches
    /// the sink.
    pub async fn run<S, K>(
        &mut self,
        source: &S,
        session: &SessionId,
        cancel: &CancellationToken,
        sink: &K,
    ) -> PollState
    where
        S: TicketSource,
        K: PageSink,
    {
        let mut step = self.begin();

        loop {
            let delay = match step {
                PollStep::Fetch { delay } => delay,
                PollStep::Finish(state) => {
                    info!(%session, ?state, pages = self.pages, "polling finished");
                    return state;
                }
            };

            if !delay.is_zero() {
                debug!(%session, ?delay, attempt = self.error_count + 1, "waiting before retry");
                tokio::select! {
                    _ = cancel.cancelled() => {
                        self.cancel();
                        return self.state;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.cancel();
                    return self.state;
                }
                result = source.fetch_page(session) => result,
            };

            step = match result {
                Ok(page) => {
                    let count = page.tickets.len();
                    if !sink.accept(page.tickets) {
                        debug!(%session, "session no longer active, discarding page");
                        self.cancel();
                        return self.state;
                    }
                    debug!(%session, tickets = count, done = page.done, "page received");
                    self.on_page(page.done)
                }
                Err(e) => {
                    warn!(%session, error = %e, failures = self.error_count + 1, "page fetch failed");
                    self.on_error()
                }
            };
        }
    }
}
