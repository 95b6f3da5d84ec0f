//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::search::PollConfig;
use crate::search_api::SearchClientConfig;

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP client settings for the search API.
    pub client: SearchClientConfig,

    /// Polling and retry settings.
    pub poll: PollConfig,

    /// Address to serve the JSON API on.
    pub bind_addr: SocketAddr,

    /// Serve this fixture file instead of calling the live API.
    pub fixture: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// | Variable                | Default                      |
    /// |-------------------------|------------------------------|
    /// | `TICKETS_API_URL`       | public test API              |
    /// | `TICKETS_TIMEOUT_SECS`  | 30                           |
    /// | `TICKETS_MAX_RETRIES`   | 5                            |
    /// | `TICKETS_RETRY_BASE_MS` | 1000                         |
    /// | `TICKETS_BIND_ADDR`     | 127.0.0.1:3000               |
    /// | `TICKETS_FIXTURE`       | unset (use the live API)     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut client = SearchClientConfig::new();
        if let Some(url) = get("TICKETS_API_URL") {
            client = client.with_base_url(url);
        }
        if let Some(secs) = parse_var(&get, "TICKETS_TIMEOUT_SECS")? {
            client = client.with_timeout(secs);
        }

        let mut poll = PollConfig::default();
        if let Some(retries) = parse_var(&get, "TICKETS_MAX_RETRIES")? {
            poll.max_retries = retries;
        }
        if let Some(ms) = parse_var(&get, "TICKETS_RETRY_BASE_MS")? {
            poll.base_delay = Duration::from_millis(ms);
        }
        if poll.max_retries == 0 {
            return Err(ConfigError::Invalid {
                key: "TICKETS_MAX_RETRIES",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let bind_addr = match parse_var(&get, "TICKETS_BIND_ADDR")? {
            Some(addr) => addr,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    key: "TICKETS_BIND_ADDR",
                    value: DEFAULT_BIND_ADDR.to_string(),
                    reason: e.to_string(),
                })?,
        };

        let fixture = get("TICKETS_FIXTURE").map(PathBuf::from);

        Ok(Self {
            client,
            poll,
            bind_addr,
            fixture,
        })
    }
}

fn parse_var<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}
