use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// API version used when none (or an empty one) is configured.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Scheme used when none is configured.
pub const DEFAULT_SCHEME: &str = "http";

/// Connection parameters for a PowerDNS API endpoint.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Host (and optional port) of the API, e.g. `127.0.0.1:8081`.
    pub dsn: String,
    pub api_key: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Overall request timeout; `None` leaves the transport default in place.
    /// Written as (fractional) seconds in config files.
    #[serde(default, deserialize_with = "timeout_from_secs")]
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("dsn", &self.dsn)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("scheme", &self.scheme)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn timeout_from_secs<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer)?
        .map(|secs| Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom))
        .transpose()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

impl ClientConfig {
    pub fn new(dsn: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            api_key: api_key.into(),
            api_version: default_api_version(),
            scheme: default_scheme(),
            timeout: None,
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// API version, falling back to `v1` when left empty.
    pub fn api_version(&self) -> &str {
        if self.api_version.is_empty() {
            DEFAULT_API_VERSION
        } else {
            &self.api_version
        }
    }

    /// Root every resource path hangs off (e.g. `http://127.0.0.1:8081/api/v1`).
    pub fn base_url(&self) -> String {
        let scheme: &str = if self.scheme.is_empty() {
            DEFAULT_SCHEME
        } else {
            &self.scheme
        };
        format!(
            "{}://{}/api/{}",
            scheme,
            self.dsn.trim_end_matches('/'),
            self.api_version()
        )
    }
}
