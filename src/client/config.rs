//! Client configuration: credential format, base URL policy, timeouts.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://sendly.live/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Environment variables read by [`SendlyClientBuilder::from_env`](super::SendlyClientBuilder::from_env).
pub mod env {
    pub const API_KEY: &str = "SENDLY_API_KEY";
    pub const BASE_URL: &str = "SENDLY_BASE_URL";
    pub const TIMEOUT_MS: &str = "SENDLY_TIMEOUT_MS";
    pub const MAX_RETRIES: &str = "SENDLY_MAX_RETRIES";
}

const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Configuration rejected at client construction. Never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The key does not look like `sk_<test|live>_v1_<token>`. The key itself is not echoed.
    #[error("invalid API key format: expected sk_<test|live>_v1_<token>")]
    InvalidApiKey,

    /// The base URL is malformed or not allowed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Timeout must be non-zero.
    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    /// A required environment variable is not set.
    #[error("missing required environment variable {name}")]
    MissingEnv { name: &'static str },

    /// An environment variable holds an unparsable value.
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    /// The user agent is not a valid header value.
    #[error("invalid user agent: {0:?}")]
    InvalidUserAgent(String),

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Which environment an API key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEnvironment {
    Test,
    Live,
}

/// Validated API key.
///
/// Invariant: matches `sk_<test|live>_v1_<token>` where the token is non-empty
/// and made of ASCII alphanumerics, `_` or `-`. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    value: String,
    environment: KeyEnvironment,
}

impl ApiKey {
    /// Validate and wrap an API key.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into().trim().to_owned();
        let rest = value.strip_prefix("sk_").ok_or(ConfigError::InvalidApiKey)?;
        let (environment, rest) = if let Some(rest) = rest.strip_prefix("test_") {
            (KeyEnvironment::Test, rest)
        } else if let Some(rest) = rest.strip_prefix("live_") {
            (KeyEnvironment::Live, rest)
        } else {
            return Err(ConfigError::InvalidApiKey);
        };
        let token = rest.strip_prefix("v1_").ok_or(ConfigError::InvalidApiKey)?;
        if token.is_empty()
            || !token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::InvalidApiKey);
        }

        Ok(Self { value, environment })
    }

    /// Borrow the full key. Avoid logging it.
    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn environment(&self) -> KeyEnvironment {
        self.environment
    }

    /// `true` for `sk_test_` keys: messages are simulated and not delivered.
    pub fn is_test(&self) -> bool {
        self.environment == KeyEnvironment::Test
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env = match self.environment {
            KeyEnvironment::Test => "test",
            KeyEnvironment::Live => "live",
        };
        write!(f, "ApiKey(sk_{env}_v1_***)")
    }
}

/// Immutable client configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_key: ApiKey,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
}

impl ClientConfig {
    pub(crate) fn new(
        api_key: ApiKey,
        base_url: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        let base_url = validate_base_url(base_url)?;
        Ok(Self {
            api_key,
            base_url,
            timeout,
            max_retries,
        })
    }

    pub(crate) fn with_defaults(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retries after the first attempt; `3` means up to 4 attempts.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Accept `https` URLs, plus plain `http` for local development hosts.
///
/// Returns the URL with one trailing slash removed.
pub(crate) fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: reason.to_owned(),
    };

    let parsed = url::Url::parse(raw).map_err(|err| invalid(&err.to_string()))?;
    let host = parsed.host_str().ok_or_else(|| invalid("missing host"))?;
    let is_local = LOCAL_HOSTS.contains(&host);

    match parsed.scheme() {
        "https" => {}
        "http" if is_local => {}
        _ => return Err(invalid("must use https (http is only allowed for localhost)")),
    }

    Ok(raw.strip_suffix('/').unwrap_or(raw).to_owned())
}
