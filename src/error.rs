//! Error taxonomy shared by the request layer, the resource facades and the
//! webhook verifier.
//!
//! Every failure is a [`SendlyError`]. Callers branch on [`SendlyError::kind`]
//! (or match the enum directly) and read the stable machine-readable
//! [`SendlyError::code`] instead of parsing messages.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::client::ConfigError;
use crate::domain::ValidationError;

/// Default wait hint when a rate-limit error carries no `retryAfter`.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

const INTERNAL_ERROR: &str = "internal_error";
const UNKNOWN_MESSAGE: &str = "An unknown error occurred";

/// Coarse classification of a [`SendlyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    Authentication,
    RateLimit,
    InsufficientCredits,
    Validation,
    NotFound,
    Network,
    Timeout,
    WebhookSignature,
    Configuration,
    Generic,
}

/// Error details reported by the API in an error response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// Machine-readable code (`error` field), e.g. `invalid_api_key`.
    pub code: String,
    /// Human-readable message (`message` field).
    pub message: String,
    /// HTTP status of the response, when the error came from one.
    pub status: Option<u16>,
    /// Raw response body, kept for diagnostics.
    pub body: Option<Value>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {status}): {}", self.code, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// Errors returned by [`SendlyClient`](crate::SendlyClient) and the webhook helpers.
pub enum SendlyError {
    /// Bad, expired or revoked credential, or missing permission.
    #[error("authentication error: {0}")]
    Authentication(ApiError),

    /// Request quota exceeded. Not retried by the client.
    #[error("rate limit exceeded, retry after {retry_after_seconds}s: {error}")]
    RateLimit {
        error: ApiError,
        retry_after_seconds: u64,
    },

    /// Account balance cannot cover the request.
    #[error("insufficient credits (needed {credits_needed}, balance {current_balance}): {error}")]
    InsufficientCredits {
        error: ApiError,
        credits_needed: f64,
        current_balance: f64,
    },

    /// The API rejected the request as malformed.
    #[error("validation error: {0}")]
    Validation(ApiError),

    /// The referenced resource does not exist.
    #[error("not found: {0}")]
    NotFound(ApiError),

    /// Any other error response from the API.
    #[error("API error: {0}")]
    Api(ApiError),

    /// Transport failure (DNS, TLS, connection reset, etc).
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// An attempt did not complete within the configured timeout.
    #[error("request timed out after {}ms", timeout.as_millis())]
    Timeout { timeout: Duration },

    /// A successful response body did not match the expected shape.
    #[error("could not decode response (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// Inbound webhook signature did not verify.
    #[error("invalid webhook signature")]
    WebhookSignature,

    /// Inbound webhook was authentic but not a well-formed event.
    #[error("invalid webhook payload: {reason}")]
    WebhookPayload { reason: String },

    /// A domain constructor rejected a value before any request was made.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The client configuration was rejected at construction time.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SendlyError {
    /// Map an API error response to the most specific variant.
    ///
    /// `body` is expected to be the decoded `{error, message, ...}` object. The
    /// mapping is pure: the same status and body always yield the same variant.
    pub fn from_wire(status: u16, body: Value) -> Self {
        let code = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or(INTERNAL_ERROR)
            .to_owned();
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_MESSAGE)
            .to_owned();
        let retry_after = body.get("retryAfter").and_then(as_seconds);
        let credits_needed = body.get("creditsNeeded").and_then(Value::as_f64);
        let current_balance = body.get("currentBalance").and_then(Value::as_f64);

        let error = ApiError {
            code,
            message,
            status: Some(status),
            body: Some(body),
        };

        match error.code.as_str() {
            "unauthorized"
            | "invalid_auth_format"
            | "invalid_key_format"
            | "invalid_api_key"
            | "key_revoked"
            | "key_expired"
            | "insufficient_permissions" => Self::Authentication(error),
            "rate_limit_exceeded" => Self::RateLimit {
                error,
                retry_after_seconds: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            },
            "insufficient_credits" => Self::InsufficientCredits {
                error,
                credits_needed: credits_needed.unwrap_or(0.0),
                current_balance: current_balance.unwrap_or(0.0),
            },
            "invalid_request" | "unsupported_destination" => Self::Validation(error),
            "not_found" => Self::NotFound(error),
            _ => Self::Api(error),
        }
    }

    pub(crate) fn network(
        message: impl Into<String>,
        source: Option<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source,
        }
    }

    /// Coarse classification for branching.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::InsufficientCredits { .. } => ErrorKind::InsufficientCredits,
            Self::Validation(_) | Self::InvalidInput(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Network { .. } => ErrorKind::Network,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::WebhookSignature => ErrorKind::WebhookSignature,
            Self::Config(_) => ErrorKind::Configuration,
            Self::Api(_) | Self::Decode { .. } | Self::WebhookPayload { .. } => ErrorKind::Generic,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &str {
        match self {
            Self::Authentication(error)
            | Self::Validation(error)
            | Self::NotFound(error)
            | Self::Api(error)
            | Self::RateLimit { error, .. }
            | Self::InsufficientCredits { error, .. } => &error.code,
            Self::Network { .. } => "network_error",
            Self::Timeout { .. } => "timeout",
            Self::Decode { .. } => "invalid_response",
            Self::WebhookSignature => "invalid_signature",
            Self::WebhookPayload { .. } => "invalid_payload",
            Self::InvalidInput(_) => "invalid_request",
            Self::Config(_) => "invalid_config",
        }
    }

    /// API error details, for variants produced from an error response.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Authentication(error)
            | Self::Validation(error)
            | Self::NotFound(error)
            | Self::Api(error)
            | Self::RateLimit { error, .. }
            | Self::InsufficientCredits { error, .. } => Some(error),
            _ => None,
        }
    }

    /// HTTP status of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Decode { status, .. } => Some(*status),
            other => other.api_error().and_then(|error| error.status),
        }
    }

    /// Raw response body, if any.
    pub fn body(&self) -> Option<&Value> {
        self.api_error().and_then(|error| error.body.as_ref())
    }

    /// Server-provided wait hint for rate-limit errors.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit {
                retry_after_seconds,
                ..
            } => Some(Duration::from_secs(*retry_after_seconds)),
            _ => None,
        }
    }

    /// Whether repeating the same request may succeed.
    ///
    /// Caller-fixable and quota conditions (HTTP 400, 401, 402, 403, 404 and
    /// any rate-limit error) are final, as are failures raised before a
    /// request was sent. A success response with an unreadable body is
    /// unclassified and may be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimit { .. }
            | Self::WebhookSignature
            | Self::WebhookPayload { .. }
            | Self::InvalidInput(_)
            | Self::Config(_) => false,
            Self::Network { .. } | Self::Timeout { .. } | Self::Decode { .. } => true,
            other => !matches!(other.status(), Some(400 | 401 | 402 | 403 | 404)),
        }
    }
}

fn as_seconds(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|secs| *secs >= 0.0).map(|secs| secs.ceil() as u64))
}
