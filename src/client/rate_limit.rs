//! Advisory rate-limit snapshot taken from response headers.

use std::sync::RwLock;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Quota state most recently reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RateLimitInfo {
    pub limit: u64,
    pub remaining: u64,
    /// Seconds until the window resets.
    pub reset: u64,
}

impl RateLimitInfo {
    /// Parse the three `X-RateLimit-*` headers. Returns `None` unless all are
    /// present and integral.
    pub fn from_headers(headers: &http::HeaderMap) -> Option<Self> {
        Some(Self {
            limit: header_u64(headers, LIMIT_HEADER)?,
            remaining: header_u64(headers, REMAINING_HEADER)?,
            reset: header_u64(headers, RESET_HEADER)?,
        })
    }
}

fn header_u64(headers: &http::HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// Last-writer-wins slot shared by every clone of a client.
///
/// Concurrent requests overwrite each other's observations; the value is a
/// hint for callers, never an input to the retry logic. The lock only makes
/// the three fields change together.
#[derive(Debug, Default)]
pub(crate) struct RateLimitState {
    current: RwLock<Option<RateLimitInfo>>,
}

impl RateLimitState {
    /// Replace the snapshot if the response carries a full header set.
    pub(crate) fn observe(&self, headers: &http::HeaderMap) -> Option<RateLimitInfo> {
        let info = RateLimitInfo::from_headers(headers)?;
        let mut slot = match self.current.write() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(info);
        Some(info)
    }

    pub(crate) fn get(&self) -> Option<RateLimitInfo> {
        match self.current.read() {
            Ok(slot) => *slot,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
