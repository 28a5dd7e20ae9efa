//! Inbound webhook verification.
//!
//! Sendly signs every delivery with HMAC-SHA256 over the raw request body and sends
//! the result in [`SIGNATURE_HEADER`] as `sha256=<hex>`. Pass the body bytes exactly
//! as received; re-serializing the JSON changes the bytes and breaks the signature.
//!
//! ```rust
//! use sendly::webhook;
//!
//! let body = br#"{"id":"evt_1","type":"message.delivered","createdAt":"2026-01-01T00:00:00Z"}"#;
//! let signature = webhook::sign(body, "whsec_test");
//!
//! let event = webhook::parse(body, &signature, "whsec_test").unwrap();
//! assert_eq!(event.known_type(), Some(webhook::KnownEventType::MessageDelivered));
//! ```

use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::Sha256;

use crate::error::SendlyError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "X-Sendly-Signature";

const SIGNATURE_PREFIX: &str = "sha256=";

/// An authenticated webhook delivery.
///
/// Only produced by [`parse`], so holding one means the signature checked out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Every other top-level field of the event, untouched.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl WebhookEvent {
    /// The event type if this crate knows it, `None` for anything newer.
    pub fn known_type(&self) -> Option<KnownEventType> {
        KnownEventType::from_wire(&self.event_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownEventType {
    MessageQueued,
    MessageSent,
    MessageDelivered,
    MessageFailed,
    MessageReceived,
}

impl KnownEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MessageQueued => "message.queued",
            Self::MessageSent => "message.sent",
            Self::MessageDelivered => "message.delivered",
            Self::MessageFailed => "message.failed",
            Self::MessageReceived => "message.received",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "message.queued" => Some(Self::MessageQueued),
            "message.sent" => Some(Self::MessageSent),
            "message.delivered" => Some(Self::MessageDelivered),
            "message.failed" => Some(Self::MessageFailed),
            "message.received" => Some(Self::MessageReceived),
            _ => None,
        }
    }
}

/// Compute the signature header value for `payload`.
pub fn sign(payload: &[u8], secret: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC key can be of any size, as per crate documentation"),
    };
    mac.update(payload);
    format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    )
}

/// Check `signature` against the expected signature of `payload`.
///
/// Returns `false` if any argument is empty. The comparison runs in constant time
/// for signatures of the expected length.
pub fn verify(payload: &[u8], signature: &str, secret: &str) -> bool {
    if payload.is_empty() || signature.is_empty() || secret.is_empty() {
        return false;
    }
    timing_safe_eq(sign(payload, secret).as_bytes(), signature.as_bytes())
}

/// Verify and decode a delivery.
///
/// # Errors
///
/// [`SendlyError::WebhookSignature`] if the signature does not verify, and
/// [`SendlyError::WebhookPayload`] if the body is not an event object with `id`,
/// `type` and `createdAt`.
pub fn parse(payload: &[u8], signature: &str, secret: &str) -> Result<WebhookEvent, SendlyError> {
    if !verify(payload, signature, secret) {
        tracing::warn!(payload_len = payload.len(), "webhook signature rejected");
        return Err(SendlyError::WebhookSignature);
    }

    serde_json::from_slice(payload).map_err(|err| {
        tracing::warn!(error = %err, "webhook payload rejected");
        SendlyError::WebhookPayload {
            reason: err.to_string(),
        }
    })
}

fn timing_safe_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.iter().zip(b) {
        result |= a_byte ^ b_byte;
    }
    result == 0
}
