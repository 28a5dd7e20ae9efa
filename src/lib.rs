//! Typed Rust client for the Sendly SMS HTTP API.
//!
//! The crate is split into a domain layer of validated types, a private transport
//! layer for the JSON wire format, and a client layer that owns authentication,
//! per-attempt timeouts, retries with backoff and the rate-limit snapshot. Inbound
//! webhook deliveries are verified with [`webhook`], which needs no client.
//!
//! ```rust,no_run
//! use sendly::{ApiKey, MessageText, PhoneNumber, SendMessage, SendlyClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sendly::SendlyError> {
//!     let client = SendlyClient::new(ApiKey::new("sk_test_v1_...")?);
//!     let to = PhoneNumber::new("+15551234567")?;
//!     let text = MessageText::new("hello")?;
//!     let message = client.messages().send(SendMessage::new(to, text)).await?;
//!     println!("{} is {:?}", message.id, message.status);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod error;
mod transport;
pub mod webhook;

pub use client::{
    ApiKey, ConfigError, KeyEnvironment, RateLimitInfo, RequestOptions, RetryPolicy,
    SendlyClient, SendlyClientBuilder,
};
pub use domain::{
    Account, ApiKeyInfo, BatchEntry, BatchResult, Campaign, Contact, ContactList, Credits,
    Deleted, ListOptions, Message, MessageStatus, MessageText, Page, PhoneNumber,
    ScheduleMessage, ScheduledMessage, SendBatch, SendMessage, SendOptions, SenderId,
    ValidationError, Webhook, WebhookSecret,
};
pub use error::{ApiError, ErrorKind, SendlyError};
pub use webhook::{KnownEventType, WebhookEvent};
