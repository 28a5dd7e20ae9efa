use serde_json::{Map, Value};

use crate::domain::value::{
    ApiKeyId, BatchId, CampaignId, ContactId, ContactListId, MessageId, WebhookId, WebhookSecret,
};

/// Delivery state of a message.
///
/// Unknown states are preserved as [`MessageStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageStatus {
    Queued,
    Scheduled,
    Sent,
    Delivered,
    Failed,
    Cancelled,
    Other(String),
}

impl MessageStatus {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "queued" => Self::Queued,
            "scheduled" => Self::Scheduled,
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            "failed" => Self::Failed,
            "cancelled" | "canceled" => Self::Cancelled,
            other => Self::Other(other.to_owned()),
        }
    }

    /// `true` once the message can no longer change state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Delivered | Self::Failed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub to: String,
    pub from: Option<String>,
    pub text: String,
    pub status: MessageStatus,
    pub segments: u32,
    pub credits_used: f64,
    pub error: Option<String>,
    pub created_at: Option<String>,
    pub delivered_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledMessage {
    pub id: MessageId,
    pub to: String,
    pub text: String,
    pub status: MessageStatus,
    pub scheduled_at: String,
    pub credits_reserved: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub batch_id: BatchId,
    pub status: String,
    pub total: u32,
    pub queued: u32,
    pub failed: u32,
    pub credits_used: f64,
    pub messages: Vec<BatchMessageResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchMessageResult {
    pub id: Option<MessageId>,
    pub to: String,
    pub status: MessageStatus,
    pub error: Option<String>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: Option<u64>,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub metadata: Map<String, Value>,
    pub opted_out: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactList {
    pub id: ContactListId,
    pub name: String,
    pub description: Option<String>,
    pub contact_count: u64,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub text: String,
    pub status: String,
    pub list_ids: Vec<ContactListId>,
    pub recipient_count: u64,
    pub estimated_credits: f64,
    pub scheduled_at: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    pub id: WebhookId,
    pub url: String,
    pub events: Vec<String>,
    pub description: Option<String>,
    pub active: bool,
    /// Only present right after creation or secret rotation.
    pub secret: Option<WebhookSecret>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookTestResult {
    pub success: bool,
    pub status_code: Option<u16>,
    pub response_time_ms: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<String>,
}

/// Credit balances. Amounts keep the exact decimal text the server sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credits {
    pub balance: String,
    pub reserved: Option<String>,
    pub available: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyInfo {
    pub id: ApiKeyId,
    pub name: String,
    /// Masked key prefix, e.g. `sk_live_v1_abc...`.
    pub prefix: Option<String>,
    /// Full key, only returned once on creation.
    pub key: Option<String>,
    pub created_at: Option<String>,
    pub last_used_at: Option<String>,
    pub expires_at: Option<String>,
}

/// Acknowledgement for operations that return no entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted {
    pub id: String,
    pub deleted: bool,
}
