use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domain::{
    BatchId, BatchMessageResult, BatchResult, ListMessages, Message, MessageId, MessageStatus,
    MessageText, PhoneNumber, ScheduleMessage, ScheduledAt, ScheduledMessage, SendBatch,
    SendMessage, SendOptions, SenderId,
};

use super::encode_list_query;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MessageWire {
    id: MessageId,
    to: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    text: String,
    status: String,
    #[serde(default)]
    segments: u32,
    #[serde(default)]
    credits_used: f64,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    delivered_at: Option<String>,
}

impl From<MessageWire> for Message {
    fn from(value: MessageWire) -> Self {
        Self {
            id: value.id,
            to: value.to,
            from: value.from,
            text: value.text,
            status: MessageStatus::from_wire(&value.status),
            segments: value.segments,
            credits_used: value.credits_used,
            error: value.error,
            created_at: value.created_at,
            delivered_at: value.delivered_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScheduledMessageWire {
    id: MessageId,
    to: String,
    #[serde(default)]
    text: String,
    status: String,
    scheduled_at: String,
    #[serde(default)]
    credits_reserved: f64,
}

impl From<ScheduledMessageWire> for ScheduledMessage {
    fn from(value: ScheduledMessageWire) -> Self {
        Self {
            id: value.id,
            to: value.to,
            text: value.text,
            status: MessageStatus::from_wire(&value.status),
            scheduled_at: value.scheduled_at,
            credits_reserved: value.credits_reserved,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchResultWire {
    batch_id: BatchId,
    status: String,
    #[serde(default)]
    total: u32,
    #[serde(default)]
    queued: u32,
    #[serde(default)]
    failed: u32,
    #[serde(default)]
    credits_used: f64,
    #[serde(default)]
    messages: Vec<BatchMessageWire>,
}

#[derive(Debug, Clone, Deserialize)]
struct BatchMessageWire {
    #[serde(default)]
    id: Option<MessageId>,
    to: String,
    status: String,
    #[serde(default)]
    error: Option<String>,
}

impl From<BatchResultWire> for BatchResult {
    fn from(value: BatchResultWire) -> Self {
        let messages = value
            .messages
            .into_iter()
            .map(|message| BatchMessageResult {
                id: message.id,
                to: message.to,
                status: MessageStatus::from_wire(&message.status),
                error: message.error,
            })
            .collect();

        Self {
            batch_id: value.batch_id,
            status: value.status,
            total: value.total,
            queued: value.queued,
            failed: value.failed,
            credits_used: value.credits_used,
            messages,
        }
    }
}

pub(crate) fn encode_send_message(request: &SendMessage) -> Value {
    let mut body = Map::new();
    body.insert(PhoneNumber::FIELD.to_owned(), json!(request.to().e164()));
    body.insert(
        MessageText::FIELD.to_owned(),
        json!(request.text().as_str()),
    );
    push_options(&mut body, request.options());
    Value::Object(body)
}

pub(crate) fn encode_schedule_message(request: &ScheduleMessage) -> Value {
    let mut body = encode_send_message(request.message());
    if let Value::Object(map) = &mut body {
        map.insert(
            ScheduledAt::FIELD.to_owned(),
            json!(request.scheduled_at().as_str()),
        );
    }
    body
}

pub(crate) fn encode_send_batch(request: &SendBatch) -> Value {
    let messages = request
        .messages()
        .iter()
        .map(|entry| json!({"to": entry.to.e164(), "text": entry.text.as_str()}))
        .collect::<Vec<_>>();

    let mut body = Map::new();
    body.insert("messages".to_owned(), Value::Array(messages));
    if let Some(from) = request.from() {
        body.insert(SenderId::FIELD.to_owned(), json!(from.as_str()));
    }
    if let Some(message_type) = request.message_type() {
        body.insert("messageType".to_owned(), json!(message_type.as_str()));
    }
    Value::Object(body)
}

pub(crate) fn encode_list_messages_query(request: &ListMessages) -> Vec<(String, String)> {
    let mut params = encode_list_query(&request.page);
    if let Some(status) = request.status.as_deref().map(str::trim) {
        if !status.is_empty() {
            params.push(("status".to_owned(), status.to_owned()));
        }
    }
    if let Some(to) = request.to.as_ref() {
        params.push(("to".to_owned(), to.e164().to_owned()));
    }
    params
}

fn push_options(body: &mut Map<String, Value>, options: &SendOptions) {
    if let Some(from) = options.from.as_ref() {
        body.insert(SenderId::FIELD.to_owned(), json!(from.as_str()));
    }
    if let Some(message_type) = options.message_type {
        body.insert("messageType".to_owned(), json!(message_type.as_str()));
    }
    if let Some(metadata) = options.metadata.as_ref() {
        body.insert("metadata".to_owned(), Value::Object(metadata.clone()));
    }
}
