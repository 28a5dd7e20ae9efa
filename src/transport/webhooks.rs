use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domain::{
    CreateWebhook, UpdateWebhook, Webhook, WebhookId, WebhookSecret, WebhookTestResult, WebhookUrl,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WebhookWire {
    id: WebhookId,
    url: String,
    #[serde(default)]
    events: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "active_default", alias = "isActive")]
    active: bool,
    #[serde(default)]
    secret: Option<WebhookSecret>,
    #[serde(default)]
    created_at: Option<String>,
}

fn active_default() -> bool {
    true
}

impl From<WebhookWire> for Webhook {
    fn from(value: WebhookWire) -> Self {
        Self {
            id: value.id,
            url: value.url,
            events: value.events,
            description: value.description,
            active: value.active,
            secret: value.secret,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WebhookTestWire {
    success: bool,
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default)]
    response_time_ms: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

impl From<WebhookTestWire> for WebhookTestResult {
    fn from(value: WebhookTestWire) -> Self {
        Self {
            success: value.success,
            status_code: value.status_code,
            response_time_ms: value.response_time_ms,
            error: value.error,
        }
    }
}

pub(crate) fn encode_create_webhook(request: &CreateWebhook) -> Value {
    let mut body = Map::new();
    body.insert(WebhookUrl::FIELD.to_owned(), json!(request.url().as_str()));
    body.insert("events".to_owned(), json!(request.events()));
    if let Some(description) = request.description() {
        body.insert("description".to_owned(), json!(description));
    }
    Value::Object(body)
}

pub(crate) fn encode_update_webhook(request: &UpdateWebhook) -> Value {
    let mut body = Map::new();
    if let Some(url) = request.new_url() {
        body.insert(WebhookUrl::FIELD.to_owned(), json!(url.as_str()));
    }
    if let Some(events) = request.new_events() {
        body.insert("events".to_owned(), json!(events));
    }
    if let Some(description) = request.new_description() {
        body.insert("description".to_owned(), json!(description));
    }
    if let Some(active) = request.new_active() {
        body.insert("isActive".to_owned(), json!(active));
    }
    Value::Object(body)
}
