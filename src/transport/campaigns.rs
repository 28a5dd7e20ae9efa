use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domain::{Campaign, CampaignId, ContactListId, CreateCampaign, ScheduledAt, SenderId};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CampaignWire {
    id: CampaignId,
    name: String,
    #[serde(default)]
    text: String,
    status: String,
    #[serde(default)]
    list_ids: Vec<ContactListId>,
    #[serde(default)]
    recipient_count: u64,
    #[serde(default)]
    estimated_credits: f64,
    #[serde(default)]
    scheduled_at: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<CampaignWire> for Campaign {
    fn from(value: CampaignWire) -> Self {
        Self {
            id: value.id,
            name: value.name,
            text: value.text,
            status: value.status,
            list_ids: value.list_ids,
            recipient_count: value.recipient_count,
            estimated_credits: value.estimated_credits,
            scheduled_at: value.scheduled_at,
            created_at: value.created_at,
        }
    }
}

pub(crate) fn encode_create_campaign(request: &CreateCampaign) -> Value {
    let list_ids = request
        .list_ids()
        .iter()
        .map(ContactListId::as_str)
        .collect::<Vec<_>>();

    let mut body = Map::new();
    body.insert("name".to_owned(), json!(request.name()));
    body.insert("text".to_owned(), json!(request.text().as_str()));
    body.insert("listIds".to_owned(), json!(list_ids));
    if let Some(from) = request.sender() {
        body.insert(SenderId::FIELD.to_owned(), json!(from.as_str()));
    }
    if let Some(at) = request.schedule() {
        body.insert(ScheduledAt::FIELD.to_owned(), json!(at.as_str()));
    }
    Value::Object(body)
}
