//! Transport layer: JSON wire shapes and their mapping to domain types.
//!
//! `encode_*` functions build request bodies and query pairs from validated
//! domain requests. `*Wire` structs mirror response bodies and convert into
//! domain types with `From`.

mod account;
mod campaigns;
mod contacts;
mod messages;
mod webhooks;

use serde::Deserialize;

use crate::domain::{ListOptions, Page, PageLimit};

pub(crate) use account::{
    AccountWire, ApiKeyWire, CreditsWire, encode_create_api_key,
};
pub(crate) use campaigns::{CampaignWire, encode_create_campaign};
pub(crate) use contacts::{
    ContactListWire, ContactWire, encode_add_contacts, encode_create_contact,
    encode_create_contact_list, encode_update_contact,
};
pub(crate) use messages::{
    BatchResultWire, MessageWire, ScheduledMessageWire, encode_list_messages_query,
    encode_schedule_message, encode_send_batch, encode_send_message,
};
pub(crate) use webhooks::{
    WebhookTestWire, WebhookWire, encode_create_webhook, encode_update_webhook,
};

/// `{data, total?, hasMore?}` envelope used by every list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageWire<W> {
    #[serde(default = "Vec::new")]
    data: Vec<W>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    has_more: Option<bool>,
}

impl<W> PageWire<W> {
    pub(crate) fn into_page<T: From<W>>(self) -> Page<T> {
        let data = self.data.into_iter().map(T::from).collect::<Vec<_>>();
        let has_more = self.has_more.unwrap_or(false);
        Page {
            data,
            total: self.total,
            has_more,
        }
    }
}

/// Acknowledgement body of a `DELETE`. Some endpoints answer `204` instead.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeletedWire {
    #[serde(default)]
    pub(crate) id: Option<String>,
    #[serde(default = "deleted_default", alias = "success")]
    pub(crate) deleted: bool,
}

fn deleted_default() -> bool {
    true
}

pub(crate) fn encode_list_query(options: &ListOptions) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    if let Some(limit) = options.limit {
        params.push((PageLimit::FIELD.to_owned(), limit.value().to_string()));
    }
    if let Some(offset) = options.offset {
        params.push(("offset".to_owned(), offset.to_string()));
    }
    params
}
