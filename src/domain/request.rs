use serde_json::{Map, Value};

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    ContactId, ContactListId, MessageText, PageLimit, PhoneNumber, ScheduledAt, SenderId,
    WebhookUrl,
};

pub const BATCH_MAX_MESSAGES: usize = 1000;
pub const ADD_CONTACTS_MAX: usize = 1000;

/// Message classification used for quiet-hours and consent rules on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Transactional,
    Marketing,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transactional => "transactional",
            Self::Marketing => "marketing",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub from: Option<SenderId>,
    pub message_type: Option<MessageType>,
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone)]
pub struct SendMessage {
    to: PhoneNumber,
    text: MessageText,
    options: SendOptions,
}

impl SendMessage {
    pub fn new(to: PhoneNumber, text: MessageText) -> Self {
        Self::with_options(to, text, SendOptions::default())
    }

    pub fn with_options(to: PhoneNumber, text: MessageText, options: SendOptions) -> Self {
        Self { to, text, options }
    }

    pub fn to(&self) -> &PhoneNumber {
        &self.to
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleMessage {
    message: SendMessage,
    scheduled_at: ScheduledAt,
}

impl ScheduleMessage {
    pub fn new(message: SendMessage, scheduled_at: ScheduledAt) -> Self {
        Self {
            message,
            scheduled_at,
        }
    }

    pub fn message(&self) -> &SendMessage {
        &self.message
    }

    pub fn scheduled_at(&self) -> &ScheduledAt {
        &self.scheduled_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub to: PhoneNumber,
    pub text: MessageText,
}

/// An already-built batch; the server fans it out.
#[derive(Debug, Clone)]
pub struct SendBatch {
    messages: Vec<BatchEntry>,
    from: Option<SenderId>,
    message_type: Option<MessageType>,
}

impl SendBatch {
    pub fn new(
        messages: Vec<BatchEntry>,
        from: Option<SenderId>,
        message_type: Option<MessageType>,
    ) -> Result<Self, ValidationError> {
        if messages.is_empty() {
            return Err(ValidationError::Empty { field: "messages" });
        }
        if messages.len() > BATCH_MAX_MESSAGES {
            return Err(ValidationError::TooMany {
                field: "messages",
                max: BATCH_MAX_MESSAGES,
                actual: messages.len(),
            });
        }
        Ok(Self {
            messages,
            from,
            message_type,
        })
    }

    pub fn messages(&self) -> &[BatchEntry] {
        &self.messages
    }

    pub fn from(&self) -> Option<&SenderId> {
        self.from.as_ref()
    }

    pub fn message_type(&self) -> Option<MessageType> {
        self.message_type
    }
}

/// Pagination shared by every list endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: Option<PageLimit>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct ListMessages {
    pub page: ListOptions,
    pub status: Option<String>,
    pub to: Option<PhoneNumber>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone)]
pub struct CreateContact {
    phone: PhoneNumber,
    fields: ContactFields,
}

impl CreateContact {
    pub fn new(phone: PhoneNumber, fields: ContactFields) -> Self {
        Self { phone, fields }
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateContact {
    pub phone: Option<PhoneNumber>,
    pub fields: ContactFields,
}

#[derive(Debug, Clone)]
pub struct CreateContactList {
    name: String,
    description: Option<String>,
}

impl CreateContactList {
    pub const FIELD: &'static str = "name";

    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self {
            name: name.trim().to_owned(),
            description,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct AddContacts {
    contact_ids: Vec<ContactId>,
}

impl AddContacts {
    pub fn new(contact_ids: Vec<ContactId>) -> Result<Self, ValidationError> {
        if contact_ids.is_empty() {
            return Err(ValidationError::Empty {
                field: "contactIds",
            });
        }
        if contact_ids.len() > ADD_CONTACTS_MAX {
            return Err(ValidationError::TooMany {
                field: "contactIds",
                max: ADD_CONTACTS_MAX,
                actual: contact_ids.len(),
            });
        }
        Ok(Self { contact_ids })
    }

    pub fn contact_ids(&self) -> &[ContactId] {
        &self.contact_ids
    }
}

#[derive(Debug, Clone)]
pub struct CreateCampaign {
    name: String,
    text: MessageText,
    list_ids: Vec<ContactListId>,
    from: Option<SenderId>,
    scheduled_at: Option<ScheduledAt>,
}

impl CreateCampaign {
    pub fn new(
        name: impl Into<String>,
        text: MessageText,
        list_ids: Vec<ContactListId>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if list_ids.is_empty() {
            return Err(ValidationError::Empty { field: "listIds" });
        }
        Ok(Self {
            name: name.trim().to_owned(),
            text,
            list_ids,
            from: None,
            scheduled_at: None,
        })
    }

    pub fn from_sender(mut self, from: SenderId) -> Self {
        self.from = Some(from);
        self
    }

    pub fn scheduled_at(mut self, at: ScheduledAt) -> Self {
        self.scheduled_at = Some(at);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn list_ids(&self) -> &[ContactListId] {
        &self.list_ids
    }

    pub fn sender(&self) -> Option<&SenderId> {
        self.from.as_ref()
    }

    pub fn schedule(&self) -> Option<&ScheduledAt> {
        self.scheduled_at.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct CreateWebhook {
    url: WebhookUrl,
    events: Vec<String>,
    description: Option<String>,
}

impl CreateWebhook {
    pub fn new(
        url: WebhookUrl,
        events: Vec<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        let events = normalize_events(events)?;
        Ok(Self {
            url,
            events,
            description,
        })
    }

    pub fn url(&self) -> &WebhookUrl {
        &self.url
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateWebhook {
    url: Option<WebhookUrl>,
    events: Option<Vec<String>>,
    description: Option<String>,
    active: Option<bool>,
}

impl UpdateWebhook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: WebhookUrl) -> Self {
        self.url = Some(url);
        self
    }

    pub fn events(mut self, events: Vec<String>) -> Result<Self, ValidationError> {
        self.events = Some(normalize_events(events)?);
        Ok(self)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn new_url(&self) -> Option<&WebhookUrl> {
        self.url.as_ref()
    }

    pub fn new_events(&self) -> Option<&[String]> {
        self.events.as_deref()
    }

    pub fn new_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn new_active(&self) -> Option<bool> {
        self.active
    }
}

fn normalize_events(events: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let events = events
        .into_iter()
        .map(|event| event.trim().to_owned())
        .filter(|event| !event.is_empty())
        .collect::<Vec<_>>();
    if events.is_empty() {
        return Err(ValidationError::Empty { field: "events" });
    }
    Ok(events)
}

#[derive(Debug, Clone)]
pub struct CreateApiKey {
    name: String,
    expires_in_days: Option<u32>,
}

impl CreateApiKey {
    pub fn new(
        name: impl Into<String>,
        expires_in_days: Option<u32>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if let Some(days) = expires_in_days {
            if !(1..=365).contains(&days) {
                return Err(ValidationError::OutOfRange {
                    field: "expiresInDays",
                    min: 1,
                    max: 365,
                    actual: days,
                });
            }
        }
        Ok(Self {
            name: name.trim().to_owned(),
            expires_in_days,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expires_in_days(&self) -> Option<u32> {
        self.expires_in_days
    }
}
