//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    ADD_CONTACTS_MAX, AddContacts, BATCH_MAX_MESSAGES, BatchEntry, ContactFields, CreateApiKey,
    CreateCampaign, CreateContact, CreateContactList, CreateWebhook, ListMessages, ListOptions,
    MessageType, ScheduleMessage, SendBatch, SendMessage, SendOptions, UpdateContact,
    UpdateWebhook,
};
pub use response::{
    Account, ApiKeyInfo, BatchMessageResult, BatchResult, Campaign, Contact, ContactList, Credits,
    Deleted, Message, MessageStatus, Page, ScheduledMessage, Webhook, WebhookTestResult,
};
pub use validation::ValidationError;
pub use value::{
    ApiKeyId, BatchId, CampaignId, ContactId, ContactListId, MessageId, MessageText, PageLimit,
    PhoneNumber, ScheduledAt, SenderId, WebhookId, WebhookSecret, WebhookUrl,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> BatchEntry {
        BatchEntry {
            to: PhoneNumber::new("+15551234567").unwrap(),
            text: MessageText::new("hi").unwrap(),
        }
    }

    #[test]
    fn batch_size_limit_is_enforced() {
        let err = SendBatch::new(vec![entry(); BATCH_MAX_MESSAGES + 1], None, None).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooMany {
                max: BATCH_MAX_MESSAGES,
                ..
            }
        ));
        assert!(SendBatch::new(vec![entry(); BATCH_MAX_MESSAGES], None, None).is_ok());
    }

    #[test]
    fn batch_requires_messages() {
        let err = SendBatch::new(Vec::new(), None, None).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "messages" }));
    }

    #[test]
    fn add_contacts_requires_ids() {
        assert!(AddContacts::new(Vec::new()).is_err());
        let ids = vec![ContactId::new("c_1").unwrap(); ADD_CONTACTS_MAX + 1];
        assert!(matches!(
            AddContacts::new(ids),
            Err(ValidationError::TooMany { .. })
        ));
    }

    #[test]
    fn campaign_requires_name_and_lists() {
        let text = MessageText::new("Sale today").unwrap();
        let list = ContactListId::new("lst_1").unwrap();
        assert!(CreateCampaign::new(" ", text.clone(), vec![list.clone()]).is_err());
        assert!(CreateCampaign::new("Spring", text.clone(), Vec::new()).is_err());

        let campaign = CreateCampaign::new(" Spring ", text, vec![list]).unwrap();
        assert_eq!(campaign.name(), "Spring");
        assert!(campaign.schedule().is_none());
    }

    #[test]
    fn webhook_events_are_trimmed_and_required() {
        let url = WebhookUrl::new("https://example.com/hook").unwrap();
        let err = CreateWebhook::new(url.clone(), vec!["  ".to_owned()], None).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "events" }));

        let hook = CreateWebhook::new(
            url,
            vec![" message.delivered ".to_owned(), String::new()],
            None,
        )
        .unwrap();
        assert_eq!(hook.events(), ["message.delivered"]);

        assert!(UpdateWebhook::new().events(Vec::new()).is_err());
    }

    #[test]
    fn api_key_expiry_range_is_enforced() {
        assert!(CreateApiKey::new("ci", Some(0)).is_err());
        assert!(CreateApiKey::new("ci", Some(366)).is_err());
        assert!(CreateApiKey::new("ci", Some(30)).is_ok());
        assert!(CreateApiKey::new("", None).is_err());
    }

    #[test]
    fn message_status_preserves_unknown_values() {
        assert_eq!(MessageStatus::from_wire("delivered"), MessageStatus::Delivered);
        assert_eq!(MessageStatus::from_wire("canceled"), MessageStatus::Cancelled);
        assert_eq!(
            MessageStatus::from_wire("carrier_hold"),
            MessageStatus::Other("carrier_hold".to_owned())
        );
        assert!(MessageStatus::Failed.is_final());
        assert!(!MessageStatus::Queued.is_final());
    }
}
