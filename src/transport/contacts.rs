use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domain::{
    AddContacts, Contact, ContactFields, ContactId, ContactList, ContactListId, CreateContact,
    CreateContactList, UpdateContact,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContactWire {
    id: ContactId,
    #[serde(alias = "phoneNumber")]
    phone: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
    #[serde(default)]
    opted_out: bool,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<ContactWire> for Contact {
    fn from(value: ContactWire) -> Self {
        Self {
            id: value.id,
            phone: value.phone,
            name: value.name,
            email: value.email,
            metadata: value.metadata.unwrap_or_default(),
            opted_out: value.opted_out,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContactListWire {
    id: ContactListId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    contact_count: u64,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<ContactListWire> for ContactList {
    fn from(value: ContactListWire) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            contact_count: value.contact_count,
            created_at: value.created_at,
        }
    }
}

pub(crate) fn encode_create_contact(request: &CreateContact) -> Value {
    let mut body = Map::new();
    body.insert("phone".to_owned(), json!(request.phone().e164()));
    push_fields(&mut body, request.fields());
    Value::Object(body)
}

/// Only fields that are set are sent; the server leaves the rest unchanged.
pub(crate) fn encode_update_contact(request: &UpdateContact) -> Value {
    let mut body = Map::new();
    if let Some(phone) = request.phone.as_ref() {
        body.insert("phone".to_owned(), json!(phone.e164()));
    }
    push_fields(&mut body, &request.fields);
    Value::Object(body)
}

pub(crate) fn encode_create_contact_list(request: &CreateContactList) -> Value {
    let mut body = Map::new();
    body.insert(CreateContactList::FIELD.to_owned(), json!(request.name()));
    if let Some(description) = request.description() {
        body.insert("description".to_owned(), json!(description));
    }
    Value::Object(body)
}

pub(crate) fn encode_add_contacts(request: &AddContacts) -> Value {
    let ids = request
        .contact_ids()
        .iter()
        .map(ContactId::as_str)
        .collect::<Vec<_>>();
    json!({ "contactIds": ids })
}

fn push_fields(body: &mut Map<String, Value>, fields: &ContactFields) {
    if let Some(name) = fields.name.as_ref() {
        body.insert("name".to_owned(), json!(name));
    }
    if let Some(email) = fields.email.as_ref() {
        body.insert("email".to_owned(), json!(email));
    }
    if let Some(metadata) = fields.metadata.as_ref() {
        body.insert("metadata".to_owned(), Value::Object(metadata.clone()));
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::PhoneNumber;

    use super::*;

    #[test]
    fn create_contact_body_uses_e164() {
        let request = CreateContact::new(
            PhoneNumber::new("+1 (555) 123-4567").unwrap(),
            ContactFields {
                name: Some("Ada".to_owned()),
                ..Default::default()
            },
        );
        assert_eq!(
            encode_create_contact(&request),
            json!({"phone": "+15551234567", "name": "Ada"})
        );
    }

    #[test]
    fn update_contact_body_is_sparse() {
        assert_eq!(encode_update_contact(&UpdateContact::default()), json!({}));

        let request = UpdateContact {
            phone: None,
            fields: ContactFields {
                email: Some("ada@example.com".to_owned()),
                ..Default::default()
            },
        };
        assert_eq!(
            encode_update_contact(&request),
            json!({"email": "ada@example.com"})
        );
    }

    #[test]
    fn list_bodies() {
        let request = CreateContactList::new(" VIP ", Some("best".to_owned())).unwrap();
        assert_eq!(
            encode_create_contact_list(&request),
            json!({"name": "VIP", "description": "best"})
        );

        let request = AddContacts::new(vec![
            ContactId::new("c_1").unwrap(),
            ContactId::new("c_2").unwrap(),
        ])
        .unwrap();
        assert_eq!(
            encode_add_contacts(&request),
            json!({"contactIds": ["c_1", "c_2"]})
        );
    }

    #[test]
    fn contact_decodes_phone_number_alias() {
        let json = r#"
        {
          "id": "c_1",
          "phoneNumber": "+15551234567",
          "optedOut": true,
          "metadata": {"tier": "gold"}
        }
        "#;
        let contact: Contact = serde_json::from_str::<ContactWire>(json).unwrap().into();
        assert_eq!(contact.phone, "+15551234567");
        assert!(contact.opted_out);
        assert_eq!(contact.metadata.get("tier"), Some(&json!("gold")));
        assert_eq!(contact.name, None);
    }
}
