use crate::domain::{
    AddContacts, Contact, ContactId, ContactList, ContactListId, CreateContact,
    CreateContactList, Deleted, ListOptions, Page, UpdateContact,
};
use crate::error::SendlyError;
use crate::transport::{self, ContactListWire, ContactWire, PageWire};

use super::{RequestOptions, SendlyClient, with_page};

const CONTACTS: &str = "/contacts";
const CONTACT_LISTS: &str = "/contact-lists";

/// `/contacts` endpoints. Obtained from [`SendlyClient::contacts`].
#[derive(Debug, Clone, Copy)]
pub struct Contacts<'a> {
    client: &'a SendlyClient,
}

impl<'a> Contacts<'a> {
    pub(super) fn new(client: &'a SendlyClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, page: ListOptions) -> Result<Page<Contact>, SendlyError> {
        let wire: PageWire<ContactWire> = self
            .client
            .request(with_page(RequestOptions::get(CONTACTS), &page))
            .await?;
        Ok(wire.into_page())
    }

    pub async fn get(&self, id: &ContactId) -> Result<Contact, SendlyError> {
        let wire: ContactWire = self
            .client
            .request(RequestOptions::get(format!("{CONTACTS}/{id}")))
            .await?;
        Ok(wire.into())
    }

    pub async fn create(&self, request: CreateContact) -> Result<Contact, SendlyError> {
        let options =
            RequestOptions::post(CONTACTS).body(transport::encode_create_contact(&request));
        let wire: ContactWire = self.client.request(options).await?;
        Ok(wire.into())
    }

    /// Change the fields set on `request`; unset fields keep their value.
    pub async fn update(
        &self,
        id: &ContactId,
        request: UpdateContact,
    ) -> Result<Contact, SendlyError> {
        let options = RequestOptions::patch(format!("{CONTACTS}/{id}"))
            .body(transport::encode_update_contact(&request));
        let wire: ContactWire = self.client.request(options).await?;
        Ok(wire.into())
    }

    pub async fn delete(&self, id: &ContactId) -> Result<Deleted, SendlyError> {
        self.client
            .delete_resource(format!("{CONTACTS}/{id}"), id.as_str())
            .await
    }
}

/// `/contact-lists` endpoints. Obtained from [`SendlyClient::contact_lists`].
#[derive(Debug, Clone, Copy)]
pub struct ContactLists<'a> {
    client: &'a SendlyClient,
}

impl<'a> ContactLists<'a> {
    pub(super) fn new(client: &'a SendlyClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, page: ListOptions) -> Result<Page<ContactList>, SendlyError> {
        let wire: PageWire<ContactListWire> = self
            .client
            .request(with_page(RequestOptions::get(CONTACT_LISTS), &page))
            .await?;
        Ok(wire.into_page())
    }

    pub async fn get(&self, id: &ContactListId) -> Result<ContactList, SendlyError> {
        let wire: ContactListWire = self
            .client
            .request(RequestOptions::get(format!("{CONTACT_LISTS}/{id}")))
            .await?;
        Ok(wire.into())
    }

    pub async fn create(&self, request: CreateContactList) -> Result<ContactList, SendlyError> {
        let options = RequestOptions::post(CONTACT_LISTS)
            .body(transport::encode_create_contact_list(&request));
        let wire: ContactListWire = self.client.request(options).await?;
        Ok(wire.into())
    }

    pub async fn delete(&self, id: &ContactListId) -> Result<Deleted, SendlyError> {
        self.client
            .delete_resource(format!("{CONTACT_LISTS}/{id}"), id.as_str())
            .await
    }

    /// Add existing contacts to a list. Returns the updated list.
    pub async fn add_contacts(
        &self,
        id: &ContactListId,
        request: AddContacts,
    ) -> Result<ContactList, SendlyError> {
        let options = RequestOptions::post(format!("{CONTACT_LISTS}/{id}/contacts"))
            .body(transport::encode_add_contacts(&request));
        let wire: ContactListWire = self.client.request(options).await?;
        Ok(wire.into())
    }

    /// Remove one contact from a list. The contact itself is kept.
    pub async fn remove_contact(
        &self,
        id: &ContactListId,
        contact_id: &ContactId,
    ) -> Result<Deleted, SendlyError> {
        self.client
            .delete_resource(
                format!("{CONTACT_LISTS}/{id}/contacts/{contact_id}"),
                contact_id.as_str(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::testing::{FakeTransport, body_json, client, target};
    use crate::domain::{ContactFields, PageLimit, PhoneNumber};
    use crate::error::ErrorKind;

    use super::*;

    fn contact_json() -> serde_json::Value {
        json!({
            "id": "c_1",
            "phone": "+15551234567",
            "name": "Ada",
            "optedOut": false,
            "createdAt": "2026-01-01T00:00:00Z"
        })
    }

    fn list_json(count: u64) -> serde_json::Value {
        json!({"id": "lst_1", "name": "VIP", "contactCount": count})
    }

    #[tokio::test]
    async fn contact_crud_uses_expected_methods_and_paths() {
        let transport = FakeTransport::new();
        transport
            .push_json(201, contact_json())
            .push_json(200, contact_json())
            .push_json(200, contact_json())
            .push_json(200, json!({"id": "c_1", "deleted": true}));
        let client = client(&transport);
        let contacts = client.contacts();

        let created = contacts
            .create(CreateContact::new(
                PhoneNumber::new("+15551234567").unwrap(),
                ContactFields {
                    name: Some("Ada".to_owned()),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();
        assert_eq!(created.name.as_deref(), Some("Ada"));
        let sent = transport.last_request();
        assert_eq!(sent.method, http::Method::POST);
        assert_eq!(target(&sent), "/contacts");

        contacts.get(&created.id).await.unwrap();
        assert_eq!(target(&transport.last_request()), "/contacts/c_1");

        let update = UpdateContact {
            fields: ContactFields {
                email: Some("ada@example.com".to_owned()),
                ..Default::default()
            },
            ..Default::default()
        };
        contacts.update(&created.id, update).await.unwrap();
        let sent = transport.last_request();
        assert_eq!(sent.method, http::Method::PATCH);
        assert_eq!(body_json(&sent), json!({"email": "ada@example.com"}));

        let deleted = contacts.delete(&created.id).await.unwrap();
        assert!(deleted.deleted);
        assert_eq!(deleted.id, "c_1");
        assert_eq!(transport.last_request().method, http::Method::DELETE);
    }

    #[tokio::test]
    async fn list_contacts_passes_pagination() {
        let transport = FakeTransport::new();
        transport.push_json(200, json!({"data": [contact_json()], "hasMore": true}));
        let client = client(&transport);

        let page = client
            .contacts()
            .list(ListOptions {
                limit: Some(PageLimit::new(1).unwrap()),
                offset: None,
            })
            .await
            .unwrap();
        assert!(page.has_more);
        assert_eq!(target(&transport.last_request()), "/contacts?limit=1");
    }

    #[tokio::test]
    async fn missing_contact_is_not_found() {
        let transport = FakeTransport::new();
        transport.push_json(404, json!({"error": "not_found", "message": "Contact not found"}));
        let client = client(&transport);

        let err = client
            .contacts()
            .get(&ContactId::new("c_missing").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn contact_list_membership() {
        let transport = FakeTransport::new();
        transport
            .push_json(201, list_json(0))
            .push_json(200, list_json(2))
            .push(crate::client::HttpResponse::new(
                http::StatusCode::NO_CONTENT,
                http::HeaderMap::new(),
                Vec::new(),
            ));
        let client = client(&transport);
        let lists = client.contact_lists();

        let list = lists
            .create(CreateContactList::new("VIP", None).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(&transport.last_request()), json!({"name": "VIP"}));

        let ids = vec![ContactId::new("c_1").unwrap(), ContactId::new("c_2").unwrap()];
        let updated = lists
            .add_contacts(&list.id, AddContacts::new(ids).unwrap())
            .await
            .unwrap();
        assert_eq!(updated.contact_count, 2);
        let sent = transport.last_request();
        assert_eq!(target(&sent), "/contact-lists/lst_1/contacts");
        assert_eq!(body_json(&sent), json!({"contactIds": ["c_1", "c_2"]}));

        let removed = lists
            .remove_contact(&list.id, &ContactId::new("c_2").unwrap())
            .await
            .unwrap();
        assert_eq!(removed.id, "c_2");
        assert!(removed.deleted);
        assert_eq!(
            target(&transport.last_request()),
            "/contact-lists/lst_1/contacts/c_2"
        );
    }

    #[tokio::test]
    async fn contact_list_get_list_and_delete() {
        let transport = FakeTransport::new();
        transport
            .push_json(200, json!({"data": [list_json(4)]}))
            .push_json(200, list_json(4))
            .push_json(200, json!({"success": true}));
        let client = client(&transport);
        let lists = client.contact_lists();

        let page = lists.list(ListOptions::default()).await.unwrap();
        assert_eq!(page.data[0].contact_count, 4);
        assert_eq!(target(&transport.last_request()), "/contact-lists");

        let id = ContactListId::new("lst_1").unwrap();
        lists.get(&id).await.unwrap();
        assert_eq!(target(&transport.last_request()), "/contact-lists/lst_1");

        let deleted = lists.delete(&id).await.unwrap();
        assert_eq!(deleted.id, "lst_1");
    }
}
