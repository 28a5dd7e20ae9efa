use crate::domain::{
    CreateWebhook, Deleted, ListOptions, Page, UpdateWebhook, Webhook, WebhookId,
    WebhookTestResult,
};
use crate::error::SendlyError;
use crate::transport::{self, PageWire, WebhookTestWire, WebhookWire};

use super::{RequestOptions, SendlyClient, with_page};

const WEBHOOKS: &str = "/webhooks";

/// `/webhooks` subscription management. Obtained from [`SendlyClient::webhooks`].
///
/// Verifying inbound deliveries is done with [`crate::webhook`], which needs no client.
#[derive(Debug, Clone, Copy)]
pub struct Webhooks<'a> {
    client: &'a SendlyClient,
}

impl<'a> Webhooks<'a> {
    pub(super) fn new(client: &'a SendlyClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, page: ListOptions) -> Result<Page<Webhook>, SendlyError> {
        let wire: PageWire<WebhookWire> = self
            .client
            .request(with_page(RequestOptions::get(WEBHOOKS), &page))
            .await?;
        Ok(wire.into_page())
    }

    pub async fn get(&self, id: &WebhookId) -> Result<Webhook, SendlyError> {
        self.fetch(RequestOptions::get(format!("{WEBHOOKS}/{id}")))
            .await
    }

    /// Subscribe `url` to `events`. The returned webhook carries the signing
    /// secret; it is not shown again.
    pub async fn create(&self, request: CreateWebhook) -> Result<Webhook, SendlyError> {
        self.fetch(RequestOptions::post(WEBHOOKS).body(transport::encode_create_webhook(&request)))
            .await
    }

    pub async fn update(
        &self,
        id: &WebhookId,
        request: UpdateWebhook,
    ) -> Result<Webhook, SendlyError> {
        self.fetch(
            RequestOptions::patch(format!("{WEBHOOKS}/{id}"))
                .body(transport::encode_update_webhook(&request)),
        )
        .await
    }

    pub async fn delete(&self, id: &WebhookId) -> Result<Deleted, SendlyError> {
        self.client
            .delete_resource(format!("{WEBHOOKS}/{id}"), id.as_str())
            .await
    }

    /// Ask the server to deliver a test event to the subscription.
    pub async fn test(&self, id: &WebhookId) -> Result<WebhookTestResult, SendlyError> {
        let wire: WebhookTestWire = self
            .client
            .request(RequestOptions::post(format!("{WEBHOOKS}/{id}/test")))
            .await?;
        Ok(wire.into())
    }

    /// Issue a new signing secret. The old one stops verifying immediately.
    pub async fn rotate_secret(&self, id: &WebhookId) -> Result<Webhook, SendlyError> {
        self.fetch(RequestOptions::post(format!("{WEBHOOKS}/{id}/rotate-secret")))
            .await
    }

    async fn fetch(&self, options: RequestOptions) -> Result<Webhook, SendlyError> {
        let wire: WebhookWire = self.client.request(options).await?;
        Ok(wire.into())
    }
}
