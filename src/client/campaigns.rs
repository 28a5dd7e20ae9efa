use crate::domain::{Campaign, CampaignId, CreateCampaign, Deleted, ListOptions, Page};
use crate::error::SendlyError;
use crate::transport::{self, CampaignWire, PageWire};

use super::{RequestOptions, SendlyClient, with_page};

const CAMPAIGNS: &str = "/campaigns";

/// `/campaigns` endpoints. Obtained from [`SendlyClient::campaigns`].
///
/// A campaign sends one text to every contact of the given lists. It is
/// created as a draft (or scheduled) and dispatched with [`Campaigns::send`].
#[derive(Debug, Clone, Copy)]
pub struct Campaigns<'a> {
    client: &'a SendlyClient,
}

impl<'a> Campaigns<'a> {
    pub(super) fn new(client: &'a SendlyClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, page: ListOptions) -> Result<Page<Campaign>, SendlyError> {
        let wire: PageWire<CampaignWire> = self
            .client
            .request(with_page(RequestOptions::get(CAMPAIGNS), &page))
            .await?;
        Ok(wire.into_page())
    }

    pub async fn get(&self, id: &CampaignId) -> Result<Campaign, SendlyError> {
        self.fetch(RequestOptions::get(format!("{CAMPAIGNS}/{id}")))
            .await
    }

    pub async fn create(&self, request: CreateCampaign) -> Result<Campaign, SendlyError> {
        self.fetch(
            RequestOptions::post(CAMPAIGNS).body(transport::encode_create_campaign(&request)),
        )
        .await
    }

    /// Start sending now. Credits for all recipients are charged.
    pub async fn send(&self, id: &CampaignId) -> Result<Campaign, SendlyError> {
        self.fetch(RequestOptions::post(format!("{CAMPAIGNS}/{id}/send")))
            .await
    }

    /// Cancel a scheduled or in-progress campaign.
    pub async fn cancel(&self, id: &CampaignId) -> Result<Campaign, SendlyError> {
        self.fetch(RequestOptions::post(format!("{CAMPAIGNS}/{id}/cancel")))
            .await
    }

    /// Delete a draft campaign.
    pub async fn delete(&self, id: &CampaignId) -> Result<Deleted, SendlyError> {
        self.client
            .delete_resource(format!("{CAMPAIGNS}/{id}"), id.as_str())
            .await
    }

    async fn fetch(&self, options: RequestOptions) -> Result<Campaign, SendlyError> {
        let wire: CampaignWire = self.client.request(options).await?;
        Ok(wire.into())
    }
}
