use crate::domain::{Account, ApiKeyId, ApiKeyInfo, CreateApiKey, Credits, Deleted, Page};
use crate::error::SendlyError;
use crate::transport::{self, AccountWire, ApiKeyWire, CreditsWire, PageWire};

use super::{RequestOptions, SendlyClient};

const ACCOUNT: &str = "/account";
const CREDITS: &str = "/credits";
const KEYS: &str = "/keys";

/// Account, credit balance and API key endpoints. Obtained from [`SendlyClient::account`].
#[derive(Debug, Clone, Copy)]
pub struct AccountApi<'a> {
    client: &'a SendlyClient,
}

impl<'a> AccountApi<'a> {
    pub(super) fn new(client: &'a SendlyClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<Account, SendlyError> {
        let wire: AccountWire = self.client.request(RequestOptions::get(ACCOUNT)).await?;
        Ok(wire.into())
    }

    /// Current credit balance. Amounts keep the server's decimal text.
    pub async fn credits(&self) -> Result<Credits, SendlyError> {
        let wire: CreditsWire = self.client.request(RequestOptions::get(CREDITS)).await?;
        Ok(wire.into())
    }

    pub async fn list_keys(&self) -> Result<Page<ApiKeyInfo>, SendlyError> {
        let wire: PageWire<ApiKeyWire> = self.client.request(RequestOptions::get(KEYS)).await?;
        Ok(wire.into_page())
    }

    /// Create a key. [`ApiKeyInfo::key`] holds the full key only in this response.
    pub async fn create_key(&self, request: CreateApiKey) -> Result<ApiKeyInfo, SendlyError> {
        let options =
            RequestOptions::post(KEYS).body(transport::encode_create_api_key(&request));
        let wire: ApiKeyWire = self.client.request(options).await?;
        Ok(wire.into())
    }

    pub async fn revoke_key(&self, id: &ApiKeyId) -> Result<Deleted, SendlyError> {
        self.client
            .delete_resource(format!("{KEYS}/{id}"), id.as_str())
            .await
    }
}
