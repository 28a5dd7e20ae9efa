use crate::domain::{
    BatchId, BatchResult, ListMessages, Message, MessageId, Page, ScheduleMessage,
    ScheduledMessage, SendBatch, SendMessage,
};
use crate::error::SendlyError;
use crate::transport::{
    self, BatchResultWire, MessageWire, PageWire, ScheduledMessageWire,
};

use super::{RequestOptions, SendlyClient};

const MESSAGES: &str = "/v1/messages";
const SCHEDULE: &str = "/v1/messages/schedule";
const BATCH: &str = "/v1/messages/batch";

/// `/v1/messages` endpoints. Obtained from [`SendlyClient::messages`].
#[derive(Debug, Clone, Copy)]
pub struct Messages<'a> {
    client: &'a SendlyClient,
}

impl<'a> Messages<'a> {
    pub(super) fn new(client: &'a SendlyClient) -> Self {
        Self { client }
    }

    /// Send one SMS.
    ///
    /// With a `sk_test_` key the message is simulated and never delivered.
    pub async fn send(&self, request: SendMessage) -> Result<Message, SendlyError> {
        let options = RequestOptions::post(MESSAGES).body(transport::encode_send_message(&request));
        let wire: MessageWire = self.client.request(options).await?;
        Ok(wire.into())
    }

    pub async fn get(&self, id: &MessageId) -> Result<Message, SendlyError> {
        let wire: MessageWire = self
            .client
            .request(RequestOptions::get(format!("{MESSAGES}/{id}")))
            .await?;
        Ok(wire.into())
    }

    /// List sent messages, newest first.
    pub async fn list(&self, request: ListMessages) -> Result<Page<Message>, SendlyError> {
        let mut options = RequestOptions::get(MESSAGES);
        for (name, value) in transport::encode_list_messages_query(&request) {
            options = options.query(name, value);
        }
        let wire: PageWire<MessageWire> = self.client.request(options).await?;
        Ok(wire.into_page())
    }

    /// Schedule a message for later delivery. Credits are reserved up front.
    pub async fn schedule(
        &self,
        request: ScheduleMessage,
    ) -> Result<ScheduledMessage, SendlyError> {
        let options =
            RequestOptions::post(SCHEDULE).body(transport::encode_schedule_message(&request));
        let wire: ScheduledMessageWire = self.client.request(options).await?;
        Ok(wire.into())
    }

    /// Cancel a scheduled message and release its reserved credits.
    pub async fn cancel_scheduled(&self, id: &MessageId) -> Result<ScheduledMessage, SendlyError> {
        let wire: ScheduledMessageWire = self
            .client
            .request(RequestOptions::delete(format!("{SCHEDULE}/{id}")))
            .await?;
        Ok(wire.into())
    }

    /// Send up to 1000 messages in one request.
    pub async fn send_batch(&self, request: SendBatch) -> Result<BatchResult, SendlyError> {
        let options = RequestOptions::post(BATCH).body(transport::encode_send_batch(&request));
        let wire: BatchResultWire = self.client.request(options).await?;
        Ok(wire.into())
    }

    pub async fn get_batch(&self, id: &BatchId) -> Result<BatchResult, SendlyError> {
        let wire: BatchResultWire = self
            .client
            .request(RequestOptions::get(format!("{BATCH}/{id}")))
            .await?;
        Ok(wire.into())
    }
}
