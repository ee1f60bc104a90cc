//! Conversation endpoints. Live chat goes over the realtime chat channel;
//! these cover history and the REST fallback for sending.

use fret_core::Page;
use fret_core::messaging::{Conversation, Message};
use serde::Serialize;

use crate::{ApiClient, Result};

#[derive(Serialize)]
struct NewMessage<'a> {
    content: &'a str,
}

impl ApiClient {
    /// Conversations the current user takes part in.
    pub async fn conversations(&self) -> Result<Page<Conversation>> {
        self.gateway()
            .get_json(&self.url("messaging/conversations/"))
            .await
    }

    /// Message history of a conversation.
    pub async fn messages(&self, conversation_id: &str) -> Result<Page<Message>> {
        self.gateway()
            .get_json(&self.url(&format!("messaging/conversations/{conversation_id}/messages/")))
            .await
    }

    /// Post a text message.
    pub async fn send_message(&self, conversation_id: &str, content: &str) -> Result<Message> {
        self.gateway()
            .post_json(
                &self.url(&format!("messaging/conversations/{conversation_id}/messages/")),
                &NewMessage { content },
            )
            .await
    }
}
