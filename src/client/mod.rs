//! Typed client for the backend envelope, plus the polling view.
//!
//! The client speaks the `{method, params}` envelope through the
//! [`transport::ApiTransport`] port; the embedding shell provides the
//! actual wire (HTTP in production, a direct in-process binding in tests).
//! The [`view::ClientView`] layers the pull-based read model on top:
//! every read degrades failures to empty results; absence means
//! "temporarily unavailable", and there is no built-in retry.

pub mod transport;
pub mod view;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::envelope::{ApiRequest, FilePayload, MessageInfo, methods};
use crate::conversation::cache::{CacheId, CachedFile};
use crate::conversation::domain::{Conversation, ConversationId, Event, Message};
use crate::conversation::store::PendingMessage;
use crate::registry::domain::AgentCard;
use crate::task::domain::Task;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use transport::{ApiTransport, ClientError, ClientResult};

/// Typed client over the backend envelope.
#[derive(Debug, Clone)]
pub struct ConversationClient<T>
where
    T: ApiTransport,
{
    transport: Arc<T>,
}

impl<T> ConversationClient<T>
where
    T: ApiTransport,
{
    /// Creates a client over the given transport.
    #[must_use]
    pub const fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Creates a conversation.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or decode failure.
    pub async fn create_conversation(&self) -> ClientResult<Conversation> {
        self.call(methods::CONVERSATION_CREATE, Value::Null).await
    }

    /// Lists all conversations.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or decode failure.
    pub async fn list_conversations(&self) -> ClientResult<Vec<Conversation>> {
        self.call(methods::CONVERSATION_LIST, Value::Null).await
    }

    /// Sends a message for asynchronous processing.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or decode failure.
    pub async fn send_message(&self, message: &Message) -> ClientResult<MessageInfo> {
        self.call(methods::MESSAGE_SEND, message).await
    }

    /// Lists a conversation's messages.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or decode failure.
    pub async fn list_messages(
        &self,
        conversation_id: ConversationId,
    ) -> ClientResult<Vec<Message>> {
        self.call(methods::MESSAGE_LIST, conversation_id).await
    }

    /// Lists messages still awaiting an agent response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or decode failure.
    pub async fn pending_messages(&self) -> ClientResult<Vec<PendingMessage>> {
        self.call(methods::MESSAGE_PENDING, Value::Null).await
    }

    /// Lists all tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or decode failure.
    pub async fn list_tasks(&self) -> ClientResult<Vec<Task>> {
        self.call(methods::TASK_LIST, Value::Null).await
    }

    /// Lists recorded events.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or decode failure.
    pub async fn list_events(&self) -> ClientResult<Vec<Event>> {
        self.call(methods::EVENT_LIST, Value::Null).await
    }

    /// Registers the agent served at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or decode failure, or when the
    /// backend reports the peer unreachable.
    pub async fn register_agent(&self, base_url: &str) -> ClientResult<AgentCard> {
        self.call(methods::AGENT_REGISTER, base_url).await
    }

    /// Lists registered agents.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or decode failure.
    pub async fn list_agents(&self) -> ClientResult<Vec<AgentCard>> {
        self.call(methods::AGENT_LIST, Value::Null).await
    }

    /// Retrieves a cached file by id, decoding it into bytes + MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, an unknown id, or a
    /// payload that does not decode.
    pub async fn get_file(&self, id: CacheId) -> ClientResult<CachedFile> {
        let payload: FilePayload = self.call(methods::MESSAGE_FILE, id).await?;
        let bytes = BASE64
            .decode(payload.bytes.as_bytes())
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(CachedFile::new(bytes, payload.mime_type))
    }

    /// Updates the routing credential.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or decode failure.
    pub async fn update_credential(&self, credential: &str) -> ClientResult<()> {
        let _: Value = self.call(methods::CREDENTIAL_UPDATE, credential).await?;
        Ok(())
    }

    async fn call<P, O>(&self, method: &str, params: P) -> ClientResult<O>
    where
        P: Serialize + Send + Sync,
        O: DeserializeOwned,
    {
        let params = serde_json::to_value(&params)
            .map_err(|e| ClientError::Decode(format!("failed to encode params: {e}")))?;
        let response = self.transport.call(ApiRequest::new(method, params)).await?;
        let result = response
            .into_result()
            .map_err(|error| ClientError::Backend(error.message))?;
        serde_json::from_value(result).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
