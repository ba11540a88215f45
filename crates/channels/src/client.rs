use {
    crate::{
        content::OutboundContent,
        error::Result,
        event::{ConversationInfo, InboundEvent, StoredMessage},
    },
    async_trait::async_trait,
    futures::stream::BoxStream,
};

/// Pull-style stream of inbound events. Ending or yielding an error means the
/// subscription is gone and must be re-established.
pub type EventStream = BoxStream<'static, Result<InboundEvent>>;

/// Messaging-network client the bridge is driven by.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Pull conversation state from the network before streaming.
    async fn sync_all(&self) -> Result<()>;

    /// Open a fresh subscription to all conversations.
    async fn stream_all_messages(&self) -> Result<EventStream>;

    async fn conversation(&self, conversation_id: &str) -> Result<ConversationInfo>;

    /// Member inbox ids of a conversation.
    async fn members(&self, conversation_id: &str) -> Result<Vec<String>>;

    /// Message history of a conversation, oldest first.
    async fn messages(&self, conversation_id: &str) -> Result<Vec<StoredMessage>>;

    /// Look up a single message by id.
    async fn message(&self, message_id: &str) -> Result<Option<StoredMessage>>;

    /// Wallet address behind an inbox id.
    async fn inbox_address(&self, inbox_id: &str) -> Result<Option<String>>;

    /// Send `content` into a conversation, returning the new message id.
    async fn send(&self, conversation_id: &str, content: &OutboundContent) -> Result<String>;
}
