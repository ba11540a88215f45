use std::error::Error as StdError;

/// Crate-wide result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed channel errors shared across the messaging traits.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced conversation does not exist locally.
    #[error("unknown conversation: {conversation_id}")]
    UnknownConversation { conversation_id: String },

    /// Operation is currently unavailable (client not connected).
    #[error("channel operation unavailable: {message}")]
    Unavailable { message: String },

    /// Outbound delivery failed. Never retried by the dispatcher.
    #[error("send to {conversation_id} failed: {source}")]
    SendFailed {
        conversation_id: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Wrapped source error from the network client.
    #[error("channel operation failed: {context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// JSON (de)serialization failed.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unknown_conversation(conversation_id: impl std::fmt::Display) -> Self {
        Self::UnknownConversation {
            conversation_id: conversation_id.to_string(),
        }
    }

    #[must_use]
    pub fn send_failed(
        conversation_id: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::SendFailed {
            conversation_id: conversation_id.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
