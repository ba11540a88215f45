use chainchat_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The subscription errored or closed.
    #[error("stream failed: {message}")]
    StreamFailed { message: String },

    /// Every reconnect attempt failed. Fatal for the process.
    #[error("stream retries exhausted after {attempts} attempt(s)")]
    RetriesExhausted { attempts: u32 },

    #[error(transparent)]
    Channel(#[from] chainchat_channels::Error),

    #[error(transparent)]
    Agent(#[from] chainchat_agents::Error),

    #[error(transparent)]
    Wallet(#[from] chainchat_wallet::Error),

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn stream_failed(message: impl std::fmt::Display) -> Self {
        Self::StreamFailed {
            message: message.to_string(),
        }
    }
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

chainchat_common::impl_context!();
