use chainchat_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The agent endpoint answered with a non-success status.
    #[error("agent call failed with HTTP {status}: {body}")]
    AgentCallFailed { status: u16, body: String },

    /// The request never produced a response (connect, timeout, body read).
    #[error("agent request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("invalid agent response: {message}")]
    InvalidResponse { message: String },

    /// The agent reported an error inside a streamed response.
    #[error("agent stream error: {message}")]
    StreamError { message: String },

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn invalid_response(message: impl std::fmt::Display) -> Self {
        Self::InvalidResponse {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn stream_error(message: impl Into<String>) -> Self {
        Self::StreamError {
            message: message.into(),
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
