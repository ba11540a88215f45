use chainchat_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The method tag is outside the supported signing methods.
    #[error("unsupported signing method: {method}")]
    UnsupportedMethod { method: String },

    /// Typed-data payload is not a JSON object with a `domain` field.
    #[error("malformed typed data: {reason}")]
    MalformedTypedData { reason: String },

    /// Method parameters have the wrong arity or field types.
    #[error("invalid params for {method}: {message}")]
    InvalidParams { method: String, message: String },

    /// A value/gas/chain quantity could not be converted.
    #[error("invalid amount {value:?}: {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn unsupported_method(method: impl Into<String>) -> Self {
        Self::UnsupportedMethod {
            method: method.into(),
        }
    }

    #[must_use]
    pub fn malformed_typed_data(reason: impl std::fmt::Display) -> Self {
        Self::MalformedTypedData {
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn invalid_params(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            method: method.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_amount(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            value: value.into(),
            reason: reason.into(),
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
