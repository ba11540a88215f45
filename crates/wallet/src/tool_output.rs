use serde_json::Value;

use crate::{
    error::{Context, Result},
    request::SigningRequest,
    swap::SwapPayload,
};

/// A tool result, classified once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Signing(SigningRequest),
    Swap(SwapPayload),
    /// The tool reported a failure.
    Error(String),
    /// Plain data with no wallet work attached (balances, prices, ...).
    Other(Value),
}

impl ToolOutput {
    /// Classify a raw tool result.
    ///
    /// Results are sometimes JSON-encoded strings; those are unwrapped first.
    /// Anything that looks like a signing request is decoded strictly, so an
    /// unknown method surfaces as an error instead of being treated as data.
    pub fn decode(raw: &Value) -> Result<Self> {
        let unwrapped;
        let value = match raw {
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(inner @ Value::Object(_)) => {
                    unwrapped = inner;
                    &unwrapped
                },
                _ => return Ok(Self::Other(raw.clone())),
            },
            other => other,
        };

        let Some(object) = value.as_object() else {
            return Ok(Self::Other(value.clone()));
        };

        if let Some(request) = object.get("signingRequest").or_else(|| object.get("request"))
            && request.get("method").is_some()
        {
            return SigningRequest::from_value(request).map(Self::Signing);
        }
        if object.contains_key("method") && object.contains_key("params") {
            return SigningRequest::from_value(value).map(Self::Signing);
        }
        if let Some(swap) = object.get("swap") {
            let swap: SwapPayload =
                serde_json::from_value(swap.clone()).context("invalid swap payload")?;
            return Ok(Self::Swap(swap));
        }
        if let Some(error) = object.get("error").and_then(Value::as_str) {
            return Ok(Self::Error(error.to_string()));
        }
        Ok(Self::Other(value.clone()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Signing(_) => "signing",
            Self::Swap(_) => "swap",
            Self::Error(_) => "error",
            Self::Other(_) => "other",
        }
    }
}
