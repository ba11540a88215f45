use {
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

/// One call inside a batch.
///
/// Signing-only calls (message and typed-data signatures) have no `to`; the
/// field is omitted from the wire form rather than set to a zero address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    /// Free-form descriptive strings (`description`, `transactionType`, ...).
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl CallDescriptor {
    pub fn with_meta(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.get("description").map(String::as_str)
    }
}

/// Wallet send-calls payload: every call shares one chain and one sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBatch {
    #[serde(rename = "version")]
    pub schema_version: String,
    /// Lower-case `0x` hex chain id.
    #[serde(rename = "chainId")]
    pub chain_id: String,
    #[serde(rename = "from")]
    pub sender: String,
    pub calls: Vec<CallDescriptor>,
}

/// Grouping key of a batch. Addresses compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchKey {
    pub chain_id: String,
    pub sender: String,
    pub schema_version: String,
}

impl TransactionBatch {
    pub fn key(&self) -> BatchKey {
        BatchKey {
            chain_id: self.chain_id.to_ascii_lowercase(),
            sender: self.sender.to_ascii_lowercase(),
            schema_version: self.schema_version.clone(),
        }
    }

    /// Human-readable one-line summary used in logs and text fallbacks.
    pub fn summary(&self) -> String {
        let descriptions: Vec<&str> = self
            .calls
            .iter()
            .filter_map(CallDescriptor::description)
            .collect();
        format!(
            "{} call(s) on chain {} from {}: {}",
            self.calls.len(),
            self.chain_id,
            self.sender,
            descriptions.join("; ")
        )
    }
}
