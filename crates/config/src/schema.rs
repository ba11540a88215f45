use {
    chainchat_common::types::AgentIdentity,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainchatConfig {
    pub identity: AgentIdentity,
    pub agent: AgentConfig,
    pub supervisor: SupervisorConfig,
    pub replies: RepliesConfig,
    pub batch: BatchConfig,
}

/// How the agent endpoint encodes its responses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// A single JSON document with `text`, `toolCalls` and `toolResults`.
    #[default]
    Json,
    /// Line-prefixed data-stream chunks (`0:`, `9:`, `a:` ...).
    DataStream,
}

/// Hosted agent endpoint.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Full URL of the agent chat endpoint.
    pub endpoint: String,
    /// Bearer token sent with every request.
    #[serde(
        serialize_with = "serialize_optional_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<Secret<String>>,
    /// Agent identifier forwarded in the request body.
    pub agent_id: String,
    /// Context text prepended to every conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub response_format: ResponseFormat,
    /// Optional client-side request timeout. Unset means no deadline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("agent_id", &self.agent_id)
            .field("response_format", &self.response_format)
            .finish_non_exhaustive()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            agent_id: "default".into(),
            system_prompt: None,
            response_format: ResponseFormat::default(),
            timeout_secs: None,
        }
    }
}

fn serialize_optional_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_str(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Stream reconnection policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Number of reconnect attempts before the process gives up.
    pub max_retries: u32,
    /// Fixed delay between reconnect attempts.
    pub retry_delay_secs: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_delay_secs: 5,
        }
    }
}

/// Canned texts the bridge sends on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RepliesConfig {
    /// First message posted into a group the agent has never spoken in.
    pub welcome: String,
    /// Sent when the agent call fails.
    pub apology: String,
    /// Reaction placed on a message before it is forwarded to the agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ack_reaction: Option<String>,
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            welcome: "Hi! I'm an onchain assistant. Mention me or reply to one of my \
                      messages and I'll help you check balances, send tokens or swap."
                .into(),
            apology: "Sorry, I had trouble processing that request. Please try again.".into(),
            ack_reaction: None,
        }
    }
}

/// Transaction batch rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BatchConfig {
    /// Schema version stamped on every batch.
    pub schema_version: String,
    /// Decimals used to convert plain decimal `value` amounts to base units.
    ///
    /// Every decimal `value` is scaled, so an agent that already returns
    /// base units as decimal strings (wei, `"1000000000000000000"`) would
    /// overflow and have its calls dropped. Set this to 0 for such agents.
    /// Hex values are never scaled.
    pub value_decimals: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            schema_version: "1.0".into(),
            value_decimals: 18,
        }
    }
}
