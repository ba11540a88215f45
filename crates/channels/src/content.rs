use {
    chainchat_wallet::TransactionBatch,
    serde::{Deserialize, Serialize},
};

/// Content-type descriptor attached to every outbound send.
///
/// Rendered as `authority/type:major.minor`, e.g. `xmtp.org/text:1.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType {
    pub authority_id: &'static str,
    pub type_id: &'static str,
    pub version_major: u32,
    pub version_minor: u32,
}

const XMTP: &str = "xmtp.org";
const COINBASE: &str = "coinbase.com";

impl ContentType {
    const fn new(authority_id: &'static str, type_id: &'static str) -> Self {
        Self {
            authority_id,
            type_id,
            version_major: 1,
            version_minor: 0,
        }
    }

    pub const TEXT: Self = Self::new(XMTP, "text");
    pub const REPLY: Self = Self::new(XMTP, "reply");
    pub const REACTION: Self = Self::new(XMTP, "reaction");
    pub const TRANSACTION_REFERENCE: Self = Self::new(XMTP, "transactionReference");
    pub const GROUP_UPDATED: Self = Self::new(XMTP, "group_updated");
    pub const WALLET_SEND_CALLS: Self = Self::new(COINBASE, "walletSendCalls");
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}:{}.{}",
            self.authority_id, self.type_id, self.version_major, self.version_minor
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionAction {
    #[default]
    Added,
    Removed,
}

/// Emoji reaction on an earlier message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Id of the message being reacted to.
    pub reference: String,
    #[serde(default)]
    pub action: ReactionAction,
    pub content: String,
}

/// Text threaded under an earlier message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub reference: String,
    pub content: String,
}

/// What actually goes over the wire, after the dispatcher picked a shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum OutboundContent {
    Text(String),
    Reply(Reply),
    Reaction(Reaction),
    WalletSendCalls(TransactionBatch),
}

impl OutboundContent {
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Text(_) => ContentType::TEXT,
            Self::Reply(_) => ContentType::REPLY,
            Self::Reaction(_) => ContentType::REACTION,
            Self::WalletSendCalls(_) => ContentType::WALLET_SEND_CALLS,
        }
    }
}
