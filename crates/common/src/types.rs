use serde::{Deserialize, Serialize};

/// Whether a conversation is a 1:1 channel or a multi-member group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    #[default]
    Direct,
    Group,
}

impl ConversationKind {
    pub fn is_group(self) -> bool {
        matches!(self, Self::Group)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Group => "group",
        }
    }
}

impl std::fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity the bridge speaks as on the messaging network.
///
/// Every handle is matched case-insensitively when detecting mentions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentIdentity {
    /// Wallet address backing the messaging identity (`0x...`).
    pub address: String,
    /// Network-level chat id of the agent.
    pub inbox_id: String,
    /// Fixed short-name tag, e.g. `@agent`.
    pub short_name: String,
    /// Additional aliases (ENS names, display names).
    pub extra_handles: Vec<String>,
}

impl AgentIdentity {
    /// True when `sender_id` is one of this agent's own identifiers.
    pub fn is_self(&self, sender_id: &str) -> bool {
        (!self.inbox_id.is_empty() && self.inbox_id.eq_ignore_ascii_case(sender_id))
            || (!self.address.is_empty() && self.address.eq_ignore_ascii_case(sender_id))
    }

    /// All non-empty handles a human might use to address the agent.
    pub fn handles(&self) -> impl Iterator<Item = &str> {
        [
            self.address.as_str(),
            self.inbox_id.as_str(),
            self.short_name.as_str(),
        ]
        .into_iter()
        .chain(self.extra_handles.iter().map(String::as_str))
        .filter(|h| !h.trim().is_empty())
    }

    /// Whether `text` mentions any known handle.
    ///
    /// A handle only counts when it stands as its own token: the characters
    /// on either side must not be part of a handle (`@agentsmith` does not
    /// mention `@agent`).
    pub fn is_mentioned_in(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.handles()
            .any(|handle| contains_token(&lower, &handle.trim().to_lowercase()))
    }
}

fn is_handle_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

fn contains_token(text: &str, token: &str) -> bool {
    text.match_indices(token).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(is_handle_char) && !after.is_some_and(is_handle_char)
    })
}
