use {
    crate::content::{ContentType, Reaction},
    chainchat_common::types::ConversationKind,
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

/// Decoded payload of an inbound message, keyed by its content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum EventContent {
    Text(String),
    /// A threaded reply. `text` is empty when the inner content is not text.
    Reply { reference: String, text: String },
    Reaction(Reaction),
    /// Acknowledgement that a previously sent batch landed on chain.
    TransactionReference(Value),
    /// Group membership or metadata change notice.
    MembershipChange(Value),
    /// A content type this bridge does not decode.
    Unknown { content_type: String },
}

impl EventContent {
    pub fn content_type(&self) -> Option<ContentType> {
        match self {
            Self::Text(_) => Some(ContentType::TEXT),
            Self::Reply { .. } => Some(ContentType::REPLY),
            Self::Reaction(_) => Some(ContentType::REACTION),
            Self::TransactionReference(_) => Some(ContentType::TRANSACTION_REFERENCE),
            Self::MembershipChange(_) => Some(ContentType::GROUP_UPDATED),
            Self::Unknown { .. } => None,
        }
    }

    /// Content types that never carry a command for the agent.
    pub fn is_passive(&self) -> bool {
        matches!(
            self,
            Self::Reaction(_) | Self::TransactionReference(_) | Self::MembershipChange(_)
        )
    }
}

/// One message received from the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    pub id: String,
    pub conversation_id: String,
    pub sender_inbox_id: String,
    /// Nanoseconds since the epoch, when the network provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at_ns: Option<i64>,
    #[serde(flatten)]
    pub content: EventContent,
}

impl InboundEvent {
    /// Text the agent should see, if any.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            EventContent::Text(text) | EventContent::Reply { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Id of the replied-to message for reply events.
    pub fn reply_reference(&self) -> Option<&str> {
        match &self.content {
            EventContent::Reply { reference, .. } => Some(reference),
            _ => None,
        }
    }
}

/// Conversation metadata as reported by the network client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationInfo {
    pub id: String,
    pub kind: ConversationKind,
}

/// A message from conversation history. Only authorship matters here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub id: String,
    pub conversation_id: String,
    pub sender_inbox_id: String,
}

/// Per-event view of the conversation, derived fresh for every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationContext {
    pub kind: ConversationKind,
    pub participants: Vec<String>,
    /// Whether the agent has sent anything here before.
    pub agent_has_posted: bool,
    /// Author of the replied-to message, for reply events.
    pub reply_target_author: Option<String>,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn decodes_flattened_event() {
        let event: InboundEvent = serde_json::from_value(json!({
            "id": "m1",
            "conversationId": "c1",
            "senderInboxId": "alice",
            "type": "reply",
            "content": {"reference": "m0", "text": "yes please"}
        }))
        .unwrap();
        assert_eq!(event.text(), Some("yes please"));
        assert_eq!(event.reply_reference(), Some("m0"));
        assert_eq!(event.content.content_type(), Some(ContentType::REPLY));
    }

    #[test]
    fn passive_content() {
        let reaction = EventContent::Reaction(Reaction {
            reference: "m0".into(),
            action: Default::default(),
            content: "👍".into(),
        });
        assert!(reaction.is_passive());
        assert!(EventContent::MembershipChange(json!({})).is_passive());
        assert!(!EventContent::Text("hi".into()).is_passive());
        assert!(!EventContent::Unknown { content_type: "x/y:1.0".into() }.is_passive());
    }
}
