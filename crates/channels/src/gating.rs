//! Per-event eligibility decision.
//!
//! Rules are evaluated strictly in order and the first match wins:
//!
//! 1. authored by the agent itself: drop
//! 2. reaction, membership change or transaction acknowledgement: drop
//! 3. empty text after trimming: drop
//! 4. group where the agent never posted: welcome, and do not process
//! 5. group message that neither mentions the agent nor replies to it: drop
//! 6. process

use {
    crate::event::{ConversationContext, InboundEvent},
    chainchat_common::types::AgentIdentity,
};

/// Why an event was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    OwnMessage,
    PassiveContent,
    EmptyText,
    NotAddressed,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OwnMessage => "own_message",
            Self::PassiveContent => "passive_content",
            Self::EmptyText => "empty_text",
            Self::NotAddressed => "not_addressed",
        }
    }
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Drop(DropReason),
    /// First contact in a group: greet, and wait for the next event.
    SendWelcome,
    Process,
}

/// Decide what to do with one inbound event. Pure; no I/O.
pub fn evaluate(
    identity: &AgentIdentity,
    event: &InboundEvent,
    ctx: &ConversationContext,
) -> Eligibility {
    if identity.is_self(&event.sender_inbox_id) {
        return Eligibility::Drop(DropReason::OwnMessage);
    }
    if event.content.is_passive() {
        return Eligibility::Drop(DropReason::PassiveContent);
    }
    let text = event.text().unwrap_or_default().trim();
    if text.is_empty() {
        return Eligibility::Drop(DropReason::EmptyText);
    }
    if ctx.kind.is_group() {
        if !ctx.agent_has_posted {
            return Eligibility::SendWelcome;
        }
        let replies_to_agent = ctx
            .reply_target_author
            .as_deref()
            .is_some_and(|author| identity.is_self(author));
        if !identity.is_mentioned_in(text) && !replies_to_agent {
            return Eligibility::Drop(DropReason::NotAddressed);
        }
    }
    Eligibility::Process
}
