use {
    crate::{
        client::MessagingClient,
        error::Result,
        event::{ConversationContext, InboundEvent},
    },
    chainchat_common::types::AgentIdentity,
};

/// Derive the conversation view for one event.
///
/// Queries conversation metadata, membership and history on every call;
/// nothing is cached between events.
pub async fn resolve_context(
    client: &dyn MessagingClient,
    identity: &AgentIdentity,
    event: &InboundEvent,
) -> Result<ConversationContext> {
    let info = client.conversation(&event.conversation_id).await?;
    let participants = client.members(&event.conversation_id).await?;
    let agent_has_posted = client
        .messages(&event.conversation_id)
        .await?
        .iter()
        .any(|message| identity.is_self(&message.sender_inbox_id));

    let reply_target_author = match event.reply_reference() {
        Some(reference) => client
            .message(reference)
            .await?
            .map(|message| message.sender_inbox_id),
        None => None,
    };

    Ok(ConversationContext {
        kind: info.kind,
        participants,
        agent_has_posted,
        reply_target_author,
    })
}
