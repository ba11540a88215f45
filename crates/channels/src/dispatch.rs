use {
    crate::{
        client::MessagingClient,
        content::{OutboundContent, Reaction, ReactionAction, Reply},
        error::{Error, Result},
        event::InboundEvent,
    },
    chainchat_common::types::ConversationKind,
    chainchat_wallet::TransactionBatch,
    tracing::{info, warn},
};

/// Something the bridge wants to say in response to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Reaction(String),
    Text(String),
    Batch(TransactionBatch),
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reaction(_) => "reaction",
            Self::Text(_) => "text",
            Self::Batch(_) => "batch",
        }
    }
}

/// Pick the wire shape for `payload`.
///
/// Only group text is threaded. Reactions already point at their message and
/// batches keep their own content type so wallets can recognise them.
pub fn shape(payload: Payload, event: &InboundEvent, kind: ConversationKind) -> OutboundContent {
    match payload {
        Payload::Reaction(emoji) => OutboundContent::Reaction(Reaction {
            reference: event.id.clone(),
            action: ReactionAction::Added,
            content: emoji,
        }),
        Payload::Batch(batch) => OutboundContent::WalletSendCalls(batch),
        Payload::Text(text) if kind.is_group() => OutboundContent::Reply(Reply {
            reference: event.id.clone(),
            content: text,
        }),
        Payload::Text(text) => OutboundContent::Text(text),
    }
}

/// Shape and send one payload. Failures are reported, never retried.
pub async fn dispatch(
    client: &dyn MessagingClient,
    event: &InboundEvent,
    kind: ConversationKind,
    payload: Payload,
) -> Result<String> {
    let payload_kind = payload.kind();
    let content = shape(payload, event, kind);
    match client.send(&event.conversation_id, &content).await {
        Ok(message_id) => {
            info!(
                conversation_id = %event.conversation_id,
                event_id = %event.id,
                payload = payload_kind,
                content_type = %content.content_type(),
                message_id = %message_id,
                "sent"
            );
            Ok(message_id)
        },
        Err(e) => {
            warn!(
                conversation_id = %event.conversation_id,
                event_id = %event.id,
                payload = payload_kind,
                error = %e,
                "send failed"
            );
            Err(Error::send_failed(&event.conversation_id, e))
        },
    }
}
