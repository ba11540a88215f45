use {
    chainchat_agents::{AgentRequest, AgentResponse},
    chainchat_channels::{
        DropReason, Eligibility, InboundEvent, Payload, dispatch, evaluate, resolve_context,
    },
    chainchat_common::types::ConversationKind,
    chainchat_wallet::{ToolOutput, TransactionBatch, aggregate},
    tracing::{debug, info, warn},
};

use crate::{context::BridgeContext, error::Result};

/// What happened to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Dropped(DropReason),
    Welcomed,
    /// The agent call failed and the apology was sent instead.
    AgentFailed,
    Processed { batches: usize },
    /// Shutdown was observed; nothing further was sent.
    Cancelled,
}

/// Run one event through eligibility, the agent, normalization and dispatch.
///
/// Send failures are logged and skipped. Errors returned here come from the
/// conversation lookups and are isolated by the caller.
pub async fn handle_event(ctx: &BridgeContext, event: &InboundEvent) -> Result<Outcome> {
    if ctx.is_cancelled() {
        return Ok(Outcome::Cancelled);
    }

    let conversation = resolve_context(ctx.client.as_ref(), &ctx.identity, event).await?;
    let kind = conversation.kind;

    match evaluate(&ctx.identity, event, &conversation) {
        Eligibility::Drop(reason) => {
            debug!(
                conversation_id = %event.conversation_id,
                event_id = %event.id,
                reason = %reason,
                "dropping event"
            );
            Ok(Outcome::Dropped(reason))
        },
        Eligibility::SendWelcome => {
            info!(conversation_id = %event.conversation_id, "first contact in group, sending welcome");
            if !send(ctx, event, kind, Payload::Text(ctx.replies.welcome.clone())).await {
                return Ok(Outcome::Cancelled);
            }
            Ok(Outcome::Welcomed)
        },
        Eligibility::Process => process(ctx, event, kind).await,
    }
}

async fn process(ctx: &BridgeContext, event: &InboundEvent, kind: ConversationKind) -> Result<Outcome> {
    if let Some(emoji) = &ctx.replies.ack_reaction
        && !send(ctx, event, kind, Payload::Reaction(emoji.clone())).await
    {
        return Ok(Outcome::Cancelled);
    }

    let sender_address = match ctx.client.inbox_address(&event.sender_inbox_id).await {
        Ok(address) => address,
        Err(e) => {
            warn!(sender = %event.sender_inbox_id, error = %e, "sender address lookup failed");
            None
        },
    };

    let request = AgentRequest {
        conversation_id: event.conversation_id.clone(),
        message: event.text().unwrap_or_default().trim().to_string(),
        context: ctx.system_prompt.clone(),
        sender_address: sender_address.clone(),
        agent_id: ctx.agent_id.clone(),
    };

    let response = match ctx.agent.ask(&request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(
                conversation_id = %event.conversation_id,
                event_id = %event.id,
                error = %e,
                "agent call failed"
            );
            if !send(ctx, event, kind, Payload::Text(ctx.replies.apology.clone())).await {
                return Ok(Outcome::Cancelled);
            }
            return Ok(Outcome::AgentFailed);
        },
    };

    if ctx.is_cancelled() {
        debug!(event_id = %event.id, "discarding agent response after shutdown");
        return Ok(Outcome::Cancelled);
    }

    if !response.text.trim().is_empty()
        && !send(ctx, event, kind, Payload::Text(response.text.clone())).await
    {
        return Ok(Outcome::Cancelled);
    }

    let batches = collect_batches(ctx, &response, sender_address.as_deref());
    let count = batches.len();
    for batch in batches {
        info!(
            conversation_id = %event.conversation_id,
            chain_id = %batch.chain_id,
            summary = %batch.summary(),
            "dispatching transaction batch"
        );
        if !send(ctx, event, kind, Payload::Batch(batch)).await {
            return Ok(Outcome::Cancelled);
        }
    }

    Ok(Outcome::Processed { batches: count })
}

/// Decode and normalize every tool result, then merge the fragments.
///
/// A bad tool result is logged and skipped; it never blocks the others.
fn collect_batches(
    ctx: &BridgeContext,
    response: &AgentResponse,
    default_sender: Option<&str>,
) -> Vec<TransactionBatch> {
    let mut fragments = Vec::new();
    for (record, result) in response.results() {
        let output = match ToolOutput::decode(result) {
            Ok(output) => output,
            Err(e) => {
                warn!(call_id = %record.call_id, tool = %record.tool_name, error = %e, "undecodable tool result");
                continue;
            },
        };
        if let ToolOutput::Error(message) = &output {
            warn!(call_id = %record.call_id, tool = %record.tool_name, error = %message, "tool reported an error");
            continue;
        }
        match ctx.normalizer.normalize_output(&output, default_sender) {
            Ok(Some(fragment)) => fragments.push(fragment),
            Ok(None) => {},
            Err(e) => {
                warn!(call_id = %record.call_id, tool = %record.tool_name, error = %e, "tool result not normalized");
            },
        }
    }
    aggregate(fragments)
}

/// Send one payload unless shutting down. Returns `false` when cancelled.
async fn send(ctx: &BridgeContext, event: &InboundEvent, kind: ConversationKind, payload: Payload) -> bool {
    if ctx.is_cancelled() {
        debug!(event_id = %event.id, payload = payload.kind(), "shutdown, skipping send");
        return false;
    }
    if let Err(e) = dispatch(ctx.client.as_ref(), event, kind, payload).await {
        debug!(event_id = %event.id, error = %e, "continuing after send failure");
    }
    true
}
