//! Messaging-network side of the bridge.
//!
//! The network client itself lives outside this workspace; it plugs in
//! through [`MessagingClient`]. This crate owns the inbound event model, the
//! per-event eligibility decision, and the choice of outbound wire shape.

pub mod client;
pub mod content;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod gating;

pub use {
    client::{EventStream, MessagingClient},
    content::{ContentType, OutboundContent, Reaction, ReactionAction, Reply},
    context::resolve_context,
    dispatch::{Payload, dispatch, shape},
    error::{Error, Result},
    event::{ConversationContext, ConversationInfo, EventContent, InboundEvent, StoredMessage},
    gating::{DropReason, Eligibility, evaluate},
};
