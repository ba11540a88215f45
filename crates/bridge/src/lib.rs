//! Wires a messaging client to the hosted agent.
//!
//! [`Supervisor`] owns the subscription and its reconnect budget. Every event
//! it pulls goes through [`pipeline::handle_event`]: eligibility, agent call,
//! batch normalization, and dispatch.

pub mod backoff;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod supervisor;

#[cfg(test)]
mod testing;

pub use {
    backoff::{BackoffPolicy, FixedBackoff},
    context::BridgeContext,
    error::{Error, Result},
    pipeline::{Outcome, handle_event},
    supervisor::{Supervisor, SupervisorState},
};
