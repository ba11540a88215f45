//! Wallet call batching.
//!
//! Agent tool results describe signing operations in several loosely-typed
//! shapes. This crate decodes them once into [`SigningRequest`] /
//! [`SwapPayload`], normalizes each into a single-key [`TransactionBatch`]
//! fragment, and merges fragments into the batches a signing surface reviews.
//! Nothing here signs or holds keys.

pub mod aggregate;
pub mod batch;
pub mod error;
pub mod normalize;
pub mod quantity;
pub mod request;
pub mod swap;
pub mod tool_output;

pub use {
    aggregate::aggregate,
    batch::{BatchKey, CallDescriptor, TransactionBatch},
    error::{Error, Result},
    normalize::Normalizer,
    request::{SigningMethod, SigningRequest, TxParams},
    swap::SwapPayload,
    tool_output::ToolOutput,
};
