//! Client side of the hosted agent API.
//!
//! Requests go out as one JSON document per inbound message. Responses come
//! back either as JSON or as a line-prefixed data stream; both decode into the
//! same [`AgentResponse`].

pub mod client;
pub mod data_stream;
pub mod error;
pub mod model;

pub use {
    client::{AgentClient, HttpAgentClient},
    data_stream::DataStreamDecoder,
    error::{Error, Result},
    model::{AgentRequest, AgentResponse, ToolCallRecord, ToolInvocation, ToolResult, pair_tool_calls},
};
