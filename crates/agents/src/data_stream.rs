//! Decoder for line-prefixed data-stream responses.
//!
//! Each line is `<code>:<json>`. Recognised codes:
//!
//! | code | payload |
//! |------|---------|
//! | `0`  | text delta (JSON string) |
//! | `9`  | tool call `{toolCallId, toolName, args}` |
//! | `a`  | tool result `{toolCallId, result}` |
//! | `3`  | error message (JSON string) |
//! | `e`, `d` | step / message finish |
//!
//! Other codes are skipped.

use {
    crate::{
        error::{Context, Error, Result},
        model::{AgentResponse, ToolInvocation, ToolResult, pair_tool_calls},
    },
    tracing::trace,
};

/// Accumulates data-stream lines into an [`AgentResponse`].
#[derive(Debug, Default)]
pub struct DataStreamDecoder {
    text: String,
    invocations: Vec<ToolInvocation>,
    results: Vec<ToolResult>,
    finished: bool,
}

impl DataStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line. Blank lines and unknown codes are ignored.
    pub fn push_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            return Ok(());
        }
        let Some((code, payload)) = line.split_once(':') else {
            trace!(line, "data-stream line without prefix");
            return Ok(());
        };

        match code {
            "0" => {
                let delta: String =
                    serde_json::from_str(payload).context("invalid text delta")?;
                self.text.push_str(&delta);
            },
            "9" => self
                .invocations
                .push(serde_json::from_str(payload).context("invalid tool call chunk")?),
            "a" => self
                .results
                .push(serde_json::from_str(payload).context("invalid tool result chunk")?),
            "3" => {
                let message = serde_json::from_str::<String>(payload)
                    .unwrap_or_else(|_| payload.to_string());
                return Err(Error::stream_error(message));
            },
            "d" => self.finished = true,
            "e" => {},
            other => trace!(code = other, "skipping data-stream chunk"),
        }
        Ok(())
    }

    /// Whether a message-finish chunk was seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn finish(self) -> AgentResponse {
        AgentResponse {
            text: self.text,
            tool_calls: pair_tool_calls(self.invocations, self.results),
        }
    }
}

/// Decode a complete data-stream body.
pub fn decode(body: &str) -> Result<AgentResponse> {
    let mut decoder = DataStreamDecoder::new();
    for line in body.lines() {
        decoder.push_line(line)?;
    }
    Ok(decoder.finish())
}
