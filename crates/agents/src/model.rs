use {
    crate::error::{Error, Result},
    serde::{Deserialize, Serialize},
    serde_json::Value,
    std::collections::HashMap,
    tracing::debug,
};

/// Tool name given to results whose request never showed up.
pub const UNKNOWN_TOOL: &str = "unknown";

/// Body of one agent call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    pub conversation_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_address: Option<String>,
    pub agent_id: String,
}

/// A tool call as announced by the agent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    #[serde(alias = "id", alias = "tool_call_id")]
    pub tool_call_id: String,
    #[serde(alias = "name", alias = "tool_name")]
    pub tool_name: String,
    #[serde(default, alias = "arguments", alias = "input")]
    pub args: Value,
    /// Some agents inline the result into the call record.
    #[serde(default)]
    pub result: Option<Value>,
}

/// A tool result, matched to its invocation by `tool_call_id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    #[serde(alias = "id", alias = "tool_call_id")]
    pub tool_call_id: String,
    #[serde(default, alias = "name", alias = "tool_name")]
    pub tool_name: Option<String>,
    #[serde(alias = "output")]
    pub result: Value,
}

/// A tool call with its result attached when one arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRecord {
    pub call_id: String,
    pub tool_name: String,
    pub args: Value,
    pub result: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCallRecord>,
}

impl AgentResponse {
    /// Records that carry a result, in call order.
    pub fn results(&self) -> impl Iterator<Item = (&ToolCallRecord, &Value)> {
        self.tool_calls
            .iter()
            .filter_map(|record| record.result.as_ref().map(|result| (record, result)))
    }

    /// Decode a JSON response body.
    pub fn from_json(body: &Value) -> Result<Self> {
        let raw: RawResponse =
            serde_json::from_value(body.clone())
            .map_err(|e| Error::invalid_response(format!("unexpected response shape: {e}")))?;
        Ok(Self {
            text: raw.text.unwrap_or_default(),
            tool_calls: pair_tool_calls(raw.tool_calls, raw.tool_results),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    #[serde(default, alias = "content", alias = "response")]
    text: Option<String>,
    #[serde(default, alias = "tool_calls")]
    tool_calls: Vec<ToolInvocation>,
    #[serde(default, alias = "tool_results")]
    tool_results: Vec<ToolResult>,
}

/// Attach results to their invocations by call id.
///
/// Records keep invocation order. A result with no matching invocation is
/// appended after them under its own tool name, or [`UNKNOWN_TOOL`].
pub fn pair_tool_calls(
    invocations: Vec<ToolInvocation>,
    results: Vec<ToolResult>,
) -> Vec<ToolCallRecord> {
    let mut records: Vec<ToolCallRecord> = Vec::with_capacity(invocations.len());
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for invocation in invocations {
        by_id.insert(invocation.tool_call_id.clone(), records.len());
        records.push(ToolCallRecord {
            call_id: invocation.tool_call_id,
            tool_name: invocation.tool_name,
            args: invocation.args,
            result: invocation.result,
        });
    }

    for result in results {
        match by_id.get(&result.tool_call_id) {
            Some(&slot) => records[slot].result = Some(result.result),
            None => {
                debug!(call_id = %result.tool_call_id, "tool result without matching call");
                by_id.insert(result.tool_call_id.clone(), records.len());
                records.push(ToolCallRecord {
                    call_id: result.tool_call_id,
                    tool_name: result.tool_name.unwrap_or_else(|| UNKNOWN_TOOL.to_string()),
                    args: Value::Null,
                    result: Some(result.result),
                });
            },
        }
    }

    records
}
