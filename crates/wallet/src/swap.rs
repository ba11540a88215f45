use serde::{Deserialize, Serialize};

use crate::request::TxParams;

/// Swap quote returned by a swap tool: an optional token approval followed by
/// the swap transaction itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapPayload {
    #[serde(alias = "chain_id")]
    pub chain_id: serde_json::Value,
    #[serde(default, alias = "taker", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub sell_token: String,
    pub buy_token: String,
    pub sell_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_amount: Option<String>,
    /// ERC-20 approval that must land before the swap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<TxParams>,
    pub transaction: TxParams,
}
