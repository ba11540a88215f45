use {serde_json::Value, tracing::debug};

use crate::{
    batch::{CallDescriptor, TransactionBatch},
    error::{Error, Result},
    quantity::{bytes_hex, chain_id_hex, parse_chain_id, to_base_units_hex},
    request::{SigningMethod, SigningRequest, TxParams},
    swap::SwapPayload,
    tool_output::ToolOutput,
};

/// Turns decoded tool outputs into single-key batch fragments.
#[derive(Debug, Clone)]
pub struct Normalizer {
    pub schema_version: String,
    /// Decimals used for plain decimal `value` amounts.
    pub value_decimals: u32,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            schema_version: "1.0".into(),
            value_decimals: 18,
        }
    }
}

impl Normalizer {
    pub fn new(schema_version: impl Into<String>, value_decimals: u32) -> Self {
        Self {
            schema_version: schema_version.into(),
            value_decimals,
        }
    }

    /// Normalize any tool output that describes wallet work.
    ///
    /// Returns `Ok(None)` for outputs that carry no signing work.
    pub fn normalize_output(
        &self,
        output: &ToolOutput,
        default_sender: Option<&str>,
    ) -> Result<Option<TransactionBatch>> {
        match output {
            ToolOutput::Signing(request) => self.normalize(request, default_sender).map(Some),
            ToolOutput::Swap(swap) => self.normalize_swap(swap, default_sender).map(Some),
            ToolOutput::Error(_) | ToolOutput::Other(_) => Ok(None),
        }
    }

    /// Normalize one signing request into a fragment with non-empty calls.
    pub fn normalize(
        &self,
        request: &SigningRequest,
        default_sender: Option<&str>,
    ) -> Result<TransactionBatch> {
        let method = request.method();
        let (sender, calls) = match request {
            SigningRequest::SendTransaction { calls, .. } => {
                let sender = calls
                    .first()
                    .and_then(|c| c.from.as_deref())
                    .or(default_sender)
                    .ok_or_else(|| Error::invalid_params(method.as_str(), "no sender address"))?;
                let total = calls.len();
                let calls = calls
                    .iter()
                    .enumerate()
                    .map(|(index, tx)| {
                        let description = tx
                            .description
                            .clone()
                            .unwrap_or_else(|| format!("Transaction {} of {total}", index + 1));
                        Ok(self
                            .call_from_tx(tx)?
                            .with_meta("description", description)
                            .with_meta("transactionType", method.as_str())
                            .with_meta("callIndex", index.to_string()))
                    })
                    .collect::<Result<Vec<_>>>()?;
                (sender.to_string(), calls)
            },
            SigningRequest::SignMessage {
                message, address, ..
            }
            | SigningRequest::SignMessageLegacy {
                message, address, ..
            } => (address.clone(), vec![sign_message_call(method, message, address)]),
            SigningRequest::SignTypedDataV1 {
                address,
                typed_data,
                ..
            }
            | SigningRequest::SignTypedDataV4 {
                address,
                typed_data,
                ..
            } => (
                address.clone(),
                vec![typed_data_call(method, address, typed_data)?],
            ),
        };

        debug!(
            method = %method,
            chain_id = request.chain_id(),
            calls = calls.len(),
            "normalized signing request"
        );
        Ok(self.fragment(request.chain_id(), sender, calls))
    }

    /// Normalize a swap quote into `[approval?, swap]`.
    pub fn normalize_swap(
        &self,
        swap: &SwapPayload,
        default_sender: Option<&str>,
    ) -> Result<TransactionBatch> {
        let chain_id = parse_chain_id(&swap.chain_id)?;
        let sender = swap
            .from
            .as_deref()
            .or(swap.transaction.from.as_deref())
            .or(default_sender)
            .ok_or_else(|| Error::invalid_params("swap", "no sender address"))?
            .to_string();

        let mut calls = Vec::with_capacity(2);
        if let Some(approval) = &swap.approval {
            calls.push(
                self.swap_call(approval, swap)?
                    .with_meta(
                        "description",
                        format!("Approve {} of {}", swap.sell_amount, swap.sell_token),
                    )
                    .with_meta("transactionType", "approve"),
            );
        }
        calls.push(
            self.swap_call(&swap.transaction, swap)?
                .with_meta(
                    "description",
                    format!(
                        "Swap {} of {} for {}",
                        swap.sell_amount, swap.sell_token, swap.buy_token
                    ),
                )
                .with_meta("transactionType", "swap"),
        );
        for (index, call) in calls.iter_mut().enumerate() {
            call.metadata.insert("callIndex".into(), index.to_string());
        }

        debug!(chain_id, calls = calls.len(), "normalized swap");
        Ok(self.fragment(chain_id, sender, calls))
    }

    fn fragment(&self, chain_id: u64, sender: String, calls: Vec<CallDescriptor>) -> TransactionBatch {
        TransactionBatch {
            schema_version: self.schema_version.clone(),
            chain_id: chain_id_hex(chain_id),
            sender,
            calls,
        }
    }

    fn call_from_tx(&self, tx: &TxParams) -> Result<CallDescriptor> {
        Ok(CallDescriptor {
            to: tx.to.clone(),
            data: tx.data.clone(),
            value: tx
                .value
                .as_deref()
                .map(|v| to_base_units_hex(v, self.value_decimals))
                .transpose()?,
            gas: tx
                .gas
                .as_deref()
                .map(|g| to_base_units_hex(g, 0))
                .transpose()?,
            metadata: Default::default(),
        })
    }

    fn swap_call(&self, tx: &TxParams, swap: &SwapPayload) -> Result<CallDescriptor> {
        let mut call = self
            .call_from_tx(tx)?
            .with_meta("sellToken", swap.sell_token.as_str())
            .with_meta("buyToken", swap.buy_token.as_str())
            .with_meta("sellAmount", swap.sell_amount.as_str());
        if let Some(buy_amount) = &swap.buy_amount {
            call = call.with_meta("buyAmount", buy_amount.as_str());
        }
        Ok(call)
    }
}

fn sign_message_call(method: SigningMethod, message: &str, signer: &str) -> CallDescriptor {
    CallDescriptor {
        data: Some(message.to_string()),
        ..Default::default()
    }
    .with_meta("description", "Sign message")
    .with_meta("transactionType", method.as_str())
    .with_meta("signer", signer)
}

fn typed_data_call(method: SigningMethod, signer: &str, typed_data: &str) -> Result<CallDescriptor> {
    let parsed: Value = serde_json::from_str(typed_data).map_err(Error::malformed_typed_data)?;
    let domain = parsed
        .as_object()
        .ok_or_else(|| Error::malformed_typed_data("typed data is not a JSON object"))?
        .get("domain")
        .ok_or_else(|| Error::malformed_typed_data("missing domain"))?;

    let primary_type = parsed.get("primaryType").and_then(Value::as_str);
    let description = match primary_type {
        Some(primary) => format!("Sign {primary}"),
        None => "Sign typed data".to_string(),
    };

    let mut call = CallDescriptor {
        data: Some(bytes_hex(typed_data.as_bytes())),
        ..Default::default()
    }
    .with_meta("description", description)
    .with_meta("transactionType", method.as_str())
    .with_meta("signer", signer)
    .with_meta("domain", serde_json::to_string(domain)?);
    if let Some(primary) = primary_type {
        call = call.with_meta("primaryType", primary);
    }
    Ok(call)
}
