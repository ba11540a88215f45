use std::path::PathBuf;

use {
    anyhow::{Context, Result},
    chainchat_config::ChainchatConfig,
    chainchat_wallet::{Normalizer, ToolOutput, TransactionBatch, aggregate},
    clap::Args,
    serde_json::Value,
    tokio::io::AsyncReadExt,
    tracing::warn,
};

#[derive(Args)]
pub struct NormalizeArgs {
    /// JSON file holding one tool result or an array of them. Reads stdin when omitted.
    file: Option<PathBuf>,

    /// Sender used when a request does not name one.
    #[arg(long)]
    sender: Option<String>,
}

pub async fn handle_normalize(config: &ChainchatConfig, args: NormalizeArgs) -> Result<()> {
    let raw = match &args.file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            raw
        },
    };
    let document: Value = serde_json::from_str(&raw).context("input is not JSON")?;

    let normalizer = Normalizer::new(
        config.batch.schema_version.clone(),
        config.batch.value_decimals,
    );
    let batches = normalize_document(&normalizer, document, args.sender.as_deref());
    println!("{}", serde_json::to_string_pretty(&batches)?);
    Ok(())
}

/// Normalize every tool result in `document` and merge the fragments.
/// Bad results are reported and skipped.
fn normalize_document(
    normalizer: &Normalizer,
    document: Value,
    sender: Option<&str>,
) -> Vec<TransactionBatch> {
    let results = match document {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut fragments = Vec::new();
    for (index, result) in results.iter().enumerate() {
        let normalized = ToolOutput::decode(result)
            .and_then(|output| normalizer.normalize_output(&output, sender));
        match normalized {
            Ok(Some(fragment)) => fragments.push(fragment),
            Ok(None) => warn!(index, "tool result carries no wallet work"),
            Err(e) => warn!(index, error = %e, "tool result skipped"),
        }
    }
    aggregate(fragments)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn array_of_results_is_merged() {
        let document = json!([
            {"method": "eth_sendTransaction", "chainId": 8453, "params": [{"to": "0x1", "data": "0x"}]},
            {"method": "wallet_switchEthereumChain", "params": []},
            {"method": "eth_sendTransaction", "chainId": 8453, "params": [{"to": "0x2", "data": "0x"}]}
        ]);
        let batches = normalize_document(&Normalizer::default(), document, Some("0xabc"));
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].sender, "0xabc");
        assert_eq!(batches[0].calls.len(), 2);
    }

    #[test]
    fn single_result_without_wallet_work() {
        let batches =
            normalize_document(&Normalizer::default(), json!({"balance": "3"}), None);
        assert!(batches.is_empty());
    }
}
