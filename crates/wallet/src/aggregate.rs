use std::collections::HashMap;

use crate::batch::{BatchKey, TransactionBatch};

/// Merge fragments that share a (chain, sender, version) key.
///
/// Batches come out in order of each key's first appearance; calls inside a
/// batch keep fragment arrival order, so an approval emitted before its action
/// stays first. Fragments without calls are skipped.
pub fn aggregate(fragments: impl IntoIterator<Item = TransactionBatch>) -> Vec<TransactionBatch> {
    let mut batches: Vec<TransactionBatch> = Vec::new();
    let mut index: HashMap<BatchKey, usize> = HashMap::new();

    for fragment in fragments {
        if fragment.calls.is_empty() {
            continue;
        }
        match index.get(&fragment.key()) {
            Some(&slot) => batches[slot].calls.extend(fragment.calls),
            None => {
                index.insert(fragment.key(), batches.len());
                batches.push(fragment);
            },
        }
    }

    batches
}
