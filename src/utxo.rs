//! Unspent output set: the spendable coins at one point of one branch

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::*;

/// UTXO Set: OutPoint → TransactionOutput
///
/// Each block node owns exactly one of these; branches never share one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutputSet {
    outputs: HashMap<OutPoint, TransactionOutput>,
}

impl UnspentOutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &OutPoint) -> bool {
        self.outputs.contains_key(key)
    }

    pub fn get(&self, key: &OutPoint) -> Option<&TransactionOutput> {
        self.outputs.get(key)
    }

    /// Insert an output. An existing entry is replaced (last write wins).
    pub fn add(&mut self, key: OutPoint, output: TransactionOutput) {
        if self.outputs.insert(key, output).is_some() {
            warn!(
                "overwrote live output {}:{} in unspent set",
                hex_prefix(&key.hash),
                key.index
            );
        }
    }

    pub fn remove(&mut self, key: &OutPoint) -> Option<TransactionOutput> {
        self.outputs.remove(key)
    }

    /// Independent deep snapshot
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OutPoint, &TransactionOutput)> {
        self.outputs.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &OutPoint> {
        self.outputs.keys()
    }

    /// Sum of all live values; `None` on overflow
    pub fn total_value(&self) -> Option<Integer> {
        self.outputs
            .values()
            .try_fold(0i64, |acc, output| acc.checked_add(output.value))
    }
}

impl FromIterator<(OutPoint, TransactionOutput)> for UnspentOutputSet {
    fn from_iter<I: IntoIterator<Item = (OutPoint, TransactionOutput)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, output) in iter {
            set.add(key, output);
        }
        set
    }
}

/// Short hex rendering of a hash for log lines
pub(crate) fn hex_prefix(hash: &Hash) -> String {
    hash[..4].iter().map(|b| format!("{:02x}", b)).collect()
}
