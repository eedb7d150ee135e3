//! Block identity and construction

use crate::constants::NULL_HASH;
use crate::crypto::double_sha256;
use crate::types::*;

const GENESIS_TAG: [u8; 1] = [0];
const PARENT_TAG: [u8; 1] = [1];

impl Block {
    /// Genesis block: no parent, only a coinbase
    pub fn genesis(coinbase: Transaction) -> Self {
        Self {
            prev_block_hash: None,
            coinbase,
            transactions: Vec::new(),
        }
    }

    /// Block extending `prev_block_hash`
    pub fn new(prev_block_hash: Hash, coinbase: Transaction, transactions: Vec<Transaction>) -> Self {
        Self {
            prev_block_hash: Some(prev_block_hash),
            coinbase,
            transactions,
        }
    }

    pub fn hash(&self) -> Hash {
        calculate_block_hash(self)
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_block_hash.is_none()
    }

    /// Hashes of every transaction the block commits, coinbase first
    pub fn transaction_hashes(&self) -> Vec<Hash> {
        std::iter::once(&self.coinbase)
            .chain(self.transactions.iter())
            .map(Transaction::hash)
            .collect()
    }
}

/// Block hash: double SHA-256 over a parent tag, the previous hash, then the
/// coinbase id and transaction ids in order
pub fn calculate_block_hash(block: &Block) -> Hash {
    let (tag, prev) = match block.prev_block_hash {
        Some(prev) => (PARENT_TAG, prev),
        None => (GENESIS_TAG, NULL_HASH),
    };
    let tx_hashes = block.transaction_hashes();

    double_sha256(
        [tag.as_slice(), prev.as_slice()]
            .into_iter()
            .chain(tx_hashes.iter().map(|h| h.as_slice())),
    )
}
