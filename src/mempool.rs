//! Pending transaction pool

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::*;

/// Transactions submitted but not yet committed by an accepted block.
///
/// Nothing here is validated; validity is decided when a block including the
/// transaction is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingTransactionPool {
    transactions: HashMap<Hash, Transaction>,
}

impl PendingTransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replacing any transaction with the same hash
    pub fn add(&mut self, tx: Transaction) {
        self.transactions.insert(tx.hash(), tx);
    }

    pub fn remove(&mut self, hash: &Hash) -> Option<Transaction> {
        self.transactions.remove(hash)
    }

    /// Drop every transaction committed by `block`, coinbase included
    pub fn remove_block(&mut self, block: &Block) {
        for hash in block.transaction_hashes() {
            self.transactions.remove(&hash);
        }
    }

    pub fn get(&self, hash: &Hash) -> Option<&Transaction> {
        self.transactions.get(hash)
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.transactions.contains_key(hash)
    }

    /// All pending transactions, in no particular order
    pub fn all(&self) -> Vec<Transaction> {
        self.transactions.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(seed: u8) -> Transaction {
        Transaction::new(
            vec![TransactionInput {
                prevout: OutPoint::new([seed; 32], 0),
                signature: vec![],
            }],
            vec![TransactionOutput {
                value: 1,
                owner: vec![],
            }],
        )
    }

    #[test]
    fn test_add_and_remove() {
        let mut pool = PendingTransactionPool::new();
        let t = tx(1);
        pool.add(t.clone());

        assert!(pool.contains(&t.hash()));
        assert_eq!(pool.get(&t.hash()), Some(&t));
        assert_eq!(pool.remove(&t.hash()), Some(t));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_add_same_hash_overwrites() {
        let mut pool = PendingTransactionPool::new();
        pool.add(tx(1));
        pool.add(tx(1));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut pool = PendingTransactionPool::new();
        pool.add(tx(1));
        assert!(pool.remove(&[7; 32]).is_none());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_all() {
        let mut pool = PendingTransactionPool::new();
        pool.add(tx(1));
        pool.add(tx(2));

        let mut hashes: Vec<Hash> = pool.all().iter().map(Transaction::hash).collect();
        hashes.sort();
        let mut expected = vec![tx(1).hash(), tx(2).hash()];
        expected.sort();
        assert_eq!(hashes, expected);
    }

    #[test]
    fn test_remove_block() {
        let mut pool = PendingTransactionPool::new();
        let included = tx(1);
        let left_over = tx(2);
        pool.add(included.clone());
        pool.add(left_over.clone());

        let block = Block::new(
            [0; 32],
            Transaction::coinbase(50, vec![], 0),
            vec![included.clone()],
        );
        pool.remove_block(&block);

        assert!(!pool.contains(&included.hash()));
        assert!(pool.contains(&left_over.hash()));
    }
}
