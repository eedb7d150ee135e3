//! # Ledger-Tree
//!
//! In-memory ledger state machine for a minimal UTXO blockchain node.
//!
//! This crate keeps a bounded-depth tree of candidate blocks, validates every
//! block's transactions against the unspent outputs of the branch it extends,
//! tracks the best (highest) tip, and forgets history that has fallen out of the
//! confirmation window.
//!
//! ## Architecture
//!
//! Components, leaves first:
//! - [`utxo::UnspentOutputSet`] - spendable outputs at one point of one branch
//! - [`validator::TransactionValidator`] - validates and applies a batch of
//!   transactions on a private copy of a set
//! - [`block_tree::BlockTree`] - hash-keyed arena of block nodes, best-tip
//!   selection, retention window and pruning
//! - [`mempool::PendingTransactionPool`] - submitted but uncommitted transactions
//!
//! ## Design Principles
//!
//! 1. **Branch Isolation**: every node owns its own unspent set; nothing is shared
//! 2. **All-or-Nothing Blocks**: one invalid transaction rejects the whole block
//!    and leaves the tree untouched
//! 3. **Bounded Forks**: side-branch nodes that can no longer be extended are
//!    pruned; the best chain is always kept
//! 4. **Opaque Cryptography**: signatures go through [`crypto::SignatureVerifier`]
//!
//! ## Usage
//!
//! ```rust
//! use ledger_tree::*;
//! use secp256k1::SecretKey;
//!
//! let miner = SecretKey::from_slice(&[1u8; 32]).unwrap();
//! let alice = SecretKey::from_slice(&[2u8; 32]).unwrap();
//!
//! let genesis = Block::genesis(Transaction::coinbase(10, public_key_bytes(&miner), 0));
//! let reward = genesis.coinbase.outpoint(0);
//! let mut tree = BlockTree::new(genesis).unwrap();
//!
//! let mut spend = Transaction::new(
//!     vec![TransactionInput { prevout: reward, signature: vec![] }],
//!     vec![
//!         TransactionOutput { value: 4, owner: public_key_bytes(&alice) },
//!         TransactionOutput { value: 6, owner: public_key_bytes(&miner) },
//!     ],
//! );
//! let message = spend.signable_data(0).unwrap();
//! spend.inputs[0].signature = sign(&miner, &message);
//!
//! let block = Block::new(
//!     tree.best_hash(),
//!     Transaction::coinbase(10, public_key_bytes(&miner), 1),
//!     vec![spend.clone()],
//! );
//! assert!(tree.accept_block(block));
//! assert_eq!(tree.best_height(), 2);
//! assert!(!tree.best_utxo_set().contains(&reward));
//! assert!(tree.best_utxo_set().contains(&spend.outpoint(0)));
//! ```

pub mod types;
pub mod constants;
pub mod crypto;
pub mod transaction;
pub mod block;
pub mod utxo;
pub mod validator;
pub mod mempool;
pub mod block_tree;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use block_tree::{BlockNode, BlockTree};
pub use config::ChainConfig;
pub use crypto::{public_key_bytes, sign, Secp256k1Verifier, SignatureVerifier};
pub use error::{ChainError, Result};
pub use mempool::PendingTransactionPool;
pub use utxo::UnspentOutputSet;
pub use validator::TransactionValidator;
