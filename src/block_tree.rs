//! Block tree: forks, per-branch unspent sets, best-tip selection and retention
//!
//! Nodes live in an arena keyed by block hash. Parent and child links are
//! hashes into that arena, so the tree owns every node and no node owns
//! another.
//!
//! AcceptBlock: Block → {accepted, rejected}
//!
//! For block b extending parent p:
//! 1. b must name a parent and carry a coinbase with an output 0
//! 2. p must be retained
//! 3. every transaction of b must be valid, applied in order on a copy of p's set
//! 4. height(b) = height(p) + 1 must exceed best_height - cut_off_age
//! 5. b's node holds p's set with b applied plus b's coinbase output
//! 6. b becomes best if height(b) > best_height (first seen wins ties)

use log::{debug, info};
use std::collections::{HashMap, HashSet};

use crate::config::ChainConfig;
use crate::constants::GENESIS_HEIGHT;
use crate::crypto::{Secp256k1Verifier, SignatureVerifier};
use crate::error::{ChainError, Result};
use crate::mempool::PendingTransactionPool;
use crate::transaction::coinbase_reward;
use crate::types::*;
use crate::utxo::{hex_prefix, UnspentOutputSet};
use crate::validator::TransactionValidator;

/// A retained block and the unspent set after applying it
#[derive(Debug, Clone)]
pub struct BlockNode {
    block: Block,
    hash: Hash,
    parent: Option<Hash>,
    children: Vec<Hash>,
    height: Natural,
    arrival: u64,
    utxo_set: UnspentOutputSet,
}

impl BlockNode {
    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// Parent hash as recorded at acceptance; the parent may since have been pruned
    pub fn parent(&self) -> Option<Hash> {
        self.parent
    }

    pub fn children(&self) -> &[Hash] {
        &self.children
    }

    pub fn height(&self) -> Natural {
        self.height
    }

    /// Acceptance order; lower arrived first
    pub fn arrival(&self) -> u64 {
        self.arrival
    }

    /// Copy of the unspent set for building on top of this block
    pub fn utxo_set(&self) -> UnspentOutputSet {
        self.utxo_set.copy()
    }
}

#[derive(Debug)]
pub struct BlockTree<V: SignatureVerifier = Secp256k1Verifier> {
    nodes: HashMap<Hash, BlockNode>,
    best_hash: Hash,
    best_height: Natural,
    next_arrival: u64,
    config: ChainConfig,
    verifier: V,
    pending: PendingTransactionPool,
}

impl BlockTree<Secp256k1Verifier> {
    /// Tree holding only `genesis`, with default configuration and secp256k1 signatures
    pub fn new(genesis: Block) -> Result<Self> {
        Self::with_config(genesis, ChainConfig::default(), Secp256k1Verifier::new())
    }
}

impl<V: SignatureVerifier> BlockTree<V> {
    /// Tree holding only `genesis`.
    ///
    /// Genesis is trusted: its coinbase output is credited without validation
    /// and any regular transactions it carries are ignored.
    pub fn with_config(genesis: Block, config: ChainConfig, verifier: V) -> Result<Self> {
        config.validate()?;

        let (reward_key, reward) = coinbase_credit(&genesis.coinbase)?;
        let mut utxo_set = UnspentOutputSet::new();
        utxo_set.add(reward_key, reward);

        let hash = genesis.hash();
        let node = BlockNode {
            block: genesis,
            hash,
            parent: None,
            children: Vec::new(),
            height: GENESIS_HEIGHT,
            arrival: 0,
            utxo_set,
        };

        let mut nodes = HashMap::new();
        nodes.insert(hash, node);

        Ok(Self {
            nodes,
            best_hash: hash,
            best_height: GENESIS_HEIGHT,
            next_arrival: 1,
            config,
            verifier,
            pending: PendingTransactionPool::new(),
        })
    }

    /// Add `block` if it is valid; false on any rejection
    pub fn accept_block(&mut self, block: Block) -> bool {
        match self.try_accept_block(block) {
            Ok(_) => true,
            Err(err) => {
                debug!("block rejected: {}", err);
                false
            }
        }
    }

    /// Add `block` if it is valid, returning its hash or the reason it was refused.
    ///
    /// Nothing in the tree or the pending pool changes unless the block is accepted.
    pub fn try_accept_block(&mut self, block: Block) -> Result<Hash> {
        // 1. Structure
        let prev_hash = block.prev_block_hash.ok_or_else(|| {
            ChainError::MalformedBlock("missing previous block hash".to_string())
        })?;
        let (reward_key, reward) = coinbase_credit(&block.coinbase)?;

        let hash = block.hash();
        if self.nodes.contains_key(&hash) {
            return Err(ChainError::DuplicateBlock(hex_prefix(&hash)));
        }

        // 2. Parent
        let parent = self
            .nodes
            .get(&prev_hash)
            .ok_or_else(|| ChainError::UnknownParent(hex_prefix(&prev_hash)))?;
        let height = parent.height + 1;

        // 3. Transactions, on a private copy of the parent's set
        let mut validator = TransactionValidator::new(&parent.utxo_set, &self.verifier);
        let accepted = validator.handle_batch(&block.transactions);
        if accepted.len() < block.transactions.len() {
            return Err(ChainError::InvalidTransactionBatch {
                accepted: accepted.len(),
                proposed: block.transactions.len(),
            });
        }

        // 4. Retention window
        let floor = self.best_height.saturating_sub(self.config.cut_off_age);
        if height <= floor {
            return Err(ChainError::BelowRetentionWindow {
                height,
                best_height: self.best_height,
                cut_off_age: self.config.cut_off_age,
            });
        }

        // 5. Link
        let mut utxo_set = validator.into_utxo_set();
        utxo_set.add(reward_key, reward);

        self.pending.remove_block(&block);

        let node = BlockNode {
            block,
            hash,
            parent: Some(prev_hash),
            children: Vec::new(),
            height,
            arrival: self.next_arrival,
            utxo_set,
        };
        self.next_arrival += 1;
        self.nodes.insert(hash, node);
        if let Some(parent) = self.nodes.get_mut(&prev_hash) {
            parent.children.push(hash);
        }

        // 6. Best tip
        if height > self.best_height {
            self.best_height = height;
            self.best_hash = hash;
            info!("new best block {} at height {}", hex_prefix(&hash), height);

            if self.config.prune {
                self.prune();
            }
        } else {
            debug!(
                "accepted block {} at height {} on a side branch",
                hex_prefix(&hash),
                height
            );
        }

        Ok(hash)
    }

    /// Queue a transaction for a future block; no validation happens here
    pub fn add_transaction(&mut self, tx: Transaction) {
        self.pending.add(tx);
    }

    pub fn best_block(&self) -> &Block {
        &self.best_node().block
    }

    pub fn best_hash(&self) -> Hash {
        self.best_hash
    }

    pub fn best_height(&self) -> Natural {
        self.best_height
    }

    /// Copy of the unspent set at the best block
    pub fn best_utxo_set(&self) -> UnspentOutputSet {
        self.best_node().utxo_set()
    }

    pub fn pending_pool(&self) -> &PendingTransactionPool {
        &self.pending
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn node(&self, hash: &Hash) -> Option<&BlockNode> {
        self.nodes.get(hash)
    }

    pub fn contains_block(&self, hash: &Hash) -> bool {
        self.nodes.contains_key(hash)
    }

    /// Number of retained nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn height_of(&self, hash: &Hash) -> Option<Natural> {
        self.nodes.get(hash).map(|node| node.height)
    }

    /// Retained parent of `hash`
    pub fn parent_of(&self, hash: &Hash) -> Option<Hash> {
        self.nodes
            .get(hash)?
            .parent
            .filter(|parent| self.nodes.contains_key(parent))
    }

    pub fn children_of(&self, hash: &Hash) -> Option<&[Hash]> {
        self.nodes.get(hash).map(|node| node.children.as_slice())
    }

    /// Retained nodes at `height`, first seen first
    pub fn nodes_at_height(&self, height: Natural) -> Vec<Hash> {
        let mut at_height: Vec<&BlockNode> = self
            .nodes
            .values()
            .filter(|node| node.height == height)
            .collect();
        at_height.sort_by_key(|node| node.arrival);
        at_height.into_iter().map(|node| node.hash).collect()
    }

    /// Best block back to the oldest retained ancestor.
    ///
    /// This is genesis unless the best block descends from a side branch whose
    /// lower nodes were pruned before it overtook.
    pub fn best_chain(&self) -> Vec<Hash> {
        let mut chain = vec![self.best_hash];
        let mut current = self.best_hash;
        while let Some(parent) = self.parent_of(&current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Copy of the unspent set after block `hash`
    pub fn utxo_set_at(&self, hash: &Hash) -> Option<UnspentOutputSet> {
        self.nodes.get(hash).map(BlockNode::utxo_set)
    }

    fn best_node(&self) -> &BlockNode {
        &self.nodes[&self.best_hash]
    }

    /// Drop every node below `best_height - cut_off_age` that is not an
    /// ancestor of the best block.
    ///
    /// A child of such a node would sit at or below the window floor and be
    /// refused anyway, so dropping them never changes an acceptance outcome.
    /// Ancestors of the best block are never removed.
    fn prune(&mut self) {
        let floor = self.best_height.saturating_sub(self.config.cut_off_age);
        if floor <= GENESIS_HEIGHT {
            return;
        }

        let best_chain: HashSet<Hash> = self.best_chain().into_iter().collect();
        let stale: Vec<Hash> = self
            .nodes
            .values()
            .filter(|node| node.height < floor && !best_chain.contains(&node.hash))
            .map(|node| node.hash)
            .collect();

        for hash in &stale {
            if let Some(node) = self.nodes.remove(hash) {
                if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
                    parent.children.retain(|child| child != hash);
                }
            }
        }

        if !stale.is_empty() {
            debug!(
                "pruned {} nodes below height {}, {} retained",
                stale.len(),
                floor,
                self.nodes.len()
            );
        }
    }
}

/// Coinbase slot must hold a zero-input transaction with an output 0
fn coinbase_credit(coinbase: &Transaction) -> Result<(OutPoint, TransactionOutput)> {
    if coinbase.kind() != TransactionKind::Coinbase {
        return Err(ChainError::MalformedBlock(
            "coinbase slot holds a transaction with inputs".to_string(),
        ));
    }

    coinbase_reward(coinbase)
        .map(|(key, output)| (key, output.clone()))
        .ok_or_else(|| ChainError::MalformedBlock("coinbase has no reward output".to_string()))
}
