//! Ledger-tree constants

use crate::types::Natural;

/// Default retention depth: a block must sit strictly above `best_height - CUT_OFF_AGE`
pub const CUT_OFF_AGE: Natural = 10;

/// Height assigned to the genesis block
pub const GENESIS_HEIGHT: Natural = 1;

/// Only this output of a block's coinbase enters the unspent set
pub const COINBASE_OUTPUT_INDEX: Natural = 0;

/// Length of a compact ECDSA signature
pub const COMPACT_SIGNATURE_SIZE: usize = 64;

/// Hash used in place of a missing previous-block hash when hashing genesis
pub const NULL_HASH: [u8; 32] = [0u8; 32];
