//! Error types for block acceptance

use thiserror::Error;

use crate::types::Natural;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Malformed block: {0}")]
    MalformedBlock(String),

    #[error("Unknown parent block: {0}")]
    UnknownParent(String),

    #[error("Invalid transaction batch: {accepted} of {proposed} transactions accepted")]
    InvalidTransactionBatch { accepted: usize, proposed: usize },

    #[error("Block height {height} is outside the retention window (best height {best_height}, cut-off age {cut_off_age})")]
    BelowRetentionWindow {
        height: Natural,
        best_height: Natural,
        cut_off_age: Natural,
    },

    #[error("Block already known: {0}")]
    DuplicateBlock(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, ChainError>;
