//! Configuration for the block tree
//!
//! Parameters can be built programmatically or loaded from JSON. Missing
//! fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::constants::CUT_OFF_AGE;
use crate::error::{ChainError, Result};
use crate::types::Natural;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Retention depth: a new block must sit strictly above `best_height - cut_off_age`.
    /// Must be at least 1.
    #[serde(default = "default_cut_off_age")]
    pub cut_off_age: Natural,

    /// Drop nodes that can no longer parent an acceptable block.
    /// Disabling keeps every accepted node for the lifetime of the tree.
    #[serde(default = "default_true")]
    pub prune: bool,
}

fn default_cut_off_age() -> Natural {
    CUT_OFF_AGE
}

fn default_true() -> bool {
    true
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            cut_off_age: CUT_OFF_AGE,
            prune: true,
        }
    }
}

impl ChainConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ChainConfig = serde_json::from_str(json)
            .map_err(|e| ChainError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cut_off_age == 0 {
            return Err(ChainError::Configuration(
                "cut_off_age must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChainConfig::default();
        assert_eq!(config.cut_off_age, 10);
        assert!(config.prune);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = ChainConfig::from_json(r#"{ "cut_off_age": 3 }"#).unwrap();
        assert_eq!(config.cut_off_age, 3);
        assert!(config.prune);
    }

    #[test]
    fn test_from_json_empty_object() {
        assert_eq!(ChainConfig::from_json("{}").unwrap(), ChainConfig::default());
    }

    #[test]
    fn test_from_json_rejects_zero_cut_off() {
        assert!(matches!(
            ChainConfig::from_json(r#"{ "cut_off_age": 0 }"#),
            Err(ChainError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ChainConfig::from_json("not json"),
            Err(ChainError::Configuration(_))
        ));
    }
}
