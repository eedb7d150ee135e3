//! Shared fixtures for integration tests

#![allow(dead_code)]

use ledger_tree::*;
use secp256k1::SecretKey;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A key pair standing in for a wallet
pub struct Wallet {
    pub secret: SecretKey,
    pub owner: ByteString,
}

impl Wallet {
    pub fn new(seed: u8) -> Self {
        let secret = SecretKey::from_slice(&[seed; 32]).unwrap();
        let owner = public_key_bytes(&secret);
        Self { secret, owner }
    }

    pub fn output(&self, value: Integer) -> TransactionOutput {
        TransactionOutput {
            value,
            owner: self.owner.clone(),
        }
    }

    pub fn coinbase(&self, value: Integer, nonce: Natural) -> Transaction {
        Transaction::coinbase(value, self.owner.clone(), nonce)
    }
}

/// Transaction spending `inputs`, each signed by the paired wallet
pub fn signed_spend(inputs: &[(OutPoint, &Wallet)], outputs: Vec<TransactionOutput>) -> Transaction {
    let mut tx = Transaction::new(
        inputs
            .iter()
            .map(|(prevout, _)| TransactionInput {
                prevout: *prevout,
                signature: vec![],
            })
            .collect(),
        outputs,
    );

    for (i, (_, wallet)) in inputs.iter().enumerate() {
        let message = tx.signable_data(i).unwrap();
        tx.inputs[i].signature = sign(&wallet.secret, &message);
    }

    tx
}

/// Genesis block paying `value` to `wallet`
pub fn genesis_for(wallet: &Wallet, value: Integer) -> Block {
    Block::genesis(wallet.coinbase(value, 0))
}
