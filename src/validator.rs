//! Transaction validation against a private unspent output set
//!
//! A validator never shares its set: it copies the caller's snapshot on
//! construction, mutates only that copy while applying a batch, and hands out
//! further copies on request.

use log::debug;
use std::collections::HashSet;

use crate::crypto::SignatureVerifier;
use crate::transaction::is_coinbase;
use crate::types::*;
use crate::utxo::{hex_prefix, UnspentOutputSet};

pub struct TransactionValidator<'v, V: SignatureVerifier + ?Sized> {
    utxo_set: UnspentOutputSet,
    verifier: &'v V,
}

impl<'v, V: SignatureVerifier + ?Sized> TransactionValidator<'v, V> {
    /// Create a validator over a private copy of `utxo_set`
    pub fn new(utxo_set: &UnspentOutputSet, verifier: &'v V) -> Self {
        Self {
            utxo_set: utxo_set.copy(),
            verifier,
        }
    }

    /// CheckTransaction: Transaction × UnspentOutputSet → {valid, invalid}
    ///
    /// A regular transaction is valid if and only if:
    /// 1. every input's outpoint is in the current set
    /// 2. every input carries a signature over its signable data that verifies
    ///    against the owner of the referenced output
    /// 3. no outpoint is claimed twice by the same transaction
    /// 4. every output value is non-negative
    /// 5. Σ input values ≥ Σ output values
    ///
    /// A coinbase has no inputs, so rules 1-3 do not apply to it. Rules 4 and 5
    /// still do, which limits a coinbase outside the coinbase slot to
    /// zero-value outputs.
    pub fn check_transaction(&self, tx: &Transaction) -> ValidationResult {
        if !is_coinbase(tx) {
            if let ValidationResult::Invalid(reason) = self.check_inputs(tx) {
                return ValidationResult::Invalid(reason);
            }
        }

        // 4. Non-negative outputs
        for (i, output) in tx.outputs.iter().enumerate() {
            if output.value < 0 {
                return ValidationResult::Invalid(format!(
                    "Negative output value {} at index {}",
                    output.value, i
                ));
            }
        }

        // 5. Conservation
        let total_in = tx.inputs.iter().try_fold(0i64, |acc, input| {
            self.utxo_set
                .get(&input.prevout)
                .and_then(|output| acc.checked_add(output.value))
        });
        let total_in = match total_in {
            Some(total) => total,
            None => return ValidationResult::Invalid("Input value overflow".to_string()),
        };
        let total_out = match tx.total_output_value() {
            Some(total) => total,
            None => return ValidationResult::Invalid("Output value overflow".to_string()),
        };

        if total_in < total_out {
            return ValidationResult::Invalid(format!(
                "Insufficient input value: {} < {}",
                total_in, total_out
            ));
        }

        ValidationResult::Valid
    }

    /// Rules 1-3: outpoints exist, signatures verify, no outpoint claimed twice
    fn check_inputs(&self, tx: &Transaction) -> ValidationResult {
        // 1. All claimed outputs are unspent
        for (i, input) in tx.inputs.iter().enumerate() {
            if !self.utxo_set.contains(&input.prevout) {
                return ValidationResult::Invalid(format!(
                    "Input {} not found in unspent set",
                    i
                ));
            }
        }

        // 2. Signatures
        for (i, input) in tx.inputs.iter().enumerate() {
            let output = match self.utxo_set.get(&input.prevout) {
                Some(output) => output,
                None => {
                    return ValidationResult::Invalid(format!("Input {} has no owner", i));
                }
            };

            let message = match tx.signable_data(i) {
                Some(message) => message,
                None => {
                    return ValidationResult::Invalid(format!("Input {} has no signable data", i));
                }
            };

            if input.signature.is_empty()
                || !self.verifier.verify(&message, &input.signature, &output.owner)
            {
                return ValidationResult::Invalid(format!("Invalid signature on input {}", i));
            }
        }

        // 3. No outpoint claimed twice
        let mut claimed = HashSet::with_capacity(tx.inputs.len());
        for (i, input) in tx.inputs.iter().enumerate() {
            if !claimed.insert(input.prevout) {
                return ValidationResult::Invalid(format!(
                    "Input {} claims an outpoint already claimed by this transaction",
                    i
                ));
            }
        }

        ValidationResult::Valid
    }

    pub fn is_valid(&self, tx: &Transaction) -> bool {
        self.check_transaction(tx).is_valid()
    }

    /// HandleBatch: validate and apply `candidates` strictly in order.
    ///
    /// Each candidate is checked against the set as mutated by the candidates
    /// accepted before it. Rejected candidates are not retried.
    pub fn handle_batch(&mut self, candidates: &[Transaction]) -> Vec<Transaction> {
        let mut accepted = Vec::with_capacity(candidates.len());

        for tx in candidates {
            match self.check_transaction(tx) {
                ValidationResult::Valid => {
                    self.apply_transaction(tx);
                    accepted.push(tx.clone());
                }
                ValidationResult::Invalid(reason) => {
                    debug!(
                        "rejected transaction {}: {}",
                        hex_prefix(&tx.hash()),
                        reason
                    );
                }
            }
        }

        accepted
    }

    /// Copy of the current set
    pub fn utxo_set(&self) -> UnspentOutputSet {
        self.utxo_set.copy()
    }

    pub fn into_utxo_set(self) -> UnspentOutputSet {
        self.utxo_set
    }

    /// ApplyTransaction: (set \ spent inputs) ∪ {(tx.id, i) ↦ outputs[i]}
    fn apply_transaction(&mut self, tx: &Transaction) {
        for input in &tx.inputs {
            self.utxo_set.remove(&input.prevout);
        }

        let tx_id = tx.hash();
        for (i, output) in tx.outputs.iter().enumerate() {
            self.utxo_set
                .add(OutPoint::new(tx_id, i as Natural), output.clone());
        }
    }
}
