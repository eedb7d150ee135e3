//! Transaction identity, signing data and the coinbase tag

use crate::constants::COINBASE_OUTPUT_INDEX;
use crate::crypto::double_sha256;
use crate::types::*;

impl Transaction {
    /// Regular transaction spending `inputs` into `outputs`
    pub fn new(inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>) -> Self {
        Self {
            inputs,
            outputs,
            extra_nonce: 0,
        }
    }

    /// Block reward paying `value` to `owner`.
    ///
    /// `extra_nonce` should differ between coinbases that would otherwise be identical.
    pub fn coinbase(value: Integer, owner: ByteString, extra_nonce: Natural) -> Self {
        Self {
            inputs: Vec::new(),
            outputs: vec![TransactionOutput { value, owner }],
            extra_nonce,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        if self.inputs.is_empty() {
            TransactionKind::Coinbase
        } else {
            TransactionKind::Regular
        }
    }

    pub fn hash(&self) -> Hash {
        calculate_tx_id(self)
    }

    /// Bytes that input `input_index` must sign
    pub fn signable_data(&self, input_index: usize) -> Option<ByteString> {
        let input = self.inputs.get(input_index)?;

        let mut data = Vec::with_capacity(40 + self.outputs.len() * 48);
        data.extend_from_slice(&input.prevout.hash);
        data.extend_from_slice(&input.prevout.index.to_le_bytes());
        for output in &self.outputs {
            encode_output(output, &mut data);
        }
        Some(data)
    }

    /// UTXO key of output `index` of this transaction
    pub fn outpoint(&self, index: Natural) -> OutPoint {
        OutPoint::new(self.hash(), index)
    }

    /// Sum of output values; `None` on overflow
    pub fn total_output_value(&self) -> Option<Integer> {
        self.outputs
            .iter()
            .try_fold(0i64, |acc, output| acc.checked_add(output.value))
    }
}

/// Check if transaction is coinbase
pub fn is_coinbase(tx: &Transaction) -> bool {
    tx.kind() == TransactionKind::Coinbase
}

/// Calculate transaction ID: double SHA-256 over the canonical encoding, signatures included
pub fn calculate_tx_id(tx: &Transaction) -> Hash {
    let mut data = Vec::new();

    data.extend_from_slice(&(tx.inputs.len() as u64).to_le_bytes());
    for input in &tx.inputs {
        data.extend_from_slice(&input.prevout.hash);
        data.extend_from_slice(&input.prevout.index.to_le_bytes());
        data.extend_from_slice(&(input.signature.len() as u64).to_le_bytes());
        data.extend_from_slice(&input.signature);
    }

    data.extend_from_slice(&(tx.outputs.len() as u64).to_le_bytes());
    for output in &tx.outputs {
        encode_output(output, &mut data);
    }

    data.extend_from_slice(&tx.extra_nonce.to_le_bytes());

    double_sha256([data.as_slice()])
}

/// Output credited to the unspent set when a block's coinbase is applied
pub fn coinbase_reward(coinbase: &Transaction) -> Option<(OutPoint, &TransactionOutput)> {
    let output = coinbase.outputs.get(COINBASE_OUTPUT_INDEX as usize)?;
    Some((coinbase.outpoint(COINBASE_OUTPUT_INDEX), output))
}

fn encode_output(output: &TransactionOutput, data: &mut Vec<u8>) {
    data.extend_from_slice(&output.value.to_le_bytes());
    data.extend_from_slice(&(output.owner.len() as u64).to_le_bytes());
    data.extend_from_slice(&output.owner);
}
