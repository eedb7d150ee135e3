//! Property-based tests for validation and tree invariants

use ledger_tree::*;
use proptest::prelude::*;

struct AcceptAll;

impl SignatureVerifier for AcceptAll {
    fn verify(&self, _message: &[u8], _signature: &[u8], _key: &[u8]) -> bool {
        true
    }
}

fn output(value: Integer) -> TransactionOutput {
    TransactionOutput {
        value,
        owner: vec![2; 33],
    }
}

fn input(prevout: OutPoint) -> TransactionInput {
    TransactionInput {
        prevout,
        signature: vec![1],
    }
}

fn funded(values: &[Integer]) -> (UnspentOutputSet, Vec<OutPoint>) {
    let mut set = UnspentOutputSet::new();
    let mut keys = Vec::new();
    for (i, &value) in values.iter().enumerate() {
        let key = OutPoint::new([i as u8 + 1; 32], 0);
        set.add(key, output(value));
        keys.push(key);
    }
    (set, keys)
}

proptest! {
    /// Outputs within the input total pass; anything above fails
    #[test]
    fn prop_conservation_decides_validity(
        inputs in prop::collection::vec(0i64..1_000_000, 1..5),
        outputs in prop::collection::vec(0i64..1_000_000, 0..5),
    ) {
        let (set, keys) = funded(&inputs);
        let validator = TransactionValidator::new(&set, &AcceptAll);

        let tx = Transaction::new(
            keys.iter().copied().map(input).collect(),
            outputs.iter().copied().map(output).collect(),
        );

        let total_in: Integer = inputs.iter().sum();
        let total_out: Integer = outputs.iter().sum();
        prop_assert_eq!(validator.is_valid(&tx), total_in >= total_out);
    }

    /// Any negative output value invalidates the transaction
    #[test]
    fn prop_negative_output_rejected(
        funding in 1i64..1_000_000,
        negative in i64::MIN..0,
    ) {
        let (set, keys) = funded(&[funding]);
        let validator = TransactionValidator::new(&set, &AcceptAll);

        let tx = Transaction::new(vec![input(keys[0])], vec![output(negative)]);
        prop_assert!(!validator.is_valid(&tx));
    }

    /// Mutating a copy never touches the original
    #[test]
    fn prop_copy_is_isolated(values in prop::collection::vec(0i64..1_000, 1..20)) {
        let (set, keys) = funded(&values);
        let mut copy = set.copy();

        for key in &keys {
            copy.remove(key);
        }
        copy.add(OutPoint::new([0xff; 32], 7), output(1));

        prop_assert_eq!(set.len(), values.len());
        for key in &keys {
            prop_assert!(set.contains(key));
        }
        prop_assert!(!set.contains(&OutPoint::new([0xff; 32], 7)));
    }

    /// The best chain is never pruned; losing siblings only survive inside the window
    #[test]
    fn prop_pruning_keeps_best_chain(cut_off_age in 1u64..8, blocks in 1u64..40) {
        let config = ChainConfig { cut_off_age, prune: true };
        let genesis = Block::genesis(Transaction::coinbase(10, vec![2; 33], 0));
        let mut tree = BlockTree::with_config(genesis, config, AcceptAll).unwrap();
        let genesis_hash = tree.best_hash();

        for nonce in 1..=blocks {
            let tip = tree.best_hash();
            let block = Block::new(tip, Transaction::coinbase(10, vec![2; 33], nonce), vec![]);
            prop_assert!(tree.accept_block(block));
            let sibling = Block::new(tip, Transaction::coinbase(10, vec![3; 33], nonce), vec![]);
            prop_assert!(tree.accept_block(sibling));
        }

        prop_assert_eq!(tree.best_height(), blocks + 1);
        prop_assert_eq!(tree.best_chain().len() as u64, blocks + 1);
        prop_assert_eq!(tree.best_chain().last().copied(), Some(genesis_hash));
        prop_assert!(tree.node_count() as u64 <= tree.best_height() + cut_off_age + 1);
        prop_assert_eq!(tree.best_utxo_set().len() as u64, blocks + 1);
    }
}
