//! Block-level transaction and event commitments.
//!
//! Both are roots of height-64 Merkle-Patricia trees keyed by the 64-bit
//! index of the entry within the block, per the Starknet block header
//! definition.

use anyhow::Context;
use kestrel_common::{Transaction, TransactionReceipt};
use kestrel_crypto::{pedersen_array, pedersen_hash, Felt};

use crate::{MerkleTree, PedersenHash};

/// The commitment tree over a block's transactions.
#[derive(Default)]
pub struct TransactionTree {
    tree: MerkleTree<PedersenHash, 64>,
}

impl TransactionTree {
    pub fn set(&mut self, index: u64, value: Felt) -> anyhow::Result<()> {
        self.tree
            .set(Felt::from(index), value)
            .context("Inserting transaction hash")?;
        Ok(())
    }

    pub fn commit(self) -> Felt {
        self.tree.commit()
    }
}

/// The commitment tree over a block's events.
#[derive(Default)]
pub struct EventTree {
    tree: MerkleTree<PedersenHash, 64>,
}

impl EventTree {
    pub fn set(&mut self, index: u64, value: Felt) -> anyhow::Result<()> {
        self.tree
            .set(Felt::from(index), value)
            .context("Inserting event hash")?;
        Ok(())
    }

    pub fn commit(self) -> Felt {
        self.tree.commit()
    }
}

/// Computes the transaction commitment of a block.
///
/// Each leaf is `pedersen(hash, signature_hash)`. Only invoke transactions
/// historically contributed their signature to this commitment; every other
/// kind uses the empty-chain hash.
pub fn transaction_commitment(transactions: &[Transaction]) -> anyhow::Result<Felt> {
    let mut tree = TransactionTree::default();

    for (index, transaction) in transactions.iter().enumerate() {
        let signature_hash = match transaction {
            Transaction::Invoke(_) => pedersen_array(transaction.signature()),
            _ => pedersen_array(&[]),
        };
        tree.set(
            index as u64,
            pedersen_hash(transaction.hash(), signature_hash),
        )?;
    }

    Ok(tree.commit())
}

/// Computes the event commitment of a block.
///
/// Events are flattened across receipts in order and keyed by their running
/// index. Each leaf is `pedersen_array(from, pedersen_array(keys),
/// pedersen_array(data))`.
pub fn event_commitment(receipts: &[TransactionReceipt]) -> anyhow::Result<Felt> {
    let mut tree = EventTree::default();

    let mut index = 0u64;
    for receipt in receipts {
        for event in &receipt.events {
            let event_hash = pedersen_array(&[
                event.from_address,
                pedersen_array(&event.keys),
                pedersen_array(&event.data),
            ]);
            tree.set(index, event_hash)?;
            index += 1;
        }
    }

    Ok(tree.commit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_common::{felt, Event, ExecutionResources, InvokeTransaction};
    use pretty_assertions::assert_eq;

    fn invoke(hash: Felt, signature: Vec<Felt>) -> Transaction {
        Transaction::Invoke(InvokeTransaction {
            transaction_hash: hash,
            version: Felt::ONE,
            contract_address: Felt::ZERO,
            calldata: vec![],
            signature,
            max_fee: Felt::ZERO,
            entry_point_selector: None,
            nonce: None,
            sender_address: None,
        })
    }

    fn receipt(hash: Felt, events: Vec<Event>) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: hash,
            actual_fee: Felt::ZERO,
            events,
            l1_to_l2_consumed_message: None,
            l2_to_l1_messages: vec![],
            execution_resources: ExecutionResources::default(),
        }
    }

    #[test]
    fn commitment_merkle_tree() {
        let mut tree = TransactionTree::default();

        for (index, value) in [1u64, 2, 3, 4].into_iter().enumerate() {
            tree.set(index as u64, Felt::from(value)).unwrap();
        }

        // produced by the cairo-lang Python implementation:
        // `hex(asyncio.run(calculate_patricia_root([1, 2, 3, 4], height=64, ffc=ffc)))`
        let expected = felt!("0x1a0e579b6b444769e4626331230b5ae39bd880f47e703b73fa56bf77e52e461");
        assert_eq!(tree.commit(), expected);
    }

    #[test]
    fn empty_commitments_are_zero() {
        assert_eq!(transaction_commitment(&[]).unwrap(), Felt::ZERO);
        assert_eq!(event_commitment(&[]).unwrap(), Felt::ZERO);
    }

    #[test]
    fn only_invoke_signatures_contribute() {
        // An invoke with an empty signature commits identically to a
        // non-invoke kind, whereas a real signature changes the leaf.
        let unsigned = transaction_commitment(&[invoke(felt!("0x1"), vec![])]).unwrap();
        let signed =
            transaction_commitment(&[invoke(felt!("0x1"), vec![felt!("0x2")])]).unwrap();
        assert_ne!(unsigned, signed);

        let declare = Transaction::Declare(kestrel_common::DeclareTransaction {
            transaction_hash: felt!("0x1"),
            version: Felt::ONE,
            class_hash: Felt::ZERO,
            sender_address: Felt::ZERO,
            max_fee: Felt::ZERO,
            signature: vec![felt!("0x2")],
            nonce: Felt::ZERO,
            compiled_class_hash: None,
        });
        // The declare's signature is ignored.
        assert_eq!(transaction_commitment(&[declare]).unwrap(), unsigned);
    }

    #[test]
    fn transaction_order_is_load_bearing() {
        let a = invoke(felt!("0x1"), vec![]);
        let b = invoke(felt!("0x2"), vec![]);
        let forward = transaction_commitment(&[a.clone(), b.clone()]).unwrap();
        let reversed = transaction_commitment(&[b, a]).unwrap();
        assert_ne!(forward, reversed);
    }

    #[test]
    fn events_flatten_across_receipts() {
        let event = |data: Felt| Event {
            from_address: felt!("0xcafe"),
            keys: vec![felt!("0x1")],
            data: vec![data],
        };

        // Two receipts with [e1] and [e2] commit like one receipt with
        // [e1, e2]: indices run across the whole block.
        let split = event_commitment(&[
            receipt(felt!("0xa"), vec![event(felt!("0x10"))]),
            receipt(felt!("0xb"), vec![event(felt!("0x20"))]),
        ])
        .unwrap();
        let merged = event_commitment(&[receipt(
            felt!("0xa"),
            vec![event(felt!("0x10")), event(felt!("0x20"))],
        )])
        .unwrap();
        assert_eq!(split, merged);
    }

    #[test]
    fn event_hash_covers_all_fields() {
        let base = Event {
            from_address: felt!("0x1"),
            keys: vec![felt!("0x2")],
            data: vec![felt!("0x3")],
        };
        let mut changed_key = base.clone();
        changed_key.keys[0] = felt!("0x4");

        let lhs = event_commitment(&[receipt(felt!("0xa"), vec![base])]).unwrap();
        let rhs = event_commitment(&[receipt(felt!("0xa"), vec![changed_key])]).unwrap();
        assert_ne!(lhs, rhs);
    }
}
