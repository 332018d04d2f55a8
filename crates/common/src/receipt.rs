use kestrel_crypto::Felt;
use serde::{Deserialize, Serialize};

use crate::EthereumAddress;

/// An event emitted by a contract during execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub from_address: Felt,
    pub keys: Vec<Felt>,
    pub data: Vec<Felt>,
}

/// A message sent from L1 to a Starknet contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L1ToL2Message {
    pub from_address: EthereumAddress,
    pub to_address: Felt,
    pub selector: Felt,
    pub payload: Vec<Felt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Felt>,
}

/// A message sent from a Starknet contract to L1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2ToL1Message {
    pub from_address: Felt,
    pub to_address: EthereumAddress,
    pub payload: Vec<Felt>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResources {
    #[serde(rename = "builtin_instance_counter")]
    pub builtins: BuiltinCounters,
    pub memory_holes: u64,
    pub steps: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinCounters {
    pub bitwise: u64,
    pub ec_op: u64,
    // The upstream gateway misspells this key; keep the wire form.
    #[serde(rename = "ecsda")]
    pub ecdsa: u64,
    pub output: u64,
    pub pedersen: u64,
    pub range_check: u64,
}

/// The receipt bound to one transaction by hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: Felt,
    pub actual_fee: Felt,
    pub events: Vec<Event>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l1_to_l2_consumed_message: Option<L1ToL2Message>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub l2_to_l1_messages: Vec<L2ToL1Message>,
    pub execution_resources: ExecutionResources,
}
