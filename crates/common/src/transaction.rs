use kestrel_crypto::{pedersen_array, Felt};
use serde::{Deserialize, Serialize};

use crate::{felt_bytes, ChainId};

/// The hash-recipe prefixes: felt encodings of the transaction kind names.
const INVOKE_PREFIX: Felt = felt_bytes!(b"invoke");
const DECLARE_PREFIX: Felt = felt_bytes!(b"declare");
const L1_HANDLER_PREFIX: Felt = felt_bytes!(b"l1_handler");
const DEPLOY_ACCOUNT_PREFIX: Felt = felt_bytes!(b"deploy_account");

/// A Starknet transaction, tagged by kind. The version lives inside each
/// variant since the fields only shift between versions, they do not change
/// kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transaction {
    Deploy(DeployTransaction),
    DeployAccount(DeployAccountTransaction),
    Declare(DeclareTransaction),
    Invoke(InvokeTransaction),
    L1Handler(L1HandlerTransaction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployTransaction {
    pub transaction_hash: Felt,
    pub version: Felt,
    pub contract_address: Felt,
    /// Distinguishes between instances deployed from the same class.
    pub contract_address_salt: Felt,
    pub class_hash: Felt,
    pub constructor_calldata: Vec<Felt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployAccountTransaction {
    pub transaction_hash: Felt,
    pub version: Felt,
    pub contract_address: Felt,
    pub contract_address_salt: Felt,
    pub class_hash: Felt,
    pub constructor_calldata: Vec<Felt>,
    pub max_fee: Felt,
    pub signature: Vec<Felt>,
    pub nonce: Felt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclareTransaction {
    pub transaction_hash: Felt,
    pub version: Felt,
    pub class_hash: Felt,
    pub sender_address: Felt,
    pub max_fee: Felt,
    pub signature: Vec<Felt>,
    pub nonce: Felt,
    /// Version 2 onwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiled_class_hash: Option<Felt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeTransaction {
    pub transaction_hash: Felt,
    pub version: Felt,
    pub contract_address: Felt,
    pub calldata: Vec<Felt>,
    pub signature: Vec<Felt>,
    pub max_fee: Felt,
    /// Version 0 only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point_selector: Option<Felt>,
    /// Version 1 onwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Felt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_address: Option<Felt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L1HandlerTransaction {
    pub transaction_hash: Felt,
    pub version: Felt,
    pub contract_address: Felt,
    pub entry_point_selector: Felt,
    /// Early L1 handler transactions were delivered without a nonce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Felt>,
    pub calldata: Vec<Felt>,
}

impl Transaction {
    /// The hash declared by the upstream source.
    pub fn hash(&self) -> Felt {
        match self {
            Transaction::Deploy(tx) => tx.transaction_hash,
            Transaction::DeployAccount(tx) => tx.transaction_hash,
            Transaction::Declare(tx) => tx.transaction_hash,
            Transaction::Invoke(tx) => tx.transaction_hash,
            Transaction::L1Handler(tx) => tx.transaction_hash,
        }
    }

    /// The transaction signature; empty for the kinds that carry none.
    pub fn signature(&self) -> &[Felt] {
        match self {
            Transaction::Deploy(_) | Transaction::L1Handler(_) => &[],
            Transaction::DeployAccount(tx) => &tx.signature,
            Transaction::Declare(tx) => &tx.signature,
            Transaction::Invoke(tx) => &tx.signature,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Transaction::Deploy(_) => "DEPLOY",
            Transaction::DeployAccount(_) => "DEPLOY_ACCOUNT",
            Transaction::Declare(_) => "DECLARE",
            Transaction::Invoke(_) => "INVOKE",
            Transaction::L1Handler(_) => "L1_HANDLER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionHashError {
    #[error("invalid {kind} transaction version: {version}")]
    InvalidVersion { kind: &'static str, version: Felt },
}

/// Recomputes the hash a transaction must declare.
///
/// Hash calculation changed several times before re-genesis and some
/// historical paths cannot be reproduced; for those (Deploy, Invoke v0,
/// Declare v0, L1 handler without a nonce) the declared hash is returned
/// unchecked. Unknown versions are an error.
pub fn transaction_hash(
    transaction: &Transaction,
    chain: ChainId,
) -> Result<Felt, TransactionHashError> {
    match transaction {
        // Deploy transactions are deprecated since re-genesis; the hash is
        // not verifiable.
        Transaction::Deploy(tx) => Ok(tx.transaction_hash),
        Transaction::DeployAccount(tx) => deploy_account_hash(tx, chain),
        Transaction::Declare(tx) => declare_hash(tx, chain),
        Transaction::Invoke(tx) => invoke_hash(tx, chain),
        Transaction::L1Handler(tx) => l1_handler_hash(tx, chain),
    }
}

fn invoke_hash(tx: &InvokeTransaction, chain: ChainId) -> Result<Felt, TransactionHashError> {
    if tx.version.is_zero() {
        // Version 0 hashes were computed inconsistently upstream.
        Ok(tx.transaction_hash)
    } else if tx.version.is_one() {
        Ok(pedersen_array(&[
            INVOKE_PREFIX,
            tx.version,
            tx.sender_address.unwrap_or_default(),
            Felt::ZERO,
            pedersen_array(&tx.calldata),
            tx.max_fee,
            chain.0,
            tx.nonce.unwrap_or_default(),
        ]))
    } else {
        Err(TransactionHashError::InvalidVersion {
            kind: "INVOKE",
            version: tx.version,
        })
    }
}

fn declare_hash(tx: &DeclareTransaction, chain: ChainId) -> Result<Felt, TransactionHashError> {
    if tx.version.is_zero() {
        // Version 0 hashes were computed inconsistently upstream.
        Ok(tx.transaction_hash)
    } else if tx.version.is_one() {
        Ok(pedersen_array(&[
            DECLARE_PREFIX,
            tx.version,
            tx.sender_address,
            Felt::ZERO,
            pedersen_array(&[tx.class_hash]),
            tx.max_fee,
            chain.0,
            tx.nonce,
        ]))
    } else if tx.version == Felt::from(2u64) {
        Ok(pedersen_array(&[
            DECLARE_PREFIX,
            tx.version,
            tx.sender_address,
            Felt::ZERO,
            pedersen_array(&[tx.class_hash]),
            tx.max_fee,
            chain.0,
            tx.nonce,
            tx.compiled_class_hash.unwrap_or_default(),
        ]))
    } else {
        Err(TransactionHashError::InvalidVersion {
            kind: "DECLARE",
            version: tx.version,
        })
    }
}

fn l1_handler_hash(tx: &L1HandlerTransaction, chain: ChainId) -> Result<Felt, TransactionHashError> {
    if !tx.version.is_zero() {
        return Err(TransactionHashError::InvalidVersion {
            kind: "L1_HANDLER",
            version: tx.version,
        });
    }
    // Some historical L1 handler transactions were delivered without a
    // nonce, and the recipe below does not reproduce their hashes.
    let Some(nonce) = tx.nonce else {
        return Ok(tx.transaction_hash);
    };
    Ok(pedersen_array(&[
        L1_HANDLER_PREFIX,
        tx.version,
        tx.contract_address,
        tx.entry_point_selector,
        pedersen_array(&tx.calldata),
        Felt::ZERO,
        chain.0,
        nonce,
    ]))
}

fn deploy_account_hash(
    tx: &DeployAccountTransaction,
    chain: ChainId,
) -> Result<Felt, TransactionHashError> {
    // There is no version 0 for deploy-account.
    if !tx.version.is_one() {
        return Err(TransactionHashError::InvalidVersion {
            kind: "DEPLOY_ACCOUNT",
            version: tx.version,
        });
    }
    let mut calldata = vec![tx.class_hash, tx.contract_address_salt];
    calldata.extend_from_slice(&tx.constructor_calldata);
    Ok(pedersen_array(&[
        DEPLOY_ACCOUNT_PREFIX,
        tx.version,
        tx.contract_address,
        Felt::ZERO,
        pedersen_array(&calldata),
        tx.max_fee,
        chain.0,
        tx.nonce,
    ]))
}

/// One transaction whose declared hash could not be confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashMismatch {
    /// The declared hash of the offending transaction.
    pub transaction_hash: Felt,
    pub kind: &'static str,
    /// Present when the recipe itself failed rather than the comparison.
    pub hash_failure: Option<TransactionHashError>,
}

impl std::fmt::Display for HashMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot verify transaction hash {} of {} transaction",
            self.transaction_hash, self.kind
        )?;
        if let Some(failure) = &self.hash_failure {
            write!(f, ": {failure}")?;
        }
        Ok(())
    }
}

/// The accumulated outcome of a failed batch verification. Every failing
/// transaction is represented; [VerificationError::mismatches] yields them in
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationError {
    mismatches: Vec<HashMismatch>,
}

impl VerificationError {
    pub fn mismatches(&self) -> &[HashMismatch] {
        &self.mismatches
    }
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut mismatches = self.mismatches.iter();
        if let Some(first) = mismatches.next() {
            first.fmt(f)?;
        }
        for mismatch in mismatches {
            write!(f, ": {mismatch}")?;
        }
        Ok(())
    }
}

impl std::error::Error for VerificationError {}

/// Checks every transaction's declared hash against the recomputed one.
///
/// The whole batch is always scanned so the caller sees the complete set of
/// mismatches, not just the first.
pub fn verify_transactions(
    transactions: &[Transaction],
    chain: ChainId,
) -> Result<(), VerificationError> {
    let mut mismatches = Vec::new();
    for transaction in transactions {
        match transaction_hash(transaction, chain) {
            Ok(computed) if computed == transaction.hash() => {}
            Ok(_) => mismatches.push(HashMismatch {
                transaction_hash: transaction.hash(),
                kind: transaction.kind(),
                hash_failure: None,
            }),
            Err(e) => mismatches.push(HashMismatch {
                transaction_hash: transaction.hash(),
                kind: transaction.kind(),
                hash_failure: Some(e),
            }),
        }
    }
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(VerificationError { mismatches })
    }
}
