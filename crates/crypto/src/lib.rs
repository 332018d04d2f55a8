//! Cryptographic primitives for the Starknet field: the 252-bit field
//! element, the two-input Pedersen hash and the length-suffixed hash chain
//! that all commitment and transaction hashing reduces to.
#![deny(rust_2018_idioms)]

mod chain;
mod curve;
mod felt;
mod field;
mod hash;

pub use chain::{pedersen_array, HashChain};
pub use felt::{Felt, HexParseError, OverflowError};
pub use hash::pedersen_hash;
