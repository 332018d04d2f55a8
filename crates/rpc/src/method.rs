mod block_hash_and_number;
mod block_number;
mod chain_id;
mod get_block_transaction_count;
mod get_block_with_tx_hashes;
mod get_block_with_txs;
mod get_state_update;
mod get_transaction_by_block_id_and_index;
mod get_transaction_by_hash;
mod get_transaction_receipt;

pub use block_hash_and_number::block_hash_and_number;
pub use block_number::block_number;
pub use chain_id::chain_id;
pub use get_block_transaction_count::get_block_transaction_count;
pub use get_block_with_tx_hashes::get_block_with_tx_hashes;
pub use get_block_with_txs::get_block_with_txs;
pub use get_state_update::get_state_update;
pub use get_transaction_by_block_id_and_index::get_transaction_by_block_id_and_index;
pub use get_transaction_by_hash::get_transaction_by_hash;
pub use get_transaction_receipt::get_transaction_receipt;
