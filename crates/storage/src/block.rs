use anyhow::Context;
use kestrel_common::{
    Block, BlockHash, BlockHeader, BlockNumber, StateUpdate, Transaction, TransactionReceipt,
};
use kestrel_crypto::Felt;
use rusqlite::{named_params, Connection, OptionalExtension};

use crate::params::{felt_column, u128_column};
use crate::{BlockId, Storage};

impl Storage {
    /// Stores a block, its transactions with receipts, and its state update
    /// in one database transaction.
    pub fn insert_block(&self, block: &Block, state_update: &StateUpdate) -> anyhow::Result<()> {
        anyhow::ensure!(
            block.transactions.len() == block.receipts.len(),
            "Every transaction requires a receipt"
        );

        let mut connection = self.connection()?;
        let db_tx = connection
            .transaction()
            .context("Starting database transaction")?;

        let header = &block.header;
        db_tx
            .execute(
                r"INSERT INTO block_headers
                       ( number,  hash,  parent_hash,  timestamp,  sequencer_address,
                         state_commitment,  transaction_commitment,  event_commitment,  gas_price)
                VALUES (:number, :hash, :parent_hash, :timestamp, :sequencer_address,
                        :state_commitment, :transaction_commitment, :event_commitment, :gas_price)",
                named_params! {
                    ":number": header.number.get() as i64,
                    ":hash": header.hash.0.as_be_bytes().as_slice(),
                    ":parent_hash": header.parent_hash.0.as_be_bytes().as_slice(),
                    ":timestamp": header.timestamp as i64,
                    ":sequencer_address": header.sequencer_address.as_be_bytes().as_slice(),
                    ":state_commitment": header.state_commitment.as_be_bytes().as_slice(),
                    ":transaction_commitment": header.transaction_commitment.as_be_bytes().as_slice(),
                    ":event_commitment": header.event_commitment.as_be_bytes().as_slice(),
                    ":gas_price": header.gas_price.to_be_bytes().as_slice(),
                },
            )
            .context("Inserting block header")?;

        for (index, (transaction, receipt)) in
            block.transactions.iter().zip(&block.receipts).enumerate()
        {
            let transaction_json =
                serde_json::to_string(transaction).context("Serializing transaction")?;
            let receipt_json = serde_json::to_string(receipt).context("Serializing receipt")?;
            db_tx
                .execute(
                    r"INSERT INTO transactions (hash, block_number, idx, transaction_json, receipt_json)
                    VALUES (:hash, :block_number, :idx, :transaction_json, :receipt_json)",
                    named_params! {
                        ":hash": transaction.hash().as_be_bytes().as_slice(),
                        ":block_number": header.number.get() as i64,
                        ":idx": index as i64,
                        ":transaction_json": &transaction_json,
                        ":receipt_json": &receipt_json,
                    },
                )
                .context("Inserting transaction")?;
        }

        let update_json =
            serde_json::to_string(state_update).context("Serializing state update")?;
        db_tx
            .execute(
                "INSERT INTO state_updates (block_number, update_json) VALUES (:block_number, :update_json)",
                named_params! {
                    ":block_number": header.number.get() as i64,
                    ":update_json": &update_json,
                },
            )
            .context("Inserting state update")?;

        db_tx.commit().context("Committing database transaction")
    }

    pub fn latest_block_number(&self) -> anyhow::Result<Option<BlockNumber>> {
        let connection = self.connection()?;
        connection
            .query_row(
                "SELECT number FROM block_headers ORDER BY number DESC LIMIT 1",
                [],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .context("Querying latest block number")
            .map(|number| number.map(|n| BlockNumber::new_or_panic(n as u64)))
    }

    /// Resolves a [BlockId] to the canonical block number, if the block
    /// exists.
    pub fn block_number(&self, block: BlockId) -> anyhow::Result<Option<BlockNumber>> {
        let connection = self.connection()?;
        resolve(&connection, block)
    }

    pub fn block_header(&self, block: BlockId) -> anyhow::Result<Option<BlockHeader>> {
        let connection = self.connection()?;
        let Some(number) = resolve(&connection, block)? else {
            return Ok(None);
        };
        connection
            .query_row(
                r"SELECT number, hash, parent_hash, timestamp, sequencer_address,
                         state_commitment, transaction_commitment, event_commitment, gas_price
                  FROM block_headers WHERE number = :number",
                named_params! { ":number": number.get() as i64 },
                |row| {
                    Ok(BlockHeader {
                        number: BlockNumber::new_or_panic(row.get::<_, i64>(0)? as u64),
                        hash: BlockHash(felt_column(row, 1)?),
                        parent_hash: BlockHash(felt_column(row, 2)?),
                        timestamp: row.get::<_, i64>(3)? as u64,
                        sequencer_address: felt_column(row, 4)?,
                        state_commitment: felt_column(row, 5)?,
                        transaction_commitment: felt_column(row, 6)?,
                        event_commitment: felt_column(row, 7)?,
                        gas_price: u128_column(row, 8)?,
                    })
                },
            )
            .optional()
            .context("Querying block header")
    }

    pub fn block_transactions(&self, block: BlockId) -> anyhow::Result<Option<Vec<Transaction>>> {
        let connection = self.connection()?;
        let Some(number) = resolve(&connection, block)? else {
            return Ok(None);
        };
        let mut statement = connection
            .prepare(
                "SELECT transaction_json FROM transactions WHERE block_number = :number ORDER BY idx",
            )
            .context("Preparing transaction query")?;
        let transactions = statement
            .query_map(named_params! { ":number": number.get() as i64 }, |row| {
                row.get::<_, String>(0)
            })
            .context("Querying block transactions")?
            .collect::<Result<Vec<_>, _>>()
            .context("Iterating block transactions")?
            .into_iter()
            .map(|json| serde_json::from_str(&json).context("Deserializing transaction"))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Some(transactions))
    }

    pub fn transaction_count(&self, block: BlockId) -> anyhow::Result<Option<usize>> {
        let connection = self.connection()?;
        let Some(number) = resolve(&connection, block)? else {
            return Ok(None);
        };
        let count = connection
            .query_row(
                "SELECT COUNT(1) FROM transactions WHERE block_number = :number",
                named_params! { ":number": number.get() as i64 },
                |row| row.get::<_, i64>(0),
            )
            .context("Counting block transactions")?;
        Ok(Some(count as usize))
    }

    pub fn transaction_by_hash(&self, hash: Felt) -> anyhow::Result<Option<Transaction>> {
        let connection = self.connection()?;
        connection
            .query_row(
                "SELECT transaction_json FROM transactions WHERE hash = :hash",
                named_params! { ":hash": hash.as_be_bytes().as_slice() },
                |row| row.get::<_, String>(0),
            )
            .optional()
            .context("Querying transaction")?
            .map(|json| serde_json::from_str(&json).context("Deserializing transaction"))
            .transpose()
    }

    pub fn transaction_at_index(
        &self,
        block: BlockId,
        index: u64,
    ) -> anyhow::Result<Option<Transaction>> {
        let connection = self.connection()?;
        let Some(number) = resolve(&connection, block)? else {
            return Ok(None);
        };
        connection
            .query_row(
                "SELECT transaction_json FROM transactions WHERE block_number = :number AND idx = :idx",
                named_params! {
                    ":number": number.get() as i64,
                    ":idx": index as i64,
                },
                |row| row.get::<_, String>(0),
            )
            .optional()
            .context("Querying transaction by position")?
            .map(|json| serde_json::from_str(&json).context("Deserializing transaction"))
            .transpose()
    }

    /// The receipt for a transaction, along with the block it was included
    /// in.
    pub fn receipt_by_hash(
        &self,
        hash: Felt,
    ) -> anyhow::Result<Option<(TransactionReceipt, BlockNumber, BlockHash)>> {
        let connection = self.connection()?;
        connection
            .query_row(
                r"SELECT t.receipt_json, t.block_number, b.hash
                  FROM transactions t JOIN block_headers b ON b.number = t.block_number
                  WHERE t.hash = :hash",
                named_params! { ":hash": hash.as_be_bytes().as_slice() },
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        BlockNumber::new_or_panic(row.get::<_, i64>(1)? as u64),
                        BlockHash(felt_column(row, 2)?),
                    ))
                },
            )
            .optional()
            .context("Querying receipt")?
            .map(|(json, number, hash)| {
                let receipt = serde_json::from_str(&json).context("Deserializing receipt")?;
                Ok((receipt, number, hash))
            })
            .transpose()
    }

    pub fn state_update(&self, block: BlockId) -> anyhow::Result<Option<StateUpdate>> {
        let connection = self.connection()?;
        let Some(number) = resolve(&connection, block)? else {
            return Ok(None);
        };
        connection
            .query_row(
                "SELECT update_json FROM state_updates WHERE block_number = :number",
                named_params! { ":number": number.get() as i64 },
                |row| row.get::<_, String>(0),
            )
            .optional()
            .context("Querying state update")?
            .map(|json| serde_json::from_str(&json).context("Deserializing state update"))
            .transpose()
    }
}

fn resolve(connection: &Connection, block: BlockId) -> anyhow::Result<Option<BlockNumber>> {
    let number = match block {
        BlockId::Number(number) => connection
            .query_row(
                "SELECT number FROM block_headers WHERE number = :number",
                named_params! { ":number": number.get() as i64 },
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .context("Checking block number")?,
        BlockId::Hash(hash) => connection
            .query_row(
                "SELECT number FROM block_headers WHERE hash = :hash",
                named_params! { ":hash": hash.0.as_be_bytes().as_slice() },
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .context("Resolving block hash")?,
        BlockId::Latest => connection
            .query_row(
                "SELECT number FROM block_headers ORDER BY number DESC LIMIT 1",
                [],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .context("Resolving latest block")?,
    };
    Ok(number.map(|n| BlockNumber::new_or_panic(n as u64)))
}
