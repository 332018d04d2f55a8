//! Sqlite-backed storage for canonical blocks, their transactions and
//! receipts, and per-block state updates.
//!
//! The node treats this as a narrow collaborator: the synchronizer writes
//! whole blocks through [Storage::insert_block] and the RPC layer reads
//! through the query methods. The column layout is private to this crate.
#![deny(rust_2018_idioms)]

mod block;
mod params;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use kestrel_common::{BlockHash, BlockNumber};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;

/// Identifies a block for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockId {
    Latest,
    Number(BlockNumber),
    Hash(BlockHash),
}

type PooledSqlite = PooledConnection<SqliteConnectionManager>;

/// A handle to the node's database. Cheap to clone; all clones share one
/// connection pool.
#[derive(Clone)]
pub struct Storage(Pool<SqliteConnectionManager>);

impl Storage {
    /// Opens the database at `path`, creating it and its schema if needed.
    pub fn migrate(path: &Path) -> anyhow::Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        Self::setup(manager)
    }

    /// An isolated in-memory database, for tests.
    ///
    /// Connections in the pool share one database via sqlite's shared-cache
    /// URI mode; the counter keeps separate instances from colliding.
    pub fn in_memory() -> anyhow::Result<Self> {
        static INSTANCE: AtomicUsize = AtomicUsize::new(0);
        let instance = INSTANCE.fetch_add(1, Ordering::Relaxed);

        let manager = SqliteConnectionManager::file(format!(
            "file:kestrel_memdb{instance}?mode=memory&cache=shared"
        ))
        .with_flags(
            OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE,
        );
        Self::setup(manager)
    }

    fn setup(manager: SqliteConnectionManager) -> anyhow::Result<Self> {
        let pool = Pool::builder()
            .max_size(8)
            .build(manager)
            .context("Creating database connection pool")?;

        let connection = pool.get().context("Opening database connection")?;
        connection
            .execute_batch(
                r"
                CREATE TABLE IF NOT EXISTS block_headers (
                    number                 INTEGER PRIMARY KEY,
                    hash                   BLOB NOT NULL,
                    parent_hash            BLOB NOT NULL,
                    timestamp              INTEGER NOT NULL,
                    sequencer_address      BLOB NOT NULL,
                    state_commitment       BLOB NOT NULL,
                    transaction_commitment BLOB NOT NULL,
                    event_commitment       BLOB NOT NULL,
                    gas_price              BLOB NOT NULL
                );
                CREATE UNIQUE INDEX IF NOT EXISTS block_headers_hash ON block_headers(hash);

                CREATE TABLE IF NOT EXISTS transactions (
                    hash             BLOB PRIMARY KEY,
                    block_number     INTEGER NOT NULL REFERENCES block_headers(number),
                    idx              INTEGER NOT NULL,
                    transaction_json TEXT NOT NULL,
                    receipt_json     TEXT NOT NULL
                );
                CREATE UNIQUE INDEX IF NOT EXISTS transactions_position
                    ON transactions(block_number, idx);

                CREATE TABLE IF NOT EXISTS state_updates (
                    block_number INTEGER PRIMARY KEY REFERENCES block_headers(number),
                    update_json  TEXT NOT NULL
                );
                ",
            )
            .context("Creating database schema")?;

        Ok(Self(pool))
    }

    fn connection(&self) -> anyhow::Result<PooledSqlite> {
        self.0.get().context("Fetching connection from pool")
    }
}
