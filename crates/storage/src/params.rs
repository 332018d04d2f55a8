//! Column conversions between domain types and sqlite values.

use kestrel_crypto::Felt;
use rusqlite::types::FromSqlError;
use rusqlite::Row;

/// Reads a 32-byte blob column as a [Felt].
pub(crate) fn felt_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Felt> {
    let blob = row.get_ref(index)?.as_blob()?;
    Felt::from_be_slice(blob)
        .map_err(|e| FromSqlError::Other(Box::new(e)).into())
}

/// Reads a 16-byte blob column as a u128.
pub(crate) fn u128_column(row: &Row<'_>, index: usize) -> rusqlite::Result<u128> {
    let blob = row.get_ref(index)?.as_blob()?;
    let bytes: [u8; 16] = blob
        .try_into()
        .map_err(|_| FromSqlError::InvalidBlobSize {
            expected_size: 16,
            blob_size: blob.len(),
        })?;
    Ok(u128::from_be_bytes(bytes))
}
