//! Checksums for migration SQL
//!
//! A migration's SQL must not change once applied; the runner compares the
//! recorded checksum against the embedded text on every open.

#![allow(clippy::result_large_err)]

use crate::errors::{checksum_mismatch, Result};
use sha2::{Digest, Sha256};

/// SHA256 (hex) of a migration's SQL text
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fail if `recorded` differs from the checksum of `sql`.
///
/// Rows written without a checksum are accepted.
pub fn verify_checksum(migration_id: &str, sql: &str, recorded: Option<&str>) -> Result<()> {
    let Some(recorded) = recorded else {
        return Ok(());
    };
    let actual = compute_checksum(sql);
    if recorded != actual {
        return Err(checksum_mismatch(migration_id, recorded, &actual));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_sha256_hex() {
        let checksum = compute_checksum("SELECT 1");
        assert_eq!(checksum.len(), 64);
        assert_eq!(checksum, compute_checksum("SELECT 1"));
    }

    #[test]
    fn test_verify_checksum() {
        let sql = "CREATE TABLE t (id INTEGER)";
        let good = compute_checksum(sql);

        assert!(verify_checksum("001", sql, Some(&good)).is_ok());
        assert!(verify_checksum("001", sql, None).is_ok());

        let err = verify_checksum("001", sql, Some("deadbeef")).unwrap_err();
        assert_eq!(err.op(), Some("migration_checksum"));
    }
}
