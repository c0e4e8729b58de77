//! Persisted cache envelope.
//!
//! A cache is stored as one JSON document holding the sections plus enough
//! metadata to reject stale or damaged data:
//!
//! ```json
//! {
//!   "cache_schema_version": 1,
//!   "cache_name": "tasks",
//!   "written_at": "2026-01-01T00:00:00Z",
//!   "section_key_path": "group",
//!   "sections_digest": "<sha256 hex of the canonical sections JSON>",
//!   "sections": [ { "name": "A", "entries": [ ... ] } ]
//! }
//! ```

use crate::errors::FetchDeltaError;
use crate::model::{Section, Snapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

pub const CACHE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope {
    pub cache_schema_version: u32,
    pub cache_name: String,
    pub written_at: DateTime<Utc>,
    pub section_key_path: Option<String>,
    pub sections_digest: String,
    pub sections: Vec<Section>,
}

/// SHA-256 (hex) of the sections' canonical JSON.
///
/// Attribute maps are `BTreeMap`s, so the serialization is key-ordered and
/// stable across runs.
pub fn sections_digest(sections: &[Section]) -> Result<String, FetchDeltaError> {
    let canonical = serde_json::to_vec(sections)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}

pub fn encode(
    cache_name: &str,
    section_key_path: Option<&str>,
    snapshot: &Snapshot,
) -> Result<Vec<u8>, FetchDeltaError> {
    let envelope = CacheEnvelope {
        cache_schema_version: CACHE_SCHEMA_VERSION,
        cache_name: cache_name.to_string(),
        written_at: Utc::now(),
        section_key_path: section_key_path.map(str::to_string),
        sections_digest: sections_digest(snapshot.sections())?,
        sections: snapshot.sections().to_vec(),
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Parse and verify an envelope without checking its section rule.
///
/// # Errors
///
/// - `Serialization` for malformed JSON
/// - `UnsupportedCacheVersion` for another schema version
/// - `CacheDigestMismatch` if the sections were altered after writing
pub fn decode_envelope(bytes: &[u8]) -> Result<CacheEnvelope, FetchDeltaError> {
    let envelope: CacheEnvelope = serde_json::from_slice(bytes)?;

    if envelope.cache_schema_version != CACHE_SCHEMA_VERSION {
        return Err(FetchDeltaError::UnsupportedCacheVersion {
            found: envelope.cache_schema_version,
            expected: CACHE_SCHEMA_VERSION,
        });
    }

    let computed = sections_digest(&envelope.sections)?;
    if computed != envelope.sections_digest {
        return Err(FetchDeltaError::CacheDigestMismatch {
            recorded: envelope.sections_digest,
            computed,
        });
    }

    Ok(envelope)
}

/// Decode a cache into a snapshot built with `section_key_path`.
///
/// # Errors
///
/// Everything [`decode_envelope`] rejects, plus `SectionRuleMismatch` and
/// `DuplicateIdentifier`.
pub fn decode(bytes: &[u8], section_key_path: Option<&str>) -> Result<Snapshot, FetchDeltaError> {
    let envelope = decode_envelope(bytes)?;

    if envelope.section_key_path.as_deref() != section_key_path {
        return Err(FetchDeltaError::SectionRuleMismatch {
            found: envelope.section_key_path,
            expected: section_key_path.map(str::to_string),
        });
    }

    Snapshot::new(envelope.sections)
}
