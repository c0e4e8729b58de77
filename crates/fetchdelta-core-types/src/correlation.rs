//! Correlation types for fetch cycle tracking
//!
//! Every `perform_fetch` call is tagged with a fresh [`RequestId`] so that the
//! start/end log events, any error raised during the cycle and the returned
//! outcome can be tied together.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id of one fetch/diff/notify cycle. Serializes as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Fresh time-ordered id (UUIDv7).
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an id read back from a log line or a test fixture.
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
