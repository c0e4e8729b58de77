use fetchdelta_core_types::RequestId;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Fetch
    /// The fetch source rejected or failed to execute the request
    QueryFailure,
    /// A fetch produced the same identifier more than once
    DuplicateIdentifier,
    InvalidInput,

    // Cache
    /// Persisted baseline could not be decoded; callers treat it as empty
    CacheUnreadable,
    NotFound,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::QueryFailure => "ERR_QUERY_FAILURE",
            ExErrorKind::DuplicateIdentifier => "ERR_DUPLICATE_IDENTIFIER",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::CacheUnreadable => "ERR_CACHE_UNREADABLE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    cache_name: Option<String>,
    entity: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            cache_name: None,
            entity: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add cache name context
    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = Some(name.into());
        self
    }

    /// Add entity context
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the cache name context, if any
    pub fn cache_name(&self) -> Option<&str> {
        self.cache_name.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(cache_name) = &self.cache_name {
            write!(f, " (cache: {})", cache_name)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised while building and decoding snapshots
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchDeltaError {
    /// The same identifier appeared twice in one result set
    #[error("Duplicate identifier in result set: {identifier}")]
    DuplicateIdentifier { identifier: String },

    /// Persisted cache envelope has an unsupported schema version
    #[error("Unsupported cache schema version {found} (expected {expected})")]
    UnsupportedCacheVersion { found: u32, expected: u32 },

    /// Persisted sections do not match their recorded digest
    #[error("Cache digest mismatch: recorded {recorded}, computed {computed}")]
    CacheDigestMismatch { recorded: String, computed: String },

    /// Persisted cache was built with a different section rule
    #[error("Cache built with section key {found:?}, controller uses {expected:?}")]
    SectionRuleMismatch {
        found: Option<String>,
        expected: Option<String>,
    },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<FetchDeltaError> for ExError {
    fn from(err: FetchDeltaError) -> Self {
        match &err {
            FetchDeltaError::DuplicateIdentifier { identifier } => {
                ExError::new(ExErrorKind::DuplicateIdentifier)
                    .with_entity(identifier.clone())
                    .with_message(err.to_string())
            }
            FetchDeltaError::UnsupportedCacheVersion { .. }
            | FetchDeltaError::CacheDigestMismatch { .. }
            | FetchDeltaError::SectionRuleMismatch { .. } => {
                ExError::new(ExErrorKind::CacheUnreadable).with_message(err.to_string())
            }
            FetchDeltaError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for FetchDeltaError {
    fn from(err: serde_json::Error) -> Self {
        FetchDeltaError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kind_codes() {
        let cases = [
            (ExErrorKind::QueryFailure, "ERR_QUERY_FAILURE"),
            (ExErrorKind::DuplicateIdentifier, "ERR_DUPLICATE_IDENTIFIER"),
            (ExErrorKind::CacheUnreadable, "ERR_CACHE_UNREADABLE"),
            (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::QueryFailure)
            .with_op("perform_fetch")
            .with_entity("Task")
            .with_message("store offline");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_QUERY_FAILURE]"));
        assert!(text.contains("perform_fetch"));
        assert!(text.contains("store offline"));
        assert!(text.contains("(entity: Task)"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        use std::error::Error as _;
        let inner = ExError::new(ExErrorKind::Io).with_message("disk full");
        let outer = ExError::new(ExErrorKind::Persistence).with_source(inner);
        assert_eq!(outer.source_error().map(|e| e.kind()), Some(ExErrorKind::Io));
        assert!(outer.source().is_some());
    }
}
