use serde::{Deserialize, Serialize};

/// One sort key of a fetch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub key: String,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

impl SortDescriptor {
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ascending: true,
        }
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ascending: false,
        }
    }

    /// Parse `key` or `key:asc` / `key:desc`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.split_once(':') {
            None if !text.is_empty() => Some(Self::ascending(text)),
            Some((key, "asc")) if !key.is_empty() => Some(Self::ascending(key)),
            Some((key, "desc")) if !key.is_empty() => Some(Self::descending(key)),
            _ => None,
        }
    }
}

/// Query handed to the fetch source.
///
/// The engine never interprets `predicate`; it is forwarded verbatim. The
/// sort descriptors are also used by the diff engine to decide which
/// attribute changes can move a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub entity: String,
    #[serde(default)]
    pub predicate: Option<String>,
    #[serde(default)]
    pub sort: Vec<SortDescriptor>,
}

impl FetchRequest {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            predicate: None,
            sort: Vec::new(),
        }
    }

    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    pub fn sorted_by(mut self, descriptor: SortDescriptor) -> Self {
        self.sort.push(descriptor);
        self
    }

    pub fn sort_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.sort.iter().map(|d| d.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_descriptor() {
        assert_eq!(SortDescriptor::parse("due"), Some(SortDescriptor::ascending("due")));
        assert_eq!(
            SortDescriptor::parse("due:desc"),
            Some(SortDescriptor::descending("due"))
        );
        assert_eq!(SortDescriptor::parse("due:sideways"), None);
        assert_eq!(SortDescriptor::parse(":asc"), None);
        assert_eq!(SortDescriptor::parse(""), None);
    }
}
