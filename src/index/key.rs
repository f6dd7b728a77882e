//! Index identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one ordering view.
///
/// `Default` is the reserved identity of the always-present manual order;
/// every secondary (comparator-sorted) index is `Named`. The reserved id
/// cannot be used in an index spec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKey {
    /// The built-in manual order (normally insertion order).
    Default,
    /// A comparator-sorted secondary index.
    Named(String),
}

impl IndexKey {
    /// True for the reserved default-index identity.
    pub fn is_default(&self) -> bool {
        matches!(self, IndexKey::Default)
    }
}

impl From<&str> for IndexKey {
    fn from(name: &str) -> Self {
        IndexKey::Named(name.to_string())
    }
}

impl From<String> for IndexKey {
    fn from(name: String) -> Self {
        IndexKey::Named(name)
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Default => write!(f, "default"),
            IndexKey::Named(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        let key = IndexKey::from("byAge");
        assert_eq!(key, IndexKey::Named("byAge".to_string()));
        assert!(!key.is_default());
    }

    #[test]
    fn test_display() {
        assert_eq!(IndexKey::Default.to_string(), "default");
        assert_eq!(IndexKey::from("byAge").to_string(), "byAge");
    }
}
