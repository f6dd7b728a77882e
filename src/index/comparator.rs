//! Comparator functions and index specs.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::entry::Entry;

use super::IndexKey;

/// Three-way comparator over two entries.
///
/// Drives one secondary index. The comparator must be consistent for a given
/// pair across a single resort pass; transitivity is the caller's obligation
/// (the engine bounds comparator evaluations defensively, see the sort
/// module).
pub type Comparator<K, D> =
    Arc<dyn Fn(&Entry<K, D>, &Entry<K, D>) -> Ordering + Send + Sync>;

/// Construction-time definition of one secondary index: an identity plus the
/// comparator that orders it.
pub struct IndexSpec<K, D> {
    id: IndexKey,
    comparator: Comparator<K, D>,
}

impl<K, D> IndexSpec<K, D> {
    /// Creates a spec for a comparator-sorted index.
    pub fn new<F>(id: impl Into<IndexKey>, comparator: F) -> Self
    where
        F: Fn(&Entry<K, D>, &Entry<K, D>) -> Ordering + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            comparator: Arc::new(comparator),
        }
    }

    /// The index identity this spec defines.
    pub fn id(&self) -> &IndexKey {
        &self.id
    }

    pub(crate) fn into_parts(self) -> (IndexKey, Comparator<K, D>) {
        (self.id, self.comparator)
    }
}

/// Orders entries by key ascending.
pub fn by_key<K: Ord, D>(a: &Entry<K, D>, b: &Entry<K, D>) -> Ordering {
    a.key().cmp(b.key())
}

/// Orders entries by value ascending.
pub fn by_value<K, D: Ord>(a: &Entry<K, D>, b: &Entry<K, D>) -> Ordering {
    a.value().cmp(b.value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_key() {
        let a = Entry::new(1, "one");
        let b = Entry::new(2, "two");
        assert_eq!(by_key(&a, &b), Ordering::Less);
        assert_eq!(by_key(&b, &a), Ordering::Greater);
        assert_eq!(by_key(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_by_value() {
        let a = Entry::new("x", 10);
        let b = Entry::new("y", 3);
        assert_eq!(by_value(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_spec_carries_id() {
        let spec: IndexSpec<i32, i32> = IndexSpec::new("byKey", by_key);
        assert_eq!(spec.id(), &IndexKey::from("byKey"));
    }
}
