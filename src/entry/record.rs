//! The stored record type: one key/value pair.

/// One stored key/value pair.
///
/// Entries are owned by the map's arena and are simultaneously linked into
/// every index lane. External code only ever sees them by shared reference
/// (comparators, iteration callbacks); value mutation goes through the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, D> {
    key: K,
    value: D,
}

impl<K, D> Entry<K, D> {
    /// Creates a new entry.
    pub(crate) fn new(key: K, value: D) -> Self {
        Self { key, value }
    }

    /// Returns the entry key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the entry value.
    pub fn value(&self) -> &D {
        &self.value
    }

    /// Replaces the entry value in place.
    pub(crate) fn set_value(&mut self, value: D) {
        self.value = value;
    }

    /// Borrows the key and the value mutably at once, for the map's
    /// write-iteration path.
    pub(crate) fn key_value_mut(&mut self) -> (&K, &mut D) {
        (&self.key, &mut self.value)
    }

    /// Consumes the entry, returning its value.
    pub(crate) fn into_value(self) -> D {
        self.value
    }

    /// Consumes the entry, returning key and value.
    pub(crate) fn into_parts(self) -> (K, D) {
        (self.key, self.value)
    }
}
