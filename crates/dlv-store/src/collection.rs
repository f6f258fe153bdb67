//! Ordered record collections
//!
//! A [`Collection`] keeps records in insertion order and gives each one a
//! stable key. Records can be addressed by key or by position; positions
//! shift on removal, keys never do.
//!
//! Backed by [`im::Vector`], so cloning a collection is O(1) and the reducer
//! can return new states without copying every record.

use crate::error::StoreError;
use dlv_model::RecordKey;
use im::Vector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A record and its stable key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record<K, T> {
    pub id: K,
    pub value: T,
}

/// How an operation picks its target record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address<K> {
    /// Stable key
    Id(K),
    /// Zero-based storage position
    Index(usize),
}

impl<K: fmt::Display> fmt::Display for Address<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Id(id) => write!(f, "{id}"),
            Address::Index(i) => write!(f, "#{i}"),
        }
    }
}

impl<K> From<K> for Address<K>
where
    K: RecordKey,
{
    fn from(id: K) -> Self {
        Address::Id(id)
    }
}

/// Insertion-ordered records with stable keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<K: Clone, T: Clone> {
    records: Vector<Record<K, T>>,
}

impl<K: Clone, T: Clone> Default for Collection<K, T> {
    fn default() -> Self {
        Self {
            records: Vector::new(),
        }
    }
}

impl<K: RecordKey, T: Clone> Collection<K, T> {
    /// Create empty collection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in storage order
    pub fn iter(&self) -> impl Iterator<Item = &Record<K, T>> {
        self.records.iter()
    }

    /// Iterate values in storage order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.records.iter().map(|r| &r.value)
    }

    /// Keys in storage order
    #[must_use]
    pub fn ids(&self) -> Vec<K> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Look up a record by key
    #[must_use]
    pub fn get(&self, id: K) -> Option<&T> {
        self.records.iter().find(|r| r.id == id).map(|r| &r.value)
    }

    /// Record at a storage position
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Record<K, T>> {
        self.records.get(index)
    }

    /// Storage position of a key
    #[must_use]
    pub fn position(&self, id: K) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Check if a key is present
    #[inline]
    #[must_use]
    pub fn contains(&self, id: K) -> bool {
        self.position(id).is_some()
    }

    /// Resolve an address to a storage position
    ///
    /// # Errors
    /// Returns [`StoreError::RecordNotFound`] or [`StoreError::IndexOutOfBounds`]
    pub fn resolve(&self, address: Address<K>) -> Result<usize, StoreError> {
        match address {
            Address::Id(id) => self
                .position(id)
                .ok_or_else(|| StoreError::RecordNotFound(id.to_string())),
            Address::Index(index) if index < self.records.len() => Ok(index),
            Address::Index(index) => Err(StoreError::IndexOutOfBounds {
                index,
                len: self.records.len(),
            }),
        }
    }

    /// Append a record under a fresh key
    pub fn insert(&mut self, value: T) -> K {
        let id = K::generate();
        self.insert_with_id(id, value);
        id
    }

    /// Append a record under a caller-chosen key
    ///
    /// An existing record with the same key is replaced in place.
    pub fn insert_with_id(&mut self, id: K, value: T) {
        match self.position(id) {
            Some(index) => {
                self.records.set(index, Record { id, value });
            }
            None => self.records.push_back(Record { id, value }),
        }
    }

    /// Replace the value at an address, keeping its key and position
    ///
    /// # Errors
    /// Returns an error when the address does not resolve
    pub fn update(&mut self, address: Address<K>, value: T) -> Result<K, StoreError> {
        let index = self.resolve(address)?;
        let id = self.records[index].id;
        self.records.set(index, Record { id, value });
        Ok(id)
    }

    /// Remove the record at an address
    ///
    /// # Errors
    /// Returns an error when the address does not resolve
    pub fn remove(&mut self, address: Address<K>) -> Result<Record<K, T>, StoreError> {
        let index = self.resolve(address)?;
        Ok(self.records.remove(index))
    }

    /// Remove every record
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records sorted by a key function, ties kept in storage order
    #[must_use]
    pub fn sorted_by_key<S, F>(&self, mut f: F) -> Vec<&Record<K, T>>
    where
        S: Ord,
        F: FnMut(&T) -> S,
    {
        let mut out: Vec<&Record<K, T>> = self.records.iter().collect();
        out.sort_by_key(|r| f(&r.value));
        out
    }
}

impl<K: RecordKey, T: Clone> FromIterator<T> for Collection<K, T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Self::new();
        for value in iter {
            collection.insert(value);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlv_model::RecordId;
    use proptest::prelude::*;

    type Names = Collection<RecordId, String>;

    fn names(items: &[&str]) -> Names {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn insert_assigns_distinct_ids() {
        let mut c = Names::new();
        let a = c.insert("a".into());
        let b = c.insert("b".into());
        assert_ne!(a, b);
        assert_eq!(c.get(a).map(String::as_str), Some("a"));
        assert_eq!(c.position(b), Some(1));
    }

    #[test]
    fn ids_survive_removal_of_earlier_rows() {
        let mut c = names(&["a", "b", "c"]);
        let c_id = c.at(2).unwrap().id;
        c.remove(Address::Index(0)).unwrap();
        assert_eq!(c.position(c_id), Some(1));
        assert_eq!(c.get(c_id).map(String::as_str), Some("c"));
    }

    #[test]
    fn update_keeps_key_and_position() {
        let mut c = names(&["a", "b"]);
        let id = c.at(1).unwrap().id;
        let updated = c.update(Address::Id(id), "B".into()).unwrap();
        assert_eq!(updated, id);
        assert_eq!(c.at(1).unwrap().value, "B");
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn bad_addresses() {
        let mut c = names(&["a"]);
        assert_eq!(
            c.remove(Address::Index(3)).unwrap_err(),
            StoreError::IndexOutOfBounds { index: 3, len: 1 }
        );
        assert!(matches!(
            c.update(Address::Id(RecordId::new()), "x".into()),
            Err(StoreError::RecordNotFound(_))
        ));
    }

    #[test]
    fn insert_with_existing_id_replaces() {
        let mut c = names(&["a"]);
        let id = c.at(0).unwrap().id;
        c.insert_with_id(id, "z".into());
        assert_eq!(c.len(), 1);
        assert_eq!(c.get(id).map(String::as_str), Some("z"));
    }

    #[test]
    fn sorted_by_key_is_stable() {
        let c: Collection<RecordId, (u8, &str)> =
            [(2, "x"), (1, "a"), (2, "y"), (1, "b")].into_iter().collect();
        let order: Vec<&str> = c.sorted_by_key(|v| v.0).iter().map(|r| r.value.1).collect();
        assert_eq!(order, vec!["a", "b", "x", "y"]);
    }

    #[test]
    fn serializes_as_array() {
        let c = names(&["a"]);
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.is_array());
        let back: Names = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }

    proptest! {
        #[test]
        fn prop_add_then_remove_same_index_restores(
            items in proptest::collection::vec("[a-z]{0,6}", 0..12),
            extra in "[a-z]{1,6}",
        ) {
            let before: Names = items.into_iter().collect();
            let mut after = before.clone();
            after.insert(extra);
            let index = after.len() - 1;
            after.remove(Address::Index(index)).unwrap();
            prop_assert_eq!(after, before);
        }

        #[test]
        fn prop_remove_by_id_removes_exactly_one(
            items in proptest::collection::vec("[a-z]{0,6}", 1..12),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut c: Names = items.into_iter().collect();
            let index = pick.index(c.len());
            let id = c.at(index).unwrap().id;
            let len = c.len();
            c.remove(Address::Id(id)).unwrap();
            prop_assert_eq!(c.len(), len - 1);
            prop_assert!(!c.contains(id));
        }
    }
}
