//! Typed view over one JSON array key and its ID counter.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{KeyValueStore, StoreError};

/// The pair of keys backing one entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableKeys {
    /// Key holding the JSON array of records.
    pub items: &'static str,
    /// Key holding the last assigned ID as a decimal string.
    pub counter: &'static str,
}

impl TableKeys {
    /// Describe a table.
    #[must_use]
    pub const fn new(items: &'static str, counter: &'static str) -> Self {
        Self { items, counter }
    }
}

/// Repository for one entity table.
///
/// Decoding happens here, at the storage edge: a record that does not match
/// `T` is reported as [`StoreError::Corrupted`] and never silently dropped.
pub struct Table<'a, T> {
    store: &'a dyn KeyValueStore,
    keys: TableKeys,
    _record: PhantomData<fn() -> T>,
}

impl<'a, T> Table<'a, T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a table view over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore, keys: TableKeys) -> Self {
        Self {
            store,
            keys,
            _record: PhantomData,
        }
    }

    /// Whether the array key has ever been written.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the backend cannot be read.
    pub fn exists(&self) -> Result<bool, StoreError> {
        Ok(self.store.get(self.keys.items)?.is_some())
    }

    /// Load every record. A missing key loads as an empty table.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupted` if the stored JSON does not decode.
    pub fn load(&self) -> Result<Vec<T>, StoreError> {
        match self.store.get(self.keys.items)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupted {
                key: self.keys.items.to_owned(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored array with `records`.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if encoding or the backend write fails.
    pub fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(records).map_err(|source| StoreError::Encode {
            key: self.keys.items.to_owned(),
            source,
        })?;
        self.store.set(self.keys.items, &encoded)
    }

    /// Current counter value; an absent counter reads as 0.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidCounter` if the counter is not a
    /// non-negative integer.
    pub fn counter(&self) -> Result<i32, StoreError> {
        let Some(raw) = self.store.get(self.keys.counter)? else {
            return Ok(0);
        };
        raw.trim()
            .parse::<i32>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| StoreError::InvalidCounter {
                key: self.keys.counter.to_owned(),
                value: raw.clone(),
            })
    }

    /// Overwrite the counter.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the backend write fails.
    pub fn set_counter(&self, value: i32) -> Result<(), StoreError> {
        self.store.set(self.keys.counter, &value.to_string())
    }

    /// Advance the counter and return the new value as the next ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidCounter` on a malformed or exhausted
    /// counter, or a backend error if the write fails.
    pub fn next_id(&self) -> Result<i32, StoreError> {
        let current = self.counter()?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::InvalidCounter {
                key: self.keys.counter.to_owned(),
                value: current.to_string(),
            })?;
        self.set_counter(next)?;
        Ok(next)
    }
}
