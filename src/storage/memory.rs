//! In-memory item store

use crate::etl::Loader;
use crate::record::{FieldValue, Record};
use crate::transform::DEFAULT_KEY_FIELD;

use eyre::{Result, bail, eyre};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// Store items in memory, keyed by their integer key field
///
/// Behaves like the remote table as far as the loader can tell: `put`
/// inserts or overwrites by key. Writes of chosen keys can be made to fail.
///
/// # Example
/// ```
/// use sequin::storage::MemoryStore;
/// use sequin::etl::Loader;
/// use sequin::record::Record;
///
/// # async fn example() -> eyre::Result<()> {
/// let store = MemoryStore::default().failing_on(2);
///
/// let mut item = Record::new();
/// item.insert("SNO", 1i64);
/// store.put(item).await?;
///
/// assert_eq!(store.ids(), vec![1]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    key_field: String,
    items: Mutex<BTreeMap<i64, Record>>,
    rejected: BTreeSet<i64>,
    writes: Mutex<u64>,
}

impl MemoryStore {
    pub fn new(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            items: Mutex::new(BTreeMap::new()),
            rejected: BTreeSet::new(),
            writes: Mutex::new(0),
        }
    }

    /// Reject any write of the item with this key
    pub fn failing_on(mut self, key: i64) -> Self {
        self.rejected.insert(key);
        self
    }

    /// Keys of all stored items, ascending
    pub fn ids(&self) -> Vec<i64> {
        self.lock_items().keys().copied().collect()
    }

    pub fn get(&self, key: i64) -> Option<Record> {
        self.lock_items().get(&key).cloned()
    }

    /// All stored items, ordered by key
    pub fn items(&self) -> Vec<Record> {
        self.lock_items().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock_items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_items().is_empty()
    }

    /// Number of accepted writes, including overwrites
    pub fn write_count(&self) -> u64 {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_items(&self) -> std::sync::MutexGuard<'_, BTreeMap<i64, Record>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn key_of(&self, item: &Record) -> Result<i64> {
        match item.get(&self.key_field) {
            Some(FieldValue::Integer(key)) => Ok(*key),
            Some(other) => bail!(
                "Key field '{}' must be an integer, got {}",
                self.key_field,
                other.type_name()
            ),
            None => Err(eyre!("Item is missing key field '{}'", self.key_field)),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_FIELD)
    }
}

impl Loader for MemoryStore {
    type Item = Record;

    async fn put(&self, item: Self::Item) -> Result<()> {
        let key = self.key_of(&item)?;
        if self.rejected.contains(&key) {
            bail!("Write of item {} rejected", key);
        }
        self.lock_items().insert(key, item);
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}
