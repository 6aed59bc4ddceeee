//! The persisted machine list.
//!
//! [`SelectableItemStore`] owns its [`Storage`] handle and rewrites the whole
//! list under [`STORAGE_KEY`] after every mutation. Items are addressed by
//! position, so removing one shifts every later position down by one.

use std::collections::HashMap;

use disc_roulette_shared::{
    decode_items, encode_items, RouletteError, RouletteResult, StoredItem, STORAGE_KEY,
};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StorageError(pub String);

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError(err.to_string())
    }
}

/// String key-value persistence, e.g. browser `localStorage` or a directory.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.into(), value.into());
        storage
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableItem {
    pub name: String,
    pub selected: bool,
}

impl From<StoredItem> for SelectableItem {
    fn from(item: StoredItem) -> Self {
        Self {
            name: item.name,
            selected: item.checked,
        }
    }
}

impl From<&SelectableItem> for StoredItem {
    fn from(item: &SelectableItem) -> Self {
        Self {
            name: item.name.clone(),
            checked: item.selected,
        }
    }
}

pub struct SelectableItemStore<S> {
    storage: S,
    items: Vec<SelectableItem>,
}

impl<S: Storage> SelectableItemStore<S> {
    /// Loads the list; a missing key is an empty list, a corrupt blob is an error.
    ///
    /// Stored names must be non-blank and already trimmed, as `add` writes them.
    pub fn open(storage: S) -> RouletteResult<Self> {
        let blob = storage
            .read(STORAGE_KEY)
            .map_err(|e| read_error(e.to_string()))?;
        let items: Vec<SelectableItem> = match blob {
            Some(blob) => decode_items(&blob)
                .map_err(|e| read_error(e.to_string()))?
                .into_iter()
                .map(SelectableItem::from)
                .collect(),
            None => Vec::new(),
        };
        if let Some(position) = items
            .iter()
            .position(|item| item.name.trim().is_empty() || item.name.trim() != item.name)
        {
            return Err(read_error(format!(
                "entry {position} has a blank or untrimmed name {:?}",
                items[position].name
            )));
        }
        debug!(count = items.len(), "machine list loaded");
        Ok(Self { storage, items })
    }

    pub fn list(&self) -> &[SelectableItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items with `selected == true`, in list order.
    pub fn selected_subset(&self) -> Vec<&SelectableItem> {
        self.items.iter().filter(|item| item.selected).collect()
    }

    pub fn add(&mut self, name: &str) -> RouletteResult<()> {
        let name = name.trim();
        if name.is_empty() {
            warn!("rejected blank machine name");
            return Err(RouletteError::InvalidArgument(
                "machine name must not be blank".into(),
            ));
        }
        let mut next = self.items.clone();
        next.push(SelectableItem {
            name: name.to_string(),
            selected: false,
        });
        self.commit(next)?;
        debug!(name, "machine added");
        Ok(())
    }

    pub fn remove(&mut self, position: usize) -> RouletteResult<SelectableItem> {
        self.check_position(position)?;
        let mut next = self.items.clone();
        let removed = next.remove(position);
        self.commit(next)?;
        debug!(position, name = %removed.name, "machine removed");
        Ok(removed)
    }

    pub fn set_selected(&mut self, position: usize, value: bool) -> RouletteResult<()> {
        self.check_position(position)?;
        let mut next = self.items.clone();
        next[position].selected = value;
        self.commit(next)
    }

    /// Gives the backing storage back, e.g. to reopen it as a new session.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn check_position(&self, position: usize) -> RouletteResult<()> {
        if position >= self.items.len() {
            return Err(RouletteError::OutOfRange {
                index: position,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    // persist first so a failed write leaves the list as it was
    fn commit(&mut self, next: Vec<SelectableItem>) -> RouletteResult<()> {
        let stored: Vec<StoredItem> = next.iter().map(StoredItem::from).collect();
        let blob = encode_items(&stored).map_err(|e| write_error(e.to_string()))?;
        self.storage
            .write(STORAGE_KEY, &blob)
            .map_err(|e| write_error(e.to_string()))?;
        self.items = next;
        Ok(())
    }
}

fn read_error(reason: String) -> RouletteError {
    RouletteError::PersistenceRead {
        key: STORAGE_KEY.to_string(),
        reason,
    }
}

fn write_error(reason: String) -> RouletteError {
    RouletteError::PersistenceWrite {
        key: STORAGE_KEY.to_string(),
        reason,
    }
}
