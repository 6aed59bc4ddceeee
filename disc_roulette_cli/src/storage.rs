use std::fs;
use std::path::{Path, PathBuf};

use disc_roulette_core::{Storage, StorageError};

/// One `<key>.json` file per key inside a data directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError(format!("{}: {err}", path.display()))),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // readers only ever see a complete blob
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use disc_roulette_core::{RouletteError, SelectableItemStore};
    use disc_roulette_shared::STORAGE_KEY;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));
        assert_eq!(storage.read(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn store_round_trips_through_files() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = SelectableItemStore::open(FileStorage::new(dir.path())).unwrap();
            store.add("Juggler").unwrap();
            store.add("Pulsar").unwrap();
            store.set_selected(1, true).unwrap();
        }
        let store = SelectableItemStore::open(FileStorage::new(dir.path())).unwrap();
        let list: Vec<(&str, bool)> = store
            .list()
            .iter()
            .map(|i| (i.name.as_str(), i.selected))
            .collect();
        assert_eq!(list, vec![("Juggler", false), ("Pulsar", true)]);
        assert!(dir.path().join("disc_roulette_machines.json").exists());
    }

    #[test]
    fn corrupt_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("disc_roulette_machines.json"), "not json").unwrap();
        assert!(matches!(
            SelectableItemStore::open(FileStorage::new(dir.path())),
            Err(RouletteError::PersistenceRead { .. })
        ));
    }
}
