use log::{ debug, error };
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{ Path, PathBuf };

use super::{ Storage, StorageError };

/// Storage backed by a single JSON object file mapping keys to string values.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Items for a rewrite. An unreadable file is replaced rather than blocking every write.
    fn items_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_items() {
            Ok(items) => Ok(items),
            Err(StorageError::Json(e)) => {
                error!("Discarding unreadable storage file {}: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }

    fn write_items(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(items)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Wrote {} storage item(s) to {}", items.len(), self.path.display());
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items_for_write()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items_for_write()?;
        if items.remove(key).is_some() {
            self.write_items(&items)?;
        }
        Ok(())
    }
}
