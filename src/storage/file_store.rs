use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::traits::KeyValueStore;

/// A key-value store that keeps each value in its own file, inside a backing folder
#[derive(Debug, Clone, PartialEq)]
pub struct FileStore {
    backing_folder: PathBuf,
}

impl FileStore {
    /// Use (and create if needed) `folder` as the backing folder
    pub fn new(folder: &Path) -> Result<Self> {
        if let Err(err) = std::fs::create_dir_all(folder) {
            return Err(Error::StorageUnavailable(format!("Unable to create folder {:?}: {}", folder, err)));
        }
        Ok(Self {
            backing_folder: PathBuf::from(folder),
        })
    }

    pub fn folder(&self) -> &Path {
        &self.backing_folder
    }

    /// The file a key is stored in
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name = sanitize_filename::sanitize(format!("{}.json", key));
        self.backing_folder.join(file_name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::StorageUnavailable(format!("Unable to read file {:?}: {}", path, err))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        // Write next to the target then rename, so that a crash never leaves half a value behind
        let temp_path = path.with_extension("json.tmp");

        if let Err(err) = std::fs::write(&temp_path, value) {
            return Err(Error::StorageUnavailable(format!("Unable to save file {:?}: {}", temp_path, err)));
        }
        if let Err(err) = std::fs::rename(&temp_path, &path) {
            return Err(Error::StorageUnavailable(format!("Unable to replace file {:?}: {}", path, err)));
        }
        Ok(())
    }
}
