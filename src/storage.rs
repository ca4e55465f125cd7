use anyhow::{Context, Result};
use log::debug;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "~/.config/progtrack";

/// Durable string key-value storage the store mirrors its list into.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        FileStorage { dir: dir.into() }
    }

    /// Expands `~` and environment variables in `dir`.
    pub fn from_config_path(dir: &str) -> Result<Self> {
        let path = shellexpand::full(dir)
            .with_context(|| format!("Data directory path {} is invalid", dir))?;
        Ok(FileStorage::new(Path::new(path.as_ref())))
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

fn read_if_found(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(&path) {
        Ok(c) => Ok(Some(c)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        debug!("Reading {:?}", path);
        read_if_found(&path).with_context(|| format!("Error reading {:?}", path))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Error ensuring path {:?} exists", parent))?;
        }
        debug!("Writing {} bytes to {:?}", value.len(), path);
        std::fs::write(&path, value).with_context(|| format!("Error writing {:?}", path))
    }
}

/// In-process storage, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn with(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_owned(), value.to_owned());
        MemoryStorage { entries }
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
