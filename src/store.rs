use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json;
use tokio::fs;

use crate::error::{BotError, Result};

/// Store key under which the tracked group list lives, as a single
/// comma-joined string.
pub const GROUPS_KEY: &str = "groups";

/// Key/value persistence for the bot's registry. String keys, string
/// values, last write wins.
#[async_trait]
pub trait GroupStore {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> Result<()>;
}

/// Registry persisted as a single JSON object on disk. A missing file is
/// an empty store; the parent directory is created on first write.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    async fn load(&self) -> Result<HashMap<String, String>> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                BotError::Store(format!("corrupt store file {:?}: {}", self.path, e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(BotError::Store(format!(
                "could not read store file {:?}: {}",
                self.path, e
            ))),
        }
    }

    async fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if parent != Path::new("") {
                fs::create_dir_all(parent).await.map_err(|e| {
                    BotError::Store(format!("could not create {:?}: {}", parent, e))
                })?;
            }
        }
        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| BotError::Store(format!("could not encode store: {}", e)))?;
        fs::write(&self.path, contents).await.map_err(|e| {
            BotError::Store(format!("could not write store file {:?}: {}", self.path, e))
        })
    }
}

#[async_trait]
impl GroupStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.load().await?;
        Ok(entries.remove(key))
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }
}
