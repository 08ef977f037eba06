use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::SessionStore;

// JSON-file key-value store: the CLI's equivalent of browser local storage.
pub struct FileSessionStore {
    path: PathBuf,
    // Serialises read-modify-write cycles on the file within this process.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, String> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| format!("corrupt session file {}: {err}", self.path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(format!("read {}: {err}", self.path.display())),
        }
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|err| format!("create {}: {err}", parent.display()))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(entries).map_err(|err| err.to_string())?;

        // Write then rename so a crash never leaves a half-written file.
        let tmp = self.path.with_extension("tmp");
        // A leftover tmp file would keep its old permissions.
        let _ = tokio::fs::remove_file(&tmp).await;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Tokens are credentials: owner read/write only.
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&tmp)
            .await
            .map_err(|err| format!("create {}: {err}", tmp.display()))?;
        file.write_all(&bytes)
            .await
            .map_err(|err| format!("write {}: {err}", tmp.display()))?;
        file.sync_all()
            .await
            .map_err(|err| format!("sync {}: {err}", tmp.display()))?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| format!("rename {}: {err}", self.path.display()))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        let entries = self.read_entries().await?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn set_many(&self, pairs: &[(&str, &str)]) -> Result<(), String> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        for (key, value) in pairs {
            entries.insert(key.to_string(), value.to_string());
        }
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<bool, String> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.write_entries(&entries).await?;
        Ok(true)
    }
}

// In-memory store adapter for embedding and tests; nothing survives the process.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    pub entries: Arc<Mutex<HashMap<String, String>>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_many(&self, pairs: &[(&str, &str)]) -> Result<(), String> {
        let mut entries = self.entries.lock().await;
        for (key, value) in pairs {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, String> {
        let mut entries = self.entries.lock().await;
        Ok(entries.remove(key).is_some())
    }
}
