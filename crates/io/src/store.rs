// Flat JSON document store with TTL freshness

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Documents at or below this size are treated as empty (`{}`, `[]`).
const EMPTY_DOCUMENT_BYTES: u64 = 2;

/// Storage directory holding every intermediate and final document.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

/// Freshness of one document, as shown by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryStatus {
    pub name: String,
    pub exists: bool,
    pub size: u64,
    /// Last modification time, RFC 3339.
    pub modified: Option<String>,
    pub age_secs: Option<u64>,
    pub fresh: bool,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Parse a document; a missing file is [`StoreError::Missing`].
    pub fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, StoreError> {
        let path = self.path(name);
        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::Missing(path));
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        let value = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StoreError::json(&path, e))?;
        log::debug!("read {}", path.display());
        Ok(value)
    }

    /// Like [`read_json`](Self::read_json) but a missing file is `None`.
    pub fn read_optional<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        match self.read_json(name) {
            Ok(v) => Ok(Some(v)),
            Err(StoreError::Missing(path)) => {
                log::debug!("{} absent", path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Pretty-print `value` to `name`, creating the storage directory if needed.
    pub fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf, StoreError> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let file = fs::File::create(&path).map_err(|e| StoreError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value).map_err(|e| StoreError::json(&path, e))?;
        writer.flush().map_err(|e| StoreError::io(&path, e))?;
        log::debug!("wrote {}", path.display());
        Ok(path)
    }

    /// Modified less than `ttl` ago and not an empty document.
    pub fn is_fresh(&self, name: &str, ttl: Duration) -> bool {
        let status = self.entry_status(name, ttl);
        log::debug!(
            "cache {} for {name}",
            if status.fresh { "hit" } else { "miss" }
        );
        status.fresh
    }

    pub fn entry_status(&self, name: &str, ttl: Duration) -> EntryStatus {
        let Ok(meta) = fs::metadata(self.path(name)) else {
            return EntryStatus {
                name: name.to_string(),
                exists: false,
                size: 0,
                modified: None,
                age_secs: None,
                fresh: false,
            };
        };

        let modified = meta.modified().ok();
        let age = modified.map(|m| {
            SystemTime::now()
                .duration_since(m)
                .unwrap_or(Duration::ZERO)
        });
        let size = meta.len();

        EntryStatus {
            name: name.to_string(),
            exists: true,
            size,
            modified: modified.map(|m| DateTime::<Utc>::from(m).to_rfc3339()),
            age_secs: age.map(|a| a.as_secs()),
            fresh: age.is_some_and(|a| a < ttl) && size > EMPTY_DOCUMENT_BYTES,
        }
    }

    pub fn statuses(&self, names: &[&str], ttl: Duration) -> Vec<EntryStatus> {
        names.iter().map(|n| self.entry_status(n, ttl)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    const TTL: Duration = Duration::from_secs(7200);

    #[test]
    fn write_then_read() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        store.write_json("doc.json", &json!([{"name": "Flame"}])).unwrap();

        let doc: Value = store.read_json("doc.json").unwrap();
        assert_eq!(doc[0]["name"], "Flame");
        assert!(store.exists("doc.json"));
    }

    #[test]
    fn missing_document() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.read_json::<Value>("nope.json"),
            Err(StoreError::Missing(_))
        ));
        assert!(store.read_optional::<Value>("nope.json").unwrap().is_none());
    }

    #[test]
    fn malformed_document() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let store = FileStore::new(dir.path());
        let err = store.read_optional::<Value>("bad.json").unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn empty_object_is_never_fresh() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.write_json("empty.json", &json!({})).unwrap();
        store.write_json("full.json", &json!({"normal": ["Flame"]})).unwrap();

        assert!(!store.is_fresh("empty.json", TTL));
        assert!(store.is_fresh("full.json", TTL));
        assert!(!store.is_fresh("full.json", Duration::ZERO));
        assert!(!store.is_fresh("absent.json", TTL));
    }

    #[test]
    fn status_reports_timestamp() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.write_json("info.json", &json!([1, 2, 3])).unwrap();

        let statuses = store.statuses(&["info.json", "stock.json"], TTL);
        assert!(statuses[0].exists);
        assert!(statuses[0].fresh);
        assert!(statuses[0].size > 2);
        let modified = statuses[0].modified.as_deref().unwrap();
        assert!(DateTime::parse_from_rfc3339(modified).is_ok());

        assert!(!statuses[1].exists);
        assert_eq!(statuses[1].modified, None);
    }
}
