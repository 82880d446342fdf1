//! JSON-document saved-city storage.
//!
//! For hosts without SQLite: the whole list lives in one small JSON file,
//! rewritten on every change via a temp file and rename.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::favorites_backend::{
    validate_city_name, FavoritesBackend, FavoritesBackendError, FavoritesBackendResult, SavedCity,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    /// Next id to hand out; ids are never reused
    next_id: i64,
    cities: Vec<SavedCity>,
}

/// JSON-file saved-city storage.
pub struct JsonFavoritesStore {
    path: PathBuf,
}

impl JsonFavoritesStore {
    /// Use the document at `path`. A missing file reads as an empty list.
    pub fn new<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let store = Self { path };
        // Surface a corrupt document at startup rather than on first refresh
        store.load().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> FavoritesBackendResult<Document> {
        if !self.path.exists() {
            return Ok(Document {
                next_id: 1,
                cities: Vec::new(),
            });
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| FavoritesBackendError::storage(format!("read {}: {}", self.path.display(), e)))?;
        if contents.trim().is_empty() {
            return Ok(Document {
                next_id: 1,
                cities: Vec::new(),
            });
        }

        let mut doc: Document = serde_json::from_str(&contents)
            .map_err(|e| FavoritesBackendError::storage(format!("parse {}: {}", self.path.display(), e)))?;

        // Guard against hand-edited files with a stale counter
        let max_id = doc.cities.iter().map(|c| c.id).max().unwrap_or(0);
        doc.next_id = doc.next_id.max(max_id + 1);
        Ok(doc)
    }

    fn save(&self, doc: &Document) -> FavoritesBackendResult<()> {
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| FavoritesBackendError::storage(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| FavoritesBackendError::storage(format!("write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            FavoritesBackendError::storage(format!("rename to {}: {}", self.path.display(), e))
        })?;
        Ok(())
    }
}

impl FavoritesBackend for JsonFavoritesStore {
    fn list(&self) -> FavoritesBackendResult<Vec<SavedCity>> {
        Ok(self.load()?.cities)
    }

    fn count(&self) -> FavoritesBackendResult<usize> {
        Ok(self.load()?.cities.len())
    }

    fn insert(&self, city_name: &str, capacity: usize) -> FavoritesBackendResult<SavedCity> {
        validate_city_name(city_name)?;

        let mut doc = self.load()?;
        if doc.cities.len() >= capacity {
            return Err(FavoritesBackendError::CapacityReached(capacity));
        }
        if doc.cities.iter().any(|c| c.city_name == city_name) {
            return Err(FavoritesBackendError::Duplicate(city_name.to_string()));
        }

        let city = SavedCity {
            id: doc.next_id,
            city_name: city_name.to_string(),
        };
        doc.next_id += 1;
        doc.cities.push(city.clone());
        self.save(&doc)?;
        Ok(city)
    }

    fn delete(&self, id: i64) -> FavoritesBackendResult<()> {
        let mut doc = self.load()?;
        let before = doc.cities.len();
        doc.cities.retain(|c| c.id != id);
        if doc.cities.len() == before {
            tracing::debug!(id, "Delete matched no saved city");
            return Ok(());
        }
        self.save(&doc)
    }
}
