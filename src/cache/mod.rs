use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::content::model::Entity;

type BoxResult<T> = Result<T, Box<dyn Error>>;

/// One cached parse result
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Source mtime at the time of caching
    mtime: SystemTime,
    entity: Entity,
}

/// Per-entity-type cache of parsed entities, keyed by source path and
/// validated against file modification times.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EntityCache {
    entries: HashMap<PathBuf, CacheEntry>,

    #[serde(skip)]
    cache_path: PathBuf,
}

impl EntityCache {
    /// Load the cache for one entity type, starting empty when the file is
    /// missing or unreadable.
    pub fn load(cache_dir: &Path, entity_type: &str) -> Self {
        let cache_path = cache_dir.join(format!("{}.json", entity_type.to_lowercase()));

        let mut cache = if cache_path.exists() {
            match fs::read_to_string(&cache_path) {
                Ok(content) => match serde_json::from_str::<EntityCache>(&content) {
                    Ok(cache) => cache,
                    Err(e) => {
                        warn!("Failed to parse cache file {}: {}", cache_path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    warn!("Failed to read cache file {}: {}", cache_path.display(), e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        cache.cache_path = cache_path;
        cache
    }

    /// Cached entity for a source path, if the file is unchanged.
    pub fn get(&self, path: &Path) -> Option<Entity> {
        let entry = self.entries.get(path)?;
        let mtime = fs::metadata(path).ok()?.modified().ok()?;
        if mtime > entry.mtime {
            debug!("Cache entry stale for {}", path.display());
            return None;
        }
        Some(entry.entity.clone())
    }

    /// Store a parsed entity under its source path.
    pub fn put(&mut self, path: &Path, entity: Entity) {
        let Ok(mtime) = fs::metadata(path).and_then(|m| m.modified()) else {
            return;
        };
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry { mtime, entity },
        );
    }

    /// Drop entries for source paths outside the current build, so
    /// deleted files don't accumulate in the cache file.
    pub fn prune(&mut self, keep: &[PathBuf]) {
        let keep: HashSet<&PathBuf> = keep.iter().collect();
        let before = self.entries.len();
        self.entries.retain(|path, _| keep.contains(path));

        let dropped = before - self.entries.len();
        if dropped > 0 {
            debug!("Pruned {} stale cache entries", dropped);
        }
    }

    /// Write the cache to disk.
    pub fn save(&self) -> BoxResult<()> {
        if let Some(parent) = self.cache_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(self)?;
        fs::write(&self.cache_path, json)?;
        Ok(())
    }
}
