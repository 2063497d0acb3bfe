//! On-disk copy of the commodity metadata, used when the API is unreachable.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::domain::Metadata;

const METADATA_CACHE_FILENAME: &str = "metadata_cache.json";

/// Commodity lists change rarely; a week-old copy is still useful offline.
pub const METADATA_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataCache {
    /// Unix timestamp (seconds) when this cache was written.
    pub cached_at: u64,
    pub metadata: Metadata,
}

impl MetadataCache {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            cached_at: unix_now(),
            metadata,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age() > METADATA_CACHE_TTL
    }

    pub fn age(&self) -> Duration {
        Duration::from_secs(unix_now().saturating_sub(self.cached_at))
    }

    /// Human-readable age string.
    pub fn age_string(&self) -> String {
        let secs = self.age().as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else if secs < 86400 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}d", secs / 86400)
        }
    }

    pub fn fetched_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.cached_at)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// `<data-local-dir>/mandi-desk`, falling back to the working directory.
pub fn default_cache_dir() -> PathBuf {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mandi-desk")
    })
    .clone()
}

fn cache_path(dir: &Path) -> PathBuf {
    dir.join(METADATA_CACHE_FILENAME)
}

/// Load the metadata cache kept in `dir`, ignoring expired copies.
pub fn load_metadata_cache(dir: &Path) -> Option<MetadataCache> {
    let path = cache_path(dir);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no metadata cache on disk");
        return None;
    }

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("failed to read metadata cache: {e}");
            return None;
        }
    };

    match serde_json::from_str::<MetadataCache>(&content) {
        Ok(cache) if cache.is_expired() => {
            tracing::info!(age = %cache.age_string(), "metadata cache expired");
            None
        }
        Ok(cache) => {
            tracing::debug!(
                commodities = cache.metadata.commodities.len(),
                age = %cache.age_string(),
                "loaded metadata cache"
            );
            Some(cache)
        }
        Err(e) => {
            tracing::warn!("failed to parse metadata cache: {e}");
            None
        }
    }
}

pub fn save_metadata_cache(dir: &Path, cache: &MetadataCache) -> Result<(), std::io::Error> {
    fs::create_dir_all(dir)?;
    let path = cache_path(dir);
    let content = serde_json::to_string(cache)?;
    fs::write(&path, content)?;
    tracing::debug!(
        commodities = cache.metadata.commodities.len(),
        path = %path.display(),
        "saved metadata cache"
    );
    Ok(())
}
