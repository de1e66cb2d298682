use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::i18n::TranslationCatalog;
use crate::models::QualificationCategory;

/// Consider cache stale after 1 hour.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", (minutes + 30) / 60)
        } else {
            format!("{}d ago", (minutes + 720) / 1440)
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        debug!(name, age = %cached.age_display(), "Loaded cache entry");
        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(self.cache_path(name), contents)
            .with_context(|| format!("Failed to write cache file: {}", name))?;
        Ok(())
    }

    // ===== Qualification categories =====

    pub fn load_qualification_categories(
        &self,
    ) -> Result<Option<CachedData<Vec<QualificationCategory>>>> {
        self.load("qualification_categories")
    }

    pub fn save_qualification_categories(
        &self,
        categories: &[QualificationCategory],
    ) -> Result<()> {
        self.save("qualification_categories", &categories)
    }

    // ===== Translations =====

    pub fn load_translations(&self) -> Result<Option<CachedData<TranslationCatalog>>> {
        self.load("translations")
    }

    pub fn save_translations(&self, catalog: &TranslationCatalog) -> Result<()> {
        self.save("translations", catalog)
    }

    /// Remove every cache file
    pub fn clear(&self) -> Result<()> {
        for name in ["qualification_categories", "translations"] {
            let path = self.cache_path(name);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove cache file: {}", name))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_age_display() {
        let mut cached = CachedData::new(());
        assert_eq!(cached.age_display(), "just now");
        assert!(!cached.is_stale());

        cached.cached_at = Utc::now() - Duration::minutes(45);
        assert_eq!(cached.age_display(), "45m ago");

        cached.cached_at = Utc::now() - Duration::minutes(95);
        assert_eq!(cached.age_display(), "2h ago");
        assert!(cached.is_stale());

        cached.cached_at = Utc::now() - Duration::hours(30);
        assert_eq!(cached.age_display(), "1d ago");
    }

    #[test]
    fn test_round_trip_categories() {
        let dir = std::env::temp_dir().join(format!("eventdesk-cache-{}", std::process::id()));
        let cache = CacheManager::new(dir.clone()).unwrap();
        assert!(cache.load_qualification_categories().unwrap().is_none());

        let categories = vec![QualificationCategory {
            id: 1,
            slug: "organizer".to_string(),
            name: "Organizátor".to_string(),
            parents: vec![],
        }];
        cache.save_qualification_categories(&categories).unwrap();

        let loaded = cache.load_qualification_categories().unwrap().unwrap();
        assert_eq!(loaded.data, categories);
        assert!(!loaded.is_stale());

        cache.clear().unwrap();
        assert!(cache.load_qualification_categories().unwrap().is_none());
        std::fs::remove_dir_all(&dir).ok();
    }
}
