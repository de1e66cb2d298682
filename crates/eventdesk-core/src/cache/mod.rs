//! Local caching module for reference data.
//!
//! Qualification categories and translation dictionaries change rarely, so
//! they are cached as JSON files with a timestamp and refreshed once stale.
//! Cache files are stored in `~/.cache/eventdesk/`.

pub mod manager;

pub use manager::{CacheManager, CachedData};
