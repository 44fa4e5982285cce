//! Session-scoped track-list cache.
//!
//! Loading an album or playlist yields its header and a [`PagedData`] of
//! tracks. The track source is stored here under the container id so that a
//! later "load tracks" call reuses it instead of hitting the catalog again.
//!
//! - `put` replaces any previous entry for the id (reload means a fresh source)
//! - entries live for the whole session; there is no eviction
//! - `get` for a container that was never loaded is a caller error

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::Track;
use crate::paged::PagedData;

/// Mapping from container id to its track source.
#[derive(Debug, Default)]
pub struct TrackCache {
    entries: RwLock<HashMap<String, PagedData<Track>>>,
}

impl TrackCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the track source of a container, replacing any previous one.
    ///
    /// Sources handed out earlier by [`get`](Self::get) stay usable.
    pub async fn put(&self, container_id: impl Into<String>, tracks: PagedData<Track>) {
        let container_id = container_id.into();
        let mut entries = self.entries.write().await;
        if entries.insert(container_id.clone(), tracks).is_some() {
            debug!("Replaced track source for {}", container_id);
        } else {
            debug!("Cached track source for {}", container_id);
        }
    }

    /// Get the track source of a loaded container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TrackListNotLoaded`] if the container was never loaded.
    pub async fn get(&self, container_id: &str) -> Result<PagedData<Track>> {
        self.entries
            .read()
            .await
            .get(container_id)
            .cloned()
            .ok_or_else(|| Error::TrackListNotLoaded(container_id.to_string()))
    }

    /// Whether a container has a cached track source.
    pub async fn contains(&self, container_id: &str) -> bool {
        self.entries.read().await.contains_key(container_id)
    }

    /// Number of cached containers.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
