//! Recent playlist-URL history.
//!
//! Keeps the few most recently played playlist URLs so the UI can offer
//! them again. The dedup/cap policy lives here; the actual persistence is
//! an external key-value store behind [`RecentUrlStore`]. Saved on every
//! successful load, read on render; none of the playback invariants
//! depend on it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Maximum number of remembered URLs.
pub const MAX_RECENT_URLS: usize = 3;

/// One remembered playlist URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentUrl {
    /// The playlist URL as the user entered it.
    pub url: String,
    /// Playlist title at the time it was loaded.
    pub title: String,
}

/// Persistence backend for the recent-URL list.
#[cfg_attr(test, mockall::automock)]
pub trait RecentUrlStore {
    /// Read the stored list, most recent first.
    fn load(&self) -> Result<Vec<RecentUrl>>;
    /// Overwrite the stored list.
    fn save(&self, urls: &[RecentUrl]) -> Result<()>;
}

/// Prepend `url`, dropping any older occurrence of it and anything beyond
/// the cap.
#[must_use]
pub fn remember(
    mut history: Vec<RecentUrl>,
    url: impl Into<String>,
    title: impl Into<String>,
) -> Vec<RecentUrl> {
    let url = url.into();
    history.retain(|item| item.url != url);
    history.insert(
        0,
        RecentUrl {
            url,
            title: title.into(),
        },
    );
    history.truncate(MAX_RECENT_URLS);
    history
}

/// Drop `url` from the list.
#[must_use]
pub fn forget(mut history: Vec<RecentUrl>, url: &str) -> Vec<RecentUrl> {
    history.retain(|item| item.url != url);
    history
}

/// Recent-URL list bound to a persistence backend.
pub struct RecentUrlList<S> {
    store: S,
}

impl<S: RecentUrlStore> RecentUrlList<S> {
    /// List over the given backend.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The stored list, most recent first.
    pub fn list(&self) -> Result<Vec<RecentUrl>> {
        self.store.load()
    }

    /// Record a successfully loaded playlist URL.
    pub fn remember(&self, url: &str, title: &str) -> Result<()> {
        let updated = remember(self.store.load()?, url, title);
        debug!(url, len = updated.len(), "recent URL remembered");
        self.store.save(&updated)
    }

    /// Remove a URL from the list.
    pub fn forget(&self, url: &str) -> Result<()> {
        let updated = forget(self.store.load()?, url);
        self.store.save(&updated)
    }
}
