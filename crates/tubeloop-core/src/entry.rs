//! Playlist entry data model.
//!
//! An [`Entry`] is one item of a loaded playlist. Entries are created in
//! bulk when a playlist finishes loading and are never removed
//! individually; only their error flags mutate afterwards.

use serde::{Deserialize, Serialize};

/// Why an entry was unplayable at load time.
///
/// Assigned once while translating the Data API response and permanent for
/// the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadErrorKind {
    /// The video is private.
    Private,
    /// The video was deleted.
    Deleted,
    /// The item could not be resolved to a video at all.
    Failed,
}

impl std::fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Private => write!(f, "private"),
            Self::Deleted => write!(f, "deleted"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One playlist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// 1-based position in the current playback order.
    ///
    /// Unique and contiguous over the playlist; renumbered whenever the
    /// ordering changes (initial load, shuffle).
    pub sequence_number: usize,
    /// Opaque playable identifier understood by the playback engine.
    pub video_id: String,
    /// Video title (or a placeholder for unresolvable items).
    pub title: String,
    /// Channel name; empty for error entries.
    pub channel: String,
    /// Thumbnail URL; may be empty.
    pub thumbnail_url: String,
    /// Unplayable at load time (private/deleted/failed to resolve).
    #[serde(default)]
    pub load_error: Option<LoadErrorKind>,
    /// Became unplayable during playback; set only by the error-recovery
    /// policy after the engine reports a failure.
    #[serde(default)]
    pub runtime_error: bool,
}

impl Entry {
    /// Create a playable entry.
    pub fn new(
        sequence_number: usize,
        video_id: impl Into<String>,
        title: impl Into<String>,
        channel: impl Into<String>,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        Self {
            sequence_number,
            video_id: video_id.into(),
            title: title.into(),
            channel: channel.into(),
            thumbnail_url: thumbnail_url.into(),
            load_error: None,
            runtime_error: false,
        }
    }

    /// Create an entry that is already known to be unplayable.
    pub fn with_load_error(
        sequence_number: usize,
        video_id: impl Into<String>,
        title: impl Into<String>,
        kind: LoadErrorKind,
    ) -> Self {
        Self {
            sequence_number,
            video_id: video_id.into(),
            title: title.into(),
            channel: String::new(),
            thumbnail_url: String::new(),
            load_error: Some(kind),
            runtime_error: false,
        }
    }

    /// Whether the entry was unplayable at load time.
    #[must_use]
    pub const fn is_load_error(&self) -> bool {
        self.load_error.is_some()
    }

    /// Whether the entry can be handed to the playback engine.
    #[must_use]
    pub const fn is_playable(&self) -> bool {
        self.load_error.is_none() && !self.runtime_error
    }

    /// Full watch URL for this entry.
    #[must_use]
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}
