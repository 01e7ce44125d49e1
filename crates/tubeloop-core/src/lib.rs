//! Tubeloop Core Library
//!
//! This crate provides the core functionality for the Tubeloop playlist
//! player:
//! - Playlist loading from the YouTube Data API (paginated, cached)
//! - Skip-error navigation over the loaded playlist
//! - A debounced playback controller driving an abstract playback engine
//! - Consecutive-failure error recovery
//! - Recent-URL history
//!
//! Rendering, the embedded player widget, and persistent storage are
//! external collaborators behind the [`engine::PlaybackEngine`],
//! [`notify::NotificationSink`], and [`history::RecentUrlStore`] traits.

pub mod controller;
pub mod engine;
pub mod entry;
pub mod error;
pub mod history;
pub mod loader;
pub mod navigator;
pub mod notify;
pub mod recovery;
pub mod store;

pub use controller::{Clock, PlaybackController, SystemClock, DEFAULT_SETTLE_DELAY};
pub use engine::{PlaybackEngine, PlayerErrorCode, PlayerEvent};
pub use entry::{Entry, LoadErrorKind};
pub use error::{Error, Result};
pub use history::{RecentUrl, RecentUrlList, RecentUrlStore, MAX_RECENT_URLS};
pub use loader::{
    extract_playlist_id, extract_video_id, is_youtube_url, LoadProgress, PlaylistDataSource,
    PlaylistLoader, PlaylistPage, YouTubeDataApi,
};
pub use navigator::{next_playable, seek_first_playable, Direction, NavigationTrigger};
pub use notify::{LogNotifier, NotificationSink};
pub use recovery::{ErrorRecoveryPolicy, RecoveryAction, DEFAULT_SKIP_THRESHOLD};
pub use store::PlaylistStore;
