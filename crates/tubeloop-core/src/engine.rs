//! Abstraction over the embedded video player.
//!
//! The core never talks to a real player widget; it issues commands
//! through [`PlaybackEngine`] and consumes the engine's event stream as
//! [`PlayerEvent`] values fed into the playback controller.

use serde::{Deserialize, Serialize};

/// Commands the core issues to the embedded player.
#[cfg_attr(test, mockall::automock)]
pub trait PlaybackEngine {
    /// Load (and start playing) the video with the given identifier.
    fn load(&mut self, video_id: &str) -> crate::error::Result<()>;
    /// Resume playback of the loaded video.
    fn play(&mut self) -> crate::error::Result<()>;
    /// Pause playback.
    fn pause(&mut self) -> crate::error::Result<()>;
    /// Mute the player.
    fn mute(&mut self) -> crate::error::Result<()>;
    /// Unmute the player.
    fn unmute(&mut self) -> crate::error::Result<()>;
}

/// Playback failure codes reported by the engine.
///
/// The numeric codes follow the YouTube IFrame player API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerErrorCode {
    /// Code 2: the request contained an invalid video id.
    InvalidParameter,
    /// Code 5: the HTML5 player failed.
    Html5PlayerError,
    /// Code 100: the requested video was not found.
    VideoNotFound,
    /// Codes 101/150: the owner does not allow embedded playback.
    EmbedNotAllowed,
    /// Any other code, carried through verbatim.
    Other(u32),
}

impl PlayerErrorCode {
    /// Map a raw engine error code.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            2 => Self::InvalidParameter,
            5 => Self::Html5PlayerError,
            100 => Self::VideoNotFound,
            101 | 150 => Self::EmbedNotAllowed,
            other => Self::Other(other),
        }
    }

    /// User-facing description of the failure.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidParameter => "Invalid video id.",
            Self::Html5PlayerError => "An HTML5 player error occurred.",
            Self::VideoNotFound => "The requested video was not found.",
            Self::EmbedNotAllowed => {
                "The video owner does not allow playback in an embedded player."
            }
            Self::Other(_) => "An error occurred during video playback.",
        }
    }
}

/// Events the engine emits back into the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// The current video played to its natural end.
    Ended,
    /// The engine refused or aborted playback of the current video.
    Error(PlayerErrorCode),
    /// Playback (re)started successfully.
    Playing,
}
