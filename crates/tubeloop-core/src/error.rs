//! Error types for Tubeloop core operations.

use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Tubeloop core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A full cyclic scan found zero playable entries.
    #[error("No playable entry in the playlist")]
    NoPlayableEntry,

    /// Direct index access outside the playlist bounds.
    #[error("Index {index} out of range for playlist of {len} entries")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// Number of entries in the playlist.
        len: usize,
    },

    /// The URL does not contain a YouTube playlist identifier.
    #[error("Invalid YouTube playlist URL: {0}")]
    InvalidPlaylistUrl(String),

    /// No Data API key was configured.
    #[error("YouTube Data API key is not set")]
    ApiKeyMissing,

    /// The Data API answered with a non-success status.
    #[error("YouTube Data API request failed with status {status}: {message}")]
    ApiRequest {
        /// HTTP status code.
        status: u16,
        /// User-facing description of the failure.
        message: String,
    },

    /// A playlist fetch was requested while another one is outstanding.
    #[error("A playlist fetch is already in progress")]
    FetchInProgress,

    /// The playback engine rejected a command.
    #[error("Playback engine error: {0}")]
    Engine(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
