//! Playlist loading from the YouTube Data API.
//!
//! [`PlaylistLoader`] follows the `playlistItems` pagination to
//! exhaustion before handing entries to the store, translating the API's
//! sentinel titles (`Private video`, `Deleted video`) and missing video
//! ids into load-error flags. Results are cached in memory per playlist
//! id to keep API usage down; the cache lives for the session only.
//!
//! The HTTP side is behind the [`PlaylistDataSource`] trait so the
//! pagination and translation logic can be tested without a network.

use std::collections::HashMap;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::entry::{Entry, LoadErrorKind};
use crate::error::{Error, Result};

/// Items requested per `playlistItems` page (the API maximum).
pub const PAGE_SIZE: usize = 50;

/// Base URL of the YouTube Data API v3.
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Title used when the playlist title cannot be fetched.
pub const DEFAULT_PLAYLIST_TITLE: &str = "YouTube playlist";

/// Extract the playlist id (the `list=` parameter) from a YouTube URL.
///
/// # Errors
///
/// [`Error::InvalidPlaylistUrl`] when no playlist id is present.
pub fn extract_playlist_id(url: &str) -> Result<String> {
    Regex::new(r"list=([A-Za-z0-9_-]+)")
        .ok()
        .and_then(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::InvalidPlaylistUrl(url.to_string()))
}

/// Extract the 11-character video id from a YouTube watch URL.
#[must_use]
pub fn extract_video_id(url: &str) -> Option<String> {
    Regex::new(r"(?:youtube\.com/.*[?&]v=|youtu\.be/)([A-Za-z0-9_-]{11})")
        .ok()
        .and_then(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether the URL points at YouTube at all.
#[must_use]
pub fn is_youtube_url(url: &str) -> bool {
    Regex::new(r"^https?://(www\.)?(youtube\.com|youtu\.be)/")
        .ok()
        .is_some_and(|re| re.is_match(url))
}

/// One page of playlist items, already translated into entries.
#[derive(Debug, Clone)]
pub struct PlaylistPage {
    /// Entries of this page, numbered within the page.
    pub entries: Vec<Entry>,
    /// Token of the next page, if any.
    pub next_page_token: Option<String>,
}

/// Fetch progress reported while following pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    /// Entries loaded so far.
    pub loaded: usize,
    /// Estimated final count; exact once the last page arrived.
    pub estimated_total: usize,
    /// 1-based page number.
    pub page: usize,
}

/// Paginated playlist data source.
#[cfg_attr(test, mockall::automock)]
pub trait PlaylistDataSource {
    /// Fetch one page of playlist items.
    fn fetch_page(&self, playlist_id: &str, page_token: Option<String>) -> Result<PlaylistPage>;

    /// Fetch the playlist title.
    fn fetch_title(&self, playlist_id: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Data API response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PlaylistItemsResponse {
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(rename = "resourceId")]
    resource_id: Option<ResourceId>,
    #[serde(default)]
    title: String,
    thumbnails: Option<Thumbnails>,
    #[serde(rename = "videoOwnerChannelTitle")]
    video_owner_channel_title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResourceId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistListResponse {
    #[serde(default)]
    items: Vec<PlaylistListItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistListItem {
    snippet: Option<TitleSnippet>,
}

#[derive(Debug, Deserialize)]
struct TitleSnippet {
    #[serde(default)]
    title: String,
}

/// Translate one API item into an entry.
///
/// The API keeps unplayable items in the listing; it marks them with
/// sentinel titles (`Private video`, `Deleted video`) or, for items that
/// no longer resolve to a video, with a missing video id.
fn entry_from_item(item: PlaylistItem, sequence_number: usize) -> Entry {
    let Some(snippet) = item.snippet else {
        return Entry::with_load_error(
            sequence_number,
            "",
            "Failed to load video",
            LoadErrorKind::Failed,
        );
    };
    let Some(video_id) = snippet.resource_id.and_then(|r| r.video_id) else {
        return Entry::with_load_error(
            sequence_number,
            "",
            "Failed to load video",
            LoadErrorKind::Failed,
        );
    };
    match snippet.title.as_str() {
        "Private video" => Entry::with_load_error(
            sequence_number,
            video_id,
            "Private Video",
            LoadErrorKind::Private,
        ),
        "Deleted video" => Entry::with_load_error(
            sequence_number,
            video_id,
            "Deleted Video",
            LoadErrorKind::Deleted,
        ),
        _ => Entry::new(
            sequence_number,
            video_id,
            snippet.title,
            snippet.video_owner_channel_title.unwrap_or_default(),
            snippet
                .thumbnails
                .and_then(|t| t.default)
                .map(|t| t.url)
                .unwrap_or_default(),
        ),
    }
}

/// `PlaylistDataSource` backed by the real YouTube Data API v3.
pub struct YouTubeDataApi {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeDataApi {
    /// Client against the public API endpoint.
    ///
    /// # Errors
    ///
    /// [`Error::ApiKeyMissing`] when the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_API_BASE_URL)
    }

    /// Client against a custom endpoint (test servers).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::ApiKeyMissing);
        }
        Ok(Self {
            client: reqwest::blocking::Client::new(),
            api_key,
            base_url: base_url.into(),
        })
    }

    fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match status.as_u16() {
            403 => "API key is invalid or the quota is exceeded.",
            400 => "Bad request.",
            _ => "Request failed.",
        };
        Err(Error::ApiRequest {
            status: status.as_u16(),
            message: message.to_string(),
        })
    }
}

impl PlaylistDataSource for YouTubeDataApi {
    fn fetch_page(&self, playlist_id: &str, page_token: Option<String>) -> Result<PlaylistPage> {
        let page_size = PAGE_SIZE.to_string();
        let mut request = self
            .client
            .get(format!("{}/playlistItems", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("maxResults", page_size.as_str()),
                (
                    "fields",
                    "nextPageToken,items(snippet(resourceId,title,thumbnails/default/url,videoOwnerChannelTitle))",
                ),
                ("playlistId", playlist_id),
                ("key", self.api_key.as_str()),
            ]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        let response = Self::check_status(request.send()?)?;
        let body: PlaylistItemsResponse = response.json()?;
        let entries = body
            .items
            .into_iter()
            .enumerate()
            .map(|(i, item)| entry_from_item(item, i + 1))
            .collect();
        Ok(PlaylistPage {
            entries,
            next_page_token: body.next_page_token,
        })
    }

    fn fetch_title(&self, playlist_id: &str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/playlists", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("fields", "items(snippet(title))"),
                ("id", playlist_id),
                ("key", self.api_key.as_str()),
            ])
            .send()?;
        let body: PlaylistListResponse = Self::check_status(response)?.json()?;
        Ok(body
            .items
            .into_iter()
            .next()
            .and_then(|item| item.snippet)
            .map_or_else(|| DEFAULT_PLAYLIST_TITLE.to_string(), |s| s.title))
    }
}

/// Loads playlists through a data source, caching results per playlist id.
pub struct PlaylistLoader<S> {
    source: S,
    entry_cache: HashMap<String, Vec<Entry>>,
    title_cache: HashMap<String, String>,
    fetch_in_flight: bool,
}

impl<S: PlaylistDataSource> PlaylistLoader<S> {
    /// Loader over the given data source with empty caches.
    pub fn new(source: S) -> Self {
        Self {
            source,
            entry_cache: HashMap::new(),
            title_cache: HashMap::new(),
            fetch_in_flight: false,
        }
    }

    /// Whether a fetch is currently outstanding.
    #[must_use]
    pub const fn is_fetch_in_flight(&self) -> bool {
        self.fetch_in_flight
    }

    /// Fetch every item of the playlist, following pagination to
    /// exhaustion, renumbered 1..=N.
    ///
    /// `progress` is called after each page (and once, complete, on a
    /// cache hit).
    ///
    /// # Errors
    ///
    /// [`Error::FetchInProgress`] if another fetch is outstanding; any
    /// data-source error otherwise.
    pub fn fetch_all(
        &mut self,
        playlist_id: &str,
        mut progress: impl FnMut(LoadProgress),
    ) -> Result<Vec<Entry>> {
        if let Some(cached) = self.entry_cache.get(playlist_id) {
            debug!(playlist_id, len = cached.len(), "playlist served from cache");
            progress(LoadProgress {
                loaded: cached.len(),
                estimated_total: cached.len(),
                page: 1,
            });
            return Ok(cached.clone());
        }
        if self.fetch_in_flight {
            return Err(Error::FetchInProgress);
        }
        self.fetch_in_flight = true;
        let result = self.fetch_all_pages(playlist_id, &mut progress);
        self.fetch_in_flight = false;
        if let Ok(entries) = &result {
            self.entry_cache
                .insert(playlist_id.to_string(), entries.clone());
        }
        result
    }

    /// The playlist title, cached; falls back to a default on API
    /// failure (a missing title is not worth aborting a load).
    pub fn playlist_title(&mut self, playlist_id: &str) -> String {
        if let Some(title) = self.title_cache.get(playlist_id) {
            return title.clone();
        }
        match self.source.fetch_title(playlist_id) {
            Ok(title) => {
                self.title_cache
                    .insert(playlist_id.to_string(), title.clone());
                title
            }
            Err(e) => {
                warn!(playlist_id, error = %e, "failed to fetch playlist title");
                DEFAULT_PLAYLIST_TITLE.to_string()
            }
        }
    }

    fn fetch_all_pages(
        &self,
        playlist_id: &str,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Vec<Entry>> {
        let mut entries: Vec<Entry> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page = 0usize;
        let mut estimated_total = 0usize;
        loop {
            let fetched = self.source.fetch_page(playlist_id, page_token.clone())?;
            if fetched.entries.is_empty() {
                if page == 0 {
                    return Ok(Vec::new());
                }
                break;
            }
            entries.extend(fetched.entries);
            page += 1;
            // Total estimate: exact once the last page arrived, otherwise
            // at least one more full page is assumed to follow.
            estimated_total = if fetched.next_page_token.is_none() {
                entries.len()
            } else if page == 1 {
                PAGE_SIZE * 2
            } else {
                estimated_total.max(entries.len() + PAGE_SIZE)
            };
            progress(LoadProgress {
                loaded: entries.len(),
                estimated_total,
                page,
            });
            page_token = fetched.next_page_token;
            if page_token.is_none() {
                break;
            }
        }
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.sequence_number = i + 1;
        }
        info!(playlist_id, len = entries.len(), pages = page, "playlist fetched");
        Ok(entries)
    }
}
