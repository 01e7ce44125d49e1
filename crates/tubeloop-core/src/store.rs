//! In-memory playlist container.
//!
//! [`PlaylistStore`] holds the ordered entry list and the current-position
//! cursor. It is a pure container: no I/O, no engine calls, no
//! notifications. The cursor is only ever mutated through the playback
//! controller.

use tracing::debug;

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::navigator;

/// Ordered playlist entries plus the current-position cursor.
///
/// Invariant: whenever a current index is set, it is within
/// `0..entries.len()`. The cursor is `None` for an empty store, and also
/// after a wholesale [`replace`](Self::replace) that found no playable
/// entry.
#[derive(Debug, Clone, Default)]
pub struct PlaylistStore {
    entries: Vec<Entry>,
    current: Option<usize>,
}

impl PlaylistStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            current: None,
        }
    }

    /// Replace the whole playlist.
    ///
    /// Renumbers `sequence_number` 1..=N in the new order and resets the
    /// cursor to the first playable entry (`None` if there is none).
    pub fn replace(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.sequence_number = i + 1;
        }
        self.current = navigator::seek_first_playable(&self.entries).ok();
        debug!(
            len = self.entries.len(),
            current = ?self.current,
            "playlist replaced"
        );
    }

    /// Entry at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// All entries in playback order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The current-position cursor.
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The entry under the cursor, if any.
    #[must_use]
    pub fn current_entry(&self) -> Option<&Entry> {
        self.current.and_then(|i| self.entries.get(i))
    }

    /// Move the cursor to `index`.
    ///
    /// An empty store silently ignores the call (there is nothing to
    /// select). Otherwise an index outside `[0, len)` yields
    /// [`Error::OutOfRange`].
    pub fn set_current_index(&mut self, index: usize) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }
        if index >= self.entries.len() {
            return Err(Error::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.current = Some(index);
        Ok(())
    }

    /// Flag the entry at `index` as having failed during playback.
    ///
    /// The entry stays in the list; it is only excluded from future
    /// navigation targets.
    pub fn mark_runtime_error(&mut self, index: usize) -> Result<()> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })?;
        entry.runtime_error = true;
        debug!(index, video_id = %entry.video_id, "entry flagged with runtime error");
        Ok(())
    }
}
