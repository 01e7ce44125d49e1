//! Skip-error navigation over the playlist.
//!
//! The navigator answers one question: starting from the current position
//! and a direction, which entry should play next? Entries flagged with a
//! load error or a runtime error are skipped. The scan is cyclic and
//! modular, bounded to one full cycle, so the search terminates even when
//! every entry is unplayable.
//!
//! These functions never mutate the playlist and never touch the UI; they
//! only report an index (or [`Error::NoPlayableEntry`]) to the caller.

use crate::entry::Entry;
use crate::error::{Error, Result};

/// Direction of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards higher indices, wrapping to 0 past the end.
    Forward,
    /// Towards lower indices, wrapping to `len - 1` before 0.
    Backward,
}

impl Direction {
    /// Signed step applied per probe.
    const fn step(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// What caused a navigation request.
///
/// The trigger never influences which entry is selected; it exists for the
/// controller's debounce bookkeeping and log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTrigger {
    /// The engine finished playing the current entry.
    EndOfPlayback,
    /// An explicit user action (next/previous button, list click).
    UserAction,
    /// The error-recovery policy forced a skip.
    ErrorSkip,
}

/// Find the next playable entry from `current` in `direction`.
///
/// Probes entries starting at `current + step`, wrapping modulo the
/// playlist length, for at most one full cycle. A single-entry playlist
/// whose entry is playable returns that same index for either direction (a
/// self-loop is valid).
///
/// # Errors
///
/// [`Error::NoPlayableEntry`] if a full cycle finds nothing playable; the
/// caller must leave the cursor unchanged.
pub fn next_playable(entries: &[Entry], current: usize, direction: Direction) -> Result<usize> {
    if entries.is_empty() {
        return Err(Error::NoPlayableEntry);
    }
    let len = entries.len() as i64;
    let step = direction.step();
    for offset in 1..=len {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = (current as i64 + step * offset).rem_euclid(len) as usize;
        if entries[index].is_playable() {
            return Ok(index);
        }
    }
    Err(Error::NoPlayableEntry)
}

/// Find the first playable entry scanning forward from index 0 inclusive.
///
/// Used after a load or shuffle to pick the initial cursor position.
///
/// # Errors
///
/// [`Error::NoPlayableEntry`] if the playlist is empty or every entry is
/// unplayable.
pub fn seek_first_playable(entries: &[Entry]) -> Result<usize> {
    entries
        .iter()
        .position(Entry::is_playable)
        .ok_or(Error::NoPlayableEntry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LoadErrorKind;

    fn playable(n: usize) -> Entry {
        Entry::new(n, format!("video-{n}"), format!("Title {n}"), "Channel", "")
    }

    fn errored(n: usize) -> Entry {
        Entry::with_load_error(n, format!("video-{n}"), "Deleted Video", LoadErrorKind::Deleted)
    }

    fn runtime_errored(n: usize) -> Entry {
        let mut entry = playable(n);
        entry.runtime_error = true;
        entry
    }

    #[test]
    fn forward_skips_errored_entry() {
        // [A(ok), B(error), C(ok)] at index 0 -> C
        let entries = vec![playable(1), errored(2), playable(3)];
        assert_eq!(next_playable(&entries, 0, Direction::Forward).unwrap(), 2);
    }

    #[test]
    fn forward_skips_runtime_errored_entry() {
        let entries = vec![playable(1), runtime_errored(2), playable(3)];
        assert_eq!(next_playable(&entries, 0, Direction::Forward).unwrap(), 2);
    }

    #[test]
    fn forward_wraps_around_the_end() {
        let entries = vec![playable(1), playable(2), playable(3)];
        assert_eq!(next_playable(&entries, 2, Direction::Forward).unwrap(), 0);
    }

    #[test]
    fn backward_from_zero_wraps_to_last() {
        let entries = vec![playable(1), playable(2), playable(3)];
        assert_eq!(next_playable(&entries, 0, Direction::Backward).unwrap(), 2);
    }

    #[test]
    fn backward_skips_errored_entry() {
        let entries = vec![playable(1), errored(2), playable(3)];
        assert_eq!(next_playable(&entries, 2, Direction::Backward).unwrap(), 0);
    }

    #[test]
    fn single_playable_entry_self_loops_both_directions() {
        let entries = vec![playable(1)];
        assert_eq!(next_playable(&entries, 0, Direction::Forward).unwrap(), 0);
        assert_eq!(next_playable(&entries, 0, Direction::Backward).unwrap(), 0);
    }

    #[test]
    fn single_errored_entry_yields_no_playable() {
        let entries = vec![errored(1)];
        assert!(matches!(
            next_playable(&entries, 0, Direction::Forward),
            Err(Error::NoPlayableEntry)
        ));
    }

    #[test]
    fn all_errored_yields_no_playable() {
        let entries = vec![errored(1), errored(2), errored(3)];
        assert!(matches!(
            next_playable(&entries, 0, Direction::Forward),
            Err(Error::NoPlayableEntry)
        ));
        assert!(matches!(
            next_playable(&entries, 0, Direction::Backward),
            Err(Error::NoPlayableEntry)
        ));
    }

    #[test]
    fn empty_playlist_yields_no_playable() {
        assert!(matches!(
            next_playable(&[], 0, Direction::Forward),
            Err(Error::NoPlayableEntry)
        ));
    }

    #[test]
    fn seek_first_playable_returns_zero_when_head_is_playable() {
        let entries = vec![playable(1), errored(2)];
        assert_eq!(seek_first_playable(&entries).unwrap(), 0);
    }

    #[test]
    fn seek_first_playable_scans_past_errored_head() {
        let entries = vec![errored(1), errored(2), playable(3)];
        assert_eq!(seek_first_playable(&entries).unwrap(), 2);
    }

    #[test]
    fn seek_first_playable_on_all_errored_fails() {
        let entries = vec![errored(1), errored(2)];
        assert!(matches!(
            seek_first_playable(&entries),
            Err(Error::NoPlayableEntry)
        ));
    }

    #[test]
    fn repeated_forward_navigation_is_cyclic() {
        // Repeating next over the playable subset returns to the start.
        let entries = vec![playable(1), errored(2), playable(3), playable(4)];
        let mut index = 0;
        let playable_count = entries.iter().filter(|e| e.is_playable()).count();
        for _ in 0..playable_count {
            index = next_playable(&entries, index, Direction::Forward).unwrap();
        }
        assert_eq!(index, 0);
    }
}
