//! Playback controller and transition lock.
//!
//! [`PlaybackController`] owns the playlist cursor and is the only
//! component allowed to mutate it. Every navigation trigger (a user
//! click, the engine's end-of-video auto-advance, an error-driven skip)
//! funnels through here, so the cursor and the engine never see two
//! overlapping navigations.
//!
//! The controller is a two-state machine: `Idle` (no transition in
//! flight) and `Transitioning` (a navigation was applied and its settle
//! deadline has not yet passed). A navigation arriving while
//! `Transitioning` is dropped silently; once the deadline elapses the
//! lock clears unconditionally, even if the engine load itself failed, so
//! the controller can never deadlock. Time is read through the [`Clock`]
//! trait so the machine can be exercised in tests without real timers.

use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::engine::{PlaybackEngine, PlayerEvent};
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::navigator::{self, Direction, NavigationTrigger};
use crate::notify::NotificationSink;
use crate::recovery::{ErrorRecoveryPolicy, RecoveryAction};
use crate::store::PlaylistStore;

/// Settle delay applied after every navigation before the next one may
/// begin.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Notice shown when a full cyclic scan finds nothing playable.
const NO_PLAYABLE_NOTICE: &str = "No playable video found.";

/// Source of the current time for the transition lock.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Transition-lock state.
#[derive(Debug, Clone, Copy)]
enum TransitionState {
    /// No navigation in flight.
    Idle,
    /// A navigation was applied; further ones are dropped until `until`.
    Transitioning {
        /// Deadline after which the lock clears unconditionally.
        until: Instant,
    },
}

/// Mediates between navigation decisions and the playback engine.
pub struct PlaybackController<E, N, C = SystemClock> {
    store: PlaylistStore,
    engine: E,
    notifier: N,
    clock: C,
    recovery: ErrorRecoveryPolicy,
    state: TransitionState,
    settle_delay: Duration,
}

impl<E, N> PlaybackController<E, N, SystemClock>
where
    E: PlaybackEngine,
    N: NotificationSink,
{
    /// Controller with the wall clock and default settle delay.
    pub fn new(engine: E, notifier: N) -> Self {
        Self::with_clock(engine, notifier, SystemClock, DEFAULT_SETTLE_DELAY)
    }
}

impl<E, N, C> PlaybackController<E, N, C>
where
    E: PlaybackEngine,
    N: NotificationSink,
    C: Clock,
{
    /// Controller with an explicit clock and settle delay.
    pub const fn with_clock(engine: E, notifier: N, clock: C, settle_delay: Duration) -> Self {
        Self {
            store: PlaylistStore::new(),
            engine,
            notifier,
            clock,
            recovery: ErrorRecoveryPolicy::new(),
            state: TransitionState::Idle,
            settle_delay,
        }
    }

    /// Replace the error-recovery policy (e.g. to skip on the first
    /// failure instead of the second).
    pub fn set_recovery_policy(&mut self, policy: ErrorRecoveryPolicy) {
        self.recovery = policy;
    }

    /// The playlist store. Read-only; the cursor is mutated only through
    /// the controller's own operations.
    pub const fn store(&self) -> &PlaylistStore {
        &self.store
    }

    /// The entry under the cursor, if any.
    pub fn current_entry(&self) -> Option<&Entry> {
        self.store.current_entry()
    }

    /// The error-recovery policy state.
    pub const fn recovery(&self) -> &ErrorRecoveryPolicy {
        &self.recovery
    }

    /// Whether a navigation is in flight (its settle deadline has not yet
    /// passed).
    pub fn is_transitioning(&self) -> bool {
        match self.state {
            TransitionState::Idle => false,
            TransitionState::Transitioning { until } => self.clock.now() < until,
        }
    }

    /// Replace the playlist and start playback at the first playable
    /// entry.
    ///
    /// # Errors
    ///
    /// [`Error::NoPlayableEntry`] if the playlist is empty or every entry
    /// carries a load error; a notice is surfaced and nothing is loaded.
    pub fn load_playlist(&mut self, entries: Vec<Entry>) -> Result<()> {
        self.store.replace(entries);
        self.recovery.record_playing();
        self.state = TransitionState::Idle;
        if self.store.current_index().is_some() {
            self.begin_transition();
            self.load_current();
            Ok(())
        } else {
            self.notifier.notify(NO_PLAYABLE_NOTICE);
            Err(Error::NoPlayableEntry)
        }
    }

    /// Advance to the next playable entry.
    pub fn play_next(&mut self) -> Result<()> {
        self.navigate(Direction::Forward, NavigationTrigger::UserAction)
            .map(|_| ())
    }

    /// Go back to the previous playable entry.
    pub fn play_previous(&mut self) -> Result<()> {
        self.navigate(Direction::Backward, NavigationTrigger::UserAction)
            .map(|_| ())
    }

    /// Jump directly to `index` (a list click).
    ///
    /// A known-error entry is refused as a target; the forward skip-scan
    /// from that index picks the entry to play instead.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] for an index outside the playlist,
    /// [`Error::NoPlayableEntry`] if the scan finds nothing.
    pub fn play_at(&mut self, index: usize) -> Result<()> {
        if self.store.is_empty() {
            return Ok(());
        }
        if index >= self.store.len() {
            return Err(Error::OutOfRange {
                index,
                len: self.store.len(),
            });
        }
        if self.is_transitioning() {
            debug!(index, "direct jump dropped while transitioning");
            return Ok(());
        }
        let target = if self.store.entries()[index].is_playable() {
            index
        } else {
            match navigator::next_playable(self.store.entries(), index, Direction::Forward) {
                Ok(i) => i,
                Err(Error::NoPlayableEntry) => {
                    self.notifier.notify(NO_PLAYABLE_NOTICE);
                    return Err(Error::NoPlayableEntry);
                }
                Err(e) => return Err(e),
            }
        };
        self.begin_transition();
        self.store.set_current_index(target)?;
        self.load_current();
        Ok(())
    }

    /// Shuffle the playlist and restart playback at the first playable
    /// entry of the new order.
    pub fn shuffle(&mut self) -> Result<()> {
        self.shuffle_with(&mut rand::rng())
    }

    /// Shuffle with a caller-provided random source.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        if self.store.is_empty() {
            return Ok(());
        }
        if self.is_transitioning() {
            debug!("shuffle dropped while transitioning");
            return Ok(());
        }
        let mut entries = self.store.entries().to_vec();
        entries.shuffle(rng);
        self.store.replace(entries);
        if self.store.current_index().is_some() {
            self.begin_transition();
            self.load_current();
            Ok(())
        } else {
            self.notifier.notify(NO_PLAYABLE_NOTICE);
            Err(Error::NoPlayableEntry)
        }
    }

    /// Feed an engine event into the state machine.
    ///
    /// This is the single dispatcher for the engine's callback stream;
    /// nothing else may react to engine events or touch the store in
    /// response to them.
    pub fn handle_event(&mut self, event: PlayerEvent) -> Result<()> {
        match event {
            PlayerEvent::Ended => {
                debug!("video ended, advancing to the next entry");
                self.navigate(Direction::Forward, NavigationTrigger::EndOfPlayback)
                    .map(|_| ())
            }
            PlayerEvent::Playing => {
                self.recovery.record_playing();
                Ok(())
            }
            PlayerEvent::Error(code) => {
                warn!(?code, "engine reported a playback error");
                self.notifier.notify(code.description());
                if let Some(index) = self.store.current_index() {
                    self.store.mark_runtime_error(index)?;
                }
                match self.recovery.record_failure() {
                    RecoveryAction::Skip => {
                        let moved =
                            self.navigate(Direction::Forward, NavigationTrigger::ErrorSkip)?;
                        if moved {
                            self.recovery.acknowledge_skip();
                        } else {
                            debug!("error skip deferred while transitioning, streak stays armed");
                        }
                        Ok(())
                    }
                    RecoveryAction::Tolerate => Ok(()),
                }
            }
        }
    }

    /// Pause playback.
    pub fn pause(&mut self) -> Result<()> {
        self.engine.pause()
    }

    /// Resume playback.
    pub fn resume(&mut self) -> Result<()> {
        self.engine.play()
    }

    /// Mute the player and confirm to the user.
    pub fn mute(&mut self) -> Result<()> {
        self.engine.mute()?;
        self.notifier.notify("Muted.");
        Ok(())
    }

    /// Unmute the player and confirm to the user.
    pub fn unmute(&mut self) -> Result<()> {
        self.engine.unmute()?;
        self.notifier.notify("Unmuted.");
        Ok(())
    }

    /// Core navigation path shared by all triggers.
    ///
    /// Returns `Ok(true)` when a navigation was applied and `Ok(false)`
    /// when it was dropped (empty store or transition in flight).
    fn navigate(&mut self, direction: Direction, trigger: NavigationTrigger) -> Result<bool> {
        if self.store.is_empty() {
            return Ok(false);
        }
        if self.is_transitioning() {
            debug!(?direction, ?trigger, "navigation dropped while transitioning");
            return Ok(false);
        }
        let start = self.store.current_index().unwrap_or(0);
        let target = match navigator::next_playable(self.store.entries(), start, direction) {
            Ok(i) => i,
            Err(Error::NoPlayableEntry) => {
                warn!(?direction, ?trigger, "no playable entry found");
                self.notifier.notify(NO_PLAYABLE_NOTICE);
                return Err(Error::NoPlayableEntry);
            }
            Err(e) => return Err(e),
        };
        debug!(?direction, ?trigger, from = start, to = target, "navigating");
        self.begin_transition();
        self.store.set_current_index(target)?;
        self.load_current();
        Ok(true)
    }

    /// Arm the transition lock until the settle deadline.
    fn begin_transition(&mut self) {
        self.state = TransitionState::Transitioning {
            until: self.clock.now() + self.settle_delay,
        };
    }

    /// Hand the entry under the cursor to the engine.
    ///
    /// An engine failure is logged but does not abort the transition; the
    /// settle deadline releases the lock either way.
    fn load_current(&mut self) {
        if let Some(entry) = self.store.current_entry() {
            let video_id = entry.video_id.clone();
            debug!(video_id = %video_id, sequence = entry.sequence_number, "loading entry into engine");
            if let Err(e) = self.engine.load(&video_id) {
                warn!(error = %e, "engine load failed");
            }
        }
    }
}
