//! Integration tests for Tubeloop core workflows.
//!
//! These tests verify end-to-end behavior: loading a playlist through a
//! fake data source, driving playback through engine events, error
//! recovery, shuffling, and recent-URL history. All collaborators are
//! in-memory fakes; time is advanced by hand through a manual clock.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use tubeloop_core::{
    Clock, DEFAULT_SETTLE_DELAY, Entry, Error, LoadErrorKind, LoadProgress, NotificationSink,
    PlaybackController, PlaybackEngine, PlayerErrorCode, PlayerEvent, PlaylistDataSource,
    PlaylistLoader, PlaylistPage, RecentUrl, RecentUrlList, RecentUrlStore, Result,
};

// =============================================================================
// Test Fixtures
// =============================================================================

/// Engine that records every load instruction.
#[derive(Clone, Default)]
struct RecordingEngine {
    loads: Rc<RefCell<Vec<String>>>,
}

impl PlaybackEngine for RecordingEngine {
    fn load(&mut self, video_id: &str) -> Result<()> {
        self.loads.borrow_mut().push(video_id.to_string());
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        Ok(())
    }

    fn mute(&mut self) -> Result<()> {
        Ok(())
    }

    fn unmute(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Notifier that collects every message.
#[derive(Clone, Default)]
struct CollectingNotifier {
    messages: Rc<RefCell<Vec<String>>>,
}

impl NotificationSink for CollectingNotifier {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Clock the test advances by hand.
#[derive(Clone)]
struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    fn settle(&self) {
        self.advance(DEFAULT_SETTLE_DELAY);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Data source serving canned pages keyed by page token.
struct FakeDataSource {
    pages: Vec<PlaylistPage>,
    title: String,
    calls: Rc<Cell<usize>>,
}

impl FakeDataSource {
    fn new(pages: Vec<PlaylistPage>, title: &str) -> Self {
        Self {
            pages,
            title: title.to_string(),
            calls: Rc::new(Cell::new(0)),
        }
    }
}

impl PlaylistDataSource for FakeDataSource {
    fn fetch_page(&self, _playlist_id: &str, page_token: Option<String>) -> Result<PlaylistPage> {
        self.calls.set(self.calls.get() + 1);
        let index = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(0),
        };
        Ok(self.pages[index].clone())
    }

    fn fetch_title(&self, _playlist_id: &str) -> Result<String> {
        Ok(self.title.clone())
    }
}

/// In-memory stand-in for the persistent recent-URL store.
#[derive(Clone, Default)]
struct MemoryUrlStore {
    urls: Rc<RefCell<Vec<RecentUrl>>>,
}

impl RecentUrlStore for MemoryUrlStore {
    fn load(&self) -> Result<Vec<RecentUrl>> {
        Ok(self.urls.borrow().clone())
    }

    fn save(&self, urls: &[RecentUrl]) -> Result<()> {
        *self.urls.borrow_mut() = urls.to_vec();
        Ok(())
    }
}

fn playable(n: usize) -> Entry {
    Entry::new(n, format!("video-{n}"), format!("Title {n}"), "Channel", "")
}

fn errored(n: usize, kind: LoadErrorKind) -> Entry {
    Entry::with_load_error(n, format!("video-{n}"), "Unavailable", kind)
}

type TestController = PlaybackController<RecordingEngine, CollectingNotifier, ManualClock>;

fn controller() -> (TestController, RecordingEngine, CollectingNotifier, ManualClock) {
    let engine = RecordingEngine::default();
    let notifier = CollectingNotifier::default();
    let clock = ManualClock::new();
    let controller = PlaybackController::with_clock(
        engine.clone(),
        notifier.clone(),
        clock.clone(),
        DEFAULT_SETTLE_DELAY,
    );
    (controller, engine, notifier, clock)
}

// =============================================================================
// Loading workflow
// =============================================================================

#[test]
fn load_fetch_and_play_workflow() {
    // Two pages: the second holds a private and a deleted video.
    let source = FakeDataSource::new(
        vec![
            PlaylistPage {
                entries: vec![playable(1), playable(2)],
                next_page_token: Some("page-1".to_string()),
            },
            PlaylistPage {
                entries: vec![
                    errored(1, LoadErrorKind::Private),
                    playable(2),
                    errored(3, LoadErrorKind::Deleted),
                ],
                next_page_token: None,
            },
        ],
        "Road trip mix",
    );
    let calls = source.calls.clone();
    let mut loader = PlaylistLoader::new(source);

    let mut progress: Vec<LoadProgress> = Vec::new();
    let entries = loader.fetch_all("PLtest", |p| progress.push(p)).unwrap();

    assert_eq!(calls.get(), 2, "pagination followed to exhaustion");
    assert_eq!(entries.len(), 5);
    let numbers: Vec<usize> = entries.iter().map(|e| e.sequence_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    assert_eq!(progress.last().map(|p| p.loaded), Some(5));
    assert_eq!(loader.playlist_title("PLtest"), "Road trip mix");

    let (mut controller, engine, _notifier, _clock) = controller();
    controller.load_playlist(entries).unwrap();
    assert_eq!(controller.store().current_index(), Some(0));
    assert_eq!(engine.loads.borrow().as_slice(), ["video-1"]);
}

#[test]
fn playlist_of_only_unplayable_entries_is_rejected() {
    let (mut controller, engine, notifier, _clock) = controller();
    let err = controller
        .load_playlist(vec![
            errored(1, LoadErrorKind::Private),
            errored(2, LoadErrorKind::Deleted),
            errored(3, LoadErrorKind::Failed),
        ])
        .unwrap_err();
    assert!(matches!(err, Error::NoPlayableEntry));
    assert!(engine.loads.borrow().is_empty());
    assert_eq!(
        notifier.messages.borrow().as_slice(),
        ["No playable video found."]
    );
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn play_next_skips_errored_entries() {
    // Scenario A: [A(ok), B(private), C(ok)].
    let (mut controller, engine, _notifier, clock) = controller();
    controller
        .load_playlist(vec![
            playable(1),
            errored(2, LoadErrorKind::Private),
            playable(3),
        ])
        .unwrap();
    clock.settle();

    controller.play_next().unwrap();
    assert_eq!(controller.store().current_index(), Some(2));
    assert_eq!(engine.loads.borrow().as_slice(), ["video-1", "video-3"]);
}

#[test]
fn repeated_play_next_is_cyclically_closed() {
    // Advancing once per playable entry returns to the original index.
    let (mut controller, _engine, _notifier, clock) = controller();
    controller
        .load_playlist(vec![playable(1), playable(2), playable(3), playable(4)])
        .unwrap();
    clock.settle();

    let origin = controller.store().current_index();
    for _ in 0..controller.store().len() {
        controller.play_next().unwrap();
        clock.settle();
    }
    assert_eq!(controller.store().current_index(), origin);
}

#[test]
fn rapid_double_advance_moves_the_cursor_once() {
    // A click and an auto-advance landing in the same settle window must
    // produce exactly one engine load and one cursor move.
    let (mut controller, engine, _notifier, clock) = controller();
    controller
        .load_playlist(vec![playable(1), playable(2), playable(3)])
        .unwrap();
    clock.settle();

    controller.play_next().unwrap();
    controller.handle_event(PlayerEvent::Ended).unwrap();
    assert_eq!(controller.store().current_index(), Some(1));
    assert_eq!(engine.loads.borrow().as_slice(), ["video-1", "video-2"]);
}

#[test]
fn navigation_resumes_after_the_settle_deadline() {
    let (mut controller, engine, _notifier, clock) = controller();
    controller
        .load_playlist(vec![playable(1), playable(2), playable(3)])
        .unwrap();
    clock.settle();

    controller.play_next().unwrap();
    clock.settle();
    controller.play_next().unwrap();
    assert_eq!(controller.store().current_index(), Some(2));
    assert_eq!(engine.loads.borrow().len(), 3);
}

#[test]
fn backward_navigation_wraps_modularly() {
    let (mut controller, _engine, _notifier, clock) = controller();
    controller
        .load_playlist(vec![playable(1), playable(2), playable(3)])
        .unwrap();
    clock.settle();

    controller.play_previous().unwrap();
    assert_eq!(controller.store().current_index(), Some(2));
}

#[test]
fn single_entry_playlist_self_loops() {
    // Scenario C.
    let (mut controller, engine, _notifier, clock) = controller();
    controller.load_playlist(vec![playable(1)]).unwrap();
    clock.settle();

    controller.play_next().unwrap();
    assert_eq!(controller.store().current_index(), Some(0));
    assert_eq!(engine.loads.borrow().as_slice(), ["video-1", "video-1"]);
}

#[test]
fn all_errored_navigation_shows_notice_and_keeps_cursor() {
    // Scenario B, reached through runtime errors on every entry.
    let (mut controller, _engine, notifier, clock) = controller();
    controller
        .load_playlist(vec![playable(1), playable(2)])
        .unwrap();
    clock.settle();

    // Exhaust both entries with pairs of consecutive errors.
    for _ in 0..2 {
        let _ = controller.handle_event(PlayerEvent::Error(PlayerErrorCode::EmbedNotAllowed));
        clock.settle();
        let _ = controller.handle_event(PlayerEvent::Error(PlayerErrorCode::EmbedNotAllowed));
        clock.settle();
    }

    let before = controller.store().current_index();
    let err = controller.play_next().unwrap_err();
    assert!(matches!(err, Error::NoPlayableEntry));
    assert_eq!(controller.store().current_index(), before);
    assert!(
        notifier
            .messages
            .borrow()
            .iter()
            .any(|m| m == "No playable video found.")
    );
}

#[test]
fn direct_jump_to_errored_entry_delegates_to_skip_scan() {
    let (mut controller, _engine, _notifier, clock) = controller();
    controller
        .load_playlist(vec![
            playable(1),
            errored(2, LoadErrorKind::Deleted),
            errored(3, LoadErrorKind::Private),
            playable(4),
        ])
        .unwrap();
    clock.settle();

    controller.play_at(1).unwrap();
    assert_eq!(controller.store().current_index(), Some(3));
}

// =============================================================================
// Error recovery
// =============================================================================

#[test]
fn two_consecutive_engine_errors_force_a_skip() {
    // Scenario D.
    let (mut controller, engine, notifier, clock) = controller();
    controller
        .load_playlist(vec![playable(1), playable(2)])
        .unwrap();
    clock.settle();

    controller
        .handle_event(PlayerEvent::Error(PlayerErrorCode::VideoNotFound))
        .unwrap();
    assert_eq!(controller.store().current_index(), Some(0), "first error tolerated");

    controller
        .handle_event(PlayerEvent::Error(PlayerErrorCode::VideoNotFound))
        .unwrap();
    assert_eq!(controller.store().current_index(), Some(1));
    assert_eq!(controller.recovery().consecutive_failures(), 0);
    assert_eq!(engine.loads.borrow().as_slice(), ["video-1", "video-2"]);
    // The error description was surfaced to the user each time.
    assert_eq!(
        notifier
            .messages
            .borrow()
            .iter()
            .filter(|m| m.as_str() == PlayerErrorCode::VideoNotFound.description())
            .count(),
        2
    );
}

#[test]
fn playing_event_between_errors_prevents_the_skip() {
    // Scenario E.
    let (mut controller, _engine, _notifier, clock) = controller();
    controller
        .load_playlist(vec![playable(1), playable(2)])
        .unwrap();
    clock.settle();

    controller
        .handle_event(PlayerEvent::Error(PlayerErrorCode::Html5PlayerError))
        .unwrap();
    controller.handle_event(PlayerEvent::Playing).unwrap();
    controller
        .handle_event(PlayerEvent::Error(PlayerErrorCode::Html5PlayerError))
        .unwrap();

    assert_eq!(controller.store().current_index(), Some(0), "no skip occurred");
    assert_eq!(controller.recovery().consecutive_failures(), 1);
}

#[test]
fn errored_entries_stay_in_the_playlist() {
    let (mut controller, _engine, _notifier, clock) = controller();
    controller
        .load_playlist(vec![playable(1), playable(2)])
        .unwrap();
    clock.settle();

    controller
        .handle_event(PlayerEvent::Error(PlayerErrorCode::EmbedNotAllowed))
        .unwrap();
    controller
        .handle_event(PlayerEvent::Error(PlayerErrorCode::EmbedNotAllowed))
        .unwrap();

    assert_eq!(controller.store().len(), 2);
    let first = controller.store().get(0).unwrap();
    assert!(!first.is_playable());
    assert!(!first.is_load_error(), "flagged as runtime, not load, error");
}

// =============================================================================
// Shuffle
// =============================================================================

#[test]
fn shuffle_renumbers_and_lands_on_a_playable_entry() {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    let (mut controller, engine, _notifier, clock) = controller();
    let mut entries: Vec<Entry> = (1..=10).map(playable).collect();
    entries.push(errored(11, LoadErrorKind::Private));
    controller.load_playlist(entries).unwrap();
    clock.settle();

    let mut rng = StdRng::seed_from_u64(42);
    controller.shuffle_with(&mut rng).unwrap();

    let numbers: Vec<usize> = controller
        .store()
        .entries()
        .iter()
        .map(|e| e.sequence_number)
        .collect();
    assert_eq!(numbers, (1..=11).collect::<Vec<usize>>());

    let current = controller.store().current_index().unwrap();
    assert!(controller.store().get(current).unwrap().is_playable());
    // The new current entry was handed to the engine.
    let loads = engine.loads.borrow();
    assert_eq!(
        loads.last(),
        Some(&controller.store().get(current).unwrap().video_id)
    );
}

// =============================================================================
// Recent-URL history
// =============================================================================

#[test]
fn history_remembers_dedups_and_caps() {
    let store = MemoryUrlStore::default();
    let list = RecentUrlList::new(store.clone());

    list.remember("https://youtube.com/playlist?list=PL1", "One").unwrap();
    list.remember("https://youtube.com/playlist?list=PL2", "Two").unwrap();
    list.remember("https://youtube.com/playlist?list=PL3", "Three").unwrap();
    list.remember("https://youtube.com/playlist?list=PL1", "One again").unwrap();
    list.remember("https://youtube.com/playlist?list=PL4", "Four").unwrap();

    let urls: Vec<String> = list.list().unwrap().into_iter().map(|i| i.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://youtube.com/playlist?list=PL4",
            "https://youtube.com/playlist?list=PL1",
            "https://youtube.com/playlist?list=PL3",
        ]
    );

    list.forget("https://youtube.com/playlist?list=PL1").unwrap();
    assert_eq!(list.list().unwrap().len(), 2);
}
