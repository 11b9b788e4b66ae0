/// Integration tests for the player shell
///
/// Exercises the dispatcher, config store and bounds writer together,
/// without a running Tauri app.

use cadenza_lib::{
    config::{ConfigStore, CONFIG_FILE_NAME},
    core::{
        ActionSink, AppEvent, AudioEvent, Dispatcher, EventBus, FrontendAction, MediaKey,
        WindowBounds,
    },
    persistence::BoundsPersister,
    PlayerError,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_test::assert_ok;

/// Sink that records every action it receives
#[derive(Default)]
struct RecordingSink {
    actions: Mutex<Vec<FrontendAction>>,
}

impl RecordingSink {
    fn actions(&self) -> Vec<FrontendAction> {
        self.actions.lock().unwrap().clone()
    }
}

impl ActionSink for RecordingSink {
    fn dispatch(&self, action: FrontendAction) -> cadenza_lib::Result<()> {
        self.actions.lock().unwrap().push(action);
        Ok(())
    }
}

/// Sink whose frontend is gone
struct FailingSink;

impl ActionSink for FailingSink {
    fn dispatch(&self, _action: FrontendAction) -> cadenza_lib::Result<()> {
        Err(PlayerError::EmitFailed {
            event: "app-action".to_string(),
            reason: "webview closed".to_string(),
        })
    }
}

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

fn temp_config_path() -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "cadenza-integration-{}-{}",
        std::process::id(),
        NEXT_DIR.fetch_add(1, Ordering::SeqCst)
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir.join(CONFIG_FILE_NAME)
}

// ============================================================================
// Bootstrap + Playback Flow
// ============================================================================

#[tokio::test]
async fn test_bootstrap_then_listening_session() {
    let sink = Arc::new(RecordingSink::default());
    let bus = Arc::new(EventBus::new());
    let mut rx = bus.subscribe();
    let dispatcher = Dispatcher::new(sink.clone(), bus.clone());

    dispatcher.load_persisted_state().unwrap();

    // Track plays through, counted once, then ends
    dispatcher.audio_event(AudioEvent::Play).unwrap();
    for current_time in [0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 179.0] {
        dispatcher
            .audio_event(AudioEvent::TimeUpdate {
                src: "file:///music/song.flac".to_string(),
                current_time,
                duration: 180.0,
            })
            .unwrap();
    }
    dispatcher.audio_event(AudioEvent::Ended).unwrap();

    // Media key pauses, tray asks to resume
    dispatcher.media_key(MediaKey::PlayPause).unwrap();
    assert!(dispatcher.player_action("play").unwrap());
    assert!(!dispatcher.player_action("stop").unwrap());

    let actions = sink.actions();
    assert_eq!(actions.len(), 7);
    assert_eq!(
        &actions[..3],
        &[
            FrontendAction::LibraryLoad,
            FrontendAction::PlaylistsRefresh,
            FrontendAction::SettingsCheck,
        ]
    );
    assert!(matches!(
        &actions[3],
        FrontendAction::LibraryIncrementPlayCount { src, .. } if src == "file:///music/song.flac"
    ));
    assert_eq!(actions[4], FrontendAction::PlayerNext);
    assert_eq!(actions[5], FrontendAction::PlaylistsPlayToggle);
    assert_eq!(actions[6], FrontendAction::PlaylistsPlay);

    assert_eq!(rx.recv().await.unwrap(), AppEvent::PlaybackChanged { playing: true });
}

#[test]
fn test_replayed_track_counts_again_after_end() {
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = Dispatcher::new(sink.clone(), Arc::new(EventBus::new()));

    for _ in 0..2 {
        for current_time in [10.0, 80.0, 99.0] {
            dispatcher
                .audio_event(AudioEvent::TimeUpdate {
                    src: "loop.mp3".to_string(),
                    current_time,
                    duration: 100.0,
                })
                .unwrap();
        }
        dispatcher.audio_event(AudioEvent::Ended).unwrap();
    }

    let counted = sink
        .actions()
        .iter()
        .filter(|a| matches!(a, FrontendAction::LibraryIncrementPlayCount { .. }))
        .count();
    assert_eq!(counted, 2);
}

#[test]
fn test_dispatch_errors_propagate() {
    let dispatcher = Dispatcher::new(Arc::new(FailingSink), Arc::new(EventBus::new()));

    let err = dispatcher.load_persisted_state().unwrap_err();
    assert!(err.to_string().contains("webview closed"));
    assert!(dispatcher.media_key(MediaKey::NextTrack).is_err());

    // Unknown payloads never reach the sink
    assert!(!dispatcher.player_action("bogus").unwrap());
}

// ============================================================================
// Window Bounds Persistence
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_drag_burst_persists_final_geometry_to_disk() {
    let path = temp_config_path();
    let store = Arc::new(ConfigStore::load(&path).unwrap());
    let bus = Arc::new(EventBus::new());
    let mut rx = bus.subscribe();

    let (persister, driver) = BoundsPersister::new(store.clone(), bus.clone());
    tokio::spawn(driver);

    // Simulate a drag: move events every 16ms
    for step in 0..30 {
        persister.save_bounds(WindowBounds::new(step * 5, 100, 1024, 700));
        tokio::time::sleep(Duration::from_millis(16)).await;
    }
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(matches!(rx.recv().await.unwrap(), AppEvent::BoundsSaved { .. }));

    let reloaded = ConfigStore::load(&path).unwrap();
    assert_eq!(reloaded.bounds(), Some(WindowBounds::new(145, 100, 1024, 700)));
}

#[tokio::test(start_paused = true)]
async fn test_bounds_write_keeps_other_settings() {
    let path = temp_config_path();
    let store = Arc::new(ConfigStore::load(&path).unwrap());
    store.set_value("minimize_to_tray", json!(true)).unwrap();
    store.set_value("volume", json!(0.3)).unwrap();

    let bus = Arc::new(EventBus::new());
    let mut rx = bus.subscribe();
    let (persister, driver) = BoundsPersister::new(store.clone(), bus.clone());
    tokio::spawn(driver);

    persister.save_bounds(WindowBounds::new(0, 0, 900, 600));
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(matches!(rx.recv().await.unwrap(), AppEvent::BoundsSaved { .. }));

    let reloaded = ConfigStore::load(&path).unwrap().get();
    assert!(reloaded.minimize_to_tray);
    assert_eq!(reloaded.volume, 0.3);
    assert_eq!(reloaded.bounds, Some(WindowBounds::new(0, 0, 900, 600)));
}

// ============================================================================
// Config Store
// ============================================================================

#[test]
fn test_settings_check_repairs_hand_edited_file() {
    let path = temp_config_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        r#"{"volume": 7.5, "playback_rate": 0.1, "bounds": {"x": 0, "y": 0, "width": 5, "height": 5}}"#,
    )
    .unwrap();

    let store = ConfigStore::load(&path).unwrap();
    assert_ok!(store.check());

    let reloaded = ConfigStore::load(&path).unwrap().get();
    assert_eq!(reloaded.volume, 1.0);
    assert_eq!(reloaded.playback_rate, 0.5);
    assert_eq!(reloaded.bounds, None);
}

#[test]
fn test_config_store_shared_across_threads() {
    let store = Arc::new(ConfigStore::load(temp_config_path()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || {
                store.set_bounds(WindowBounds::new(i, i, 800, 600));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let bounds = store.bounds().unwrap();
    assert!((0..4).contains(&bounds.x));
    tokio_test::block_on(async {
        assert_ok!(store.save_sync());
    });
}
