use crate::common::fixtures::{Harness, launch_from_home_row};
use crate::common::mocks::{FAKE_DURATION_MS, FakeHost};
use reeltv::config::PlaybackConfig;
use reeltv::data::{Catalog, LaunchContext};
use reeltv::models::Video;
use reeltv::player::{
    AutoplayController, AutoplayMode, DiscontinuityReason, HostEvent, KeyOutcome,
    PlaybackSession, PlaybackState, RemoteKey,
};
use reeltv::storage::{Stores, TRACK_ID_OFF};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

async fn end_video(harness: &mut Harness) {
    harness.host.set_position(FAKE_DURATION_MS, FAKE_DURATION_MS);
    harness
        .session
        .handle_host_event(HostEvent::StateChanged(PlaybackState::Ended))
        .await
        .unwrap();
    harness.pump().await;
}

#[tokio::test(start_paused = true)]
async fn test_ended_video_counts_down_and_plays_next_in_row() {
    let mut h = Harness::from_home_row("Trending", 1);
    h.stores.progress.set_progress("v2", 4_000, 10_000).unwrap();
    h.session.start().await.unwrap();
    assert_eq!(h.host.loads(), vec![("v2".to_string(), 0)]);

    end_video(&mut h).await;

    assert!(h.stores.progress.progress("v2").is_none());
    assert_eq!(h.stores.last_played.last_index("Trending"), Some(1));
    let overlay = h.session.overlay().clone();
    assert!(overlay.visible);
    assert_eq!(overlay.mode, AutoplayMode::NextUp);
    assert_eq!(overlay.next_up.as_ref().map(|n| n.video.id.as_str()), Some("v3"));

    sleep(Duration::from_millis(5_100)).await;
    h.pump().await;

    assert_eq!(h.host.last_loaded().as_deref(), Some("v3"));
    assert_eq!(h.session.video().id.as_str(), "v3");
    assert_eq!(h.session.row_key().as_str(), "Trending");
    assert_eq!(h.session.current_index(), 2);
    assert!(!h.session.overlay().visible);
    assert!(!h.is_autoplay_active().await);
}

#[tokio::test(start_paused = true)]
async fn test_dismissing_prompt_disables_autoplay_for_item() {
    let mut h = Harness::from_home_row("Trending", 0);
    h.session.start().await.unwrap();
    end_video(&mut h).await;
    assert!(h.is_autoplay_active().await);

    let outcome = h.session.handle_key(RemoteKey::Up).await.unwrap();
    assert_eq!(outcome, KeyOutcome::Handled);
    h.pump().await;

    assert!(h.session.autoplay_canceled());
    assert!(!h.session.overlay().visible);
    assert!(!h.is_autoplay_active().await);

    // ending again does not bring the prompt back
    end_video(&mut h).await;
    assert!(!h.is_autoplay_active().await);
    sleep(Duration::from_secs(6)).await;
    h.pump().await;
    assert_eq!(h.host.loads().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_only_user_seek_discontinuity_cancels_countdown() {
    let mut h = Harness::from_home_row("Sports", 0);
    h.session.start().await.unwrap();
    end_video(&mut h).await;

    h.session
        .handle_host_event(HostEvent::PositionDiscontinuity {
            reason: DiscontinuityReason::Other,
        })
        .await
        .unwrap();
    assert!(h.is_autoplay_active().await);

    h.session
        .handle_host_event(HostEvent::PositionDiscontinuity {
            reason: DiscontinuityReason::UserSeek,
        })
        .await
        .unwrap();
    h.pump().await;
    assert!(!h.is_autoplay_active().await);
    assert!(h.session.autoplay_canceled());
}

#[tokio::test(start_paused = true)]
async fn test_play_request_after_cancel_is_dropped() {
    let mut h = Harness::from_home_row("Trending", 0);
    h.session.start().await.unwrap();
    end_video(&mut h).await;

    // Ok queues a play request, the seek closes the prompt before it is delivered
    assert_eq!(
        h.session.handle_key(RemoteKey::Ok).await.unwrap(),
        KeyOutcome::Handled
    );
    h.session
        .handle_host_event(HostEvent::PositionDiscontinuity {
            reason: DiscontinuityReason::UserSeek,
        })
        .await
        .unwrap();
    h.pump().await;

    assert_eq!(h.host.loads().len(), 1);
    assert_eq!(h.session.video().id.as_str(), "v1");
}

#[tokio::test(start_paused = true)]
async fn test_candidate_from_fallback_adopts_fallback_row() {
    let mut h = Harness::from_home_row("News", 3);
    h.session.start().await.unwrap();
    assert_eq!(h.session.video().id.as_str(), "v16");
    end_video(&mut h).await;

    let next = h.session.overlay().next_up.clone().unwrap();
    assert_eq!(next.video.id.as_str(), "v1");
    assert!(next.row_key.is_global_fallback());

    h.session.handle_key(RemoteKey::Ok).await.unwrap();
    h.pump().await;

    assert_eq!(h.host.last_loaded().as_deref(), Some("v1"));
    assert!(h.session.row_key().is_global_fallback());
    assert_eq!(h.session.current_index(), 0);

    // the adopted row keeps driving autoplay
    end_video(&mut h).await;
    assert_eq!(h.stores.last_played.last_index("global_fallback"), Some(0));
    let next = h.session.overlay().next_up.clone().unwrap();
    assert_eq!(next.video.id.as_str(), "v2");
    assert_eq!(next.index, 1);
}

#[tokio::test(start_paused = true)]
async fn test_candidate_moves_with_left_and_right() {
    let mut h = Harness::from_home_row("Music", 0);
    h.session.start().await.unwrap();
    end_video(&mut h).await;

    assert_eq!(
        h.session.handle_key(RemoteKey::Right).await.unwrap(),
        KeyOutcome::Handled
    );
    h.pump().await;
    assert_eq!(
        h.session.overlay().next_up.as_ref().map(|n| n.video.id.as_str()),
        Some("v11")
    );

    h.session.handle_key(RemoteKey::Left).await.unwrap();
    h.session.handle_key(RemoteKey::Left).await.unwrap();
    h.pump().await;
    assert_eq!(
        h.session.overlay().next_up.as_ref().map(|n| n.video.id.as_str()),
        Some("v9")
    );

    // clamped at the start of the row
    assert_eq!(
        h.session.handle_key(RemoteKey::Left).await.unwrap(),
        KeyOutcome::Ignored
    );
}

#[tokio::test(start_paused = true)]
async fn test_replay_prompt_restarts_current_video() {
    let solo = Video::new("solo", "Only One", "Solo");
    // no categories, so there is no global fallback either
    let catalog = Arc::new(Catalog::new(Vec::new(), vec![solo.clone()]));
    let launch = LaunchContext::standalone(solo, 0);
    let mut h = Harness::new(catalog, Stores::in_memory(), launch);
    h.session.start().await.unwrap();

    end_video(&mut h).await;
    let overlay = h.session.overlay().clone();
    assert!(overlay.visible);
    assert_eq!(overlay.mode, AutoplayMode::Replay);
    assert!(overlay.next_up.is_none());

    h.host.set_position(FAKE_DURATION_MS, FAKE_DURATION_MS);
    h.session.handle_key(RemoteKey::Ok).await.unwrap();
    h.pump().await;

    assert_eq!(h.host.seeks(), vec![0]);
    assert!(h.host.playing());
    assert!(!h.is_autoplay_active().await);
    assert!(!h.session.overlay().visible);
    assert_eq!(h.host.loads().len(), 1);
    assert!(h.session.autoplay_canceled());

    // the replayed item ends without bringing the prompt back
    end_video(&mut h).await;
    assert!(!h.is_autoplay_active().await);
    assert!(!h.session.overlay().visible);
}

#[tokio::test]
async fn test_progress_persistence_respects_completion_threshold() {
    let mut h = Harness::from_home_row("Trending", 0);
    h.session.start().await.unwrap();

    h.host.set_position(4_000, 10_000);
    h.session.persist_progress().await.unwrap();
    let record = h.stores.progress.progress("v1").unwrap();
    assert_eq!((record.position_ms, record.duration_ms), (4_000, 10_000));

    h.host.set_position(9_600, 10_000);
    h.session.persist_progress().await.unwrap();
    assert!(h.stores.progress.progress("v1").is_none());

    h.host.set_position(1_000, 0);
    h.session.persist_progress().await.unwrap();
    assert!(h.stores.progress.progress("v1").is_none());
}

#[tokio::test]
async fn test_launch_resumes_saved_position() {
    let catalog = Catalog::builtin();
    let stores = Stores::in_memory();
    stores.progress.set_progress("v6", 3_500, 10_000).unwrap();
    let launch = launch_from_home_row(&catalog, &stores, "Sports", 1);

    let mut h = Harness::new(catalog, stores, launch);
    h.session.start().await.unwrap();
    assert_eq!(h.host.loads(), vec![("v6".to_string(), 3_500)]);
}

#[tokio::test]
async fn test_keys_without_prompt_seek_and_toggle() {
    let mut h = Harness::from_home_row("Trending", 0);
    h.session.start().await.unwrap();
    h.host.set_position(5_000, 10_000);

    h.session.handle_key(RemoteKey::Right).await.unwrap();
    h.session.handle_key(RemoteKey::Left).await.unwrap();
    h.session.handle_key(RemoteKey::FastForward).await.unwrap();
    assert_eq!(h.host.seeks(), vec![10_000, 0, 10_000]);

    assert!(h.host.playing());
    h.session.handle_key(RemoteKey::PlayPause).await.unwrap();
    assert!(!h.host.playing());

    assert_eq!(
        h.session.handle_key(RemoteKey::Down).await.unwrap(),
        KeyOutcome::Ignored
    );
    assert_eq!(
        h.session.handle_key(RemoteKey::Back).await.unwrap(),
        KeyOutcome::NavigateBack
    );
    assert!(h.session.autoplay_canceled());
}

#[tokio::test]
async fn test_subtitles_restore_toggle_and_menu_selection() {
    let catalog = Catalog::builtin();
    let stores = Stores::in_memory();
    stores
        .subtitles
        .set_selected_track_id("v1", Some("fr"))
        .unwrap();
    let launch = launch_from_home_row(&catalog, &stores, "Trending", 0);
    let mut h = Harness::new(catalog, stores, launch);

    h.session.start().await.unwrap();
    // the saved track no longer exists
    assert_eq!(h.session.selected_track_id(), TRACK_ID_OFF);
    assert_eq!(
        h.stores.subtitles.selected_track_id("v1").as_deref(),
        Some(TRACK_ID_OFF)
    );
    assert_eq!(h.host.subtitle(), None);

    h.session.handle_key(RemoteKey::Subtitles).await.unwrap();
    assert_eq!(h.session.selected_track_id(), "en");
    assert_eq!(h.host.subtitle().as_deref(), Some("en"));
    assert_eq!(h.stores.subtitles.selected_track_id("v1").as_deref(), Some("en"));

    h.session.toggle_subtitles().await.unwrap();
    assert_eq!(h.session.selected_track_id(), TRACK_ID_OFF);
    assert_eq!(h.host.subtitle(), None);

    h.session.select_subtitle_by_index(1).await.unwrap();
    assert_eq!(h.host.subtitle().as_deref(), Some("en"));
    h.session.select_subtitle_by_index(7).await.unwrap();
    assert_eq!(h.session.selected_track_id(), TRACK_ID_OFF);
}

#[tokio::test]
async fn test_subtitle_toggle_without_tracks_is_noop() {
    let mut h = Harness::from_home_row("Sports", 0);
    h.session.start().await.unwrap();
    assert!(h.session.subtitle_tracks().is_empty());

    h.session.handle_key(RemoteKey::Subtitles).await.unwrap();
    assert_eq!(h.session.selected_track_id(), TRACK_ID_OFF);
    assert!(h.stores.subtitles.selected_track_id("v5").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_autoplays_and_returns_host_on_back() {
    let catalog = Catalog::builtin();
    let stores = Stores::in_memory();
    let launch = launch_from_home_row(&catalog, &stores, "Trending", 0);

    let (autoplay, controller, autoplay_events) =
        AutoplayController::new(Duration::from_millis(250));
    tokio::spawn(controller.run());

    let host = FakeHost::new();
    let session = PlaybackSession::new(
        host.clone(),
        catalog,
        stores.clone(),
        autoplay,
        PlaybackConfig::default(),
        launch,
    );

    let (host_tx, host_rx) = mpsc::unbounded_channel();
    let (key_tx, key_rx) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(session.run(host_rx, key_rx, autoplay_events, shutdown));

    assert!(
        crate::common::wait_for_async(
            || {
                let host = host.clone();
                async move { host.loads().len() == 1 }
            },
            Duration::from_secs(1)
        )
        .await
    );

    host.set_position(FAKE_DURATION_MS, FAKE_DURATION_MS);
    host_tx
        .send(HostEvent::StateChanged(PlaybackState::Ended))
        .unwrap();

    assert!(
        crate::common::wait_for_async(
            || {
                let host = host.clone();
                async move { host.last_loaded().as_deref() == Some("v2") }
            },
            Duration::from_secs(7)
        )
        .await
    );

    host.set_position(2_000, FAKE_DURATION_MS);
    key_tx.send(RemoteKey::Back).unwrap();
    let returned = task.await.unwrap().unwrap();

    assert_eq!(returned.loads().len(), 2);
    let saved = stores.progress.progress("v2").unwrap();
    assert_eq!(saved.position_ms, 2_000);
    assert!(stores.progress.progress("v1").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_stops_on_shutdown() {
    let catalog = Catalog::builtin();
    let stores = Stores::in_memory();
    let launch = launch_from_home_row(&catalog, &stores, "Sports", 2);

    let (autoplay, controller, autoplay_events) =
        AutoplayController::new(Duration::from_millis(250));
    let controller_task = tokio::spawn(controller.run());

    let session = PlaybackSession::new(
        FakeHost::new(),
        catalog,
        stores,
        autoplay,
        PlaybackConfig::default(),
        launch,
    );

    let (_host_tx, host_rx) = mpsc::unbounded_channel();
    let (_key_tx, key_rx) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(session.run(host_rx, key_rx, autoplay_events, shutdown.clone()));

    sleep(Duration::from_millis(100)).await;
    shutdown.cancel();

    let host = task.await.unwrap().unwrap();
    assert_eq!(host.last_loaded().as_deref(), Some("v7"));
    // the session shuts the controller down on its way out
    controller_task.await.unwrap();
}
