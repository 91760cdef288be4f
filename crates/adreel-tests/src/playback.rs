//! End-to-end playback scenarios: manifest → store → index → controller.

use adreel_playback::{MediaRenderer, PlaybackController, PlaybackPhase, RendererEvent};
use adreel_timeline::{ClipSettingsPatch, ClipStore, ShotManifest};

/// Renderer double that records the commanded source and position.
#[derive(Debug, Default)]
struct RecordingRenderer {
    current_source: Option<String>,
    last_play: Option<(f64, u64)>,
    last_seek: Option<(f64, u64)>,
    paused: bool,
}

impl MediaRenderer for RecordingRenderer {
    fn set_source(&mut self, media_ref: &str) {
        self.current_source = Some(media_ref.to_string());
    }
    fn play(&mut self, source_time: f64, generation: u64) {
        self.last_play = Some((source_time, generation));
        self.paused = false;
    }
    fn pause(&mut self) {
        self.paused = true;
    }
    fn seek(&mut self, source_time: f64, generation: u64) {
        self.last_seek = Some((source_time, generation));
    }
}

const MANIFEST_JSON: &str = r#"{
    "version": 1,
    "shots": [
        {
            "shot_id": "0b7f8f6e-58f4-4e6e-8a10-31f4b0a1c001",
            "title": "Opening",
            "order": 0,
            "video": { "url": "https://cdn.test/opening.mp4", "duration_seconds": 6.0 }
        },
        {
            "shot_id": "0b7f8f6e-58f4-4e6e-8a10-31f4b0a1c002",
            "title": "Product",
            "order": 1,
            "video": { "url": "https://cdn.test/product.mp4", "duration_seconds": 8.0 }
        },
        {
            "shot_id": "0b7f8f6e-58f4-4e6e-8a10-31f4b0a1c003",
            "title": "Still rendering",
            "order": 2
        },
        {
            "shot_id": "0b7f8f6e-58f4-4e6e-8a10-31f4b0a1c004",
            "title": "Call to action",
            "order": 3,
            "video": { "url": "https://cdn.test/cta.mp4", "duration_seconds": 5.0 }
        }
    ]
}"#;

fn controller_from_manifest() -> PlaybackController<RecordingRenderer> {
    let manifest = ShotManifest::from_json(MANIFEST_JSON.as_bytes()).unwrap();
    let store = ClipStore::from_clips(manifest.into_clips());
    PlaybackController::new(store, RecordingRenderer::default())
}

#[test]
fn manifest_builds_playable_timeline() {
    let ctl = controller_from_manifest();

    // the unrendered shot is excluded; [6, 8, 5] compose to 19s
    assert_eq!(ctl.store().len(), 3);
    assert_eq!(ctl.index().total_duration(), 19.0);
    assert_eq!(ctl.phase(), PlaybackPhase::Idle);
}

#[test]
fn seek_resolves_across_clip_boundaries() {
    let mut ctl = controller_from_manifest();

    ctl.seek(7.0);
    assert_eq!(ctl.current_clip_index(), 1);
    assert_eq!(ctl.current_local_time(), 1.0);
    assert_eq!(
        ctl.renderer().current_source.as_deref(),
        Some("https://cdn.test/product.mp4")
    );
    assert_eq!(ctl.renderer().last_seek, Some((1.0, 1)));
}

#[test]
fn edits_reshape_the_timeline_and_keep_position_valid() {
    let mut ctl = controller_from_manifest();
    let product = ctl.store().clips()[1].id;

    // trim 1s either side and double speed: 8s shot contributes 3s
    ctl.update_clip_settings(
        product,
        ClipSettingsPatch::default()
            .with_trim_start(1.0)
            .with_trim_end(1.0)
            .with_speed(2.0),
    );
    assert_eq!(ctl.store().effective_duration(product), Some(3.0));
    assert_eq!(ctl.index().total_duration(), 14.0);

    // seek into the edited clip: local 1s maps to source 1 + 1*2 = 3
    ctl.seek(7.0);
    assert_eq!(ctl.current_clip_index(), 1);
    assert_eq!(ctl.renderer().last_seek, Some((3.0, 1)));
}

#[test]
fn playback_advances_through_trimmed_clips_to_the_end() {
    let mut ctl = controller_from_manifest();
    let opening = ctl.store().clips()[0].id;
    ctl.update_clip_settings(opening, ClipSettingsPatch::default().with_trim_end(2.0));
    assert_eq!(ctl.index().total_duration(), 17.0);

    ctl.play();
    assert_eq!(
        ctl.renderer().current_source.as_deref(),
        Some("https://cdn.test/opening.mp4")
    );

    // the renderer reaches the trimmed-out tail of clip 0 (source span [0, 4))
    let generation = ctl.seek_generation();
    ctl.handle_event(RendererEvent::Position {
        generation,
        source_time: 4.0,
    });
    assert_eq!(ctl.current_clip_index(), 1);
    assert_eq!(
        ctl.renderer().current_source.as_deref(),
        Some("https://cdn.test/product.mp4")
    );
    assert!(ctl.is_playing());

    // natural end of clip 1, then of the final clip
    let generation = ctl.seek_generation();
    ctl.handle_event(RendererEvent::Ended { generation });
    assert_eq!(ctl.current_clip_index(), 2);

    let generation = ctl.seek_generation();
    ctl.handle_event(RendererEvent::Ended { generation });
    assert_eq!(ctl.phase(), PlaybackPhase::Paused);
    assert_eq!(ctl.current_global_time(), 17.0);
    assert!(ctl.renderer().paused);
}

#[test]
fn rapid_seeks_converge_to_the_last_requested_position() {
    let mut ctl = controller_from_manifest();

    ctl.seek(16.0);
    let first = ctl.seek_generation();
    ctl.seek(3.0);
    ctl.seek(9.5);

    // late callbacks from the superseded seeks arrive out of order
    ctl.handle_event(RendererEvent::SeekCompleted { generation: first });
    ctl.handle_event(RendererEvent::Position {
        generation: first,
        source_time: 2.0,
    });
    assert_eq!(ctl.current_global_time(), 9.5);
    assert_eq!(ctl.phase(), PlaybackPhase::Seeking { resume: false });

    ctl.handle_event(RendererEvent::SeekCompleted {
        generation: ctl.seek_generation(),
    });
    assert_eq!(ctl.current_global_time(), 9.5);
    assert_eq!(ctl.phase(), PlaybackPhase::Paused);
}

#[test]
fn clip_list_refresh_keeps_the_session_consistent() {
    let mut ctl = controller_from_manifest();
    ctl.seek(15.0); // inside the final clip

    // the pending shot finishes rendering and the list is refreshed
    let manifest = ShotManifest::from_json(MANIFEST_JSON.as_bytes()).unwrap();
    let mut shots = manifest.shots;
    shots[2].video = Some(adreel_timeline::ReadyVideo {
        url: "https://cdn.test/rendered.mp4".to_string(),
        duration_seconds: 4.0,
    });
    let refreshed = ShotManifest { version: 1, shots };

    ctl.set_clips(refreshed.into_clips());
    assert_eq!(ctl.store().len(), 4);
    assert_eq!(ctl.index().total_duration(), 23.0);
    // playhead followed the clip it was on, now shifted by the new clip
    assert_eq!(ctl.current_clip_index(), 3);
    assert_eq!(ctl.current_global_time(), 19.0);
}
