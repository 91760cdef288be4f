//! End-to-end export scenarios: manifest → clips → coordinator.

use std::collections::HashMap;

use adreel_export::{ExportCoordinator, ExportError, FetchError, MediaFetch};
use adreel_timeline::{ReadyVideo, ShotEntry, ShotManifest};
use async_trait::async_trait;
use uuid::Uuid;

/// In-memory stand-in for the storage backend.
#[derive(Default)]
struct MemoryStore {
    objects: HashMap<String, Vec<u8>>,
}

#[async_trait]
impl MediaFetch for MemoryStore {
    async fn fetch(&self, media_ref: &str) -> Result<Vec<u8>, FetchError> {
        self.objects
            .get(media_ref)
            .cloned()
            .ok_or_else(|| FetchError::new(format!("object not found: {media_ref}")))
    }
}

fn manifest() -> ShotManifest {
    let shot = |title: &str, order: u32, url: &str, duration: f64| ShotEntry {
        shot_id: Uuid::new_v4(),
        title: title.to_string(),
        order,
        video: Some(ReadyVideo {
            url: url.to_string(),
            duration_seconds: duration,
        }),
    };
    ShotManifest {
        version: 1,
        shots: vec![
            shot("Opening", 0, "https://cdn.test/opening.mp4", 6.0),
            shot("Product", 1, "https://cdn.test/product.mp4", 8.0),
            shot("Call to action", 2, "https://cdn.test/cta.mp4", 5.0),
        ],
    }
}

#[tokio::test]
async fn bundle_over_manifest_clips_reports_partial_failures() {
    let mut store = MemoryStore::default();
    store
        .objects
        .insert("https://cdn.test/opening.mp4".to_string(), b"open".to_vec());
    store
        .objects
        .insert("https://cdn.test/cta.mp4".to_string(), b"cta".to_vec());
    // product.mp4 is missing from storage

    let clips = manifest().into_clips();
    let coordinator = ExportCoordinator::new(store).with_max_concurrent_fetches(2);

    let bundle = coordinator.export_bundle(&clips).await.unwrap();
    assert_eq!(
        bundle.entries,
        vec!["01_Opening.mp4", "03_Call_to_action.mp4"]
    );
    assert_eq!(bundle.failures.len(), 1);
    assert_eq!(bundle.failures[0].title, "Product");
}

#[tokio::test]
async fn bundle_fails_outright_when_storage_is_empty() {
    let clips = manifest().into_clips();
    let coordinator = ExportCoordinator::new(MemoryStore::default());

    let err = coordinator.export_bundle(&clips).await.unwrap_err();
    match err {
        ExportError::ExportFailed { failures } => {
            assert_eq!(failures.len(), 3);
            assert!(failures.iter().all(|f| f.reason.contains("object not found")));
        }
        other => panic!("expected ExportFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn single_download_matches_bundle_naming() {
    let mut store = MemoryStore::default();
    store
        .objects
        .insert("https://cdn.test/product.mp4".to_string(), b"prod".to_vec());

    let clips = manifest().into_clips();
    let coordinator = ExportCoordinator::new(store);

    let downloaded = coordinator.download_clip(&clips[1]).await.unwrap();
    assert_eq!(downloaded.filename, "02_Product.mp4");
    assert_eq!(downloaded.bytes, b"prod");
}
