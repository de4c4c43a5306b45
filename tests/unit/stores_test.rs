use reeltv::data::{Catalog, RowResolver};
use reeltv::storage::{FileStore, KeyValueStore, Stores, TRACK_ID_OFF};
use std::sync::Arc;
use tempfile::TempDir;

fn file_stores(dir: &TempDir) -> Stores {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    Stores::new(store)
}

#[test]
fn test_state_survives_reopening_the_data_dir() {
    let temp_dir = TempDir::new().unwrap();
    {
        let stores = file_stores(&temp_dir);
        stores.favorites.set_favorite("v7", true).unwrap();
        stores.progress.set_progress("v3", 2_500, 10_000).unwrap();
        stores.last_played.set_last_index("Sports", 2).unwrap();
        stores
            .subtitles
            .set_selected_track_id("v1", Some(TRACK_ID_OFF))
            .unwrap();
        stores.recent_searches.push("sintel").unwrap();
    }

    let stores = file_stores(&temp_dir);
    assert!(stores.favorites.is_favorite("v7"));
    assert_eq!(stores.progress.progress("v3").map(|p| p.position_ms), Some(2_500));
    assert_eq!(stores.last_played.last_index("Sports"), Some(2));
    assert_eq!(
        stores.subtitles.selected_track_id("v1").as_deref(),
        Some(TRACK_ID_OFF)
    );
    assert_eq!(stores.recent_searches.list(), vec!["sintel"]);
}

#[test]
fn test_home_rows_reflect_store_contents() {
    let temp_dir = TempDir::new().unwrap();
    let stores = file_stores(&temp_dir);
    let catalog = Catalog::builtin();

    stores.progress.set_progress("v12", 1_000, 10_000).unwrap();
    stores.favorites.set_favorite("v4", true).unwrap();

    let resolver = RowResolver::new(&catalog, &stores.favorites, &stores.progress);
    let rows = resolver.home_rows();
    let keys: Vec<_> = rows.iter().map(|row| row.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["continue-watching", "favorites", "Trending", "Sports", "Music", "News"]
    );

    let launch = resolver.launch_from_row(&rows[0], 0).unwrap();
    assert_eq!(launch.video.id.as_str(), "v12");
    assert_eq!(launch.resume_position_ms, 1_000);
    assert!(resolver.launch_from_row(&rows[0], 1).is_none());
}

#[test]
fn test_corrupt_documents_fall_back_to_empty() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("favorites.json"), "{{{").unwrap();
    std::fs::write(temp_dir.path().join("progress.json"), "null").unwrap();

    let stores = file_stores(&temp_dir);
    assert!(stores.favorites.ids().is_empty());
    assert!(stores.progress.list_in_progress(&Catalog::builtin()).is_empty());

    stores.favorites.toggle_favorite("v1").unwrap();
    assert!(file_stores(&temp_dir).favorites.is_favorite("v1"));
}
