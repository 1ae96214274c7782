use super::*;

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("pokedex.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn set_overwrites_existing_value() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    assert_eq!(storage.get("k").await.expect("get"), None);

    storage.set("k", "one").await.expect("set");
    storage.set("k", "two").await.expect("overwrite");

    assert_eq!(storage.get("k").await.expect("get").as_deref(), Some("two"));
}

#[test]
fn database_location_classifies_urls() {
    assert_eq!(DatabaseLocation::of("sqlite::memory:"), DatabaseLocation::Memory);
    assert_eq!(DatabaseLocation::of("postgres://db"), DatabaseLocation::Foreign);
    assert_eq!(
        DatabaseLocation::of("sqlite://./data/pokedex.db?mode=rwc"),
        DatabaseLocation::File(PathBuf::from("./data/pokedex.db"))
    );
    assert_eq!(
        DatabaseLocation::of("sqlite:C:/Users/ash/pokedex.db"),
        DatabaseLocation::File(PathBuf::from("C:/Users/ash/pokedex.db"))
    );
}

#[test]
fn bare_file_name_needs_no_directory() {
    DatabaseLocation::of("sqlite://pokedex.db")
        .create_parent_dir()
        .expect("no directory to create");
}

#[tokio::test]
async fn missing_key_loads_empty_favorites() {
    let favorites = FavoritesStore::load(Arc::new(MemoryKeyValueStore::new()))
        .await
        .expect("load");
    assert!(favorites.ids().is_empty());
}

#[tokio::test]
async fn corrupt_favorites_load_empty() {
    for raw in ["not json", "{\"id\":1}", "[\"a\", 2]"] {
        let backend = Arc::new(MemoryKeyValueStore::with_entry(FAVORITES_STORAGE_KEY, raw));
        let favorites = FavoritesStore::load(backend).await.expect("load");
        assert!(favorites.ids().is_empty(), "{raw} should be treated as empty");
    }
}

#[tokio::test]
async fn duplicate_stored_ids_are_collapsed() {
    let backend = Arc::new(MemoryKeyValueStore::with_entry(
        FAVORITES_STORAGE_KEY,
        "[25, 1, 25]",
    ));
    let favorites = FavoritesStore::load(backend).await.expect("load");
    assert_eq!(favorites.ids(), &[PokemonId(25), PokemonId(1)]);
}

#[tokio::test]
async fn mutations_write_through() {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let mut favorites = FavoritesStore::load(backend.clone()).await.expect("load");

    favorites.add(PokemonId(25)).await.expect("add");
    favorites.add(PokemonId(4)).await.expect("add");
    favorites.add(PokemonId(25)).await.expect("add again");
    assert_eq!(
        backend.get(FAVORITES_STORAGE_KEY).await.expect("get").as_deref(),
        Some("[25,4]")
    );

    favorites.remove(PokemonId(25)).await.expect("remove");
    assert_eq!(
        backend.get(FAVORITES_STORAGE_KEY).await.expect("get").as_deref(),
        Some("[4]")
    );
    assert!(!favorites.is_favorite(PokemonId(25)));
}

#[tokio::test]
async fn toggle_reports_new_membership() {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let mut favorites = FavoritesStore::load(backend).await.expect("load");

    assert!(favorites.toggle(PokemonId(7)).await.expect("toggle on"));
    assert!(favorites.is_favorite(PokemonId(7)));
    assert!(!favorites.toggle(PokemonId(7)).await.expect("toggle off"));
    assert!(favorites.ids().is_empty());
}
