//! Admin submit flows: validation gating, image upload precedence, write
//! modes and the single-submission guard.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_lite::future::block_on;
use serde_json::{json, Value};

use sabor_client::{
    watch_dishes, watch_section, EditorError, ImageFile, MenuEditor, SectionEditor,
    ThemeController, THEME_STORAGE_KEY,
};
use sabor_common::{
    ContactContent, ContentSection, Dish, HeroContent, SiteSettings, CONTENT_COLLECTION,
};
use sabor_store::{
    Document, DocumentStore, ErrorCallback, ListCallback, LocalStorage, MemoryBlobStore,
    MemoryStorage, MemoryStore, SnapshotCallback, StoreError, Subscription, WriteMode,
};

fn get_section(store: &MemoryStore, key: &str) -> Option<Document> {
    block_on(store.get(CONTENT_COLLECTION, key)).unwrap()
}

fn valid_hero() -> HeroContent {
    HeroContent::seed()
}

fn valid_dish() -> Dish {
    Dish {
        name: "Moqueca Baiana".into(),
        description: "Moqueca de peixe com leite de coco e dendê.".into(),
        price: "R$ 62,00".into(),
        image_src: "https://example.com/moqueca.jpg".into(),
    }
}

#[test]
fn load_prefers_remote_over_seed() {
    let store = Arc::new(MemoryStore::new());
    let editor = SectionEditor::hero(store.clone(), Arc::new(MemoryBlobStore::new()));

    assert_eq!(block_on(editor.load()), HeroContent::seed());

    let mut values = valid_hero();
    values.title = "Título remoto".into();
    block_on(editor.submit(values.clone(), None)).unwrap();
    assert_eq!(block_on(editor.load()), values);
}

#[test]
fn validation_failure_blocks_the_write() {
    let store = Arc::new(MemoryStore::new());
    let editor = SectionEditor::hero(store.clone(), Arc::new(MemoryBlobStore::new()));

    let mut values = valid_hero();
    values.title = "Oi".into(); // below the 5-character minimum

    let err = block_on(editor.submit(values, None)).unwrap_err();
    match err {
        EditorError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "title");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(get_section(&store, HeroContent::KEY).is_none());
    assert!(!editor.is_busy());
}

#[test]
fn hero_write_replaces_the_whole_document() {
    let store = Arc::new(MemoryStore::new());
    let stale = match json!({ "title": "Velho", "legacyField": "deve sumir" }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    };
    block_on(store.set(CONTENT_COLLECTION, HeroContent::KEY, stale, WriteMode::Replace)).unwrap();

    let editor = SectionEditor::hero(store.clone(), Arc::new(MemoryBlobStore::new()));
    block_on(editor.submit(valid_hero(), None)).unwrap();

    let document = get_section(&store, HeroContent::KEY).unwrap();
    assert!(!document.contains_key("legacyField"));
    assert_eq!(document["title"], json!(HeroContent::seed().title));
}

#[test]
fn contact_write_merges_over_the_existing_document() {
    let store = Arc::new(MemoryStore::new());
    let existing = match json!({ "mapEmbedUrl": "https://maps.example.com/x" }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    };
    block_on(store.set(
        CONTENT_COLLECTION,
        ContactContent::KEY,
        existing,
        WriteMode::Replace,
    ))
    .unwrap();

    let editor = SectionEditor::contact(store.clone());
    block_on(editor.submit(ContactContent::seed(), None)).unwrap();

    let document = get_section(&store, ContactContent::KEY).unwrap();
    // The unmanaged field survives the merge; the managed ones are updated.
    assert_eq!(document["mapEmbedUrl"], json!("https://maps.example.com/x"));
    assert_eq!(document["email"], json!(ContactContent::seed().email));
}

#[test]
fn attached_file_beats_the_typed_url() {
    let store = Arc::new(MemoryStore::new());
    let editor = SectionEditor::hero(store.clone(), Arc::new(MemoryBlobStore::new()));

    let mut values = valid_hero();
    values.background_image_url = "https://typed.example.com/old.jpg".into();
    let image = ImageFile {
        name: "banner.jpg".into(),
        bytes: b"jpeg bytes".to_vec(),
    };
    block_on(editor.submit(values, Some(image))).unwrap();

    let document = get_section(&store, HeroContent::KEY).unwrap();
    let url = document["backgroundImageUrl"].as_str().unwrap();
    assert!(url.starts_with("memory://heroImages/banner.jpg"), "{url}");
}

#[test]
fn upload_progress_is_reported_up_to_100() {
    let store = Arc::new(MemoryStore::new());
    let editor = SectionEditor::hero(store, Arc::new(MemoryBlobStore::new()));

    let progress: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&progress);
    let image = ImageFile {
        name: "banner.jpg".into(),
        bytes: vec![0u8; 300 * 1024],
    };
    block_on(editor.submit_with_progress(valid_hero(), Some(image), move |p| {
        sink.lock().unwrap().push(p)
    }))
    .unwrap();

    let progress = progress.lock().unwrap();
    assert!(!progress.is_empty());
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*progress.last().unwrap(), 100);
}

#[test]
fn upload_failure_aborts_without_writing() {
    let store = Arc::new(MemoryStore::new());
    let blobs = Arc::new(MemoryBlobStore::new());
    blobs.fail_uploads(true);
    let editor = SectionEditor::hero(store.clone(), blobs);

    let image = ImageFile {
        name: "banner.jpg".into(),
        bytes: b"jpeg bytes".to_vec(),
    };
    let err = block_on(editor.submit(valid_hero(), Some(image))).unwrap_err();
    assert!(matches!(err, EditorError::Upload(_)), "{err:?}");
    assert!(get_section(&store, HeroContent::KEY).is_none());
    assert!(!editor.is_busy());
}

#[test]
fn empty_url_without_file_clears_the_stored_image() {
    let store = Arc::new(MemoryStore::new());
    let editor = SectionEditor::hero(store.clone(), Arc::new(MemoryBlobStore::new()));

    let mut values = valid_hero();
    values.background_image_url = "https://example.com/old.jpg".into();
    block_on(editor.submit(values.clone(), None)).unwrap();

    values.background_image_url = String::new();
    block_on(editor.submit(values, None)).unwrap();

    let document = get_section(&store, HeroContent::KEY).unwrap();
    assert_eq!(document["backgroundImageUrl"], json!(""));
}

#[test]
fn site_settings_submit_normalizes_a_missing_theme_name() {
    let store = Arc::new(MemoryStore::new());
    let editor = SectionEditor::site_settings(store.clone());

    let values = SiteSettings {
        establishment_name: "Sabor da Rua".into(),
        active_theme_name: None,
    };
    block_on(editor.submit(values, None)).unwrap();

    let document = get_section(&store, SiteSettings::KEY).unwrap();
    assert_eq!(
        document["activeThemeName"],
        json!(sabor_common::default_theme().name)
    );
}

/// Store whose writes park until released, to hold a submission in flight.
struct GatedStore {
    inner: MemoryStore,
    release: async_channel::Receiver<()>,
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        value: Document,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        self.release
            .recv()
            .await
            .map_err(|_| StoreError::Backend("gate closed".into()))?;
        self.inner.set(collection, id, value, mode).await
    }

    async fn add(&self, collection: &str, value: Document) -> Result<String, StoreError> {
        self.inner.add(collection, value).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete(collection, id).await
    }

    fn subscribe(
        &self,
        collection: &str,
        id: &str,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Subscription {
        self.inner.subscribe(collection, id, on_snapshot, on_error)
    }

    fn subscribe_collection(&self, collection: &str, on_change: ListCallback) -> Subscription {
        self.inner.subscribe_collection(collection, on_change)
    }
}

#[test]
fn concurrent_submission_is_rejected_as_busy() {
    let (release, gate) = async_channel::bounded(1);
    let store = Arc::new(GatedStore {
        inner: MemoryStore::new(),
        release: gate,
    });
    let editor = Arc::new(SectionEditor::hero(
        store,
        Arc::new(MemoryBlobStore::new()),
    ));

    let first = {
        let editor = Arc::clone(&editor);
        std::thread::spawn(move || block_on(editor.submit(valid_hero(), None)))
    };
    while !editor.is_busy() {
        std::thread::yield_now();
    }

    let err = block_on(editor.submit(valid_hero(), None)).unwrap_err();
    assert!(matches!(err, EditorError::Busy));

    release.try_send(()).unwrap();
    first.join().unwrap().unwrap();
    assert!(!editor.is_busy());
}

#[test]
fn write_failure_surfaces_and_releases_the_editor() {
    // A gate whose sender is already gone makes every write fail.
    let (release, gate) = async_channel::bounded::<()>(1);
    drop(release);
    let store = Arc::new(GatedStore {
        inner: MemoryStore::new(),
        release: gate,
    });
    let editor = SectionEditor::hero(store, Arc::new(MemoryBlobStore::new()));

    let err = block_on(editor.submit(valid_hero(), None)).unwrap_err();
    assert!(matches!(err, EditorError::Write(_)), "{err:?}");
    // The operator can resubmit; nothing is stuck in flight.
    assert!(!editor.is_busy());
}

#[test]
fn menu_editor_roundtrip_reaches_the_board() {
    let store = Arc::new(MemoryStore::new());
    let board = watch_dishes(store.as_ref());
    let menu = MenuEditor::new(store);

    let dish = valid_dish();
    let id = block_on(menu.add_dish(dish.clone())).unwrap();
    assert_eq!(board.dishes(), vec![dish.clone()]);

    let mut updated = dish;
    updated.price = "R$ 58,00".into();
    block_on(menu.update_dish(&id, updated.clone())).unwrap();
    assert_eq!(board.entries(), vec![(id.clone(), updated)]);

    block_on(menu.remove_dish(&id)).unwrap();
    assert!(board.entries().is_empty());
    assert_eq!(board.dishes(), Dish::seed_list());
}

#[test]
fn invalid_dish_is_rejected_before_storage() {
    let store = Arc::new(MemoryStore::new());
    let menu = MenuEditor::new(store.clone());

    let mut dish = valid_dish();
    dish.price = "62 reais".into();
    let err = block_on(menu.add_dish(dish)).unwrap_err();
    match err {
        EditorError::Validation(errors) => assert_eq!(errors[0].field, "price"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(store.is_empty("featuredDishes"));
}

#[test]
fn theme_change_propagates_and_survives_reload() {
    let store = Arc::new(MemoryStore::new());
    let storage = Arc::new(MemoryStorage::new());

    // Visitor page: hero section and theme controller mounted.
    let hero = watch_section::<HeroContent>(store.as_ref());
    let mut theme = ThemeController::bootstrap(storage.clone());
    theme.connect(store.as_ref());

    // Admin saves new settings with a different theme.
    let editor = SectionEditor::site_settings(store.clone());
    let settings = SiteSettings {
        establishment_name: "Sabor da Rua".into(),
        active_theme_name: Some("Roxo Vibrante".into()),
    };
    block_on(editor.submit(settings, None)).unwrap();

    // The mounted controller repainted without any reload.
    assert_eq!(theme.active_theme_name(), "Roxo Vibrante");
    assert_eq!(hero.resolved(), HeroContent::seed());

    // A fresh bootstrap from the same device storage paints the new theme
    // before (and without) any remote round-trip.
    drop(theme);
    let offline = ThemeController::bootstrap(storage.clone());
    assert_eq!(offline.active_theme_name(), "Roxo Vibrante");
    assert_eq!(storage.get(THEME_STORAGE_KEY).as_deref(), Some("Roxo Vibrante"));
}
