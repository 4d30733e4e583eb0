/*!
# Sabor client

Live content synchronization for the Sabor site.

Public page sections and the admin panel share one mechanism: every section
is backed by a named document in the remote content store, resolved over
compiled-in defaults, with push-based propagation of admin writes back to
every mounted subscriber.

- [`watch_section`]: generic section loader. Subscribe to a section's
  document, resolve remote-else-default, expose the value plus a loading
  flag, tear down on drop.
- [`watch_dishes`]: the same for the `featuredDishes` collection.
- [`ThemeController`]: applies the active color theme from local storage
  synchronously at bootstrap (no flash of the default palette), then keeps
  it synchronized with the remote `siteSettings` document.
- [`SectionEditor`] / [`MenuEditor`]: the admin submit flow. Field-level
  validation, optional image upload with progress, then a replace or merge
  write to the section's document.

## Quick start

```rust,no_run
use std::sync::Arc;
use futures_lite::future::block_on;
use sabor_client::{watch_section, SectionEditor, ThemeController};
use sabor_common::HeroContent;
use sabor_store::{MemoryBlobStore, MemoryStore, MemoryStorage};

let store = Arc::new(MemoryStore::new());
let blobs = Arc::new(MemoryBlobStore::new());

// Public page: paints seed defaults immediately, converges to remote state.
let hero = watch_section::<HeroContent>(store.as_ref());
let mut theme = ThemeController::bootstrap(Arc::new(MemoryStorage::new()));
theme.connect(store.as_ref());

// Admin panel: one write fans out to every mounted subscriber.
let editor = SectionEditor::hero(store.clone(), blobs);
let mut values = block_on(editor.load());
values.title = "Novo título".into();
block_on(editor.submit(values, None)).unwrap();
assert_eq!(hero.resolved().title, "Novo título");
```
*/

pub mod editor;
pub mod loader;
pub mod theme;
pub mod validate;

pub use editor::{EditorError, ImageFile, MenuEditor, SectionEditor};
pub use loader::{watch_dishes, watch_section, DishBoard, SectionHandle};
pub use theme::{ThemeController, THEME_STORAGE_KEY};
pub use validate::FieldError;
