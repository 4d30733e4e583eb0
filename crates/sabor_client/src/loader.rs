//! Generic section content loader.
//!
//! One parametrized unit replaces the per-section fetch/fallback boilerplate:
//! subscribe to the section's document, start from the compiled-in seed, and
//! converge to remote state once the store delivers it. Consumers either poll
//! [`SectionHandle::resolved`] or drain the [`SectionHandle::updates`] stream.

use std::sync::{Arc, Mutex};

use log::warn;

use sabor_common::{ContentSection, Dish, CONTENT_COLLECTION, DISHES_COLLECTION};
use sabor_store::{from_document, DocumentStore, Subscription};

struct SectionState<T> {
    resolved: T,
    loading: bool,
}

/// Live view of one section's resolved content.
///
/// Dropping the handle cancels the underlying subscription, so a section that
/// is no longer displayed can't be written to.
pub struct SectionHandle<T: ContentSection> {
    state: Arc<Mutex<SectionState<T>>>,
    updates: async_channel::Receiver<T>,
    _watch: Subscription,
}

impl<T: ContentSection> SectionHandle<T> {
    /// The value currently rendered: remote state if the document exists,
    /// the seed defaults otherwise.
    pub fn resolved(&self) -> T {
        self.state.lock().expect("section state poisoned").resolved.clone()
    }

    /// True until the first snapshot (or subscription error) arrives.
    pub fn is_loading(&self) -> bool {
        self.state.lock().expect("section state poisoned").loading
    }

    /// Stream of resolved values, one per store notification, in store order.
    pub fn updates(&self) -> async_channel::Receiver<T> {
        self.updates.clone()
    }
}

/// Subscribe to section `T`'s document and keep a resolved view of it.
///
/// The handle starts at `T::seed()` and is already resolved against the
/// store's current state when this returns (subscriptions deliver the current
/// snapshot immediately). Subscription errors are logged and resolve to the
/// seed; they are never surfaced to the visitor.
pub fn watch_section<T: ContentSection>(store: &dyn DocumentStore) -> SectionHandle<T> {
    let state = Arc::new(Mutex::new(SectionState {
        resolved: T::seed(),
        loading: true,
    }));
    let (sender, receiver) = async_channel::unbounded();

    let on_snapshot = {
        let state = Arc::clone(&state);
        let sender = sender.clone();
        Arc::new(move |snapshot: Option<sabor_store::Document>| {
            let resolved = match snapshot {
                Some(document) => match from_document::<T>(document) {
                    Ok(value) => value,
                    Err(err) => {
                        warn!("[loader] malformed {} document: {err}", T::KEY);
                        T::seed()
                    }
                },
                None => T::seed(),
            };
            {
                let mut state = state.lock().expect("section state poisoned");
                state.resolved = resolved.clone();
                state.loading = false;
            }
            let _ = sender.try_send(resolved);
        }) as sabor_store::SnapshotCallback
    };

    let on_error = {
        let state = Arc::clone(&state);
        Arc::new(move |err: sabor_store::StoreError| {
            warn!("[loader] subscription for {} failed: {err}", T::KEY);
            let mut state = state.lock().expect("section state poisoned");
            state.resolved = T::seed();
            state.loading = false;
        }) as sabor_store::ErrorCallback
    };

    let watch = store.subscribe(CONTENT_COLLECTION, T::KEY, on_snapshot, on_error);
    SectionHandle {
        state,
        updates: receiver,
        _watch: watch,
    }
}

struct DishState {
    entries: Vec<(String, Dish)>,
    loading: bool,
}

/// Live view of the featured-dish collection.
pub struct DishBoard {
    state: Arc<Mutex<DishState>>,
    updates: async_channel::Receiver<Vec<(String, Dish)>>,
    _watch: Subscription,
}

impl DishBoard {
    /// Raw `(id, dish)` entries as stored remotely. Empty while the
    /// collection is empty.
    pub fn entries(&self) -> Vec<(String, Dish)> {
        self.state.lock().expect("dish state poisoned").entries.clone()
    }

    /// Dishes to display: remote entries, or the compiled-in seed list while
    /// the remote collection is empty.
    pub fn dishes(&self) -> Vec<Dish> {
        let entries = self.entries();
        if entries.is_empty() {
            Dish::seed_list()
        } else {
            entries.into_iter().map(|(_, dish)| dish).collect()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().expect("dish state poisoned").loading
    }

    /// Stream of entry lists, one per store notification.
    pub fn updates(&self) -> async_channel::Receiver<Vec<(String, Dish)>> {
        self.updates.clone()
    }
}

/// Subscribe to the `featuredDishes` collection. Items that fail to
/// deserialize are skipped with a warning rather than poisoning the list.
pub fn watch_dishes(store: &dyn DocumentStore) -> DishBoard {
    let state = Arc::new(Mutex::new(DishState {
        entries: Vec::new(),
        loading: true,
    }));
    let (sender, receiver) = async_channel::unbounded();

    let on_change = {
        let state = Arc::clone(&state);
        Arc::new(move |items: Vec<(String, sabor_store::Document)>| {
            let entries: Vec<(String, Dish)> = items
                .into_iter()
                .filter_map(|(id, document)| match from_document::<Dish>(document) {
                    Ok(dish) => Some((id, dish)),
                    Err(err) => {
                        warn!("[loader] skipping malformed dish {id}: {err}");
                        None
                    }
                })
                .collect();
            {
                let mut state = state.lock().expect("dish state poisoned");
                state.entries = entries.clone();
                state.loading = false;
            }
            let _ = sender.try_send(entries);
        }) as sabor_store::ListCallback
    };

    let watch = store.subscribe_collection(DISHES_COLLECTION, on_change);
    DishBoard {
        state,
        updates: receiver,
        _watch: watch,
    }
}
