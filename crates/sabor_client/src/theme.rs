//! Theme controller.
//!
//! Makes the active color theme visible as early as possible and keeps it in
//! sync with the remote `siteSettings` document:
//!
//! 1. **Bootstrap**: synchronous, before the visual tree is attached. Read
//!    the last applied theme name from local storage, resolve it against the
//!    catalog and paint it. This is what prevents a flash of the default
//!    palette while the store round-trip is in flight.
//! 2. **Subscribed**: after [`ThemeController::connect`], every settings
//!    snapshot re-resolves `activeThemeName` (unknown or absent names fall
//!    back to the catalog's first entry) and repaints only on change.
//! 3. **Teardown**: dropping the controller (or `disconnect`) cancels the
//!    subscription.
//!
//! The controller owns the style-variable map outright; its internal apply
//! step is the only code path that mutates it. The design assumes exactly one
//! controller instance per running page, since two instances sharing a
//! storage key would race on the persisted name.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use sabor_common::{resolve_theme, ColorTheme, ContentSection, SiteSettings, CONTENT_COLLECTION};
use sabor_store::{DocumentStore, LocalStorage, Subscription};

/// Local-storage key holding the last applied theme name.
pub const THEME_STORAGE_KEY: &str = "activeThemeName";

struct ThemeState {
    active: &'static ColorTheme,
    variables: BTreeMap<String, String>,
}

/// Applies themes and owns the global style-variable map.
pub struct ThemeController {
    storage: Arc<dyn LocalStorage>,
    state: Arc<Mutex<ThemeState>>,
    loading: Arc<AtomicBool>,
    watch: Option<Subscription>,
}

impl ThemeController {
    /// Read the cached theme name from local storage and paint it
    /// synchronously. An unknown or missing name paints the catalog's first
    /// entry. The resolved name is persisted back, so a stale cached name
    /// self-heals.
    pub fn bootstrap(storage: Arc<dyn LocalStorage>) -> Self {
        let stored = storage.get(THEME_STORAGE_KEY);
        let theme = resolve_theme(stored.as_deref());
        let state = Arc::new(Mutex::new(ThemeState {
            active: theme,
            variables: BTreeMap::new(),
        }));
        let controller = Self {
            storage,
            state,
            loading: Arc::new(AtomicBool::new(true)),
            watch: None,
        };
        apply(&controller.state, controller.storage.as_ref(), theme);
        controller
    }

    /// Subscribe to the remote settings document. Replaces any previous
    /// subscription held by this controller.
    pub fn connect(&mut self, store: &dyn DocumentStore) {
        let state = Arc::clone(&self.state);
        let storage = Arc::clone(&self.storage);
        let loading = Arc::clone(&self.loading);

        let on_snapshot = {
            let loading = Arc::clone(&loading);
            Arc::new(move |snapshot: Option<sabor_store::Document>| {
                let remote_name = snapshot.and_then(|document| {
                    match sabor_store::from_document::<SiteSettings>(document) {
                        Ok(settings) => settings
                            .active_theme_name
                            .filter(|name| !name.is_empty()),
                        Err(err) => {
                            warn!("[theme] malformed siteSettings document: {err}");
                            None
                        }
                    }
                });
                // Missing document, missing field and a name with no catalog
                // match all resolve to the catalog's first entry.
                let theme = resolve_theme(remote_name.as_deref());
                apply(&state, storage.as_ref(), theme);
                loading.store(false, Ordering::Release);
            }) as sabor_store::SnapshotCallback
        };

        let on_error = {
            let loading = Arc::clone(&loading);
            Arc::new(move |err: sabor_store::StoreError| {
                // Keep whatever is painted; the cached theme is last-known-good.
                warn!("[theme] settings subscription failed: {err}");
                loading.store(false, Ordering::Release);
            }) as sabor_store::ErrorCallback
        };

        self.watch = Some(store.subscribe(
            CONTENT_COLLECTION,
            SiteSettings::KEY,
            on_snapshot,
            on_error,
        ));
    }

    /// Cancel the remote subscription, keeping the painted theme.
    pub fn disconnect(&mut self) {
        self.watch = None;
    }

    /// Name of the currently applied catalog entry.
    pub fn active_theme_name(&self) -> String {
        self.state
            .lock()
            .expect("theme state poisoned")
            .active
            .name
            .to_string()
    }

    /// The full style-variable map of the applied theme.
    pub fn style_variables(&self) -> BTreeMap<String, String> {
        self.state
            .lock()
            .expect("theme state poisoned")
            .variables
            .clone()
    }

    /// One style variable, e.g. `--primary`.
    pub fn style_variable(&self, variable: &str) -> Option<String> {
        self.state
            .lock()
            .expect("theme state poisoned")
            .variables
            .get(variable)
            .cloned()
    }

    /// True until the first remote snapshot (or error) after `connect`.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }
}

/// The single mutator of the style-variable map. Re-applying the already
/// active theme is a no-op; otherwise every variable is overwritten from the
/// theme's map (all catalog entries define the same variable set, so there is
/// nothing to merge) and the name is persisted locally.
fn apply(state: &Mutex<ThemeState>, storage: &dyn LocalStorage, theme: &'static ColorTheme) {
    {
        let mut state = state.lock().expect("theme state poisoned");
        if state.active.name == theme.name && !state.variables.is_empty() {
            return;
        }
        state.active = theme;
        state.variables = theme
            .colors
            .iter()
            .map(|(variable, value)| (variable.to_string(), value.to_string()))
            .collect();
    }
    debug!("[theme] applied {}", theme.name);
    storage.set(THEME_STORAGE_KEY, theme.name);
}
