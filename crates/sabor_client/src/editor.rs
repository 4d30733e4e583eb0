//! Admin editors.
//!
//! One generic submit flow serves every single-document section: validate
//! locally, upload the attached image first if there is one (substituting the
//! resulting URL into the image field), then perform exactly one write.
//! Hero and about replace their document wholesale; contact and siteSettings
//! merge so fields not managed by the form survive. The featured-dish
//! collection gets its own editor with add/update/remove operations.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use log::{error, info};

use sabor_common::{
    default_theme, AboutContent, ContactContent, ContentSection, Dish, HeroContent, SiteSettings,
    CONTENT_COLLECTION, DISHES_COLLECTION,
};
use sabor_store::{
    to_document, BlobStore, DocumentStore, StoreError, WriteMode,
};

use crate::validate::{self, FieldError};

/// Errors surfaced to the admin operator. Nothing here touches the stored
/// document: validation and upload failures abort before the write, and a
/// failed write leaves the form values with the caller for resubmission.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("validation rejected {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("image upload failed: {0}")]
    Upload(String),

    #[error(transparent)]
    Write(#[from] StoreError),

    #[error("another submission is already in flight")]
    Busy,
}

/// An image file picked in the form, to be uploaded before the write.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Where an uploaded image URL lands inside a section's value set.
struct ImageSlot<T> {
    upload_dir: &'static str,
    write_url: fn(&mut T, String),
}

/// Resets the in-flight flag even when submission errors out.
struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Editor for one single-document section.
///
/// Construct through the section constructors ([`SectionEditor::hero`] and
/// friends) so the write mode, validator and image slot match the section.
pub struct SectionEditor<T: ContentSection> {
    store: Arc<dyn DocumentStore>,
    blobs: Option<Arc<dyn BlobStore>>,
    mode: WriteMode,
    validator: fn(&T) -> Vec<FieldError>,
    prepare: fn(&mut T),
    image_slot: Option<ImageSlot<T>>,
    in_flight: AtomicBool,
    upload_seq: AtomicU64,
}

fn no_prepare<T>(_values: &mut T) {}

impl SectionEditor<HeroContent> {
    /// Hero banner: full replace, uploaded backgrounds go to `heroImages/`.
    pub fn hero(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            blobs: Some(blobs),
            mode: WriteMode::Replace,
            validator: validate::hero,
            prepare: no_prepare,
            image_slot: Some(ImageSlot {
                upload_dir: "heroImages",
                write_url: |values, url| values.background_image_url = url,
            }),
            in_flight: AtomicBool::new(false),
            upload_seq: AtomicU64::new(0),
        }
    }
}

impl SectionEditor<AboutContent> {
    /// About section: full replace, uploaded images go to `aboutImages/`.
    pub fn about(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            blobs: Some(blobs),
            mode: WriteMode::Replace,
            validator: validate::about,
            prepare: no_prepare,
            image_slot: Some(ImageSlot {
                upload_dir: "aboutImages",
                write_url: |values, url| values.image_url = url,
            }),
            in_flight: AtomicBool::new(false),
            upload_seq: AtomicU64::new(0),
        }
    }
}

impl SectionEditor<ContactContent> {
    /// Contact section: merge write, so fields not managed by the form
    /// survive in the stored document.
    pub fn contact(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            blobs: None,
            mode: WriteMode::Merge,
            validator: validate::contact,
            prepare: no_prepare,
            image_slot: None,
            in_flight: AtomicBool::new(false),
            upload_seq: AtomicU64::new(0),
        }
    }
}

impl SectionEditor<SiteSettings> {
    /// Site settings: merge write; an empty theme selection is normalized to
    /// the catalog default so the stored document always names a theme.
    pub fn site_settings(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            blobs: None,
            mode: WriteMode::Merge,
            validator: validate::site_settings,
            prepare: |values| {
                let missing = values
                    .active_theme_name
                    .as_deref()
                    .map(str::is_empty)
                    .unwrap_or(true);
                if missing {
                    values.active_theme_name = Some(default_theme().name.to_string());
                }
            },
            image_slot: None,
            in_flight: AtomicBool::new(false),
            upload_seq: AtomicU64::new(0),
        }
    }
}

impl<T: ContentSection> SectionEditor<T> {
    /// Current remote value set, falling back to the seed defaults when the
    /// document is absent. Used to pre-populate the form.
    pub async fn try_load(&self) -> Result<T, StoreError> {
        let document = self.store.get(CONTENT_COLLECTION, T::KEY).await?;
        match document {
            Some(document) => sabor_store::from_document(document),
            None => Ok(T::seed()),
        }
    }

    /// Like [`try_load`](Self::try_load), but degrades to the seed defaults
    /// on error so the form always has something to show.
    pub async fn load(&self) -> T {
        self.try_load().await.unwrap_or_else(|err| {
            error!("[editor] failed to load {}: {err}", T::KEY);
            T::seed()
        })
    }

    /// True while a submission is in flight; the form should be disabled.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate and write, discarding upload progress.
    pub async fn submit(&self, values: T, image: Option<ImageFile>) -> Result<(), EditorError> {
        self.submit_with_progress(values, image, |_percent| {}).await
    }

    /// Validate and write, reporting upload progress (0..=100) while an image
    /// file transfers.
    ///
    /// An attached file takes precedence over a typed image URL: the typed
    /// value is cleared before validation and the upload's resulting URL is
    /// what gets written. With no file attached the typed URL is written
    /// verbatim, an empty one included (that is an explicit clear).
    pub async fn submit_with_progress(
        &self,
        mut values: T,
        image: Option<ImageFile>,
        on_progress: impl Fn(u8),
    ) -> Result<(), EditorError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(EditorError::Busy);
        }
        let _guard = SubmitGuard(&self.in_flight);

        (self.prepare)(&mut values);

        if image.is_some() {
            if let Some(slot) = &self.image_slot {
                (slot.write_url)(&mut values, String::new());
            }
        }

        let errors = (self.validator)(&values);
        if !errors.is_empty() {
            return Err(EditorError::Validation(errors));
        }

        if let Some(file) = image {
            let slot = self
                .image_slot
                .as_ref()
                .ok_or_else(|| EditorError::Upload(format!("{} has no image field", T::KEY)))?;
            let blobs = self
                .blobs
                .as_ref()
                .ok_or_else(|| EditorError::Upload("no blob store configured".into()))?;

            let seq = self.upload_seq.fetch_add(1, Ordering::Relaxed);
            let path = format!("{}/{}-{seq}", slot.upload_dir, file.name);
            let url = blobs
                .upload(&path, file.bytes)
                .await_url_with_progress(&on_progress)
                .await
                .map_err(|err| EditorError::Upload(err.to_string()))?;
            (slot.write_url)(&mut values, url);
        }

        let document = to_document(&values)?;
        self.store
            .set(CONTENT_COLLECTION, T::KEY, document, self.mode)
            .await?;
        info!("[editor] wrote {} ({:?})", T::KEY, self.mode);
        Ok(())
    }
}

/// Editor for the featured-dish collection.
pub struct MenuEditor {
    store: Arc<dyn DocumentStore>,
}

impl MenuEditor {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Validate and store a new dish, returning its generated id.
    pub async fn add_dish(&self, dish: Dish) -> Result<String, EditorError> {
        let errors = validate::dish(&dish);
        if !errors.is_empty() {
            return Err(EditorError::Validation(errors));
        }
        let id = self.store.add(DISHES_COLLECTION, to_document(&dish)?).await?;
        info!("[editor] added dish {id}");
        Ok(id)
    }

    /// Validate and replace an existing dish.
    pub async fn update_dish(&self, id: &str, dish: Dish) -> Result<(), EditorError> {
        let errors = validate::dish(&dish);
        if !errors.is_empty() {
            return Err(EditorError::Validation(errors));
        }
        self.store
            .set(DISHES_COLLECTION, id, to_document(&dish)?, WriteMode::Replace)
            .await?;
        info!("[editor] updated dish {id}");
        Ok(())
    }

    pub async fn remove_dish(&self, id: &str) -> Result<(), EditorError> {
        self.store.delete(DISHES_COLLECTION, id).await?;
        info!("[editor] removed dish {id}");
        Ok(())
    }
}
