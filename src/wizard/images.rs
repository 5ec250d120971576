//! Photographs attached in the pictures step and their preview handles.
//!
//! Every attached blob owns an [`ImagePreview`] allocated from a
//! [`PreviewStore`]. A preview is released exactly once: when the picture is
//! removed, when the session is cancelled, or when the guard is dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::loan::LoanImage;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("preview `{0}` is not allocated")]
    UnknownPreview(String),

    #[error("preview store unavailable: {0}")]
    Unavailable(String),
}

/// Raw photograph as uploaded by the operator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageBlob {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,
}

impl ImageBlob {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

impl From<&ImageBlob> for LoanImage {
    fn from(blob: &ImageBlob) -> Self {
        Self {
            file_name: blob.file_name.clone(),
            content_type: blob.content_type.clone(),
            data: blob.data.clone(),
        }
    }
}

/// Issues and revokes preview URIs for image blobs.
pub trait PreviewStore: Send + Sync {
    fn allocate(&self, blob: &ImageBlob) -> Result<String, ResourceError>;
    fn release(&self, uri: &str) -> Result<(), ResourceError>;
}

/// Process-local preview store issuing `blob:` URIs.
#[derive(Debug, Default)]
pub struct InMemoryPreviewStore {
    previews: Mutex<HashMap<String, usize>>,
}

impl InMemoryPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of previews currently allocated.
    pub fn len(&self) -> usize {
        self.previews.lock().map(|p| p.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.previews
            .lock()
            .map(|p| p.contains_key(uri))
            .unwrap_or_default()
    }
}

impl PreviewStore for InMemoryPreviewStore {
    fn allocate(&self, blob: &ImageBlob) -> Result<String, ResourceError> {
        let uri = format!("blob:{}", Uuid::new_v4());
        self.previews
            .lock()
            .map_err(|e| ResourceError::Unavailable(e.to_string()))?
            .insert(uri.clone(), blob.data.len());
        Ok(uri)
    }

    fn release(&self, uri: &str) -> Result<(), ResourceError> {
        self.previews
            .lock()
            .map_err(|e| ResourceError::Unavailable(e.to_string()))?
            .remove(uri)
            .map(|_| ())
            .ok_or_else(|| ResourceError::UnknownPreview(uri.to_string()))
    }
}

/// Guard over an allocated preview URI.
pub struct ImagePreview {
    uri: String,
    store: Arc<dyn PreviewStore>,
    released: bool,
}

impl ImagePreview {
    pub fn allocate(
        store: Arc<dyn PreviewStore>,
        blob: &ImageBlob,
    ) -> Result<Self, ResourceError> {
        let uri = store.allocate(blob)?;
        Ok(Self {
            uri,
            store,
            released: false,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Releases the preview. Calling it again after success is a no-op.
    pub fn release(&mut self) -> Result<(), ResourceError> {
        if self.released {
            return Ok(());
        }
        self.store.release(&self.uri)?;
        self.released = true;
        Ok(())
    }
}

impl fmt::Debug for ImagePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePreview")
            .field("uri", &self.uri)
            .field("released", &self.released)
            .finish()
    }
}

impl Drop for ImagePreview {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("Failed to release image preview {}: {e}", self.uri);
        }
    }
}

/// An attached picture.
#[derive(Debug)]
pub struct Picture {
    pub blob: ImageBlob,
    pub preview: ImagePreview,
}

/// Ordered pictures of one wizard session.
#[derive(Debug, Default)]
pub struct Pictures {
    entries: Vec<Picture>,
}

impl Pictures {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Picture> {
        self.entries.iter()
    }

    /// Appends `blob` and allocates its preview. Returns the new position.
    pub fn add(
        &mut self,
        store: Arc<dyn PreviewStore>,
        blob: ImageBlob,
    ) -> Result<usize, ResourceError> {
        let preview = ImagePreview::allocate(store, &blob)?;
        self.entries.push(Picture { blob, preview });
        Ok(self.entries.len() - 1)
    }

    /// Releases the preview at `index` and removes the entry, shifting the
    /// following pictures down by one.
    ///
    /// Returns `Ok(None)` when `index` is out of range. When the release
    /// fails the picture stays attached.
    pub fn remove(&mut self, index: usize) -> Result<Option<ImageBlob>, ResourceError> {
        let Some(entry) = self.entries.get_mut(index) else {
            return Ok(None);
        };
        entry.preview.release()?;
        Ok(Some(self.entries.remove(index).blob))
    }

    /// Releases every preview and empties the set. All releases are
    /// attempted; the first failure is returned.
    pub fn release_all(&mut self) -> Result<(), ResourceError> {
        let mut first_error = None;
        for mut entry in self.entries.drain(..) {
            if let Err(e) = entry.preview.release() {
                log::warn!("Failed to release image preview {}: {e}", entry.preview.uri());
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Copies of the attached blobs, in order, as stored with a loan.
    pub fn to_loan_images(&self) -> Vec<LoanImage> {
        self.entries.iter().map(|entry| (&entry.blob).into()).collect()
    }

    pub fn preview_uris(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.preview.uri()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    fn blob(name: &str) -> ImageBlob {
        ImageBlob::new(name, "image/jpeg", vec![0xFF, 0xD8])
    }

    #[test]
    fn removal_reindexes_and_releases() {
        let store = Arc::new(InMemoryPreviewStore::new());
        let mut pictures = Pictures::default();

        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            pictures.add(store.clone(), blob(name)).unwrap();
        }
        let removed_uri = pictures.preview_uris()[1].to_string();

        let removed = pictures.remove(1).unwrap().unwrap();

        assert_eq!(removed.file_name, "b.jpg");
        assert_eq!(pictures.len(), 2);
        assert_eq!(pictures.iter().nth(1).unwrap().blob.file_name, "c.jpg");
        assert!(!store.contains(&removed_uri));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn out_of_range_removal_is_none() {
        let store = Arc::new(InMemoryPreviewStore::new());
        let mut pictures = Pictures::default();
        pictures.add(store.clone(), blob("a.jpg")).unwrap();

        assert_eq!(pictures.remove(3), Ok(None));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn dropping_the_set_releases_everything() {
        let store = Arc::new(InMemoryPreviewStore::new());
        {
            let mut pictures = Pictures::default();
            pictures.add(store.clone(), blob("a.jpg")).unwrap();
            pictures.add(store.clone(), blob("b.jpg")).unwrap();
            assert_eq!(store.len(), 2);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn release_is_idempotent() {
        let store = Arc::new(InMemoryPreviewStore::new());
        let mut preview = ImagePreview::allocate(store.clone(), &blob("a.jpg")).unwrap();

        preview.release().unwrap();
        preview.release().unwrap();

        assert!(preview.is_released());
        assert!(store.is_empty());
    }

    struct FailingStore {
        fail_release: AtomicBool,
        inner: InMemoryPreviewStore,
    }

    impl PreviewStore for FailingStore {
        fn allocate(&self, blob: &ImageBlob) -> Result<String, ResourceError> {
            self.inner.allocate(blob)
        }

        fn release(&self, uri: &str) -> Result<(), ResourceError> {
            if self.fail_release.load(Ordering::SeqCst) {
                return Err(ResourceError::Unavailable("locked".to_string()));
            }
            self.inner.release(uri)
        }
    }

    #[test]
    fn failed_release_keeps_the_picture() {
        let store = Arc::new(FailingStore {
            fail_release: AtomicBool::new(true),
            inner: InMemoryPreviewStore::new(),
        });
        let mut pictures = Pictures::default();
        pictures.add(store.clone(), blob("a.jpg")).unwrap();

        assert!(pictures.remove(0).is_err());
        assert_eq!(pictures.len(), 1);

        store.fail_release.store(false, Ordering::SeqCst);
        assert!(pictures.remove(0).unwrap().is_some());
        assert!(store.inner.is_empty());
    }
}
