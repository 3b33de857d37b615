//! Copy-on-write holder for the current catalog snapshot.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::Result;

use super::{read_dataset, Catalog, LoadOptions};

/// Shared pointer to the live catalog.
///
/// Readers take an `Arc` snapshot and query it without holding any lock.
/// Writers build a complete replacement first and only then swap the pointer,
/// so a request never observes a half-built catalog.
#[derive(Debug)]
pub struct CatalogHandle {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Load the initial snapshot from a CSV dataset.
    pub fn open(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self> {
        Ok(Self::new(Catalog::load(path, options)?))
    }

    /// The snapshot new requests should use.
    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read())
    }

    /// Swap in a new catalog, returning the previous snapshot.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        std::mem::replace(&mut *self.current.write(), next)
    }

    /// Rebuild from `path` and swap it in if the content changed.
    ///
    /// Returns `Ok(false)` when the file hashes to the current fingerprint.
    /// A failed load leaves the current snapshot untouched.
    pub fn reload(&self, path: impl AsRef<Path>, options: LoadOptions) -> Result<bool> {
        let path = path.as_ref();
        let bytes = read_dataset(path)?;
        let fingerprint = blake3::hash(&bytes).to_hex();
        if self.snapshot().fingerprint() == fingerprint.as_str() {
            tracing::debug!(path = %path.display(), "dataset unchanged, keeping snapshot");
            return Ok(false);
        }

        let catalog = Catalog::from_bytes(&bytes, options, Some(path.to_path_buf()))?;
        let previous = self.replace(catalog);
        tracing::info!(
            path = %path.display(),
            previous_courses = previous.len(),
            courses = self.snapshot().len(),
            "swapped catalog snapshot"
        );
        Ok(true)
    }
}
