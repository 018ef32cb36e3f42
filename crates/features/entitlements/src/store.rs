use crate::catalog::BundleCatalog;
use crate::error::{CatalogError, CatalogErrorExt};
use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// Holds the catalog currently in effect and swaps it atomically.
///
/// Readers take a snapshot per request and keep using it even if a reload publishes a new
/// catalog halfway through; no request ever sees a partially built catalog.
#[derive(Debug)]
pub struct CatalogStore {
    current: ArcSwap<BundleCatalog>,
    generation: AtomicU64,
    source: Option<PathBuf>,
}

impl CatalogStore {
    /// Wraps an already-built catalog. [`CatalogStore::reload`] is unavailable without a source.
    #[must_use]
    pub fn new(catalog: BundleCatalog) -> Self {
        Self { current: ArcSwap::from_pointee(catalog), generation: AtomicU64::new(1), source: None }
    }

    /// Loads the catalog from `path` and remembers the path for later reloads.
    ///
    /// # Errors
    /// Any [`CatalogError`] from [`BundleCatalog::load`].
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let catalog = BundleCatalog::load(&path)?;
        info!(path = %path.display(), bundles = catalog.len(), "Bundle catalog loaded");

        Ok(Self {
            current: ArcSwap::from_pointee(catalog),
            generation: AtomicU64::new(1),
            source: Some(path),
        })
    }

    /// The catalog in effect right now.
    #[must_use]
    pub fn snapshot(&self) -> Arc<BundleCatalog> {
        self.current.load_full()
    }

    /// Replaces the catalog and returns the new generation.
    pub fn publish(&self, catalog: BundleCatalog) -> u64 {
        let bundles = catalog.len();
        self.current.store(Arc::new(catalog));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(generation, bundles, "Bundle catalog published");
        generation
    }

    /// Re-reads the remembered source file.
    ///
    /// On failure the previous catalog stays in effect.
    ///
    /// # Errors
    /// [`CatalogError::NoSource`] when the store was not built with [`CatalogStore::from_path`],
    /// otherwise any load error.
    pub fn reload(&self) -> Result<u64, CatalogError> {
        let Some(path) = self.source.as_deref() else {
            return Err(CatalogError::NoSource { context: None });
        };
        self.reload_from(path)
    }

    /// Loads `path` and publishes it; the previous catalog stays in effect on failure.
    ///
    /// # Errors
    /// Any [`CatalogError`] from [`BundleCatalog::load`].
    pub fn reload_from(&self, path: impl AsRef<Path>) -> Result<u64, CatalogError> {
        let path = path.as_ref();
        match BundleCatalog::load(path) {
            Ok(catalog) => Ok(self.publish(catalog)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Catalog reload failed; keeping previous catalog");
                Err::<u64, _>(e).context(format!("Reloading {}", path.display()))
            },
        }
    }

    /// Starts at 1 and increases by one on every publish.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(BundleCatalog::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BundleDefinition;

    #[test]
    fn publish_bumps_generation() {
        let store = CatalogStore::default();
        assert_eq!(store.generation(), 1);
        assert!(store.snapshot().is_empty());

        let generation = store.publish(
            BundleCatalog::from_bundles([BundleDefinition::new("A", true)]).expect("valid"),
        );

        assert_eq!(generation, 2);
        assert_eq!(store.generation(), 2);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn snapshot_survives_publish() {
        let store = CatalogStore::new(
            BundleCatalog::from_bundles([BundleDefinition::new("old", true)]).expect("valid"),
        );
        let held = store.snapshot();

        store.publish(BundleCatalog::empty());

        assert!(held.get("old").is_some());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn reload_without_source_is_a_usage_error() {
        let store = CatalogStore::default();
        let err = store.reload().expect_err("no source");
        assert!(matches!(err, CatalogError::NoSource { .. }));
        assert!(!err.is_parse_error());
        assert!(!err.is_load_error());
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn failed_reload_names_the_file() {
        let store = CatalogStore::default();
        let err = store.reload_from("/nonexistent/bundles.yml").expect_err("missing file");
        assert!(err.is_load_error());
        assert!(err.to_string().contains("/nonexistent/bundles.yml"), "{err}");
        assert_eq!(store.generation(), 1);
    }
}
