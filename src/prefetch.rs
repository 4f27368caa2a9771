//! Best-effort prefetch of the photos next to the current one.
//!
//! Purely an optimization: requests are fire-and-forget, never tracked,
//! never cancelled, and their failures are invisible. A prefetch for a photo
//! the visitor never reaches simply completes and is discarded by the
//! browser cache.

use crate::catalog::Catalog;
use crate::config::PrefetchConfig;
use crate::host::ImageLoader;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct PrefetchCache {
    asset_base: String,
    enabled: bool,
    neighbors: usize,
}

impl PrefetchCache {
    pub fn new(asset_base: impl Into<String>, config: &PrefetchConfig) -> Self {
        Self {
            asset_base: asset_base.into(),
            enabled: config.enabled,
            neighbors: config.neighbors,
        }
    }

    /// Issue a prefetch for `index`. Out-of-range indices are ignored.
    pub fn warm<L>(&self, catalog: &Catalog, index: usize, loader: &mut L)
    where
        L: ImageLoader + ?Sized,
    {
        if !self.enabled {
            return;
        }
        if let Some(url) = catalog.asset_url(index, &self.asset_base) {
            trace!(index, %url, "prefetch");
            loader.prefetch(&url);
        }
    }

    /// Warm the configured number of neighbours on each side of `index`,
    /// nearest first, previous before next.
    pub fn warm_around<L>(&self, catalog: &Catalog, index: usize, loader: &mut L)
    where
        L: ImageLoader + ?Sized,
    {
        for distance in 1..=self.neighbors {
            if let Some(prev) = index.checked_sub(distance) {
                self.warm(catalog, prev, loader);
            }
            if let Some(next) = index.checked_add(distance) {
                self.warm(catalog, next, loader);
            }
        }
    }
}
