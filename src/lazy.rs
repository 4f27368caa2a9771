//! Deferred loading of gallery thumbnails.
//!
//! Every thumbnail starts as a placeholder and is registered with the host's
//! [`Viewport`]. The first time one intersects, its real source is set and it
//! is unregistered, so each thumbnail loads at most once:
//!
//! ```text
//! register          observe(i) for every photo       pending = {0..n}
//! intersect(i)      set_source(i, url), unobserve(i)  pending -= i
//! intersect(i)      ignored                           (already loaded)
//! ```

use crate::catalog::Catalog;
use crate::host::{Thumbnails, Viewport};
use std::collections::BTreeSet;
use tracing::{debug, trace};

#[derive(Debug, Clone, Default)]
pub struct LazyThumbnails {
    asset_base: String,
    pending: BTreeSet<usize>,
    loaded: BTreeSet<usize>,
}

impl LazyThumbnails {
    pub fn new(asset_base: impl Into<String>) -> Self {
        Self {
            asset_base: asset_base.into(),
            pending: BTreeSet::new(),
            loaded: BTreeSet::new(),
        }
    }

    /// Observe every thumbnail that has not been registered or loaded yet.
    pub fn register<H>(&mut self, catalog: &Catalog, host: &mut H)
    where
        H: Viewport + ?Sized,
    {
        for index in 0..catalog.len() {
            if !self.loaded.contains(&index) && self.pending.insert(index) {
                host.observe(index);
            }
        }
        debug!(count = self.pending.len(), "thumbnails waiting for viewport");
    }

    /// Handle an intersection change. Returns true when it loaded a thumbnail.
    pub fn on_intersection<H>(
        &mut self,
        catalog: &Catalog,
        index: usize,
        intersecting: bool,
        host: &mut H,
    ) -> bool
    where
        H: Viewport + Thumbnails + ?Sized,
    {
        if !intersecting {
            return false;
        }
        if !self.pending.remove(&index) {
            trace!(index, "thumbnail not pending, ignoring intersection");
            return false;
        }
        self.loaded.insert(index);
        if let Some(src) = catalog.thumbnail_url(index, &self.asset_base) {
            trace!(index, %src, "loading thumbnail");
            host.set_source(index, &src);
        }
        host.unobserve(index);
        true
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.pending.contains(&index)
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.loaded.contains(&index)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PhotoRecord;

    #[derive(Default)]
    struct Page {
        observed: BTreeSet<usize>,
        sources: Vec<(usize, String)>,
    }

    impl Viewport for Page {
        fn observe(&mut self, index: usize) {
            self.observed.insert(index);
        }

        fn unobserve(&mut self, index: usize) {
            self.observed.remove(&index);
        }
    }

    impl Thumbnails for Page {
        fn set_source(&mut self, index: usize, src: &str) {
            self.sources.push((index, src.to_string()));
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            PhotoRecord::new("a.jpg"),
            PhotoRecord {
                thumbnail: Some("b-thumb.webp".to_string()),
                ..PhotoRecord::new("b.jpg")
            },
            PhotoRecord::new("c.jpg"),
        ])
    }

    #[test]
    fn register_observes_every_thumbnail() {
        let mut page = Page::default();
        let mut lazy = LazyThumbnails::new("t/");
        lazy.register(&catalog(), &mut page);
        assert_eq!(page.observed, BTreeSet::from([0, 1, 2]));
        assert_eq!(lazy.pending(), 3);
        assert!(page.sources.is_empty());
    }

    #[test]
    fn first_intersection_loads_and_unobserves() {
        let catalog = catalog();
        let mut page = Page::default();
        let mut lazy = LazyThumbnails::new("t/");
        lazy.register(&catalog, &mut page);

        assert!(lazy.on_intersection(&catalog, 1, true, &mut page));

        assert_eq!(page.sources, vec![(1, "t/b-thumb.webp".to_string())]);
        assert_eq!(page.observed, BTreeSet::from([0, 2]));
        assert!(!lazy.is_pending(1));
        assert!(lazy.is_loaded(1));
    }

    #[test]
    fn thumbnail_loads_exactly_once() {
        let catalog = catalog();
        let mut page = Page::default();
        let mut lazy = LazyThumbnails::new("t/");
        lazy.register(&catalog, &mut page);

        lazy.on_intersection(&catalog, 0, true, &mut page);
        assert!(!lazy.on_intersection(&catalog, 0, true, &mut page));
        lazy.register(&catalog, &mut page);
        assert!(!lazy.on_intersection(&catalog, 0, true, &mut page));

        assert_eq!(page.sources.len(), 1);
        assert!(!page.observed.contains(&0));
    }

    #[test]
    fn leaving_the_viewport_loads_nothing() {
        let catalog = catalog();
        let mut page = Page::default();
        let mut lazy = LazyThumbnails::new("t/");
        lazy.register(&catalog, &mut page);

        assert!(!lazy.on_intersection(&catalog, 2, false, &mut page));
        assert!(page.sources.is_empty());
        assert!(lazy.is_pending(2));
    }

    #[test]
    fn unknown_index_is_ignored() {
        let catalog = catalog();
        let mut page = Page::default();
        let mut lazy = LazyThumbnails::new("t/");
        lazy.register(&catalog, &mut page);

        assert!(!lazy.on_intersection(&catalog, 7, true, &mut page));
        assert!(page.sources.is_empty());
    }
}
