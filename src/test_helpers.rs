//! Shared test utilities for the lightbox test suite.
//!
//! Builds small catalogs and viewers hosted on a [`SimulatedPage`], and
//! drains the page's task queue the way the browser event loop would.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let mut viewer = viewer_at(&["a", "b", "c"], "/album/#photo=b");
//! viewer.init();
//! settle(&mut viewer);
//! assert_eq!(viewer.state().current, Some(1));
//! ```

use std::sync::Arc;

use crate::catalog::{Catalog, PhotoRecord};
use crate::config::ViewerConfig;
use crate::session::{SimulatedPage, run_until_idle};
use crate::viewer::Viewer;

/// Catalog with one `<slug>.jpg` record per slug, slugs set explicitly.
pub fn catalog_of(slugs: &[&str]) -> Catalog {
    Catalog::new(
        slugs
            .iter()
            .map(|slug| PhotoRecord::new(format!("{slug}.jpg")).with_slug(*slug))
            .collect(),
    )
}

/// Viewer with default config on a page loaded at `href`. `init` is not called.
pub fn viewer_at(slugs: &[&str], href: &str) -> Viewer<SimulatedPage> {
    viewer_with_config(slugs, href, &ViewerConfig::default())
}

pub fn viewer_with_config(
    slugs: &[&str],
    href: &str,
    config: &ViewerConfig,
) -> Viewer<SimulatedPage> {
    Viewer::new(Arc::new(catalog_of(slugs)), config, SimulatedPage::new(href))
}

/// Deliver all pending page tasks.
pub fn settle(viewer: &mut Viewer<SimulatedPage>) {
    run_until_idle(viewer);
}
