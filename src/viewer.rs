//! The viewer state machine.
//!
//! ```text
//!            open(i)                    navigate(j) / prev / next
//! Closed ──────────────▶ Open(i) ◀──────────────────────────────┐
//!   ▲                       │  └──────────────────────────────────┘
//!   └──── on_modal_hidden ──┘
//! ```
//!
//! [`Viewer`] owns the only mutable state of the system ([`ViewerState`]) and
//! is the single sink for every command, whatever produced it: a thumbnail
//! click calling [`Viewer::open`], a key or swipe classified by the
//! [`GestureRouter`], or a fragment change reconciled by
//! [`Viewer::on_fragment_changed`].
//!
//! Every transition into `Open(i)` does the same work, in this order:
//! render photo `i`, publish its slug to the address bar, warm `i±1`, and for
//! `open` only, show the modal.
//!
//! Closing is owned by the modal widget. Navigation logic that wants the
//! viewer gone calls [`Modal::hide`]; the state only becomes `Closed` when the
//! widget reports it is fully hidden. An `open` that lands while such a hide
//! is still animating shows the modal again, and the hidden notification of
//! that superseded hide is then ignored.
//!
//! [`Viewer::init`] also registers every gallery thumbnail with the host's
//! viewport; intersections reported through [`Viewer::on_intersection`] load
//! them through [`LazyThumbnails`].
//!
//! Out-of-range indices, unknown slugs and intents received while closed are
//! all silent no-ops.

use crate::address::{AddressSync, SuppressionToken};
use crate::catalog::{Catalog, PhotoRecord, slug_for};
use crate::config::ViewerConfig;
use crate::gesture::{Click, GestureRouter, Intent, Key, TouchPoint};
use crate::host::{ClipboardError, Modal, ViewerHost};
use crate::lazy::LazyThumbnails;
use crate::prefetch::PrefetchCache;
use crate::share::{ShareAction, ShareOutcome};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// `{ current, open }`. `open` implies `current` indexes the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerState {
    pub current: Option<usize>,
    pub open: bool,
}

impl ViewerState {
    /// Index of the displayed photo, only while open.
    pub fn open_index(&self) -> Option<usize> {
        if self.open { self.current } else { None }
    }
}

/// Everything a renderer needs to draw one photo.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoView {
    pub index: usize,
    pub count: usize,
    pub slug: String,
    pub src: String,
    pub record: PhotoRecord,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PhotoView {
    /// View of photo `index`, with its image URL built from `asset_base`.
    pub fn at(catalog: &Catalog, index: usize, asset_base: &str) -> Option<Self> {
        let record = catalog.get(index)?;
        let count = catalog.len();
        Some(Self {
            index,
            count,
            slug: slug_for(record),
            src: catalog.asset_url(index, asset_base)?,
            record: record.clone(),
            has_prev: index > 0,
            has_next: index + 1 < count,
        })
    }
}

pub struct Viewer<H> {
    catalog: Arc<Catalog>,
    state: ViewerState,
    address: AddressSync,
    prefetch: PrefetchCache,
    gestures: GestureRouter,
    share: ShareAction,
    thumbnails: LazyThumbnails,
    asset_base: String,
    /// A hide requested by the viewer has not reported hidden yet.
    hide_pending: bool,
    /// The next hidden notification belongs to a hide superseded by `open`.
    stale_hidden: bool,
    host: H,
}

impl<H: ViewerHost> Viewer<H> {
    pub fn new(catalog: Arc<Catalog>, config: &ViewerConfig, host: H) -> Self {
        Self {
            catalog,
            state: ViewerState::default(),
            address: AddressSync::new(),
            prefetch: PrefetchCache::new(config.assets.base_url.clone(), &config.prefetch),
            gestures: GestureRouter::new(config.gestures.swipe_threshold),
            share: ShareAction::new(&config.share),
            thumbnails: LazyThumbnails::new(config.assets.base_url.clone()),
            asset_base: config.assets.base_url.clone(),
            hide_pending: false,
            stale_hidden: false,
            host,
        }
    }

    /// Page-load setup: register thumbnails for deferred loading, then open
    /// the photo named by the current fragment.
    pub fn init(&mut self) {
        self.thumbnails.register(&self.catalog, &mut self.host);
        let Some(slug) = self.address.parse_current(&self.host) else {
            return;
        };
        match self.catalog.position(&slug) {
            Some(index) => {
                info!(%slug, index, "opening deep link");
                self.open(index);
            }
            None => debug!(%slug, "deep link names an unknown photo, ignoring"),
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.open
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn address(&self) -> &AddressSync {
        &self.address
    }

    pub fn thumbnails(&self) -> &LazyThumbnails {
        &self.thumbnails
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Open the overlay at `index`. Out of range is a no-op.
    pub fn open(&mut self, index: usize) {
        if self.enter(index) {
            if self.hide_pending {
                debug!(index, "reopened while hiding");
                self.hide_pending = false;
                self.stale_hidden = true;
            }
            Modal::show(&mut self.host);
        }
    }

    /// Move to `index` while open. Out of range is a no-op. When closed this
    /// behaves as [`open`](Self::open), since the modal is not visible yet.
    pub fn navigate(&mut self, index: usize) {
        if !self.state.open {
            self.open(index);
            return;
        }
        self.enter(index);
    }

    pub fn prev(&mut self) {
        if let Some(index) = self.state.open_index().and_then(|i| i.checked_sub(1)) {
            self.navigate(index);
        }
    }

    pub fn next(&mut self) {
        if let Some(index) = self.state.open_index().and_then(|i| i.checked_add(1)) {
            self.navigate(index);
        }
    }

    /// Close button or backdrop: ask the modal to hide.
    pub fn dismiss(&mut self) {
        if self.state.open {
            self.request_hide();
        }
    }

    fn request_hide(&mut self) {
        if self.hide_pending {
            return;
        }
        self.hide_pending = true;
        Modal::hide(&mut self.host);
    }

    /// The modal finished hiding: enter `Closed` and drop the fragment.
    pub fn on_modal_hidden(&mut self) {
        if self.stale_hidden {
            debug!("hidden notification of a superseded hide, ignoring");
            self.stale_hidden = false;
            return;
        }
        self.hide_pending = false;
        if !self.state.open {
            return;
        }
        info!(index = ?self.state.current, "closing viewer");
        self.state.open = false;
        self.address.clear(&mut self.host);
    }

    fn enter(&mut self, index: usize) -> bool {
        let Some(record) = self.catalog.get(index) else {
            debug!(index, count = self.catalog.len(), "index out of range, ignoring");
            return false;
        };
        let slug = slug_for(record);
        if !self.catalog.has_deep_link(index) {
            warn!(index, %slug, "slug is not linkable, the address will not reopen this photo");
        }
        self.state = ViewerState {
            current: Some(index),
            open: true,
        };
        if let Some(view) = self.view() {
            self.host.render(&view);
        }
        self.address.publish(&mut self.host, &slug);
        self.prefetch.warm_around(&self.catalog, index, &mut self.host);
        true
    }

    /// The current photo, ready to render. `None` while closed.
    pub fn view(&self) -> Option<PhotoView> {
        let index = self.state.open_index()?;
        PhotoView::at(&self.catalog, index, &self.asset_base)
    }

    // =========================================================================
    // Address bar
    // =========================================================================

    /// Fragment-changed notification from the host.
    pub fn on_fragment_changed(&mut self) {
        if !self.address.accepts_external() {
            debug!("self-caused fragment change, ignoring");
            return;
        }
        match self.address.parse_current(&self.host) {
            Some(slug) => match self.catalog.position(&slug) {
                Some(index) if self.state.open_index() == Some(index) => {}
                Some(index) => self.navigate(index),
                None => debug!(%slug, "fragment names an unknown photo, ignoring"),
            },
            None if self.state.open => {
                debug!("deep link removed, hiding viewer");
                self.request_hide();
            }
            None => {}
        }
    }

    /// Idle tick requested by a fragment write.
    pub fn on_idle_tick(&mut self, token: SuppressionToken) {
        self.address.expire(token);
    }

    // =========================================================================
    // Thumbnails
    // =========================================================================

    /// Intersection change for thumbnail `index`, reported by the viewport.
    pub fn on_intersection(&mut self, index: usize, intersecting: bool) {
        self.thumbnails
            .on_intersection(&self.catalog, index, intersecting, &mut self.host);
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Apply a navigation intent. Everything is ignored while closed.
    pub fn dispatch(&mut self, intent: Intent) {
        if !self.state.open {
            debug!(?intent, "viewer closed, ignoring intent");
            return;
        }
        match intent {
            Intent::Prev => self.prev(),
            Intent::Next => self.next(),
            Intent::Jump(index) => self.navigate(index),
            Intent::Dismiss => self.request_hide(),
        }
    }

    pub fn on_key(&mut self, key: &Key) {
        if let Some(intent) = self.gestures.key(key) {
            self.dispatch(intent);
        }
    }

    pub fn on_click(&mut self, click: Click) {
        let intent = self.gestures.click(click);
        self.dispatch(intent);
    }

    pub fn on_touch_start(&mut self, point: TouchPoint) {
        self.gestures.touch_start(point);
    }

    pub fn on_touch_move(&mut self, point: TouchPoint) {
        self.gestures.touch_move(point);
    }

    pub fn on_touch_end(&mut self) {
        if let Some(intent) = self.gestures.touch_end() {
            self.dispatch(intent);
        }
    }

    pub fn on_touch_cancel(&mut self) {
        self.gestures.touch_cancel();
    }

    // =========================================================================
    // Share
    // =========================================================================

    /// Copy the full current URL, fragment included.
    pub fn share(&mut self) -> ShareOutcome {
        let url = self.host.location().href();
        self.share.share(&mut self.host, url)
    }

    pub fn on_clipboard_result(&mut self, result: Result<(), ClipboardError>) -> ShareOutcome {
        self.share.on_clipboard_result(&mut self.host, result)
    }
}
