//! Deterministic page simulation and scripted session replay.
//!
//! [`SimulatedPage`] implements every collaborator trait in memory and models
//! the browser's event loop as a FIFO task queue. Nothing it schedules runs
//! synchronously: a fragment write enqueues its change notification, the idle
//! tick requested right after lands behind it, `hide()` enqueues the modal's
//! hidden notification, an async clipboard write enqueues its result, and
//! scrolling enqueues one intersection per observed thumbnail.
//! [`run_until_idle`] drains the queue into the viewer.
//!
//! The simulation fires a change notification for *every* address write,
//! including history replacements. Real browsers are quieter than that, so
//! this is the worst case the suppression token has to withstand.
//!
//! ## Scripts
//!
//! A session script is TOML: a start address plus a list of steps.
//!
//! ```toml
//! start = "/gallery/#photo=b"
//!
//! [[step]]
//! action = "key"
//! key = "ArrowRight"
//!
//! [[step]]
//! action = "back"
//!
//! [[step]]
//! action = "swipe"
//! dx = -60.0
//! dy = 5.0
//!
//! [[step]]
//! action = "scroll"
//! first = 0
//! last = 11
//! ```
//!
//! [`replay`] runs the script and returns a [`Transcript`] with a snapshot of
//! the viewer after page load and after every step.

use crate::address::SuppressionToken;
use crate::catalog::{Catalog, CatalogError};
use crate::config::{ConfigError, ViewerConfig, load_config};
use crate::gesture::{Click, Key, TouchPoint};
use crate::host::{
    AddressBar, Clipboard, ClipboardError, IdleScheduler, ImageLoader, Modal, PhotoRenderer,
    Thumbnails, Toast, ViewerHost, Viewport,
};
use crate::location::Location;
use crate::viewer::{PhotoView, Viewer, ViewerState};
use serde::Deserialize;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Script parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// How the simulated clipboard behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClipboardMode {
    /// Async write succeeds.
    #[default]
    Granted,
    /// Async write starts, then rejects; the selection fallback works.
    Denied,
    /// No async API; the selection fallback works.
    Unavailable,
    /// Nothing works.
    Broken,
}

/// Work the page has scheduled for a later turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    FragmentChanged,
    IdleTick(SuppressionToken),
    ModalHidden,
    ClipboardResult(Result<(), ClipboardError>),
    Intersection { index: usize, intersecting: bool },
}

/// An in-memory browser page hosting one viewer.
#[derive(Debug)]
pub struct SimulatedPage {
    history: Vec<Location>,
    cursor: usize,
    tasks: VecDeque<Task>,
    clipboard_in_flight: Option<String>,
    /// Hide animation running and not superseded by a `show`.
    hiding: bool,
    hides_in_flight: usize,
    pub clipboard_mode: ClipboardMode,
    /// Whether the page has a toast surface at all.
    pub toast_surface: bool,
    pub modal_visible: bool,
    pub modal_shows: usize,
    pub modal_hides: usize,
    pub rendered: Vec<PhotoView>,
    pub prefetched: Vec<String>,
    pub clipboard: Option<String>,
    /// Shown toasts as `"<message> (<ms>ms)"`.
    pub toasts: Vec<String>,
    /// Thumbnails currently watched by the viewport.
    pub observed: BTreeSet<usize>,
    /// Thumbnail sources set, in order.
    pub thumbnails: Vec<(usize, String)>,
}

impl SimulatedPage {
    pub fn new(href: &str) -> Self {
        Self {
            history: vec![Location::parse(href)],
            cursor: 0,
            tasks: VecDeque::new(),
            clipboard_in_flight: None,
            hiding: false,
            hides_in_flight: 0,
            clipboard_mode: ClipboardMode::default(),
            toast_surface: true,
            modal_visible: false,
            modal_shows: 0,
            modal_hides: 0,
            rendered: Vec::new(),
            prefetched: Vec::new(),
            clipboard: None,
            toasts: Vec::new(),
            observed: BTreeSet::new(),
            thumbnails: Vec::new(),
        }
    }

    pub fn href(&self) -> String {
        self.current().href()
    }

    fn current(&self) -> &Location {
        &self.history[self.cursor]
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Same-document navigation typed into the address bar: pushes a history
    /// entry and notifies.
    pub fn goto(&mut self, href: &str) {
        let target = self.current().resolve(href);
        self.history.truncate(self.cursor + 1);
        self.history.push(target);
        self.cursor += 1;
        self.tasks.push_back(Task::FragmentChanged);
    }

    /// Browser back button. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.tasks.push_back(Task::FragmentChanged);
        true
    }

    /// Browser forward button. Returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.history.len() {
            return false;
        }
        self.cursor += 1;
        self.tasks.push_back(Task::FragmentChanged);
        true
    }

    /// Overwrite the current entry without scheduling anything. Lets tests
    /// deliver the change notification by hand.
    pub fn set_location_silently(&mut self, href: &str) {
        self.history[self.cursor] = Location::parse(href);
    }

    /// Scroll so that thumbnails `first..=last` enter the viewport. Only
    /// observed thumbnails are reported.
    pub fn scroll_into_view(&mut self, first: usize, last: usize) {
        let visible: Vec<usize> = self.observed.range(first..=last).copied().collect();
        for index in visible {
            self.tasks.push_back(Task::Intersection {
                index,
                intersecting: true,
            });
        }
    }

    /// A hide animation ended. The modal stays visible if it was shown again
    /// meanwhile and not hidden since.
    fn finish_hide(&mut self) {
        self.hides_in_flight = self.hides_in_flight.saturating_sub(1);
        if self.hides_in_flight == 0 && self.hiding {
            self.hiding = false;
            self.modal_visible = false;
        }
    }

    pub fn next_task(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }
}

impl AddressBar for SimulatedPage {
    fn location(&self) -> Location {
        self.current().clone()
    }

    fn replace(&mut self, location: &Location) {
        self.history[self.cursor] = location.clone();
        self.tasks.push_back(Task::FragmentChanged);
    }
}

impl IdleScheduler for SimulatedPage {
    fn request_idle_tick(&mut self, token: SuppressionToken) {
        self.tasks.push_back(Task::IdleTick(token));
    }
}

impl Modal for SimulatedPage {
    fn show(&mut self) {
        self.modal_shows += 1;
        self.modal_visible = true;
        self.hiding = false;
    }

    fn hide(&mut self) {
        self.modal_hides += 1;
        if self.modal_visible && !self.hiding {
            self.hiding = true;
            self.hides_in_flight += 1;
            self.tasks.push_back(Task::ModalHidden);
        }
    }
}

impl ImageLoader for SimulatedPage {
    fn prefetch(&mut self, url: &str) {
        self.prefetched.push(url.to_string());
    }
}

impl PhotoRenderer for SimulatedPage {
    fn render(&mut self, view: &PhotoView) {
        self.rendered.push(view.clone());
    }
}

impl Clipboard for SimulatedPage {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let result = match self.clipboard_mode {
            ClipboardMode::Granted => Ok(()),
            ClipboardMode::Denied => Err(ClipboardError::Denied),
            ClipboardMode::Unavailable | ClipboardMode::Broken => {
                return Err(ClipboardError::Unavailable);
            }
        };
        self.clipboard_in_flight = Some(text.to_string());
        self.tasks.push_back(Task::ClipboardResult(result));
        Ok(())
    }

    fn copy_via_selection(&mut self, text: &str) -> Result<(), ClipboardError> {
        match self.clipboard_mode {
            ClipboardMode::Broken => Err(ClipboardError::Denied),
            _ => {
                self.clipboard = Some(text.to_string());
                Ok(())
            }
        }
    }
}

impl Toast for SimulatedPage {
    fn show(&mut self, message: &str, duration: Duration) {
        self.toasts
            .push(format!("{message} ({}ms)", duration.as_millis()));
    }
}

impl Viewport for SimulatedPage {
    fn observe(&mut self, index: usize) {
        self.observed.insert(index);
    }

    fn unobserve(&mut self, index: usize) {
        self.observed.remove(&index);
    }
}

impl Thumbnails for SimulatedPage {
    fn set_source(&mut self, index: usize, src: &str) {
        self.thumbnails.push((index, src.to_string()));
    }
}

impl ViewerHost for SimulatedPage {
    fn toast(&mut self) -> Option<&mut dyn Toast> {
        if self.toast_surface {
            Some(self as &mut dyn Toast)
        } else {
            None
        }
    }
}

/// Deliver every queued task to the viewer, including tasks queued while
/// delivering. Returns the number delivered.
pub fn run_until_idle(viewer: &mut Viewer<SimulatedPage>) -> usize {
    let mut delivered = 0;
    while let Some(task) = viewer.host_mut().next_task() {
        delivered += 1;
        debug!(?task, "delivering task");
        match task {
            Task::FragmentChanged => viewer.on_fragment_changed(),
            Task::IdleTick(token) => viewer.on_idle_tick(token),
            Task::ModalHidden => {
                viewer.host_mut().finish_hide();
                viewer.on_modal_hidden();
            }
            Task::ClipboardResult(result) => {
                let page = viewer.host_mut();
                if let (Ok(()), Some(text)) = (&result, page.clipboard_in_flight.take()) {
                    page.clipboard = Some(text);
                }
                viewer.on_clipboard_result(result);
            }
            Task::Intersection {
                index,
                intersecting,
            } => viewer.on_intersection(index, intersecting),
        }
    }
    delivered
}

// =============================================================================
// Scripts
// =============================================================================

fn default_start() -> String {
    "/".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Address the page is loaded with.
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_toml(content: &str) -> Result<Self, SessionError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

/// One visitor or browser action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// Thumbnail click.
    Open { index: usize },
    Navigate { index: usize },
    Prev,
    Next,
    Key { key: String },
    Swipe { dx: f64, dy: f64 },
    Tap,
    Click { target: Click },
    /// Close button or backdrop click on the modal itself.
    Dismiss,
    Back,
    Forward,
    Goto { href: String },
    Share,
    /// Change how the clipboard behaves for later shares.
    Clipboard { mode: ClipboardMode },
    /// Scroll the gallery so thumbnails `first..=last` are in view.
    Scroll { first: usize, last: usize },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Open { index } => write!(f, "open {index}"),
            Step::Navigate { index } => write!(f, "navigate {index}"),
            Step::Prev => write!(f, "prev"),
            Step::Next => write!(f, "next"),
            Step::Key { key } => write!(f, "key {key}"),
            Step::Swipe { dx, dy } => write!(f, "swipe dx={dx} dy={dy}"),
            Step::Tap => write!(f, "tap"),
            Step::Click { target } => write!(f, "click {target:?}"),
            Step::Dismiss => write!(f, "dismiss"),
            Step::Back => write!(f, "back"),
            Step::Forward => write!(f, "forward"),
            Step::Goto { href } => write!(f, "goto {href}"),
            Step::Share => write!(f, "share"),
            Step::Clipboard { mode } => write!(f, "clipboard {mode:?}"),
            Step::Scroll { first, last } => write!(f, "scroll {first}..={last}"),
        }
    }
}

/// Viewer snapshot after one step.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub label: String,
    pub state: ViewerState,
    pub slug: Option<String>,
    pub href: String,
    /// Toasts shown during this step.
    pub toasts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    pub entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }
}

const SWIPE_ORIGIN: TouchPoint = TouchPoint { x: 200.0, y: 200.0 };

/// Apply one step to the viewer, without draining the task queue.
pub fn apply_step(viewer: &mut Viewer<SimulatedPage>, step: &Step) {
    match step {
        Step::Open { index } => viewer.open(*index),
        Step::Navigate { index } => viewer.navigate(*index),
        Step::Prev => viewer.prev(),
        Step::Next => viewer.next(),
        Step::Key { key } => {
            let key: Key = match key.parse() {
                Ok(key) => key,
                Err(never) => match never {},
            };
            viewer.on_key(&key);
        }
        Step::Swipe { dx, dy } => {
            viewer.on_touch_start(SWIPE_ORIGIN);
            viewer.on_touch_move(TouchPoint::new(SWIPE_ORIGIN.x + dx, SWIPE_ORIGIN.y + dy));
            viewer.on_touch_end();
        }
        Step::Tap => {
            viewer.on_touch_start(SWIPE_ORIGIN);
            viewer.on_touch_end();
        }
        Step::Click { target } => viewer.on_click(*target),
        Step::Dismiss => viewer.dismiss(),
        Step::Back => {
            viewer.host_mut().back();
        }
        Step::Forward => {
            viewer.host_mut().forward();
        }
        Step::Goto { href } => viewer.host_mut().goto(href),
        Step::Share => {
            viewer.share();
        }
        Step::Clipboard { mode } => viewer.host_mut().clipboard_mode = *mode,
        Step::Scroll { first, last } => viewer.host_mut().scroll_into_view(*first, *last),
    }
}

/// Load the page at `script.start`, run every step, and record the viewer
/// after load and after each step settles.
pub fn replay(catalog: Arc<Catalog>, config: &ViewerConfig, script: &Script) -> Transcript {
    let mut viewer = Viewer::new(catalog, config, SimulatedPage::new(&script.start));
    let mut transcript = Transcript::default();

    viewer.init();
    run_until_idle(&mut viewer);
    record(&mut transcript, &viewer, "load".to_string());

    for step in &script.steps {
        apply_step(&mut viewer, step);
        run_until_idle(&mut viewer);
        record(&mut transcript, &viewer, step.to_string());
    }

    transcript
}

/// Load a script, catalog and config from disk and replay the script.
pub fn replay_files(
    script: &Path,
    catalog: &Path,
    config: &Path,
) -> Result<Transcript, SessionError> {
    let script = Script::load(script)?;
    let catalog = Catalog::load(catalog)?;
    let config = load_config(config)?;
    info!(
        photos = catalog.len(),
        steps = script.steps.len(),
        start = %script.start,
        "replaying session"
    );
    Ok(replay(Arc::new(catalog), &config, &script))
}

fn record(transcript: &mut Transcript, viewer: &Viewer<SimulatedPage>, label: String) {
    let page = viewer.host();
    let seen: usize = transcript.entries.iter().map(|e| e.toasts.len()).sum();
    let state = viewer.state();
    transcript.entries.push(TranscriptEntry {
        label,
        state,
        slug: state
            .open_index()
            .and_then(|i| viewer.catalog().slug_for(i)),
        href: page.href(),
        toasts: page.toasts.iter().skip(seen).cloned().collect(),
    });
}
