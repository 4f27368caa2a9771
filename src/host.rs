//! Collaborator interfaces the viewer drives.
//!
//! The viewer never touches a DOM. Everything it needs from its environment
//! is expressed as one of these traits, and a host (a `web-sys` binding, the
//! [`SimulatedPage`](crate::session::SimulatedPage), a test fake) implements
//! them. Notifications flow the other way: the host calls the matching
//! `Viewer::on_*` method when the event lands.
//!
//! | Trait | Consumed as | Host calls back with |
//! |-------|-------------|----------------------|
//! | [`AddressBar`] | read / replace the location | `Viewer::on_fragment_changed` |
//! | [`IdleScheduler`] | request a later turn | `Viewer::on_idle_tick` |
//! | [`Modal`] | show / hide the overlay | `Viewer::on_modal_hidden` |
//! | [`ImageLoader`] | fire-and-forget prefetch | nothing |
//! | [`PhotoRenderer`] | draw the current photo | nothing |
//! | [`Clipboard`] | async write, sync fallback | `Viewer::on_clipboard_result` |
//! | [`Toast`] | transient notification | nothing |
//! | [`Viewport`] | watch thumbnails for intersection | `Viewer::on_intersection` |
//! | [`Thumbnails`] | set a thumbnail's real source | nothing |

use crate::address::SuppressionToken;
use crate::location::Location;
use crate::viewer::PhotoView;
use std::time::Duration;
use thiserror::Error;

/// The browser address bar.
pub trait AddressBar {
    fn location(&self) -> Location;

    /// Replace the current history entry. Must not push a new one.
    fn replace(&mut self, location: &Location);
}

/// Schedules a turn of the event loop after the current one.
pub trait IdleScheduler {
    /// The host must call `Viewer::on_idle_tick(token)` on a later turn,
    /// after any change notification caused by the preceding write.
    fn request_idle_tick(&mut self, token: SuppressionToken);
}

/// The modal dialog widget hosting the overlay.
pub trait Modal {
    fn show(&mut self);

    /// Start hiding. Once fully hidden the host calls `Viewer::on_modal_hidden`.
    ///
    /// Every `hide` that starts hiding is answered by exactly one hidden
    /// notification, even when `show` is called before the hide finishes.
    fn hide(&mut self);
}

pub trait ImageLoader {
    /// Start loading `url` so it is likely cached. Outcome is never reported.
    fn prefetch(&mut self, url: &str);
}

pub trait PhotoRenderer {
    fn render(&mut self, view: &PhotoView);
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard API unavailable")]
    Unavailable,
    #[error("clipboard write denied")]
    Denied,
}

pub trait Clipboard {
    /// Begin an asynchronous clipboard write.
    ///
    /// `Ok` means the write is in flight and its outcome will arrive through
    /// `Viewer::on_clipboard_result`. `Err` means it could not start at all.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Synchronous select-and-copy through a temporary off-screen text field.
    fn copy_via_selection(&mut self, text: &str) -> Result<(), ClipboardError>;
}

pub trait Toast {
    fn show(&mut self, message: &str, duration: Duration);
}

/// Viewport-intersection registration for gallery thumbnails, keyed by
/// catalog index.
pub trait Viewport {
    /// Start watching thumbnail `index`. The host calls
    /// `Viewer::on_intersection` whenever it enters or leaves the viewport
    /// (with whatever margin the host considers "approaching").
    fn observe(&mut self, index: usize);

    fn unobserve(&mut self, index: usize);
}

/// The gallery's thumbnail elements.
pub trait Thumbnails {
    /// Replace the placeholder of thumbnail `index` with its real image.
    fn set_source(&mut self, index: usize, src: &str);
}

/// Everything a [`Viewer`](crate::viewer::Viewer) needs from its environment.
///
/// The toast surface is optional; hosts without one keep the default.
pub trait ViewerHost:
    AddressBar
    + IdleScheduler
    + Modal
    + ImageLoader
    + PhotoRenderer
    + Clipboard
    + Viewport
    + Thumbnails
{
    fn toast(&mut self) -> Option<&mut dyn Toast> {
        None
    }
}
