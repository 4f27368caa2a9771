//! "Copy link" action for the current photo.
//!
//! The preferred path is the asynchronous clipboard API. When it cannot start
//! or rejects, the link is copied with the synchronous select-and-copy
//! fallback instead. Either way the visitor sees the same toast; only when
//! both paths fail is nothing shown.
//!
//! ```text
//! share()                     write_text Ok   → pending, wait for result
//!                             write_text Err  → fallback → toast
//! on_clipboard_result(Ok)                     → toast
//! on_clipboard_result(Err)                    → fallback → toast
//! ```

use crate::config::ShareConfig;
use crate::host::{ClipboardError, ViewerHost};
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of one share attempt, as far as it is known synchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The async write is in flight.
    Pending,
    Copied,
    Failed(ClipboardError),
}

#[derive(Debug, Clone)]
pub struct ShareAction {
    message: String,
    duration: Duration,
    pending: Option<String>,
}

impl ShareAction {
    pub fn new(config: &ShareConfig) -> Self {
        Self {
            message: config.message.clone(),
            duration: Duration::from_millis(config.duration_ms),
            pending: None,
        }
    }

    /// Copy `url` to the clipboard.
    ///
    /// A second share while one is pending replaces it; only the latest URL
    /// is acted upon when a result arrives.
    pub fn share<H>(&mut self, host: &mut H, url: String) -> ShareOutcome
    where
        H: ViewerHost + ?Sized,
    {
        match host.write_text(&url) {
            Ok(()) => {
                debug!(%url, "clipboard write pending");
                self.pending = Some(url);
                ShareOutcome::Pending
            }
            Err(err) => {
                debug!(%url, %err, "clipboard API failed to start, using fallback");
                self.pending = None;
                self.fallback(host, &url)
            }
        }
    }

    /// Continuation of a pending asynchronous write.
    pub fn on_clipboard_result<H>(
        &mut self,
        host: &mut H,
        result: Result<(), ClipboardError>,
    ) -> ShareOutcome
    where
        H: ViewerHost + ?Sized,
    {
        let Some(url) = self.pending.take() else {
            debug!("clipboard result without a pending share");
            return ShareOutcome::Failed(ClipboardError::Unavailable);
        };
        match result {
            Ok(()) => {
                self.notify(host);
                ShareOutcome::Copied
            }
            Err(err) => {
                debug!(%err, "clipboard write rejected, using fallback");
                self.fallback(host, &url)
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn fallback<H>(&self, host: &mut H, url: &str) -> ShareOutcome
    where
        H: ViewerHost + ?Sized,
    {
        match host.copy_via_selection(url) {
            Ok(()) => {
                self.notify(host);
                ShareOutcome::Copied
            }
            Err(err) => {
                warn!(%err, "could not copy link");
                ShareOutcome::Failed(err)
            }
        }
    }

    fn notify<H>(&self, host: &mut H)
    where
        H: ViewerHost + ?Sized,
    {
        match host.toast() {
            Some(toast) => toast.show(&self.message, self.duration),
            None => debug!("no toast surface, link copied silently"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ClipboardMode, SimulatedPage};

    fn action() -> ShareAction {
        ShareAction::new(&ShareConfig::default())
    }

    #[test]
    fn async_write_stays_pending_until_result() {
        let mut page = SimulatedPage::new("/");
        let mut share = action();

        assert_eq!(share.share(&mut page, "/#photo=a".to_string()), ShareOutcome::Pending);
        assert!(share.is_pending());
        assert!(page.toasts.is_empty());

        assert_eq!(share.on_clipboard_result(&mut page, Ok(())), ShareOutcome::Copied);
        assert!(!share.is_pending());
        assert_eq!(page.toasts, vec!["Link copied to clipboard (2000ms)"]);
    }

    #[test]
    fn rejected_write_uses_selection_fallback() {
        let mut page = SimulatedPage::new("/");
        let mut share = action();
        share.share(&mut page, "/#photo=a".to_string());

        let outcome = share.on_clipboard_result(&mut page, Err(ClipboardError::Denied));

        assert_eq!(outcome, ShareOutcome::Copied);
        assert_eq!(page.clipboard.as_deref(), Some("/#photo=a"));
        assert_eq!(page.toasts.len(), 1);
    }

    #[test]
    fn second_share_replaces_pending_url() {
        let mut page = SimulatedPage::new("/");
        let mut share = action();
        share.share(&mut page, "/#photo=a".to_string());
        share.share(&mut page, "/#photo=b".to_string());

        share.on_clipboard_result(&mut page, Err(ClipboardError::Denied));

        assert_eq!(page.clipboard.as_deref(), Some("/#photo=b"));
    }

    #[test]
    fn stray_result_is_reported_as_failure() {
        let mut page = SimulatedPage::new("/");
        let outcome = action().on_clipboard_result(&mut page, Ok(()));
        assert_eq!(outcome, ShareOutcome::Failed(ClipboardError::Unavailable));
        assert!(page.toasts.is_empty());
    }

    #[test]
    fn broken_clipboard_reports_fallback_error() {
        let mut page = SimulatedPage::new("/");
        page.clipboard_mode = ClipboardMode::Broken;
        let outcome = action().share(&mut page, "/#photo=a".to_string());
        assert_eq!(outcome, ShareOutcome::Failed(ClipboardError::Denied));
        assert_eq!(page.clipboard, None);
    }
}
