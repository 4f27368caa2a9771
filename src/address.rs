//! Binding between the viewer state and the address-bar fragment.
//!
//! The viewer writes the fragment (`#photo=<slug>` while open, nothing while
//! closed) and also listens for fragment changes made by someone else: the
//! back/forward buttons, a hand-edited URL, a page loaded with a fragment
//! already set. The host reports both kinds of change through the same
//! notification, so a write made by the viewer comes straight back to it as
//! if it were external. Reprocessing it would navigate again, write again, and
//! loop.
//!
//! # Suppression
//!
//! Every self-write is bracketed by a [`SuppressionToken`]:
//!
//! ```text
//! publish(slug)
//!   arm()                  → token g, suppressed
//!   AddressBar::replace    → host queues "fragment changed"
//!   request_idle_tick(g)   → host queues tick g after the notification
//! ...
//! on_fragment_changed      → suppressed, ignored
//! on_idle_tick(g)          → g is latest, disarmed
//! ```
//!
//! The token is armed *before* the write and expires on a *later* turn, never
//! in the same synchronous turn as the write. Notifications do not consume
//! it: everything delivered between the write and its tick is ignored.
//!
//! Back-to-back writes within one turn re-arm with a new generation. The tick
//! for the earlier write then carries a stale generation and leaves the token
//! armed, so suppression lasts until the tick of the *last* write. A plain
//! boolean cleared by the first tick would instead reopen the window while the
//! second write's notification is still pending.
//!
//! Writes never add history entries; paging through fifty photos must not
//! leave fifty entries on the back stack.

use crate::host::{AddressBar, IdleScheduler};
use crate::location::Location;
use tracing::{debug, trace};

/// Handle identifying one self-write; returned to the viewer on its idle tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuppressionToken(u64);

impl SuppressionToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct AddressSync {
    generation: u64,
    armed: bool,
}

impl AddressSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the fragment at `slug`.
    pub fn publish<H>(&mut self, host: &mut H, slug: &str)
    where
        H: AddressBar + IdleScheduler + ?Sized,
    {
        let target = host.location().with_deep_link(slug);
        self.write(host, target);
    }

    /// Remove the fragment, keeping path and query.
    pub fn clear<H>(&mut self, host: &mut H)
    where
        H: AddressBar + IdleScheduler + ?Sized,
    {
        let target = host.location().with_fragment(None);
        self.write(host, target);
    }

    fn write<H>(&mut self, host: &mut H, target: Location)
    where
        H: AddressBar + IdleScheduler + ?Sized,
    {
        if host.location() == target {
            trace!(href = %target, "address already current, nothing to write");
            return;
        }
        let token = self.arm();
        debug!(href = %target, generation = token.generation(), "replacing address");
        host.replace(&target);
        host.request_idle_tick(token);
    }

    fn arm(&mut self) -> SuppressionToken {
        self.generation += 1;
        self.armed = true;
        SuppressionToken(self.generation)
    }

    /// Idle-tick expiry. Only the latest write's token disarms suppression.
    pub fn expire(&mut self, token: SuppressionToken) {
        if token.generation() == self.generation {
            self.armed = false;
        } else {
            trace!(
                stale = token.generation(),
                latest = self.generation,
                "stale idle tick, suppression stays armed"
            );
        }
    }

    /// Whether a fragment-change notification arriving now is external.
    pub fn accepts_external(&self) -> bool {
        !self.armed
    }

    pub fn is_suppressed(&self) -> bool {
        self.armed
    }

    /// Slug in the current fragment, if it is a well-formed deep link.
    pub fn parse_current<H>(&self, host: &H) -> Option<String>
    where
        H: AddressBar + ?Sized,
    {
        host.location().deep_link().map(str::to_string)
    }
}
