//! # Simple Gal Lightbox
//!
//! The photo viewer overlay for simple-gal portfolios, with deep links. Opening
//! a photo writes `#photo=<slug>` into the address bar, loading a page with
//! such a fragment opens the viewer on that photo, and browser back/forward
//! walk through the viewer without a page reload.
//!
//! # Architecture: One State Machine, Many Inputs
//!
//! ```text
//! thumbnail click ──────────────────────────────┐
//! keys / clicks / swipes ── GestureRouter ── Intent ──┐
//! fragment change ── AddressSync (suppressed?) ───────┤
//!                                                     ▼
//!                                   Viewer: Closed ⇄ Open(i)
//!                                     │ render photo i
//!                                     │ publish #photo=<slug>
//!                                     │ warm i-1, i+1
//!                                     ▼
//!                                   host (address bar, modal, images, clipboard)
//! ```
//!
//! The core never touches a browser. Everything it needs from the page is a
//! trait in [`host`]; a real binding implements those against the DOM, and
//! [`session::SimulatedPage`] implements them in memory for the CLI and tests.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Ordered photo records from a JSON manifest or an image directory |
//! | [`slug`] | Slug normalization and the linkable slug shape |
//! | [`location`] | Address parsing and the `#photo=<slug>` fragment format |
//! | [`host`] | Collaborator traits the viewer drives |
//! | [`viewer`] | The `Closed`/`Open(i)` state machine |
//! | [`address`] | Fragment publishing with self-echo suppression |
//! | [`prefetch`] | Warming neighbouring photos after each navigation |
//! | [`lazy`] | Deferred thumbnail loading on viewport intersection |
//! | [`gesture`] | Keys, clicks and swipes classified into intents |
//! | [`share`] | Copy-link with clipboard fallback and toast |
//! | [`render`] | Overlay markup for one photo, using Maud |
//! | [`config`] | `lightbox.toml` loading, merging over stock defaults, validation |
//! | [`session`] | Simulated page and scripted session replay |
//! | [`output`] | CLI output formatting for transcripts and catalog checks |
//!
//! # Design Decisions
//!
//! ## Replace, Never Push
//!
//! Navigating inside the viewer replaces the current history entry. Only
//! visitor navigation (typing a link, following one) adds entries, so back
//! leaves the viewer at the photo the visitor arrived on.
//!
//! ## Suppression Tokens
//!
//! Every fragment write produces a change notification that must not be
//! mistaken for visitor navigation. [`address::AddressSync`] arms a token
//! carrying a generation number before writing, and the idle tick requested
//! after the write expires only its own generation. Two quick writes can
//! therefore never reopen the window for an echo of the first.
//!
//! ## The Modal Owns Closing
//!
//! Code that wants the viewer gone asks the modal to hide. The viewer state
//! becomes `Closed` and the fragment is cleared only on the hidden notification,
//! whatever asked for the hide.

pub mod address;
pub mod catalog;
pub mod config;
pub mod gesture;
pub mod host;
pub mod lazy;
pub mod location;
pub mod output;
pub mod prefetch;
pub mod render;
pub mod session;
pub mod share;
pub mod slug;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_helpers;
