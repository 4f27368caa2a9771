//! Slug normalization and validation.
//!
//! A slug is the human-readable identifier that ends up in the address bar
//! (`#photo=<slug>`). Explicit slugs come from the catalog verbatim; every
//! other photo gets one derived from its filename stem:
//!
//! ```text
//! 001-Dawn Over Lake.JPG  →  001-dawn-over-lake
//! Café_Terrace.webp       →  caf-terrace
//! ```
//!
//! Normalization is lossy and ASCII-only. Non-ASCII letters are
//! treated like any other separator, and the output alphabet is exactly the
//! alphabet [`is_linkable`] accepts, so every derived slug that is non-empty
//! survives a round trip through the fragment parser.

/// Normalize arbitrary text into a URL-safe slug.
///
/// - Lowercases ASCII letters
/// - Replaces every run of characters outside `[a-z0-9]` with a single dash
/// - Strips leading and trailing dashes
pub fn normalize(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().map(|c| c.to_ascii_lowercase()) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Whether `slug` has the exact shape a deep link can carry:
/// `[a-z0-9]+(-[a-z0-9]+)*`.
pub fn is_linkable(slug: &str) -> bool {
    !slug.is_empty()
        && slug.split('-').all(|part| {
            !part.is_empty()
                && part
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}
