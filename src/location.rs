//! Address-bar value type and the deep-link fragment format.
//!
//! A deep link is `<path>?<query>#photo=<slug>`. Only the fragment carries
//! viewer state; path and query belong to the page and are preserved across
//! every write the viewer makes.

use crate::slug;
use std::fmt;

/// Key of the only fragment parameter the viewer reads or writes.
pub const FRAGMENT_KEY: &str = "photo";

/// A parsed `path?query#fragment` triple.
///
/// `query` keeps its leading `?` (or is empty) so it can be re-emitted
/// verbatim; `fragment` is stored without the `#`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub query: String,
    pub fragment: Option<String>,
}

impl Location {
    /// Split an href into its parts. Scheme and host, if any, stay in `path`.
    pub fn parse(href: &str) -> Self {
        let (rest, fragment) = match href.split_once('#') {
            Some((rest, frag)) => (rest, Some(frag.to_string())),
            None => (href, None),
        };
        let (path, query) = match rest.find('?') {
            Some(pos) => (&rest[..pos], &rest[pos..]),
            None => (rest, ""),
        };
        Self {
            path: path.to_string(),
            query: query.to_string(),
            fragment,
        }
    }

    /// Copy of this location with the fragment replaced (or removed).
    pub fn with_fragment(&self, fragment: Option<String>) -> Self {
        Self {
            fragment,
            ..self.clone()
        }
    }

    /// Copy of this location pointing at `slug`.
    pub fn with_deep_link(&self, slug: &str) -> Self {
        self.with_fragment(Some(deep_link_fragment(slug)))
    }

    /// Resolve an href typed into the address bar against this location.
    ///
    /// `#x` keeps path and query, `?q` keeps the path, anything else replaces all.
    pub fn resolve(&self, href: &str) -> Self {
        if let Some(frag) = href.strip_prefix('#') {
            self.with_fragment(Some(frag.to_string()))
        } else if href.starts_with('?') {
            let parsed = Self::parse(href);
            Self {
                path: self.path.clone(),
                ..parsed
            }
        } else {
            Self::parse(href)
        }
    }

    pub fn href(&self) -> String {
        self.to_string()
    }

    /// Slug named by the fragment, if the fragment is a well-formed deep link.
    pub fn deep_link(&self) -> Option<&str> {
        self.fragment.as_deref().and_then(parse_deep_link)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.path, self.query)?;
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

/// Fragment text (without `#`) for a slug: `photo=<slug>`.
pub fn deep_link_fragment(slug: &str) -> String {
    format!("{FRAGMENT_KEY}={slug}")
}

/// Parse a fragment (with or without its leading `#`) of the exact shape
/// `photo=<slug>`. Anything else, including surrounding whitespace, extra
/// parameters or a malformed slug, is not a deep link.
pub fn parse_deep_link(fragment: &str) -> Option<&str> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let (key, value) = fragment.split_once('=')?;
    (key == FRAGMENT_KEY && slug::is_linkable(value)).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_all_parts() {
        let loc = Location::parse("/gallery/index.html?sort=date#photo=dawn");
        assert_eq!(loc.path, "/gallery/index.html");
        assert_eq!(loc.query, "?sort=date");
        assert_eq!(loc.fragment.as_deref(), Some("photo=dawn"));
        assert_eq!(loc.href(), "/gallery/index.html?sort=date#photo=dawn");
    }

    #[test]
    fn parse_without_query_or_fragment() {
        let loc = Location::parse("https://example.com/album/");
        assert_eq!(loc.path, "https://example.com/album/");
        assert_eq!(loc.query, "");
        assert_eq!(loc.fragment, None);
    }

    #[test]
    fn question_mark_inside_fragment_is_not_a_query() {
        let loc = Location::parse("/a#photo=x?y");
        assert_eq!(loc.path, "/a");
        assert_eq!(loc.query, "");
        assert_eq!(loc.fragment.as_deref(), Some("photo=x?y"));
    }

    #[test]
    fn empty_fragment_is_kept_distinct_from_none() {
        assert_eq!(Location::parse("/a#").fragment.as_deref(), Some(""));
        assert_eq!(Location::parse("/a#").href(), "/a#");
    }

    #[test]
    fn with_fragment_none_restores_base() {
        let loc = Location::parse("/album/?x=1#photo=dawn");
        assert_eq!(loc.with_fragment(None).href(), "/album/?x=1");
    }

    #[test]
    fn with_deep_link_formats_fragment() {
        let loc = Location::parse("/album/");
        assert_eq!(loc.with_deep_link("dawn").href(), "/album/#photo=dawn");
    }

    #[test]
    fn resolve_relative_hrefs() {
        let loc = Location::parse("/album/?x=1#photo=a");
        assert_eq!(loc.resolve("#photo=b").href(), "/album/?x=1#photo=b");
        assert_eq!(loc.resolve("?y=2").href(), "/album/?y=2");
        assert_eq!(loc.resolve("/other/").href(), "/other/");
    }

    #[test]
    fn parse_deep_link_accepts_exact_shape() {
        assert_eq!(parse_deep_link("photo=dawn"), Some("dawn"));
        assert_eq!(parse_deep_link("#photo=dawn-2"), Some("dawn-2"));
    }

    #[test]
    fn parse_deep_link_rejects_everything_else() {
        for fragment in [
            "",
            "photo=",
            "photo",
            "image=dawn",
            "photo=Dawn",
            "photo=-dawn",
            "photo=da--wn",
            "photo=dawn&x=1",
            " photo=dawn",
            "photo=dawn=2",
        ] {
            assert_eq!(parse_deep_link(fragment), None, "{fragment:?}");
        }
    }

    #[test]
    fn deep_link_reads_fragment() {
        assert_eq!(Location::parse("/#photo=b").deep_link(), Some("b"));
        assert_eq!(Location::parse("/").deep_link(), None);
    }
}
