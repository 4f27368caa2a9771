//! CLI output formatting.
//!
//! Each command has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.
//!
//! ## Check
//!
//! ```text
//! Photos
//! 001 dawn
//!     Source: 001-dawn.jpg
//!     Caption: First light
//! 002 002-harbour
//!     Source: 002-harbour.jpg
//!
//! Warnings
//!     Duplicate slug "dawn": 001, 003
//!     004 has no deep link: slug "Dawn_2" is not linkable
//!
//! 4 photos, 2 warnings
//! ```
//!
//! ## Replay
//!
//! ```text
//! load            open 002 b  /album/#photo=b
//! key ArrowRight  open 003 c  /album/#photo=c
//! share           open 003 c  /album/#photo=c
//!     Toast: Link copied to clipboard (2000ms)
//! back            open 002 b  /album/#photo=b
//! ```

use crate::catalog::{Catalog, slug_for};
use crate::session::{Transcript, TranscriptEntry};

/// Format a 0-based index as a 1-based, 3-digit zero-padded position.
fn format_index(index: usize) -> String {
    format!("{:0>3}", index + 1)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ============================================================================
// Check
// ============================================================================

/// Problems that stop photos from being deep-linked reliably.
pub fn catalog_warnings(catalog: &Catalog) -> Vec<String> {
    let mut warnings = Vec::new();
    for (slug, indices) in catalog.duplicate_slugs() {
        let positions: Vec<String> = indices.iter().map(|&i| format_index(i)).collect();
        warnings.push(format!(
            "Duplicate slug \"{slug}\": {}",
            positions.join(", ")
        ));
    }
    for (i, photo) in catalog.photos.iter().enumerate() {
        let slug = slug_for(photo);
        if slug.is_empty() {
            warnings.push(format!(
                "{} has no deep link: no slug can be derived from \"{}\"",
                format_index(i),
                photo.filename
            ));
        } else if !catalog.has_deep_link(i) {
            warnings.push(format!(
                "{} has no deep link: slug \"{slug}\" is not linkable",
                format_index(i)
            ));
        }
    }
    warnings
}

pub fn format_check_output(catalog: &Catalog) -> Vec<String> {
    let mut lines = vec!["Photos".to_string()];
    for (i, photo) in catalog.photos.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i), slug_for(photo)));
        lines.push(format!("{}Source: {}", indent(1), photo.filename));
        if let Some(caption) = photo.caption.as_deref().filter(|c| !c.trim().is_empty()) {
            lines.push(format!("{}Caption: {}", indent(1), truncate(caption.trim(), 60)));
        }
    }

    let warnings = catalog_warnings(catalog);
    if !warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in &warnings {
            lines.push(format!("{}{warning}", indent(1)));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} photo{}, {} warning{}",
        catalog.len(),
        plural(catalog.len()),
        warnings.len(),
        plural(warnings.len())
    ));
    lines
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

pub fn print_check_output(catalog: &Catalog) {
    for line in format_check_output(catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// Replay
// ============================================================================

fn state_column(entry: &TranscriptEntry) -> String {
    match (entry.state.open_index(), entry.slug.as_deref()) {
        (Some(i), Some(slug)) => format!("open {} {}", format_index(i), slug),
        (Some(i), None) => format!("open {}", format_index(i)),
        _ => "closed".to_string(),
    }
}

pub fn format_transcript(transcript: &Transcript) -> Vec<String> {
    let label_width = transcript
        .entries
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);
    let states: Vec<String> = transcript.entries.iter().map(state_column).collect();
    let state_width = states.iter().map(|s| s.chars().count()).max().unwrap_or(0);

    let mut lines = Vec::new();
    for (entry, state) in transcript.entries.iter().zip(&states) {
        lines.push(format!(
            "{:<label_width$}  {:<state_width$}  {}",
            entry.label, state, entry.href
        ));
        for toast in &entry.toasts {
            lines.push(format!("{}Toast: {toast}", indent(1)));
        }
    }
    lines
}

pub fn print_transcript(transcript: &Transcript) {
    for line in format_transcript(transcript) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PhotoRecord;
    use crate::viewer::ViewerState;

    #[test]
    fn format_index_is_one_based_and_padded() {
        assert_eq!(format_index(0), "001");
        assert_eq!(format_index(41), "042");
        assert_eq!(format_index(1233), "1234");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("café au lait", 4), "café...");
    }

    // =========================================================================
    // Check
    // =========================================================================

    #[test]
    fn check_lists_photos_with_sources() {
        let catalog = Catalog::new(vec![
            PhotoRecord {
                caption: Some("First light".to_string()),
                ..PhotoRecord::new("001-dawn.jpg").with_slug("dawn")
            },
            PhotoRecord::new("002-harbour.jpg"),
        ]);
        let lines = format_check_output(&catalog);
        assert_eq!(
            lines,
            vec![
                "Photos",
                "001 dawn",
                "    Source: 001-dawn.jpg",
                "    Caption: First light",
                "002 002-harbour",
                "    Source: 002-harbour.jpg",
                "",
                "2 photos, 0 warnings",
            ]
        );
    }

    #[test]
    fn check_warns_about_unlinkable_and_duplicate_slugs() {
        let catalog = Catalog::new(vec![
            PhotoRecord::new("a.jpg"),
            PhotoRecord::new("b.jpg").with_slug("Not Linkable"),
            PhotoRecord::new("a.png"),
            PhotoRecord::new("日本.jpg"),
        ]);
        let warnings = catalog_warnings(&catalog);
        assert_eq!(
            warnings,
            vec![
                "Duplicate slug \"a\": 001, 003",
                "002 has no deep link: slug \"Not Linkable\" is not linkable",
                "004 has no deep link: no slug can be derived from \"日本.jpg\"",
            ]
        );
        let lines = format_check_output(&catalog);
        assert!(lines.contains(&"Warnings".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("4 photos, 3 warnings"));
    }

    // =========================================================================
    // Replay
    // =========================================================================

    fn entry(label: &str, current: Option<usize>, open: bool, slug: Option<&str>, href: &str) -> TranscriptEntry {
        TranscriptEntry {
            label: label.to_string(),
            state: ViewerState { current, open },
            slug: slug.map(str::to_string),
            href: href.to_string(),
            toasts: Vec::new(),
        }
    }

    #[test]
    fn transcript_aligns_columns() {
        let mut share = entry("share", Some(1), true, Some("b"), "/#photo=b");
        share.toasts.push("Link copied to clipboard (2000ms)".to_string());
        let transcript = Transcript {
            entries: vec![
                entry("load", None, false, None, "/"),
                entry("open 1", Some(1), true, Some("b"), "/#photo=b"),
                share,
                entry("dismiss", Some(1), false, None, "/"),
            ],
        };
        assert_eq!(
            format_transcript(&transcript),
            vec![
                "load     closed      /",
                "open 1   open 002 b  /#photo=b",
                "share    open 002 b  /#photo=b",
                "    Toast: Link copied to clipboard (2000ms)",
                "dismiss  closed      /",
            ]
        );
    }

    #[test]
    fn empty_transcript_formats_to_nothing() {
        assert!(format_transcript(&Transcript::default()).is_empty());
    }
}
