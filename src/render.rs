//! Overlay markup for the current photo.
//!
//! Rendered with [Maud](https://maud.lambda.xyz/) like the gallery pages, so
//! every caption and metadata value is auto-escaped. A browser host can
//! inject the result into the modal body on each `render` call.
//!
//! ```text
//! figure.lightbox-photo
//! ├── img              src, alt = caption or slug
//! ├── figcaption       only when there is a caption
//! └── dl.photo-meta    date, camera, lens, settings, location (non-empty only)
//! nav.lightbox-nav
//! ├── button.prev      hidden on the first photo
//! ├── span.counter     "2 / 12"
//! ├── button.next      hidden on the last photo
//! └── button.share
//! ```

use crate::catalog::Catalog;
use crate::viewer::PhotoView;
use maud::{Markup, html};

/// View of the photo with `slug`, for rendering outside a running viewer.
pub fn view_for_slug(catalog: &Catalog, slug: &str, asset_base: &str) -> Option<PhotoView> {
    let index = catalog.position(slug)?;
    PhotoView::at(catalog, index, asset_base)
}

/// Metadata rows shown under the photo, in display order. Empty values are dropped.
pub fn metadata_rows(view: &PhotoView) -> Vec<(&'static str, &str)> {
    let record = &view.record;
    [
        ("Date", record.date.as_deref()),
        ("Camera", record.camera.as_deref()),
        ("Lens", record.lens.as_deref()),
        ("Settings", record.settings.as_deref()),
        ("Location", record.location.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| (label, v))
    })
    .collect()
}

/// Markup for one photo inside the overlay.
pub fn render_overlay(view: &PhotoView) -> Markup {
    let caption = view
        .record
        .caption
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let alt = caption.unwrap_or(&view.slug);
    let rows = metadata_rows(view);
    let counter = format!("{} / {}", view.index + 1, view.count);

    html! {
        figure.lightbox-photo data-slug=(view.slug) {
            img src=(view.src) alt=(alt);
            @if let Some(caption) = caption {
                figcaption { (caption) }
            }
            @if !rows.is_empty() {
                dl.photo-meta {
                    @for (label, value) in &rows {
                        dt { (label) }
                        dd { (value) }
                    }
                }
            }
        }
        nav.lightbox-nav {
            button.prev type="button" aria-label="Previous photo" hidden[!view.has_prev] { "‹" }
            span.counter { (counter) }
            button.next type="button" aria-label="Next photo" hidden[!view.has_next] { "›" }
            button.share type="button" { "Copy link" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PhotoRecord;

    fn view(record: PhotoRecord, index: usize, count: usize) -> PhotoView {
        PhotoView {
            index,
            count,
            slug: "dawn".to_string(),
            src: "photos/001-dawn.jpg".to_string(),
            record,
            has_prev: index > 0,
            has_next: index + 1 < count,
        }
    }

    #[test]
    fn renders_image_and_counter() {
        let html = render_overlay(&view(PhotoRecord::new("001-dawn.jpg"), 1, 3)).into_string();
        assert!(html.contains(r#"src="photos/001-dawn.jpg""#));
        assert!(html.contains(r#"alt="dawn""#));
        assert!(html.contains(r#"data-slug="dawn""#));
        assert!(html.contains("2 / 3"));
        assert!(!html.contains("figcaption"));
        assert!(!html.contains("photo-meta"));
    }

    #[test]
    fn boundary_buttons_are_hidden() {
        let first = render_overlay(&view(PhotoRecord::new("a.jpg"), 0, 2)).into_string();
        assert!(first.contains(r#"aria-label="Previous photo" hidden>"#));
        assert!(first.contains(r#"aria-label="Next photo">"#));

        let last = render_overlay(&view(PhotoRecord::new("a.jpg"), 1, 2)).into_string();
        assert!(last.contains(r#"aria-label="Previous photo">"#));
        assert!(last.contains(r#"aria-label="Next photo" hidden>"#));
    }

    #[test]
    fn caption_is_used_for_alt_text() {
        let record = PhotoRecord {
            caption: Some("First light".to_string()),
            ..PhotoRecord::new("a.jpg")
        };
        let html = render_overlay(&view(record, 0, 1)).into_string();
        assert!(html.contains("<figcaption>First light</figcaption>"));
        assert!(html.contains(r#"alt="First light""#));
    }

    #[test]
    fn metadata_skips_empty_fields() {
        let record = PhotoRecord {
            camera: Some("X100V".to_string()),
            lens: Some("  ".to_string()),
            location: Some("Lisbon".to_string()),
            ..PhotoRecord::new("a.jpg")
        };
        let v = view(record, 0, 1);
        assert_eq!(metadata_rows(&v), vec![("Camera", "X100V"), ("Location", "Lisbon")]);
        let html = render_overlay(&v).into_string();
        assert!(html.contains("<dt>Camera</dt><dd>X100V</dd>"));
        assert!(!html.contains("Lens"));
    }

    #[test]
    fn view_for_slug_finds_photo() {
        let catalog = Catalog::new(vec![
            PhotoRecord::new("001-dawn.jpg").with_slug("dawn"),
            PhotoRecord::new("002-dusk.jpg"),
        ]);
        let view = view_for_slug(&catalog, "002-dusk", "/img").unwrap();
        assert_eq!(view.index, 1);
        assert_eq!(view.src, "/img/002-dusk.jpg");
        assert!(view.has_prev && !view.has_next);
        assert!(view_for_slug(&catalog, "noon", "/img").is_none());
    }

    #[test]
    fn caption_is_escaped() {
        let record = PhotoRecord {
            caption: Some("<script>alert('xss')</script>".to_string()),
            ..PhotoRecord::new("a.jpg")
        };
        let html = render_overlay(&view(record, 0, 1)).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
