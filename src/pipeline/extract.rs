//! Image extraction: pull embedded raster images and per-page text context
//! out of the reference PDF via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread designed for blocking operations.
//!
//! ## Why is a missing pdfium library not an error?
//!
//! Figures are supporting material, not the deck itself. When no pdfium
//! shared library can be bound, extraction degrades to an empty catalog with
//! a console advisory and the run continues: the model simply writes slides
//! without `image_refs`. A PDF that pdfium *can* be bound against but cannot
//! parse is different — the caller resolved an asset the pipeline cannot
//! read, and that surfaces as [`DeckGenError::CorruptPdf`].
//!
//! ## Resource scoping
//!
//! The document handle and every decoded pixel buffer live inside the
//! blocking closure; both are dropped before it returns, so peak memory is
//! bounded by one page's images regardless of per-image failures.

use crate::config::DeckConfig;
use crate::error::DeckGenError;
use crate::output::{ImageCatalog, ImageEntry};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Extract embedded images from the reference PDF into the image directory
/// and return the catalog keyed by deterministic id.
///
/// Ids have the form `page-<3-digit-page>-image-<2-digit-index>`, so the
/// catalog's lexicographic key order equals (page, image-index) extraction
/// order.
pub async fn extract_images(
    pdf_path: &Path,
    config: &DeckConfig,
) -> Result<ImageCatalog, DeckGenError> {
    let path = pdf_path.to_path_buf();
    let image_dir = config.image_dir();
    let excerpt_max = config.excerpt_max_chars;

    tokio::task::spawn_blocking(move || extract_images_blocking(&path, &image_dir, excerpt_max))
        .await
        .map_err(|e| DeckGenError::Internal(format!("Extraction task panicked: {e}")))?
}

/// Blocking implementation of image extraction.
fn extract_images_blocking(
    pdf_path: &Path,
    image_dir: &Path,
    excerpt_max: usize,
) -> Result<ImageCatalog, DeckGenError> {
    let pdfium = match bind_pdfium() {
        Ok(pdfium) => pdfium,
        Err(e) => {
            warn!(
                "pdfium library unavailable ({e:?}); skipping PDF image extraction. \
                 Install a pdfium shared library to include figures from the reference PDF."
            );
            return Ok(ImageCatalog::new());
        }
    };

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| DeckGenError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    std::fs::create_dir_all(image_dir).map_err(|e| DeckGenError::CacheWriteFailed {
        path: image_dir.to_path_buf(),
        source: e,
    })?;

    let mut catalog = ImageCatalog::new();

    for (page_index, page) in document.pages().iter().enumerate() {
        let page_num = page_index + 1;

        let page_text = page.text().map(|t| t.all()).unwrap_or_default();
        let context = excerpt(&page_text, excerpt_max);

        let mut image_index = 0usize;
        for object in page.objects().iter() {
            let Some(image_object) = object.as_image_object() else {
                continue;
            };
            image_index += 1;
            let id = image_id(page_num, image_index);

            // Raw is the embedded raster as stored; fall back to the
            // processed form for encodings pdfium only exposes post-filter.
            let decoded: DynamicImage = match image_object
                .get_raw_image()
                .or_else(|_| image_object.get_processed_image(&document))
            {
                Ok(img) => img,
                Err(e) => {
                    warn!("{id}: could not decode embedded image ({e:?}); skipping");
                    continue;
                }
            };

            // Dimensions come from the original listing, before any
            // colour-space conversion.
            let (width, height) = (decoded.width(), decoded.height());

            let to_save = if needs_rgb_conversion(decoded.color()) {
                DynamicImage::ImageRgb8(decoded.to_rgb8())
            } else {
                decoded
            };

            let image_path = image_dir.join(format!("{id}.png"));
            if let Err(e) = to_save.save_with_format(&image_path, image::ImageFormat::Png) {
                warn!("{id}: could not write {} ({e}); skipping", image_path.display());
                continue;
            }
            debug!("{id}: {width}x{height} px → {}", image_path.display());

            catalog.insert(
                id,
                ImageEntry {
                    src: image_path,
                    page: page_num,
                    width,
                    height,
                    context: context.clone(),
                },
            );
            // `to_save` drops here, keeping peak memory to one image at a time.
        }
    }

    if catalog.is_empty() {
        info!("No extractable images found in the reference PDF");
    } else {
        info!(
            "Extracted {} images from the reference PDF; slides may reference them via image_refs",
            catalog.len()
        );
    }

    Ok(catalog)
}

/// Bind a pdfium shared library: working directory first, then the system.
fn bind_pdfium() -> Result<Pdfium, PdfiumError> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
}

/// Deterministic catalog id for an image: 3-digit page, 2-digit index.
fn image_id(page_num: usize, image_index: usize) -> String {
    format!("page-{page_num:03}-image-{image_index:02}")
}

/// Whether a decoded buffer must be flattened to plain RGB before saving.
///
/// CMYK-like data (≥ 5 channels) and anything carrying alpha are normalised
/// so every catalog PNG decodes as 3-channel RGB.
fn needs_rgb_conversion(color: image::ColorType) -> bool {
    color.channel_count() >= 5 || color.has_alpha()
}

/// Collapse whitespace runs to single spaces and truncate to at most
/// `max_chars` characters, ellipsis-terminated when anything was cut.
fn excerpt(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let mut cut: String = collapsed.chars().take(max_chars.saturating_sub(1)).collect();
    // Break at a word boundary rather than mid-word, when one exists.
    if let Some(idx) = cut.rfind(' ') {
        cut.truncate(idx);
    }
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_ids_are_zero_padded() {
        assert_eq!(image_id(1, 1), "page-001-image-01");
        assert_eq!(image_id(12, 3), "page-012-image-03");
        assert_eq!(image_id(123, 45), "page-123-image-45");
    }

    #[test]
    fn id_order_matches_extraction_order() {
        // Lexicographic id order must equal (page, index) order.
        let ids = [
            image_id(1, 1),
            image_id(1, 2),
            image_id(2, 1),
            image_id(10, 1),
        ];
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn rgb_conversion_predicate() {
        use image::ColorType;
        assert!(needs_rgb_conversion(ColorType::Rgba8));
        assert!(needs_rgb_conversion(ColorType::La8));
        assert!(!needs_rgb_conversion(ColorType::Rgb8));
        assert!(!needs_rgb_conversion(ColorType::L8));
    }

    #[test]
    fn excerpt_collapses_whitespace() {
        assert_eq!(excerpt("  a\tb\n\nc  ", 240), "a b c");
    }

    #[test]
    fn short_excerpt_is_verbatim_after_collapsing() {
        let text = "Install the anode rod before first use.";
        assert_eq!(excerpt(text, 240), text);
    }

    #[test]
    fn long_excerpt_is_truncated_with_single_ellipsis() {
        let word = "maintenance ";
        let text = word.repeat(40); // 480 chars collapsed
        let out = excerpt(&text, 240);
        assert!(out.chars().count() <= 240, "len = {}", out.chars().count());
        assert!(out.ends_with('…'));
        assert_eq!(out.matches('…').count(), 1);
        // Word-boundary cut: no trailing fragment of "maintenance".
        assert!(out.trim_end_matches('…').ends_with("maintenance"));
    }

    #[test]
    fn excerpt_exactly_at_limit_is_untouched() {
        let text = "x".repeat(240);
        assert_eq!(excerpt(&text, 240), text);
    }

    #[test]
    fn unbroken_token_is_cut_mid_run() {
        let text = "y".repeat(500);
        let out = excerpt(&text, 240);
        assert_eq!(out.chars().count(), 240);
        assert!(out.ends_with('…'));
    }
}
