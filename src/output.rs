//! Data model: slides, the image catalog, and the run result.
//!
//! The catalog is a `BTreeMap` on purpose: catalog ids are zero-padded
//! (`page-001-image-02`), so lexicographic key order is exactly
//! (page, image-index) extraction order. Everything that iterates the
//! catalog — the prompt composer, the renderer, the CLI summary — gets the
//! deterministic ordering for free.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// In-memory mapping from deterministic image id to its extracted metadata.
pub type ImageCatalog = BTreeMap<String, ImageEntry>;

/// Metadata for one image extracted from the reference PDF.
///
/// Created once during extraction and never mutated; the id that keys it in
/// the [`ImageCatalog`] has the form `page-<3-digit-page>-image-<2-digit-index>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Path of the PNG written under the resource image directory.
    pub src: PathBuf,
    /// Source page number, 1-based.
    pub page: usize,
    /// Pixel width of the embedded image as listed in the document.
    pub width: u32,
    /// Pixel height of the embedded image as listed in the document.
    pub height: u32,
    /// Whitespace-collapsed excerpt of the page's text, for model context.
    pub context: String,
}

/// One slide as returned by the generation service.
///
/// Every field is defaulted: the service's output is trusted as-is, so a
/// member missing `title` or `body` becomes an empty slide rather than a
/// deserialisation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Catalog ids of extracted figures to place on this slide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_refs: Option<Vec<String>>,
}

/// The complete result of a deck-generation run.
#[derive(Debug, Clone, Serialize)]
pub struct DeckOutput {
    /// The final HTML document.
    pub html: String,
    /// The slides as parsed from the model response.
    pub slides: Vec<Slide>,
    /// Catalog of images extracted from the reference PDF.
    pub catalog: ImageCatalog,
    /// Timing and count statistics.
    pub stats: RunStats,
}

/// Statistics for a run, for the CLI summary line and logs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub slide_count: usize,
    pub image_count: usize,
    pub extract_duration_ms: u64,
    pub generate_duration_ms: u64,
    pub total_duration_ms: u64,
}
