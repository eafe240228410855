//! Request text for the slide-generation call.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the deck format rules (emphasis,
//!    bullet style, line length) means editing exactly one place.
//!
//! 2. **Testability** — the composer's unit tests inspect these constants
//!    directly without a live API call, so wording regressions are caught.
//!
//! The composer in [`crate::pipeline::compose`] interpolates these blocks
//! with the user instructions and the image catalog.

/// Role framing prepended to every request.
pub const SYSTEM_ROLE: &str = "[System Prompt]: You are a professional slide-deck author who \
maximises audience comprehension. Avoid redundancy, propose diagrams where they help, and \
emphasise key terminology so the content stays dense but easy to follow.";

/// Task line following the role framing.
pub const TASK: &str = "[Task]: Based on the instructions below, consolidate the information \
and produce the content for an HTML slide deck.";

/// Output-format rules. `{max_slides}` is substituted by the composer.
pub const OUTPUT_FORMAT_RULES: &str = r#"[Output Format]:
- Respond with JSON only: a single JSON array as the entire output.
- Each slide is an object of the form {"title": "slide title", "body": "detailed content as bullet points or short paragraphs"}.
    - Optimise every body for presentation delivery:
        1.  Bold emphasis: wrap important keywords and terminology in double asterisks (e.g. `**energy efficiency**`).
        2.  Bullet lists: any three or more parallel items must use a bullet list (`-` or `*`), grouped under short headings where that clarifies structure.
        3.  Short spoken lines: keep each bullet a noun-and-keyword phrase of roughly 40 characters or fewer.
        4.  Diagram suggestions: when a slide explains a complex concept (system structure, comparison, flow), open the body with a short bracketed suggestion of the diagram to draw.
        5.  Extracted figures: to place a figure from the reference PDF, add "image_refs": ["<ID>", ...] and choose IDs from the catalog below.
    - Produce at most {max_slides} slides in total."#;

/// Heading for the per-image catalog section.
pub const CATALOG_HEADER: &str = "[Supporting Assets]:";

/// Emitted instead of the catalog listing when no images were extracted.
pub const CATALOG_EMPTY_LINE: &str =
    "[PDF Image Catalog]: no usable images were extracted from the reference PDF.";

/// Fallback context line for a catalog entry whose page had no text.
pub const CONTEXT_UNAVAILABLE: &str = "no surrounding page text was available";
