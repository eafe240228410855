//! Rendering: splice the generated slides into the HTML template.
//!
//! The template owns the document chrome (styles, navigation script); this
//! module only produces one `<section>` per slide and substitutes the result
//! for the literal [`SLIDES_MARKER`]. Slide bodies arrive as lightly-marked
//! text (bold runs, bullet lines), converted here by deterministic rules so
//! the output never depends on model formatting whims. All model-sourced
//! text is escaped before any markup is re-introduced.

use crate::error::DeckGenError;
use crate::output::{ImageCatalog, Slide};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Insertion marker the template must contain.
pub const SLIDES_MARKER: &str = "<!-- deck:slides -->";

/// Render the slide list against the template, resolving `image_refs`
/// through the catalog.
///
/// Catalog ids that do not resolve are dropped with a warning; the deck
/// still renders.
pub fn render_deck(
    template: &str,
    slides: &[Slide],
    catalog: &ImageCatalog,
) -> Result<String, DeckGenError> {
    if !template.contains(SLIDES_MARKER) {
        return Err(DeckGenError::RenderFailed {
            detail: format!("template is missing the '{SLIDES_MARKER}' insertion marker"),
        });
    }

    let sections: Vec<String> = slides
        .iter()
        .enumerate()
        .map(|(i, slide)| render_slide(i + 1, slide, catalog))
        .collect();

    Ok(template.replacen(SLIDES_MARKER, &sections.join("\n"), 1))
}

fn render_slide(number: usize, slide: &Slide, catalog: &ImageCatalog) -> String {
    let mut html = String::new();
    html.push_str("<section class=\"slide\">\n");
    html.push_str(&format!(
        "  <h2>{}</h2>\n",
        html_escape::encode_text(&slide.title)
    ));
    html.push_str(&render_body(&slide.body));
    html.push_str(&render_figures(number, slide, catalog));
    html.push_str("</section>\n");
    html
}

// ── Body markup rules ────────────────────────────────────────────────────

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+?)\*\*").unwrap());

/// Escape a line, then re-introduce `<strong>` for `**…**` runs.
///
/// Order matters: escaping first means the bold rule only ever wraps
/// already-safe text.
fn inline_markup(line: &str) -> String {
    let escaped = html_escape::encode_text(line).into_owned();
    RE_BOLD.replace_all(&escaped, "<strong>$1</strong>").into_owned()
}

/// Convert a slide body to paragraphs and bullet lists.
///
/// Consecutive lines starting with `- ` or `* ` form one `<ul>`; every
/// other non-blank line becomes a `<p>`.
fn render_body(body: &str) -> String {
    let mut out = String::new();
    let mut in_list = false;

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if in_list {
                out.push_str("  </ul>\n");
                in_list = false;
            }
            continue;
        }

        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            if !in_list {
                out.push_str("  <ul>\n");
                in_list = true;
            }
            out.push_str(&format!("    <li>{}</li>\n", inline_markup(item)));
        } else {
            if in_list {
                out.push_str("  </ul>\n");
                in_list = false;
            }
            out.push_str(&format!("  <p>{}</p>\n", inline_markup(trimmed)));
        }
    }

    if in_list {
        out.push_str("  </ul>\n");
    }
    out
}

// ── Figures ──────────────────────────────────────────────────────────────

fn render_figures(slide_number: usize, slide: &Slide, catalog: &ImageCatalog) -> String {
    let Some(refs) = slide.image_refs.as_ref() else {
        return String::new();
    };

    let mut out = String::new();
    for id in refs {
        match catalog.get(id) {
            Some(entry) => {
                let src = entry.src.display().to_string();
                out.push_str(&format!(
                    "  <figure>\n    <img src=\"{src}\" alt=\"{alt}\" width=\"{w}\" height=\"{h}\">\n  </figure>\n",
                    src = html_escape::encode_double_quoted_attribute(&src),
                    alt = html_escape::encode_double_quoted_attribute(&format!(
                        "Figure from page {}",
                        entry.page
                    )),
                    w = entry.width,
                    h = entry.height,
                ));
            }
            None => {
                warn!(
                    "slide {slide_number}: image_refs id '{id}' is not in the catalog; \
                     dropping the reference"
                );
            }
        }
    }
    out
}
