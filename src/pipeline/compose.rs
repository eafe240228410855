//! Prompt composition: merge user instructions, format rules, and the image
//! catalog into the single request text.
//!
//! Pure string interpolation — the only branch is "catalog empty → emit a
//! placeholder line instead of a per-image list". Catalog lines come out in
//! id order because [`crate::output::ImageCatalog`] is a `BTreeMap`.

use crate::output::ImageCatalog;
use crate::prompts;

/// Compose the full request text sent to the generation service.
pub fn compose_prompt(user_instructions: &str, catalog: &ImageCatalog, max_slides: usize) -> String {
    let format_rules = prompts::OUTPUT_FORMAT_RULES.replace("{max_slides}", &max_slides.to_string());

    format!(
        "{role}\n{task}\n{format_rules}\n\n{header}\n{catalog}\n\n[Instructions]: {instructions}\n",
        role = prompts::SYSTEM_ROLE,
        task = prompts::TASK,
        format_rules = format_rules,
        header = prompts::CATALOG_HEADER,
        catalog = catalog_section(catalog),
        instructions = user_instructions,
    )
}

/// The per-image listing, or the placeholder line when nothing was extracted.
fn catalog_section(catalog: &ImageCatalog) -> String {
    if catalog.is_empty() {
        return prompts::CATALOG_EMPTY_LINE.to_string();
    }

    let mut lines = vec!["[PDF Image Catalog]:".to_string()];
    for (id, entry) in catalog {
        let context = if entry.context.is_empty() {
            prompts::CONTEXT_UNAVAILABLE
        } else {
            entry.context.as_str()
        };
        lines.push(format!(
            "- ID: {id} | page: {page} | context: {context}",
            page = entry.page
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ImageEntry;
    use std::path::PathBuf;

    fn entry(page: usize, context: &str) -> ImageEntry {
        ImageEntry {
            src: PathBuf::from("resources/images/x.png"),
            page,
            width: 100,
            height: 80,
            context: context.to_string(),
        }
    }

    #[test]
    fn empty_catalog_emits_placeholder_line() {
        let prompt = compose_prompt("two slides about anodes", &ImageCatalog::new(), 40);
        assert!(prompt.contains(prompts::CATALOG_EMPTY_LINE));
        assert!(!prompt.contains("- ID:"));
        assert!(prompt.contains("[Instructions]: two slides about anodes"));
    }

    #[test]
    fn catalog_lines_are_sorted_by_id() {
        let mut catalog = ImageCatalog::new();
        catalog.insert("page-002-image-01".into(), entry(2, "second"));
        catalog.insert("page-001-image-01".into(), entry(1, "first"));

        let prompt = compose_prompt("x", &catalog, 40);
        let first = prompt.find("page-001-image-01").unwrap();
        let second = prompt.find("page-002-image-01").unwrap();
        assert!(first < second);
    }

    #[test]
    fn max_slides_is_interpolated() {
        let prompt = compose_prompt("x", &ImageCatalog::new(), 12);
        assert!(prompt.contains("at most 12 slides"));
        assert!(!prompt.contains("{max_slides}"));
    }

    #[test]
    fn blank_context_gets_fallback_text() {
        let mut catalog = ImageCatalog::new();
        catalog.insert("page-001-image-01".into(), entry(1, ""));
        let prompt = compose_prompt("x", &catalog, 40);
        assert!(prompt.contains(prompts::CONTEXT_UNAVAILABLE));
    }
}
