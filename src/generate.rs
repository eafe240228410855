//! Top-level orchestration: run the whole pipeline once.
//!
//! One call, strictly sequential, no retries. Every stage's failure is
//! mapped to a [`DeckGenError`] and ends the run; the only degradation is
//! an unavailable pdfium library (empty image catalog, see
//! [`crate::pipeline::extract`]) and, with `pdf_required = false`, an
//! unresolvable reference PDF.
//!
//! [`generate_to_file`] persists the HTML atomically (temp file + rename),
//! so a failed run never creates or clobbers the output document.

use crate::config::DeckConfig;
use crate::error::DeckGenError;
use crate::output::{DeckOutput, ImageCatalog, RunStats};
use crate::pipeline::{compose, extract, gemini::GeminiClient, locate, render, validate};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Generate a slide deck per the given configuration.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Any fatal condition: missing/empty instructions, unresolvable reference
/// PDF (when required), transport failure, malformed response, missing
/// template, or a template without the insertion marker.
pub async fn generate(config: &DeckConfig) -> Result<DeckOutput, DeckGenError> {
    let total_start = Instant::now();

    // ── Step 1: Read instructions ────────────────────────────────────────
    let instructions = read_prompt(&config.prompt_path).await?;
    info!(
        "Generating deck with {}; theme: {}",
        config.model,
        display_label(&instructions)
    );

    // ── Step 2: Build the API client (fail fast on a missing credential) ─
    let client = GeminiClient::new(config)?;

    // ── Step 3: Resolve the reference PDF ────────────────────────────────
    let pdf_path = match locate::locate_or_cache_pdf(config) {
        Ok(path) => Some(path),
        Err(err @ DeckGenError::PdfNotFound { .. }) if !config.pdf_required => {
            warn!("{err}");
            warn!("Continuing without a reference PDF; the deck will have no figures");
            None
        }
        Err(err) => return Err(err),
    };

    // ── Step 4: Extract images ───────────────────────────────────────────
    let extract_start = Instant::now();
    let catalog = match pdf_path {
        Some(ref path) => extract::extract_images(path, config).await?,
        None => ImageCatalog::new(),
    };
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    // ── Step 5: Compose the request ──────────────────────────────────────
    let prompt = compose::compose_prompt(&instructions, &catalog, config.max_slides);

    // ── Step 6: Call the generation service ──────────────────────────────
    let generate_start = Instant::now();
    let raw = client.generate_slides(&prompt).await?;
    let generate_duration_ms = generate_start.elapsed().as_millis() as u64;

    // ── Step 7: Validate the response ────────────────────────────────────
    let slides = validate::parse_slides(&raw)?;
    info!("Model returned {} slides", slides.len());

    // ── Step 8: Render against the template ──────────────────────────────
    let template = read_template(&config.template_path).await?;
    let html = render::render_deck(&template, &slides, &catalog)?;

    let stats = RunStats {
        slide_count: slides.len(),
        image_count: catalog.len(),
        extract_duration_ms,
        generate_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Deck generated: {} slides, {} figures, {}ms total",
        stats.slide_count, stats.image_count, stats.total_duration_ms
    );

    Ok(DeckOutput {
        html,
        slides,
        catalog,
        stats,
    })
}

/// Generate a deck and write the HTML to `output_path`, overwriting any
/// prior content.
///
/// Uses atomic write (temp file + rename) so a failed run leaves any
/// existing output untouched.
pub async fn generate_to_file(
    config: &DeckConfig,
    output_path: impl AsRef<Path>,
) -> Result<DeckOutput, DeckGenError> {
    let output = generate(config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DeckGenError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("html.tmp");
    tokio::fs::write(&tmp_path, &output.html)
        .await
        .map_err(|e| DeckGenError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| DeckGenError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output)
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(config: &DeckConfig) -> Result<DeckOutput, DeckGenError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DeckGenError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate(config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn read_prompt(path: &Path) -> Result<String, DeckGenError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DeckGenError::PromptMissing {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(DeckGenError::Internal(format!("reading instructions: {e}"))),
    };

    if text.trim().is_empty() {
        return Err(DeckGenError::PromptEmpty {
            path: path.to_path_buf(),
        });
    }
    Ok(text)
}

async fn read_template(path: &Path) -> Result<String, DeckGenError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DeckGenError::TemplateMissing {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(DeckGenError::Internal(format!("reading template: {e}"))),
    }
}

/// First non-empty line of the instructions, for log output.
fn display_label(instructions: &str) -> &str {
    instructions
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("(untitled)")
}
