//! Error types for the deckgen library.
//!
//! One closed enum covers every way a run can die. The pipeline never
//! retries and never produces partial output, so there is no non-fatal
//! error type: anything that is not a [`DeckGenError`] is a console
//! advisory (a `tracing` warning) and the run continues.
//!
//! The variants group into the same buckets the binary reports on:
//! missing-input, asset-resolution, transport, response-format, rendering,
//! and I/O. Hint text lives in the `#[error]` strings so library users who
//! just `eprintln!("{err}")` get the same guidance the CLI prints.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the deckgen library.
#[derive(Debug, Error)]
pub enum DeckGenError {
    // ── Missing-input errors ──────────────────────────────────────────────
    /// The instructions file does not exist.
    #[error("Instructions file not found: '{path}'\nCreate it and describe the deck you want generated.")]
    PromptMissing { path: PathBuf },

    /// The instructions file exists but contains only whitespace.
    #[error("Instructions file '{path}' is empty.\nWrite the presentation instructions into it first.")]
    PromptEmpty { path: PathBuf },

    /// The HTML template file does not exist.
    #[error("Slide template not found: '{path}'\nCheck that the template file exists and is readable.")]
    TemplateMissing { path: PathBuf },

    // ── Asset-resolution errors ───────────────────────────────────────────
    /// No candidate path resolved to a regular PDF file.
    #[error(
        "No reference PDF could be found. Searched, in order:\n{}\n\
         Place the PDF at one of these locations or point SOURCE_PDF_PATH (or --pdf) at it.",
        format_searched(.searched)
    )]
    PdfNotFound { searched: Vec<PathBuf> },

    /// pdfium could not parse a PDF that the locator resolved.
    #[error("Reference PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    // ── Transport errors ──────────────────────────────────────────────────
    /// No API credential was supplied.
    #[error(
        "No Gemini API key configured.\n\
         Set GEMINI_API_KEY in the environment or in a .env file next to the binary."
    )]
    MissingApiKey,

    /// The generateContent call failed (network, auth, or an unusable response envelope).
    #[error(
        "Gemini API call failed: {detail}\n\
         Troubleshooting:\n\
         1. Check that GEMINI_API_KEY holds a valid key.\n\
         2. Check your network connection."
    )]
    ApiFailure { detail: String },

    // ── Response-format errors ────────────────────────────────────────────
    /// The returned text was not valid JSON. `raw` holds the offending text.
    #[error("Slide response was not valid JSON: {detail}")]
    InvalidResponse { detail: String, raw: String },

    /// The returned JSON parsed, but the top-level value is not an array.
    #[error("Slide response root is not a JSON array")]
    NotAnArray { raw: String },

    /// The returned array was empty — no slides to render.
    #[error("The model returned no slide content. Revisit the instructions in the prompt file.")]
    EmptyDeck,

    // ── Rendering errors ──────────────────────────────────────────────────
    /// Template processing failed.
    #[error("Template rendering failed: {detail}")]
    RenderFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write the final HTML document.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not copy the resolved PDF into the resource cache.
    #[error("Failed to cache the reference PDF at '{path}': {source}")]
    CacheWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_searched(searched: &[PathBuf]) -> String {
    searched
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
