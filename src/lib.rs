//! # deckgen
//!
//! Generate an HTML slide deck from plain-text presentation instructions and
//! an optional reference PDF, using the Gemini generative-language API.
//!
//! ## Why this crate?
//!
//! Writing a deck by hand means re-reading the source material, deciding a
//! slide split, and re-typing everything into a template. deckgen automates
//! the mechanical part: it hands your instructions (plus a catalog of figures
//! pulled out of a reference PDF) to a language model constrained to answer
//! with a JSON array of slides, then splices the result into an HTML template.
//!
//! ## Pipeline Overview
//!
//! ```text
//! prompt.txt + PDF
//!  │
//!  ├─ 1. Locate    resolve the reference PDF from an ordered candidate list
//!  ├─ 2. Extract   pull embedded images + per-page text context via pdfium
//!  ├─ 3. Compose   merge instructions, format rules, and the image catalog
//!  ├─ 4. Generate  one Gemini generateContent call (JSON-constrained)
//!  ├─ 5. Validate  parse: must be a non-empty JSON array
//!  └─ 6. Render    slide sections spliced into slide_template.html
//! ```
//!
//! The run is strictly sequential: each stage completes before the next
//! starts, and nothing is retried. A missing pdfium library is the single
//! non-fatal condition — extraction degrades to an empty catalog and the
//! deck is generated without figures.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deckgen::{generate, DeckConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads prompt.txt and slide_template.html from the working directory;
//!     // the API key comes from GEMINI_API_KEY.
//!     let config = DeckConfig::default();
//!     let output = generate(&config).await?;
//!     println!("{} slides, {} extracted figures",
//!         output.slides.len(),
//!         output.catalog.len());
//!     std::fs::write("output.html", &output.html)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `deckgen` binary (clap + tracing-subscriber + dotenv) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! deckgen = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DeckConfig, DeckConfigBuilder};
pub use error::DeckGenError;
pub use generate::{generate, generate_sync, generate_to_file};
pub use output::{DeckOutput, ImageCatalog, ImageEntry, RunStats, Slide};
