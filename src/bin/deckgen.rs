//! CLI binary for deckgen.
//!
//! A thin shim over the library crate: merges `.env` into the environment,
//! maps flags to `DeckConfig`, and maps every `DeckGenError` to a
//! user-facing message and a non-zero exit. Invocation is parameterless by
//! default — `deckgen` in a directory containing `prompt.txt` and
//! `slide_template.html` does the whole run.

use clap::Parser;
use deckgen::{generate_to_file, DeckConfig, DeckGenError};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Everything from the working directory: prompt.txt + slide_template.html
  deckgen

  # Point at a specific reference PDF
  deckgen --pdf ~/papers/water_heater_guide.pdf

  # No reference PDF at all (text-only deck)
  deckgen --no-pdf

  # Shorter deck, custom output location
  deckgen --max-slides 15 -o decks/intro.html

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY      API credential (required)
  SOURCE_PDF_PATH     Reference PDF override, same as --pdf
  DECKGEN_MODEL       Override model ID

  Variables may also be placed in a .env file in the working directory;
  it is merged into the environment before anything is read.

SETUP:
  1. Set the API key:            export GEMINI_API_KEY=...
  2. Describe the deck:          $EDITOR prompt.txt
  3. Generate:                   deckgen

  Extracting figures from the reference PDF requires a pdfium shared
  library on the system; without one the deck is generated without figures.
"#;

/// Generate an HTML slide deck from plain-text instructions and a reference PDF.
#[derive(Parser, Debug)]
#[command(
    name = "deckgen",
    version,
    about = "Generate an HTML slide deck from plain-text instructions and a reference PDF",
    long_about = "Generate an HTML slide deck by sending your instructions (plus a catalog of \
figures extracted from an optional reference PDF) to the Gemini API, then rendering the \
returned slides into an HTML template.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Instructions file; the first non-empty line labels the run.
    #[arg(long, env = "DECKGEN_PROMPT", default_value = "prompt.txt")]
    prompt: PathBuf,

    /// HTML template the slides are spliced into.
    #[arg(long, env = "DECKGEN_TEMPLATE", default_value = "slide_template.html")]
    template: PathBuf,

    /// Write the finished deck here (overwritten on success).
    #[arg(short, long, env = "DECKGEN_OUTPUT", default_value = "output.html")]
    output: PathBuf,

    /// Directory for the cached PDF and extracted images.
    #[arg(long, env = "DECKGEN_RESOURCES", default_value = "resources")]
    resources: PathBuf,

    /// Reference PDF override, tried right after the cache.
    #[arg(long, env = "SOURCE_PDF_PATH")]
    pdf: Option<PathBuf>,

    /// Extra fallback locations for the reference PDF, in priority order.
    /// Repeatable.
    #[arg(long = "pdf-fallback")]
    pdf_fallbacks: Vec<PathBuf>,

    /// Generate the deck without a reference PDF (no figures).
    #[arg(long)]
    no_pdf: bool,

    /// Model identifier.
    #[arg(long, env = "DECKGEN_MODEL", default_value = "gemini-2.5-flash")]
    model: String,

    /// Upper bound on the slide count requested from the model.
    #[arg(long, env = "DECKGEN_MAX_SLIDES", default_value_t = 40)]
    max_slides: usize,

    /// API call timeout in seconds.
    #[arg(long, env = "DECKGEN_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DECKGEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DECKGEN_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    // Merge .env before clap reads env-backed flags and before the library
    // reads GEMINI_API_KEY.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = DeckConfig::builder()
        .prompt_path(&cli.prompt)
        .template_path(&cli.template)
        .resource_dir(&cli.resources)
        .model(&cli.model)
        .max_slides(cli.max_slides)
        .api_timeout_secs(cli.api_timeout)
        .pdf_required(!cli.no_pdf);

    if let Some(ref pdf) = cli.pdf {
        builder = builder.pdf_override(pdf);
    }
    if !cli.pdf_fallbacks.is_empty() {
        let mut fallbacks = cli.pdf_fallbacks.clone();
        fallbacks.push(PathBuf::from("source.pdf"));
        builder = builder.pdf_fallbacks(fallbacks);
    }

    let config = match builder.build() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", red("✘"));
            std::process::exit(1);
        }
    };

    // ── Run ──────────────────────────────────────────────────────────────
    match generate_to_file(&config, &cli.output).await {
        Ok(output) => {
            if !cli.quiet {
                eprintln!(
                    "{}  {} slides  {} figures  {}ms  →  {}",
                    green("✔"),
                    bold(&output.stats.slide_count.to_string()),
                    output.stats.image_count,
                    output.stats.total_duration_ms,
                    bold(&cli.output.display().to_string()),
                );
                eprintln!(
                    "   {}",
                    dim(&format!(
                        "extract {}ms / generate {}ms",
                        output.stats.extract_duration_ms, output.stats.generate_duration_ms
                    )),
                );
            }
        }
        Err(err) => {
            report_failure(&err);
            std::process::exit(1);
        }
    }
}

/// Map a pipeline error to its console report.
///
/// Response-format errors additionally echo the raw model output — the one
/// piece of state a user cannot reconstruct after the process exits.
fn report_failure(err: &DeckGenError) {
    eprintln!("{} {err}", red("✘"));

    match err {
        DeckGenError::InvalidResponse { raw, .. } | DeckGenError::NotAnArray { raw } => {
            eprintln!();
            eprintln!("--- raw model output (for debugging) ---");
            eprintln!("{raw}");
            eprintln!("----------------------------------------");
        }
        _ => {}
    }
}
