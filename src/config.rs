//! Configuration types for deck generation.
//!
//! All run behaviour is controlled through [`DeckConfig`], built via its
//! [`DeckConfigBuilder`] and passed explicitly into every stage. There is no
//! module-level client, model name, or path constant anywhere in the crate:
//! a test can point `api_base_url` at a local stub server and `resource_dir`
//! at a tempdir without touching process state.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::DeckGenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default public endpoint for the generative-language API.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for a single deck-generation run.
///
/// Built via [`DeckConfig::builder()`] or [`DeckConfig::default()`].
///
/// # Example
/// ```rust
/// use deckgen::DeckConfig;
///
/// let config = DeckConfig::builder()
///     .model("gemini-2.5-flash")
///     .max_slides(20)
///     .pdf_required(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Path to the instructions file. Default: `prompt.txt`.
    ///
    /// The first non-empty line doubles as the run's display label in logs.
    pub prompt_path: PathBuf,

    /// Path to the HTML template the rendered slides are spliced into.
    /// Default: `slide_template.html`.
    pub template_path: PathBuf,

    /// Directory holding the cached PDF and the extracted images.
    /// Default: `resources`. Created on demand.
    pub resource_dir: PathBuf,

    /// Explicit override for the reference PDF, highest-priority candidate
    /// after the cache itself. Default: `None` (the CLI wires `SOURCE_PDF_PATH`
    /// or `--pdf` in here).
    pub pdf_override: Option<PathBuf>,

    /// Ordered fallback locations tried after the cache and the override.
    /// Default: `["source.pdf"]` relative to the working directory.
    ///
    /// Environment-specific absolute paths belong here (supplied by the
    /// caller), not in the source.
    pub pdf_fallbacks: Vec<PathBuf>,

    /// Whether a missing reference PDF aborts the run. Default: `true`.
    ///
    /// With `false`, resolution failure downgrades to a warning and the deck
    /// is generated without an image catalog.
    pub pdf_required: bool,

    /// Model identifier sent to the API. Default: `gemini-2.5-flash`.
    pub model: String,

    /// API credential. Default: `None`, in which case the client reads
    /// `GEMINI_API_KEY` from the environment at construction time.
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,

    /// Base URL of the generative-language endpoint.
    /// Default: [`DEFAULT_API_BASE_URL`]. Overridable so tests can target a
    /// local stub server.
    pub api_base_url: String,

    /// Upper bound on the slide count requested from the model. Default: 40.
    pub max_slides: usize,

    /// Maximum length of the per-page context excerpt attached to each
    /// catalog entry, in characters including the ellipsis. Default: 240.
    pub excerpt_max_chars: usize,

    /// Timeout for the single API call, in seconds. Default: 120.
    ///
    /// A full deck is one large completion, not a per-page call, so this is
    /// deliberately generous.
    pub api_timeout_secs: u64,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            prompt_path: PathBuf::from("prompt.txt"),
            template_path: PathBuf::from("slide_template.html"),
            resource_dir: PathBuf::from("resources"),
            pdf_override: None,
            pdf_fallbacks: vec![PathBuf::from("source.pdf")],
            pdf_required: true,
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_slides: 40,
            excerpt_max_chars: 240,
            api_timeout_secs: 120,
        }
    }
}

// Hand-written so the credential never lands in logs via `{:?}`.
impl fmt::Debug for DeckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckConfig")
            .field("prompt_path", &self.prompt_path)
            .field("template_path", &self.template_path)
            .field("resource_dir", &self.resource_dir)
            .field("pdf_override", &self.pdf_override)
            .field("pdf_fallbacks", &self.pdf_fallbacks)
            .field("pdf_required", &self.pdf_required)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("max_slides", &self.max_slides)
            .field("excerpt_max_chars", &self.excerpt_max_chars)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl DeckConfig {
    /// Create a new builder for `DeckConfig`.
    pub fn builder() -> DeckConfigBuilder {
        DeckConfigBuilder {
            config: Self::default(),
        }
    }

    /// Where the reference PDF is cached: `<resource_dir>/source.pdf`.
    pub fn cached_pdf_path(&self) -> PathBuf {
        self.resource_dir.join("source.pdf")
    }

    /// Where extracted images are written: `<resource_dir>/images`.
    pub fn image_dir(&self) -> PathBuf {
        self.resource_dir.join("images")
    }
}

/// Builder for [`DeckConfig`].
#[derive(Debug)]
pub struct DeckConfigBuilder {
    config: DeckConfig,
}

impl DeckConfigBuilder {
    pub fn prompt_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.prompt_path = path.into();
        self
    }

    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template_path = path.into();
        self
    }

    pub fn resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.resource_dir = dir.into();
        self
    }

    pub fn pdf_override(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdf_override = Some(path.into());
        self
    }

    pub fn pdf_fallbacks(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.pdf_fallbacks = paths;
        self
    }

    pub fn pdf_required(mut self, required: bool) -> Self {
        self.config.pdf_required = required;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn max_slides(mut self, n: usize) -> Self {
        self.config.max_slides = n.max(1);
        self
    }

    pub fn excerpt_max_chars(mut self, n: usize) -> Self {
        // Anything shorter than the ellipsis plus a word is useless context.
        self.config.excerpt_max_chars = n.max(8);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<DeckConfig, DeckGenError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(DeckGenError::InvalidConfig("model must not be empty".into()));
        }
        if c.api_base_url.trim().is_empty() {
            return Err(DeckGenError::InvalidConfig(
                "api_base_url must not be empty".into(),
            ));
        }
        if c.max_slides == 0 {
            return Err(DeckGenError::InvalidConfig("max_slides must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = DeckConfig::builder().build().expect("defaults build");
        assert_eq!(config.prompt_path, PathBuf::from("prompt.txt"));
        assert_eq!(config.max_slides, 40);
        assert_eq!(config.excerpt_max_chars, 240);
        assert!(config.pdf_required);
    }

    #[test]
    fn derived_paths_follow_resource_dir() {
        let config = DeckConfig::builder().resource_dir("assets").build().unwrap();
        assert_eq!(config.cached_pdf_path(), PathBuf::from("assets/source.pdf"));
        assert_eq!(config.image_dir(), PathBuf::from("assets/images"));
    }

    #[test]
    fn setters_clamp_degenerate_values() {
        let config = DeckConfig::builder()
            .max_slides(0)
            .excerpt_max_chars(1)
            .api_timeout_secs(0)
            .build()
            .unwrap();
        assert_eq!(config.max_slides, 1);
        assert_eq!(config.excerpt_max_chars, 8);
        assert_eq!(config.api_timeout_secs, 1);
    }

    #[test]
    fn empty_model_is_rejected() {
        let result = DeckConfig::builder().model("  ").build();
        assert!(matches!(result, Err(DeckGenError::InvalidConfig(_))));
    }
}
