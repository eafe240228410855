//! Asset location: resolve the reference PDF and cache it under the
//! resource directory.
//!
//! ## Why a candidate list?
//!
//! The reference PDF may already be cached from a previous run, supplied
//! explicitly by the user, or committed somewhere in the repository. Rather
//! than hard-coding one location, the locator walks an ordered candidate
//! list and the first existing regular file wins. Whatever matched is copied
//! into `<resource_dir>/source.pdf` so later stages (and later runs) always
//! read from one well-known place.
//!
//! Candidates are deduplicated by resolved absolute path so that, say, a
//! `--pdf` override pointing at the cache file itself does not produce a
//! self-copy.

use crate::config::DeckConfig;
use crate::error::DeckGenError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Resolve the reference PDF, caching it under the resource directory.
///
/// Candidate priority:
/// 1. the cache path itself (`<resource_dir>/source.pdf`)
/// 2. the configured override (`--pdf` / `SOURCE_PDF_PATH`)
/// 3. each configured fallback path, in order
///
/// A candidate that exists but is not a regular file (a directory, a socket)
/// is skipped with a warning; that is not an error by itself. When nothing
/// matches, the error lists every path searched.
///
/// Side effect: creates `resource_dir` if absent.
pub fn locate_or_cache_pdf(config: &DeckConfig) -> Result<PathBuf, DeckGenError> {
    let cache_path = config.cached_pdf_path();

    std::fs::create_dir_all(&config.resource_dir).map_err(|e| DeckGenError::CacheWriteFailed {
        path: config.resource_dir.clone(),
        source: e,
    })?;

    let candidates = build_candidates(config, &cache_path);

    for candidate in &candidates {
        if candidate.is_file() {
            if !same_file(candidate, &cache_path) {
                std::fs::copy(candidate, &cache_path).map_err(|e| {
                    DeckGenError::CacheWriteFailed {
                        path: cache_path.clone(),
                        source: e,
                    }
                })?;
                info!(
                    "Using reference PDF {} (cached as {})",
                    candidate.display(),
                    cache_path.display()
                );
            } else {
                info!("Using cached reference PDF {}", cache_path.display());
            }
            return Ok(cache_path);
        }
        if candidate.exists() {
            warn!(
                "{} exists but is not a regular file; skipping it as a PDF candidate",
                candidate.display()
            );
        }
    }

    Err(DeckGenError::PdfNotFound {
        searched: candidates,
    })
}

/// Build the ordered, deduplicated candidate list.
fn build_candidates(config: &DeckConfig, cache_path: &Path) -> Vec<PathBuf> {
    let mut seen: Vec<PathBuf> = Vec::new();
    let mut candidates: Vec<PathBuf> = Vec::new();

    let mut add = |path: &Path| {
        let resolved = resolve_key(path);
        if seen.contains(&resolved) {
            debug!("Duplicate PDF candidate skipped: {}", path.display());
            return;
        }
        seen.push(resolved);
        candidates.push(path.to_path_buf());
    };

    add(cache_path);
    if let Some(ref override_path) = config.pdf_override {
        add(override_path);
    }
    for fallback in &config.pdf_fallbacks {
        add(fallback);
    }

    candidates
}

/// Canonical form used for deduplication.
///
/// `canonicalize` fails for paths that do not exist yet (the cache file on a
/// first run), so those fall back to an absolutised lexical form.
fn resolve_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

/// Whether two paths refer to the same file on disk.
fn same_file(a: &Path, b: &Path) -> bool {
    resolve_key(a) == resolve_key(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> DeckConfig {
        DeckConfig::builder()
            .resource_dir(dir.path().join("resources"))
            .pdf_fallbacks(vec![dir.path().join("deck-source.pdf")])
            .build()
            .unwrap()
    }

    #[test]
    fn fallback_file_is_copied_into_cache() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::write(dir.path().join("deck-source.pdf"), b"%PDF-1.4 fallback").unwrap();

        let resolved = locate_or_cache_pdf(&config).unwrap();

        assert_eq!(resolved, config.cached_pdf_path());
        assert_eq!(fs::read(&resolved).unwrap(), b"%PDF-1.4 fallback");
    }

    #[test]
    fn override_takes_priority_over_fallbacks() {
        let dir = TempDir::new().unwrap();
        let override_path = dir.path().join("override.pdf");
        fs::write(&override_path, b"%PDF override").unwrap();
        fs::write(dir.path().join("deck-source.pdf"), b"%PDF fallback").unwrap();

        let config = DeckConfig::builder()
            .resource_dir(dir.path().join("resources"))
            .pdf_override(&override_path)
            .pdf_fallbacks(vec![dir.path().join("deck-source.pdf")])
            .build()
            .unwrap();

        let resolved = locate_or_cache_pdf(&config).unwrap();
        assert_eq!(fs::read(resolved).unwrap(), b"%PDF override");
    }

    #[test]
    fn existing_cache_wins_without_copying() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::create_dir_all(config.resource_dir.as_path()).unwrap();
        fs::write(config.cached_pdf_path(), b"%PDF cached").unwrap();
        fs::write(dir.path().join("deck-source.pdf"), b"%PDF fallback").unwrap();

        let resolved = locate_or_cache_pdf(&config).unwrap();
        assert_eq!(fs::read(resolved).unwrap(), b"%PDF cached");
    }

    #[test]
    fn directory_candidate_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        // The override is a directory; the fallback is the real file.
        let bogus = dir.path().join("a-directory.pdf");
        fs::create_dir(&bogus).unwrap();
        fs::write(dir.path().join("deck-source.pdf"), b"%PDF real").unwrap();

        let config = DeckConfig::builder()
            .resource_dir(dir.path().join("resources"))
            .pdf_override(&bogus)
            .pdf_fallbacks(vec![dir.path().join("deck-source.pdf")])
            .build()
            .unwrap();

        let resolved = locate_or_cache_pdf(&config).unwrap();
        assert_eq!(fs::read(resolved).unwrap(), b"%PDF real");
    }

    #[test]
    fn no_candidate_is_not_found_and_creates_no_cache_file() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let err = locate_or_cache_pdf(&config).unwrap_err();
        match err {
            DeckGenError::PdfNotFound { searched } => {
                assert_eq!(searched.len(), 2); // cache path + one fallback
            }
            other => panic!("expected PdfNotFound, got {other:?}"),
        }
        assert!(!config.cached_pdf_path().exists());
    }

    #[test]
    fn duplicate_candidates_are_searched_once() {
        let dir = TempDir::new().unwrap();
        let fallback = dir.path().join("deck-source.pdf");

        let config = DeckConfig::builder()
            .resource_dir(dir.path().join("resources"))
            .pdf_override(&fallback)
            .pdf_fallbacks(vec![fallback.clone(), fallback.clone()])
            .build()
            .unwrap();

        let err = locate_or_cache_pdf(&config).unwrap_err();
        match err {
            DeckGenError::PdfNotFound { searched } => {
                assert_eq!(searched.len(), 2); // cache path + the one distinct fallback
            }
            other => panic!("expected PdfNotFound, got {other:?}"),
        }
    }
}
