//! Response validation: exactly three checks, nothing more.
//!
//! The run dies when the returned text is not valid JSON, when the root is
//! not an array, or when the array is empty. Individual slide objects are
//! trusted as-is: every [`Slide`] field is defaulted, so a member missing
//! `title`, or one that is not even an object, degrades to a blank slide
//! instead of failing the run. The raw response text travels inside the
//! format errors so the binary can echo it for debugging.

use crate::error::DeckGenError;
use crate::output::Slide;

/// Parse the model's response text into slides.
pub fn parse_slides(raw: &str) -> Result<Vec<Slide>, DeckGenError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| DeckGenError::InvalidResponse {
            detail: e.to_string(),
            raw: raw.to_string(),
        })?;

    let items = value.as_array().ok_or_else(|| DeckGenError::NotAnArray {
        raw: raw.to_string(),
    })?;

    if items.is_empty() {
        return Err(DeckGenError::EmptyDeck);
    }

    Ok(items
        .iter()
        .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
        .collect())
}
