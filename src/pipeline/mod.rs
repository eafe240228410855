//! Pipeline stages for deck generation.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different generation backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! locate ──▶ extract ──▶ compose ──▶ gemini ──▶ validate ──▶ render
//! (PDF path)  (catalog)   (prompt)    (JSON text)  (slides)    (HTML)
//! ```
//!
//! 1. [`locate`]   — resolve the reference PDF from an ordered candidate list
//!    and copy it into the resource cache
//! 2. [`extract`]  — pull embedded images and per-page text context; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`compose`]  — pure string interpolation of instructions, format rules,
//!    and the image catalog
//! 4. [`gemini`]   — the single generateContent call; the only stage with
//!    network I/O
//! 5. [`validate`] — parse the response text: valid JSON, array root, non-empty
//! 6. [`render`]   — splice escaped slide sections into the HTML template

pub mod compose;
pub mod extract;
pub mod gemini;
pub mod locate;
pub mod render;
pub mod validate;
