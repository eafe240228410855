//! End-to-end tests for deckgen.
//!
//! Most tests drive the full pipeline against a stub HTTP server bound to
//! 127.0.0.1, so they run offline, without an API key, and without a pdfium
//! library (the reference PDF is marked optional). One live-API test at the
//! bottom is gated behind the `E2E_ENABLED` environment variable, in which
//! case `GEMINI_API_KEY` must also be set:
//!
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use deckgen::{generate, generate_to_file, DeckConfig, DeckGenError};
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ── Stub generateContent server ──────────────────────────────────────────────

/// Start a one-shot HTTP server that answers every request with `status`
/// and `body`, returning its base URL.
async fn spawn_stub(status: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                read_full_request(&mut socket).await;
                let response = format!(
                    "HTTP/1.1 {status}\r\n\
                     content-type: application/json\r\n\
                     content-length: {}\r\n\
                     connection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

/// Start a stub whose candidate text is `payload`, wrapped in the response
/// envelope the real endpoint produces.
async fn spawn_stub_api(payload: &str) -> String {
    let envelope = serde_json::json!({
        "candidates": [
            { "content": { "parts": [{ "text": payload }] } }
        ]
    });
    spawn_stub("200 OK", envelope.to_string()).await
}

/// Read the request head plus `content-length` bytes of body, so the client
/// never sees the connection close mid-send.
async fn read_full_request(socket: &mut TcpStream) {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() - (pos + 4) >= content_length {
                return;
            }
        }
    }
}

// ── Workspace fixture ────────────────────────────────────────────────────────

const TEMPLATE: &str = "<!DOCTYPE html>\n<html><body>\n<!-- deck:slides -->\n</body></html>\n";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("prompt.txt"), "Water heaters 101\nKeep it brief.")
            .unwrap();
        std::fs::write(dir.path().join("slide_template.html"), TEMPLATE).unwrap();
        Self { dir }
    }

    fn output_path(&self) -> PathBuf {
        self.dir.path().join("output.html")
    }

    /// Config wired to the stub server: no reference PDF, explicit key.
    fn config(&self, base_url: &str) -> DeckConfig {
        DeckConfig::builder()
            .prompt_path(self.dir.path().join("prompt.txt"))
            .template_path(self.dir.path().join("slide_template.html"))
            .resource_dir(self.dir.path().join("resources"))
            .pdf_fallbacks(vec![self.dir.path().join("missing.pdf")])
            .pdf_required(false)
            .api_key("stub-key")
            .api_base_url(base_url)
            .build()
            .unwrap()
    }
}

const TWO_SLIDES: &str = r#"[
  {"title": "Tank Types", "body": "- **storage** tank\n- tankless"},
  {"title": "Maintenance", "body": "Flush the tank **yearly**."}
]"#;

// ── Response-format behaviour ────────────────────────────────────────────────

#[tokio::test]
async fn non_json_response_fails_and_writes_nothing() {
    let ws = Workspace::new();
    let base = spawn_stub_api("not json").await;
    let config = ws.config(&base);

    let err = generate_to_file(&config, ws.output_path()).await.unwrap_err();
    match err {
        DeckGenError::InvalidResponse { raw, .. } => assert_eq!(raw, "not json"),
        other => panic!("expected InvalidResponse, got {other:?}"),
    }
    assert!(!ws.output_path().exists(), "output must not be created on failure");
}

#[tokio::test]
async fn empty_array_response_fails_and_writes_nothing() {
    let ws = Workspace::new();
    let base = spawn_stub_api("[]").await;
    let config = ws.config(&base);

    let err = generate_to_file(&config, ws.output_path()).await.unwrap_err();
    assert!(matches!(err, DeckGenError::EmptyDeck));
    assert!(!ws.output_path().exists());
}

#[tokio::test]
async fn object_root_fails_with_raw_preserved() {
    let ws = Workspace::new();
    let base = spawn_stub_api(r#"{"title": "A"}"#).await;
    let config = ws.config(&base);

    let err = generate(&config).await.unwrap_err();
    match err {
        DeckGenError::NotAnArray { raw } => assert!(raw.contains("\"title\"")),
        other => panic!("expected NotAnArray, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_run_leaves_existing_output_untouched() {
    let ws = Workspace::new();
    std::fs::write(ws.output_path(), "previous deck").unwrap();
    let base = spawn_stub_api("not json").await;
    let config = ws.config(&base);

    let _ = generate_to_file(&config, ws.output_path()).await.unwrap_err();
    assert_eq!(std::fs::read_to_string(ws.output_path()).unwrap(), "previous deck");
}

// ── Success behaviour ────────────────────────────────────────────────────────

#[tokio::test]
async fn two_slide_deck_is_written_with_correct_count() {
    let ws = Workspace::new();
    let base = spawn_stub_api(TWO_SLIDES).await;
    let config = ws.config(&base);

    let output = generate_to_file(&config, ws.output_path()).await.unwrap();
    assert_eq!(output.stats.slide_count, 2);
    assert_eq!(output.stats.image_count, 0);

    let html = std::fs::read_to_string(ws.output_path()).unwrap();
    assert!(html.contains("<h2>Tank Types</h2>"));
    assert!(html.contains("<h2>Maintenance</h2>"));
    assert!(html.contains("<strong>storage</strong>"));
    assert!(!html.contains("<!-- deck:slides -->"), "marker must be consumed");
}

#[tokio::test]
async fn successful_run_overwrites_prior_output() {
    let ws = Workspace::new();
    std::fs::write(ws.output_path(), "previous deck").unwrap();
    let base = spawn_stub_api(TWO_SLIDES).await;
    let config = ws.config(&base);

    generate_to_file(&config, ws.output_path()).await.unwrap();
    let html = std::fs::read_to_string(ws.output_path()).unwrap();
    assert!(html.contains("<h2>Tank Types</h2>"));
    assert!(!html.contains("previous deck"));
}

// ── Missing-input and transport behaviour ────────────────────────────────────

#[tokio::test]
async fn missing_template_is_fatal_after_generation() {
    let ws = Workspace::new();
    std::fs::remove_file(ws.dir.path().join("slide_template.html")).unwrap();
    let base = spawn_stub_api(TWO_SLIDES).await;
    let config = ws.config(&base);

    let err = generate(&config).await.unwrap_err();
    assert!(matches!(err, DeckGenError::TemplateMissing { .. }));
}

#[tokio::test]
async fn template_without_marker_is_a_render_failure() {
    let ws = Workspace::new();
    std::fs::write(
        ws.dir.path().join("slide_template.html"),
        "<html><body>no marker here</body></html>",
    )
    .unwrap();
    let base = spawn_stub_api(TWO_SLIDES).await;
    let config = ws.config(&base);

    let err = generate(&config).await.unwrap_err();
    assert!(matches!(err, DeckGenError::RenderFailed { .. }));
}

#[tokio::test]
async fn http_error_from_api_is_a_transport_failure() {
    let ws = Workspace::new();
    let base = spawn_stub("500 Internal Server Error", r#"{"error": "boom"}"#.to_string()).await;
    let config = ws.config(&base);

    let err = generate(&config).await.unwrap_err();
    match err {
        DeckGenError::ApiFailure { detail } => assert!(detail.contains("500"), "got: {detail}"),
        other => panic!("expected ApiFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_api_is_a_transport_failure() {
    let ws = Workspace::new();
    // Nothing listens here; connection is refused immediately.
    let config = ws.config("http://127.0.0.1:9");

    let err = generate(&config).await.unwrap_err();
    assert!(matches!(err, DeckGenError::ApiFailure { .. }));
}

// ── Live API test (opt-in) ───────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set.
macro_rules! e2e_skip_unless_enabled {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 (and GEMINI_API_KEY) to run live tests");
            return;
        }
    }};
}

#[tokio::test]
async fn live_generation_produces_a_deck() {
    e2e_skip_unless_enabled!();

    let ws = Workspace::new();
    let config = DeckConfig::builder()
        .prompt_path(ws.dir.path().join("prompt.txt"))
        .template_path(ws.dir.path().join("slide_template.html"))
        .resource_dir(ws.dir.path().join("resources"))
        .pdf_required(false)
        .max_slides(5)
        .build()
        .unwrap();

    let output = generate(&config).await.expect("live generation should succeed");
    assert!(output.stats.slide_count >= 1);
    assert!(output.html.contains("<section class=\"slide\">"));
    println!(
        "live run: {} slides in {}ms",
        output.stats.slide_count, output.stats.total_duration_ms
    );
}
