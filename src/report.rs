//! Report assembly: interactive HTML and machine-readable JSON.
//!
//! The HTML report is fully self-contained (inline styles and behavior):
//! a header with aggregate stats, a search/filter bar, and one collapsible
//! card per failure with three tabs (AI analysis, error details,
//! screenshots/trace) plus a lightbox for screenshots. Referenced assets are
//! copied into an `assets/` subdirectory with deterministic names, or inlined
//! as base64 data URIs in embed mode.
//!
//! The JSON report is the lossless counterpart: raw error text, classified
//! attachment paths, and the analysis object for every failure.

use base64::Engine;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::failure::{FailureAnalysis, FailureStatus, Screenshot, TestFailure};

/// Result type for report generation
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors writing the report artifacts themselves. Per-asset copy failures
/// are absorbed (the asset is omitted), never surfaced here.
#[derive(Debug)]
pub enum ReportError {
    /// Could not create the output directory or write an artifact
    Io(std::io::Error),
    /// Could not serialize the JSON report
    Serialize(serde_json::Error),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Io(e) => write!(f, "Report I/O error: {}", e),
            ReportError::Serialize(e) => write!(f, "Report serialization error: {}", e),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(e) => Some(e),
            ReportError::Serialize(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        ReportError::Io(e)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        ReportError::Serialize(e)
    }
}

/// HTML artifact file name
pub const HTML_REPORT_NAME: &str = "failure-explanations.html";

/// JSON artifact file name
pub const JSON_REPORT_NAME: &str = "failure-explanations.json";

/// Error text shown in the HTML is clipped to this many characters
const MAX_ERROR_DISPLAY_CHARS: usize = 2000;

static ANSI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid pattern"));
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid pattern"));
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid pattern"));
static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\d+\.\s+").expect("valid pattern"));

/// Generates the HTML and JSON failure reports
pub struct ReportGenerator {
    output_dir: PathBuf,
    assets_dir: PathBuf,
    playwright_report_dir: Option<PathBuf>,
    embed_images: bool,
}

impl ReportGenerator {
    /// Create a generator writing into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        let assets_dir = output_dir.join("assets");
        Self {
            output_dir,
            assets_dir,
            playwright_report_dir: None,
            embed_images: false,
        }
    }

    /// Set the Playwright HTML report directory used as a fallback location
    /// for screenshots whose declared path no longer exists
    pub fn playwright_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.playwright_report_dir = Some(dir.into());
        self
    }

    /// Inline screenshots as base64 data URIs instead of copying them
    pub fn embed_images(mut self, embed: bool) -> Self {
        self.embed_images = embed;
        self
    }

    /// Generate the interactive HTML report.
    ///
    /// Screenshot and trace paths on the failures are rewritten to the
    /// report-relative asset paths (or data URIs in embed mode); assets that
    /// cannot be resolved or copied are dropped with a warning. Call this
    /// before [`generate_json_report`](Self::generate_json_report) so both
    /// artifacts reference the same asset locations.
    pub fn generate_html_report(&self, failures: &mut [TestFailure]) -> ReportResult<PathBuf> {
        fs::create_dir_all(&self.assets_dir)?;

        for (test_index, failure) in failures.iter_mut().enumerate() {
            let mut processed = Vec::new();
            for (shot_index, shot) in failure.screenshots.iter().enumerate() {
                if let Some(rendered) = self.resolve_screenshot(&shot.path, shot_index, test_index)
                {
                    processed.push(Screenshot {
                        name: shot.name.clone(),
                        path: rendered,
                        content_type: shot.content_type.clone(),
                    });
                }
            }
            failure.screenshots = processed;

            if let Some(src) = failure.trace_path.take() {
                failure.trace_path = self.copy_trace(&src, test_index);
            }
        }

        let test_rows: String = failures
            .iter()
            .enumerate()
            .map(|(i, f)| render_test_row(f, i))
            .collect();

        let html = render_document(failures, &test_rows);

        let output_path = self.output_dir.join(HTML_REPORT_NAME);
        fs::write(&output_path, html)?;
        Ok(output_path)
    }

    /// Generate the JSON report
    pub fn generate_json_report(&self, failures: &[TestFailure]) -> ReportResult<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report = JsonReport {
            generated_at: Utc::now().to_rfc3339(),
            total_failures: failures.len(),
            failures: failures.iter().map(JsonFailure::from).collect(),
        };

        let output_path = self.output_dir.join(JSON_REPORT_NAME);
        fs::write(&output_path, serde_json::to_string_pretty(&report)?)?;
        Ok(output_path)
    }

    /// Resolve one screenshot to its rendered reference: a copied asset path,
    /// or a data URI in embed mode. Returns `None` when the source cannot be
    /// located or read (the screenshot is omitted from the report).
    fn resolve_screenshot(
        &self,
        src_path: &str,
        shot_index: usize,
        test_index: usize,
    ) -> Option<String> {
        if src_path.is_empty() {
            return None;
        }

        let src = self.locate_source(Path::new(src_path))?;

        if self.embed_images {
            return embed_data_uri(&src);
        }

        let ext = src
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_else(|| ".png".to_string());
        let dest_name = format!("screenshot-{}-{}{}", test_index, shot_index, ext);
        let dest = self.assets_dir.join(&dest_name);

        match fs::copy(&src, &dest) {
            Ok(_) => Some(format!("assets/{}", dest_name)),
            Err(e) => {
                eprintln!("    Warning: Could not copy screenshot: {}", e);
                None
            }
        }
    }

    /// Copy the trace archive into the asset directory
    fn copy_trace(&self, src_path: &str, test_index: usize) -> Option<String> {
        if src_path.is_empty() {
            return None;
        }

        let src = Path::new(src_path);
        if !src.exists() {
            return None;
        }

        let dest_name = format!("trace-{}.zip", test_index);
        let dest = self.assets_dir.join(&dest_name);

        match fs::copy(src, &dest) {
            Ok(_) => Some(format!("assets/{}", dest_name)),
            Err(e) => {
                eprintln!("    Warning: Could not copy trace: {}", e);
                None
            }
        }
    }

    /// Find the screenshot source on disk, falling back to the Playwright
    /// report's `data/` subdirectory keyed by file name.
    fn locate_source(&self, src: &Path) -> Option<PathBuf> {
        if src.exists() {
            return Some(src.to_path_buf());
        }
        let report_dir = self.playwright_report_dir.as_ref()?;
        let fallback = report_dir.join("data").join(src.file_name()?);
        fallback.exists().then_some(fallback)
    }
}

/// Read an image file and inline it as a base64 data URI
fn embed_data_uri(path: &Path) -> Option<String> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("    Warning: Could not read screenshot for embedding: {}", e);
            return None;
        }
    };
    let mime = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        _ => "image/jpeg",
    };
    let encoded = base64::engine::general_purpose::STANDARD.encode(&data);
    Some(format!("data:{};base64,{}", mime, encoded))
}

// ============================================================================
// Text Processing
// ============================================================================

/// Escape the five HTML-reserved characters.
///
/// Applied to every free string interpolated into the HTML document, in both
/// text and attribute positions.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Remove ANSI color escape sequences from raw error text
pub fn strip_ansi(text: &str) -> String {
    ANSI_RE.replace_all(text, "").into_owned()
}

/// Markdown-lite rendering for AI analysis text: inline code, bold, numbered
/// lists as bulleted line breaks. Escaping happens first; the markup below is
/// generated, not interpolated.
pub fn format_markdown(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let html = escape_html(text);
    let html = CODE_RE.replace_all(&html, "<code>$1</code>");
    let html = BOLD_RE.replace_all(&html, "<strong>$1</strong>");
    let html = NUMBERED_RE.replace_all(&html, "<br>&bull; ");
    html.replace('\n', "<br>")
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

// ============================================================================
// HTML Rendering
// ============================================================================

fn render_document(failures: &[TestFailure], test_rows: &str) -> String {
    let total_duration: u64 = failures.iter().map(|f| f.duration_ms).sum();
    let avg_duration = if failures.is_empty() {
        0
    } else {
        total_duration / failures.len() as u64
    };
    let files_affected = failures
        .iter()
        .map(|f| f.test_file.as_str())
        .collect::<HashSet<_>>()
        .len();

    let now = Utc::now();
    let body = if test_rows.is_empty() {
        EMPTY_STATE.to_string()
    } else {
        test_rows.to_string()
    };

    format!(
        "<!DOCTYPE html>\n\
        <html lang=\"en\">\n\
        <head>\n\
        <meta charset=\"UTF-8\">\n\
        <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
        <title>Test Failure Analysis Report</title>\n\
        <style>{style}</style>\n\
        </head>\n\
        <body>\n\
        <div class=\"container\">\n\
        <header>\n\
        <h1>Test Failure Analysis Report</h1>\n\
        <p>AI-powered analysis of test failures using Azure OpenAI</p>\n\
        <div class=\"stats-grid\">\n\
        <div class=\"stat-card\"><div class=\"stat-value\">{count}</div><div class=\"stat-label\">Failed Tests</div></div>\n\
        <div class=\"stat-card\"><div class=\"stat-value\">{files}</div><div class=\"stat-label\">Files Affected</div></div>\n\
        <div class=\"stat-card\"><div class=\"stat-value\">{total_s}s</div><div class=\"stat-label\">Total Duration</div></div>\n\
        <div class=\"stat-card\"><div class=\"stat-value\">{avg_ms}ms</div><div class=\"stat-label\">Avg Duration</div></div>\n\
        <div class=\"stat-card\"><div class=\"stat-value\">{time}</div><div class=\"stat-label\">Generated At</div></div>\n\
        </div>\n\
        </header>\n\
        <div class=\"filter-bar\">\n\
        <div class=\"search-box\"><input type=\"text\" id=\"searchInput\" placeholder=\"Search tests...\" onkeyup=\"filterTests()\"></div>\n\
        <button class=\"filter-btn\" onclick=\"expandAll()\">Expand All</button>\n\
        <button class=\"filter-btn\" onclick=\"collapseAll()\">Collapse All</button>\n\
        </div>\n\
        <main id=\"testsList\">\n{body}\n</main>\n\
        <footer>\n\
        <p>Generated by fail-lens | Powered by Azure OpenAI</p>\n\
        <p class=\"footer-time\">{timestamp}</p>\n\
        </footer>\n\
        </div>\n\
        <div class=\"lightbox\" id=\"lightbox\" onclick=\"closeLightbox()\">\n\
        <button class=\"lightbox-close\" onclick=\"closeLightbox()\">&times;</button>\n\
        <img id=\"lightboxImg\" src=\"\" alt=\"Screenshot\">\n\
        </div>\n\
        <script>{script}</script>\n\
        </body>\n\
        </html>",
        style = STYLE,
        count = failures.len(),
        files = files_affected,
        total_s = total_duration / 1000,
        avg_ms = avg_duration,
        time = now.format("%H:%M"),
        body = body,
        timestamp = now.format("%Y-%m-%d %H:%M:%S"),
        script = SCRIPT,
    )
}

fn render_test_row(failure: &TestFailure, index: usize) -> String {
    let empty_analysis = FailureAnalysis::default();
    let analysis = failure.analysis.as_ref().unwrap_or(&empty_analysis);

    let badge_class = match failure.status {
        FailureStatus::TimedOut => "badge-timeout",
        FailureStatus::Failed => "badge-failed",
    };

    let media_html = render_media_panel(failure);
    let clean_error = truncate_chars(&strip_ansi(&failure.error_message), MAX_ERROR_DISPLAY_CHARS);

    format!(
        "<div class=\"test-failure\" data-file=\"{file}\">\n\
        <div class=\"test-header\">\n\
        <div class=\"test-title\">\n\
        <span class=\"badge {badge_class}\">{badge}</span>\n\
        <h3>{name}</h3>\n\
        </div>\n\
        <div class=\"test-meta\">\n\
        <span class=\"duration\">{duration}ms</span>\n\
        <span class=\"expand-icon\">&#9660;</span>\n\
        </div>\n\
        </div>\n\
        <div class=\"test-content\">\n\
        <div class=\"test-file\">{file}</div>\n\
        <div class=\"tabs\">\n\
        <button class=\"tab-btn active\" onclick=\"switchTab(this, 'analysis', {index})\">AI Analysis</button>\n\
        <button class=\"tab-btn\" onclick=\"switchTab(this, 'error', {index})\">Error Details</button>\n\
        <button class=\"tab-btn\" onclick=\"switchTab(this, 'media', {index})\">Screenshots &amp; Trace</button>\n\
        </div>\n\
        <div id=\"analysis-{index}\" class=\"tab-content active\">\n\
        <div class=\"analysis-grid\">\n\
        <div class=\"analysis-card root-cause\"><h4>Root Cause</h4><div class=\"analysis-content\">{root_cause}</div></div>\n\
        <div class=\"analysis-card explanation\"><h4>Explanation</h4><div class=\"analysis-content\">{explanation}</div></div>\n\
        <div class=\"analysis-card suggested-fix\"><h4>Suggested Fix</h4><div class=\"analysis-content\">{fix}</div></div>\n\
        </div>\n\
        </div>\n\
        <div id=\"error-{index}\" class=\"tab-content\">\n\
        <div class=\"error-section\"><h4>Error Message</h4><pre class=\"error-message\">{error}</pre></div>\n\
        </div>\n\
        <div id=\"media-{index}\" class=\"tab-content\">\n{media}\n</div>\n\
        </div>\n\
        </div>\n",
        file = escape_html(&failure.test_file),
        badge_class = badge_class,
        badge = failure.badge_text(),
        name = escape_html(&failure.test_name),
        duration = failure.duration_ms,
        index = index,
        root_cause = format_markdown(&analysis.root_cause),
        explanation = format_markdown(&analysis.explanation),
        fix = format_markdown(&analysis.suggested_fix),
        error = escape_html(&clean_error),
        media = media_html,
    )
}

fn render_media_panel(failure: &TestFailure) -> String {
    let mut html = String::new();

    if failure.screenshots.is_empty() {
        html.push_str("<p class=\"no-media\">No screenshots available for this test.</p>\n");
    } else {
        html.push_str("<div class=\"screenshots-section\">\n<h4>Screenshots</h4>\n<div class=\"screenshots-grid\">\n");
        for shot in &failure.screenshots {
            let path = escape_html(&shot.path);
            html.push_str(&format!(
                "<div class=\"screenshot-card\" onclick=\"openLightbox('{path}')\">\n\
                <img src=\"{path}\" alt=\"{name}\" loading=\"lazy\">\n\
                <div class=\"screenshot-label\">{name}</div>\n\
                </div>\n",
                path = path,
                name = escape_html(&shot.name),
            ));
        }
        html.push_str("</div>\n</div>\n");
    }

    if let Some(trace) = &failure.trace_path {
        html.push_str(&format!(
            "<a href=\"{}\" class=\"trace-link\" target=\"_blank\">View Trace</a>\n",
            escape_html(trace)
        ));
    }

    html
}

const EMPTY_STATE: &str = "<div class=\"no-results\">\n\
    <h2>All Tests Passed!</h2>\n\
    <p>No failures to analyze.</p>\n\
    </div>";

const STYLE: &str = r#"
:root {
    --bg-color: #0f0f1a;
    --card-bg: #1a1a2e;
    --text-color: #e0e0e0;
    --text-muted: #888;
    --accent-color: #e94560;
    --success-color: #4ade80;
    --warning-color: #fbbf24;
    --info-color: #60a5fa;
    --border-color: #2a2a4a;
    --shadow: 0 4px 20px rgba(0,0,0,0.3);
}
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
    font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg-color);
    color: var(--text-color);
    line-height: 1.6;
    min-height: 100vh;
}
.container { max-width: 1400px; margin: 0 auto; padding: 2rem; }
header {
    background: linear-gradient(135deg, #1a1a2e 0%, #16213e 50%, #0f3460 100%);
    border-radius: 16px;
    padding: 2.5rem;
    margin-bottom: 2rem;
    border: 1px solid var(--border-color);
    box-shadow: var(--shadow);
}
header h1 { color: #fff; font-size: 2rem; margin-bottom: 0.5rem; }
header p { color: var(--text-muted); margin-bottom: 1.5rem; }
.stats-grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
    gap: 1rem;
}
.stat-card {
    background: rgba(255,255,255,0.05);
    border-radius: 12px;
    padding: 1.25rem;
    text-align: center;
    border: 1px solid rgba(255,255,255,0.1);
}
.stat-value {
    font-size: 2rem;
    font-weight: 700;
    background: linear-gradient(135deg, var(--accent-color), #ff6b8a);
    -webkit-background-clip: text;
    -webkit-text-fill-color: transparent;
    background-clip: text;
}
.stat-label { color: var(--text-muted); font-size: 0.85rem; margin-top: 0.25rem; }
.filter-bar { display: flex; gap: 1rem; margin-bottom: 1.5rem; flex-wrap: wrap; align-items: center; }
.search-box { flex: 1; min-width: 250px; }
.search-box input {
    width: 100%;
    padding: 0.75rem 1rem;
    border: 1px solid var(--border-color);
    border-radius: 8px;
    background: var(--card-bg);
    color: var(--text-color);
    font-size: 0.95rem;
}
.search-box input:focus {
    outline: none;
    border-color: var(--accent-color);
    box-shadow: 0 0 0 3px rgba(233, 69, 96, 0.2);
}
.filter-btn {
    padding: 0.75rem 1.25rem;
    border: 1px solid var(--border-color);
    border-radius: 8px;
    background: var(--card-bg);
    color: var(--text-color);
    cursor: pointer;
    font-size: 0.9rem;
}
.filter-btn:hover { background: var(--accent-color); border-color: var(--accent-color); }
.test-failure {
    background: var(--card-bg);
    border-radius: 16px;
    margin-bottom: 1.5rem;
    border: 1px solid var(--border-color);
    overflow: hidden;
    box-shadow: var(--shadow);
}
.test-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 1.25rem 1.5rem;
    background: linear-gradient(90deg, rgba(233,69,96,0.1) 0%, transparent 100%);
    border-bottom: 1px solid var(--border-color);
    cursor: pointer;
    user-select: none;
}
.test-title { display: flex; align-items: center; gap: 0.75rem; }
.test-title h3 { color: #fff; font-size: 1.1rem; font-weight: 600; }
.test-meta { display: flex; align-items: center; gap: 1rem; }
.badge {
    padding: 0.35rem 0.75rem;
    border-radius: 20px;
    font-size: 0.75rem;
    font-weight: 600;
    text-transform: uppercase;
}
.badge-failed { background: rgba(233,69,96,0.2); color: var(--accent-color); }
.badge-timeout { background: rgba(251,191,36,0.2); color: var(--warning-color); }
.duration { color: var(--text-muted); font-size: 0.85rem; }
.expand-icon { font-size: 1.25rem; transition: transform 0.3s; color: var(--text-muted); }
.test-failure.expanded .expand-icon { transform: rotate(180deg); }
.test-content { display: none; padding: 1.5rem; }
.test-failure.expanded .test-content { display: block; }
.test-file {
    color: var(--text-muted);
    font-size: 0.85rem;
    margin-bottom: 1rem;
    font-family: 'Fira Code', monospace;
}
.tabs {
    display: flex;
    gap: 0.5rem;
    margin-bottom: 1rem;
    border-bottom: 1px solid var(--border-color);
    padding-bottom: 0.5rem;
}
.tab-btn {
    padding: 0.5rem 1rem;
    background: transparent;
    border: none;
    color: var(--text-muted);
    cursor: pointer;
    font-size: 0.9rem;
    border-radius: 6px;
}
.tab-btn:hover { color: var(--text-color); background: rgba(255,255,255,0.05); }
.tab-btn.active { color: var(--accent-color); background: rgba(233,69,96,0.1); }
.tab-content { display: none; }
.tab-content.active { display: block; }
.error-section {
    background: rgba(233, 69, 96, 0.08);
    border-radius: 12px;
    padding: 1.25rem;
    border-left: 4px solid var(--accent-color);
}
.error-section h4 { color: var(--accent-color); margin-bottom: 0.75rem; }
.error-message {
    font-family: 'Fira Code', 'Consolas', monospace;
    font-size: 0.8rem;
    white-space: pre-wrap;
    word-break: break-word;
    color: #ff8fa3;
    max-height: 300px;
    overflow-y: auto;
    background: rgba(0,0,0,0.2);
    padding: 1rem;
    border-radius: 8px;
}
.analysis-grid { display: grid; gap: 1rem; margin-top: 1rem; }
.analysis-card {
    background: rgba(255, 255, 255, 0.03);
    border-radius: 12px;
    padding: 1.25rem;
    border-left: 4px solid;
}
.analysis-card.root-cause { border-left-color: #f472b6; }
.analysis-card.explanation { border-left-color: var(--info-color); }
.analysis-card.suggested-fix { border-left-color: var(--success-color); }
.analysis-card h4 { margin-bottom: 0.75rem; font-size: 0.95rem; }
.analysis-card.root-cause h4 { color: #f472b6; }
.analysis-card.explanation h4 { color: var(--info-color); }
.analysis-card.suggested-fix h4 { color: var(--success-color); }
.analysis-content { font-size: 0.9rem; line-height: 1.7; color: var(--text-color); }
.screenshots-section { margin-top: 1rem; }
.screenshots-section h4 { color: var(--info-color); margin-bottom: 0.75rem; }
.screenshots-grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(250px, 1fr));
    gap: 1rem;
}
.screenshot-card {
    position: relative;
    border-radius: 12px;
    overflow: hidden;
    border: 1px solid var(--border-color);
    cursor: pointer;
}
.screenshot-card img { width: 100%; height: 180px; object-fit: cover; display: block; }
.screenshot-label {
    position: absolute;
    bottom: 0;
    left: 0;
    right: 0;
    padding: 0.5rem 0.75rem;
    background: linear-gradient(transparent, rgba(0,0,0,0.8));
    color: #fff;
    font-size: 0.8rem;
}
.no-media { color: var(--text-muted); }
.trace-link {
    display: inline-flex;
    align-items: center;
    gap: 0.5rem;
    padding: 0.75rem 1.25rem;
    background: linear-gradient(135deg, #0f3460, #16213e);
    color: var(--info-color);
    text-decoration: none;
    border-radius: 8px;
    font-size: 0.9rem;
    margin-top: 1rem;
    border: 1px solid var(--border-color);
}
.lightbox {
    display: none;
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    background: rgba(0,0,0,0.95);
    z-index: 1000;
    justify-content: center;
    align-items: center;
    padding: 2rem;
}
.lightbox.active { display: flex; }
.lightbox img { max-width: 100%; max-height: 100%; object-fit: contain; border-radius: 8px; }
.lightbox-close {
    position: absolute;
    top: 1.5rem;
    right: 1.5rem;
    width: 40px;
    height: 40px;
    border-radius: 50%;
    background: rgba(255,255,255,0.1);
    border: none;
    color: #fff;
    font-size: 1.5rem;
    cursor: pointer;
}
footer {
    text-align: center;
    margin-top: 3rem;
    padding: 1.5rem;
    color: var(--text-muted);
    font-size: 0.85rem;
    border-top: 1px solid var(--border-color);
}
.footer-time { margin-top: 0.5rem; font-size: 0.8rem; }
.no-results { text-align: center; padding: 4rem 2rem; color: var(--text-muted); }
@media (max-width: 768px) {
    .container { padding: 1rem; }
    .test-header { flex-direction: column; align-items: flex-start; gap: 0.75rem; }
    .stats-grid { grid-template-columns: repeat(2, 1fr); }
}
"#;

const SCRIPT: &str = r#"
document.querySelectorAll('.test-header').forEach(header => {
    header.addEventListener('click', () => {
        header.parentElement.classList.toggle('expanded');
    });
});

function switchTab(btn, tabId, testIndex) {
    const container = btn.closest('.test-content');
    container.querySelectorAll('.tab-btn').forEach(t => t.classList.remove('active'));
    container.querySelectorAll('.tab-content').forEach(c => c.classList.remove('active'));
    btn.classList.add('active');
    document.getElementById(tabId + '-' + testIndex).classList.add('active');
}

function filterTests() {
    const query = document.getElementById('searchInput').value.toLowerCase();
    document.querySelectorAll('.test-failure').forEach(test => {
        const text = test.textContent.toLowerCase();
        test.style.display = text.includes(query) ? 'block' : 'none';
    });
}

function expandAll() {
    document.querySelectorAll('.test-failure').forEach(t => t.classList.add('expanded'));
}

function collapseAll() {
    document.querySelectorAll('.test-failure').forEach(t => t.classList.remove('expanded'));
}

function openLightbox(src) {
    document.getElementById('lightboxImg').src = src;
    document.getElementById('lightbox').classList.add('active');
    event.stopPropagation();
}

function closeLightbox() {
    document.getElementById('lightbox').classList.remove('active');
}

document.addEventListener('keydown', (e) => {
    if (e.key === 'Escape') closeLightbox();
});

const firstTest = document.querySelector('.test-failure');
if (firstTest) firstTest.classList.add('expanded');
"#;

// ============================================================================
// JSON Rendering
// ============================================================================

#[derive(Debug, Serialize)]
struct JsonReport {
    generated_at: String,
    total_failures: usize,
    failures: Vec<JsonFailure>,
}

#[derive(Debug, Serialize)]
struct JsonFailure {
    test_name: String,
    test_file: String,
    duration_ms: u64,
    status: String,
    error: JsonError,
    screenshots: Vec<Screenshot>,
    trace_path: Option<String>,
    ai_analysis: Option<FailureAnalysis>,
}

#[derive(Debug, Serialize)]
struct JsonError {
    message: String,
    stack: String,
}

impl From<&TestFailure> for JsonFailure {
    fn from(f: &TestFailure) -> Self {
        Self {
            test_name: f.test_name.clone(),
            test_file: f.test_file.clone(),
            duration_ms: f.duration_ms,
            status: f.status.as_str().to_string(),
            error: JsonError {
                message: f.error_message.clone(),
                stack: f.error_stack.clone(),
            },
            screenshots: f.screenshots.clone(),
            trace_path: f.trace_path.clone(),
            ai_analysis: f.analysis.clone(),
        }
    }
}
