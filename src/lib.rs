//! fail-lens - Playwright test failure analysis with AI-generated explanations.
//!
//! This crate provides:
//! - Extraction of failed/timed-out tests from Playwright JSON results
//! - Attachment classification (screenshots, trace archives, videos)
//! - AI root-cause analysis via an Azure OpenAI completion endpoint
//! - Self-contained interactive HTML and machine-readable JSON reports
//!
//! # Example
//!
//! ```rust,no_run
//! use fail_lens::{FailureAnalyzer, LlmConfig, ReportGenerator, RunResults};
//!
//! let results = RunResults::load("test-results/results.json").unwrap();
//! let mut failures = results.extract_failures();
//!
//! let analyzer = FailureAnalyzer::new(LlmConfig::default());
//! for failure in &mut failures {
//!     failure.analysis = Some(analyzer.analyze(failure));
//! }
//!
//! let generator = ReportGenerator::new("test-failure-explanations");
//! generator.generate_html_report(&mut failures).unwrap();
//! generator.generate_json_report(&failures).unwrap();
//! ```

pub mod analyzer;
pub mod config;
pub mod failure;
pub mod llm;
pub mod report;
pub mod results;

// Re-export failure types
pub use failure::{
    classify_attachments, Attachment, ClassifiedAttachments, FailureAnalysis, FailureStatus,
    Screenshot, TestFailure,
};

// Re-export results parsing
pub use results::{ResultsError, ResultsResult, RunResults};

// Re-export the analyzer and LLM client
pub use analyzer::{build_prompt, parse_response, system_prompt, FailureAnalyzer};
pub use llm::{chat_completion, LlmConfig, LlmError, LlmResult};

// Re-export report generation
pub use report::{
    escape_html, format_markdown, strip_ansi, ReportError, ReportGenerator, ReportResult,
    HTML_REPORT_NAME, JSON_REPORT_NAME,
};
