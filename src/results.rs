//! Playwright JSON results: document model and failure extraction.
//!
//! The results document is a tree: suites contain specs and nested child
//! suites, specs contain tests (retries), tests contain attempt results.
//! [`RunResults::extract_failures`] walks the tree depth-first and yields one
//! [`TestFailure`] per failed or timed-out attempt, in document order.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::failure::{classify_attachments, Attachment, FailureStatus, TestFailure};

/// Result type for results-document operations
pub type ResultsResult<T> = Result<T, ResultsError>;

/// Errors raised while loading the results document.
///
/// These are the only fatal errors of the pipeline: without a readable,
/// well-formed document there is nothing to report.
#[derive(Debug)]
pub enum ResultsError {
    /// Results file could not be read
    Io(std::io::Error),
    /// Results file is not valid JSON or has the wrong shape
    Parse(serde_json::Error),
}

impl std::fmt::Display for ResultsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultsError::Io(e) => write!(f, "Error reading results file: {}", e),
            ResultsError::Parse(e) => write!(f, "Error parsing results file: {}", e),
        }
    }
}

impl std::error::Error for ResultsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResultsError::Io(e) => Some(e),
            ResultsError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ResultsError {
    fn from(e: std::io::Error) -> Self {
        ResultsError::Io(e)
    }
}

impl From<serde_json::Error> for ResultsError {
    fn from(e: serde_json::Error) -> Self {
        ResultsError::Parse(e)
    }
}

/// Top-level Playwright JSON results document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunResults {
    #[serde(default)]
    pub suites: Vec<Suite>,
}

/// A grouping node: may carry a file path, specs, and nested child suites
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Suite {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub specs: Vec<Spec>,
    #[serde(default)]
    pub suites: Vec<Suite>,
}

/// A single test case definition; retries show up as multiple tests/results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Spec {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tests: Vec<TestEntry>,
}

/// One test of a spec, carrying its attempt results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestEntry {
    #[serde(default)]
    pub results: Vec<AttemptResult>,
}

/// One execution attempt of a spec
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttemptResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub duration: u64,
    /// Singular error payload (older report shape)
    #[serde(default)]
    pub error: Option<ErrorPayload>,
    /// Plural error list; its first entry takes precedence over `error`
    #[serde(default)]
    pub errors: Vec<ErrorPayload>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Error message and stack trace carried on a result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stack: String,
}

impl AttemptResult {
    /// Resolve the effective error payload: `errors[0]` when the plural list
    /// is non-empty, otherwise the singular `error` field.
    fn effective_error(&self) -> Option<&ErrorPayload> {
        self.errors.first().or(self.error.as_ref())
    }
}

impl RunResults {
    /// Load and parse a results file
    pub fn load(path: impl AsRef<Path>) -> ResultsResult<Self> {
        let raw = fs::read_to_string(path)?;
        let results = serde_json::from_str(&raw)?;
        Ok(results)
    }

    /// Extract all failed and timed-out attempts from the document.
    ///
    /// Depth-first, document order: a suite's own specs come before its child
    /// suites. A suite without a `file` field inherits its parent's; the root
    /// inherits the empty string. An empty suite list yields an empty vec
    /// (all tests passed).
    pub fn extract_failures(&self) -> Vec<TestFailure> {
        let mut failures = Vec::new();
        for suite in &self.suites {
            walk_suite(suite, "", &mut failures);
        }
        failures
    }
}

fn walk_suite(suite: &Suite, parent_file: &str, failures: &mut Vec<TestFailure>) {
    let file_path = suite.file.as_deref().unwrap_or(parent_file);

    for spec in &suite.specs {
        for test in &spec.tests {
            for result in &test.results {
                let Some(status) = FailureStatus::from_raw(&result.status) else {
                    continue;
                };

                let (error_message, error_stack) = match result.effective_error() {
                    Some(err) => (err.message.clone(), err.stack.clone()),
                    None => (String::new(), String::new()),
                };

                let classified = classify_attachments(&result.attachments);

                failures.push(TestFailure {
                    test_name: spec
                        .title
                        .clone()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    test_file: file_path.to_string(),
                    duration_ms: result.duration,
                    error_message,
                    error_stack,
                    status,
                    attachments: result.attachments.clone(),
                    screenshots: classified.screenshots,
                    trace_path: classified.trace_path,
                    video_path: classified.video_path,
                    analysis: None,
                });
            }
        }
    }

    for child in &suite.suites {
        walk_suite(child, file_path, failures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> RunResults {
        serde_json::from_str(json).expect("test document should parse")
    }

    #[test]
    fn test_empty_document_yields_no_failures() {
        let results = parse(r#"{"suites": []}"#);
        assert!(results.extract_failures().is_empty());

        let results = parse(r#"{}"#);
        assert!(results.extract_failures().is_empty());
    }

    #[test]
    fn test_passed_and_skipped_produce_no_records() {
        let results = parse(
            r#"{"suites": [{"file": "a.spec.ts", "specs": [{"title": "t", "tests": [
                {"results": [{"status": "passed", "duration": 5}]},
                {"results": [{"status": "skipped"}]},
                {"results": [{"status": "interrupted"}]}
            ]}]}]}"#,
        );
        assert!(results.extract_failures().is_empty());
    }

    #[test]
    fn test_single_failure_end_to_end_fields() {
        let results = parse(
            r#"{"suites": [{"file": "login.spec.ts", "specs": [{
                "title": "user can log in",
                "tests": [{"results": [{
                    "status": "failed",
                    "duration": 1234,
                    "error": {"message": "Timeout waiting for selector", "stack": "at line 10..."}
                }]}]
            }]}]}"#,
        );
        let failures = results.extract_failures();
        assert_eq!(failures.len(), 1);

        let f = &failures[0];
        assert_eq!(f.test_name, "user can log in");
        assert_eq!(f.test_file, "login.spec.ts");
        assert_eq!(f.duration_ms, 1234);
        assert_eq!(f.status, FailureStatus::Failed);
        assert_eq!(f.error_message, "Timeout waiting for selector");
        assert_eq!(f.error_stack, "at line 10...");
        assert!(f.analysis.is_none());
    }

    #[test]
    fn test_file_path_inherited_through_nested_suites() {
        // Only the root suite declares a file; all leaf failures report it.
        let results = parse(
            r#"{"suites": [{"file": "root.spec.ts", "suites": [{"suites": [{
                "specs": [{"title": "deep", "tests": [{"results": [
                    {"status": "failed", "duration": 1}
                ]}]}]
            }]}]}]}"#,
        );
        let failures = results.extract_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].test_file, "root.spec.ts");
    }

    #[test]
    fn test_plural_errors_take_precedence() {
        let results = parse(
            r#"{"suites": [{"specs": [{"title": "t", "tests": [{"results": [{
                "status": "failed",
                "errors": [{"message": "from errors", "stack": "s1"}],
                "error": {"message": "from error", "stack": "s2"}
            }]}]}]}]}"#,
        );
        let failures = results.extract_failures();
        assert_eq!(failures[0].error_message, "from errors");
        assert_eq!(failures[0].error_stack, "s1");
    }

    #[test]
    fn test_empty_plural_errors_falls_back_to_singular() {
        let results = parse(
            r#"{"suites": [{"specs": [{"title": "t", "tests": [{"results": [{
                "status": "failed",
                "errors": [],
                "error": {"message": "from error", "stack": "s2"}
            }]}]}]}]}"#,
        );
        let failures = results.extract_failures();
        assert_eq!(failures[0].error_message, "from error");
    }

    #[test]
    fn test_missing_title_and_duration_use_defaults() {
        let results = parse(
            r#"{"suites": [{"specs": [{"tests": [{"results": [{"status": "timedOut"}]}]}]}]}"#,
        );
        let failures = results.extract_failures();
        assert_eq!(failures[0].test_name, "Unknown");
        assert_eq!(failures[0].duration_ms, 0);
        assert_eq!(failures[0].status, FailureStatus::TimedOut);
        assert_eq!(failures[0].error_message, "");
    }

    #[test]
    fn test_document_order_specs_before_child_suites() {
        let results = parse(
            r#"{"suites": [{
                "file": "a.spec.ts",
                "specs": [{"title": "own spec", "tests": [{"results": [{"status": "failed"}]}]}],
                "suites": [{"specs": [{"title": "child spec", "tests": [{"results": [{"status": "failed"}]}]}]}]
            }]}"#,
        );
        let names: Vec<_> = results
            .extract_failures()
            .into_iter()
            .map(|f| f.test_name)
            .collect();
        assert_eq!(names, vec!["own spec", "child spec"]);
    }

    #[test]
    fn test_attachments_classified_and_passed_through() {
        let results = parse(
            r#"{"suites": [{"specs": [{"title": "t", "tests": [{"results": [{
                "status": "failed",
                "attachments": [
                    {"name": "screenshot", "path": "/tmp/shot.png", "contentType": "image/png"},
                    {"name": "trace", "path": "/tmp/trace.zip", "contentType": "application/zip"},
                    {"name": "stdout", "path": "/tmp/out.txt", "contentType": "text/plain"}
                ]
            }]}]}]}]}"#,
        );
        let failures = results.extract_failures();
        let f = &failures[0];
        assert_eq!(f.attachments.len(), 3);
        assert_eq!(f.screenshots.len(), 1);
        assert_eq!(f.screenshots[0].path, "/tmp/shot.png");
        assert_eq!(f.trace_path.as_deref(), Some("/tmp/trace.zip"));
        assert!(f.video_path.is_none());
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let err = RunResults::load("/nonexistent/results.json");
        assert!(matches!(err, Err(ResultsError::Io(_))));
    }

    #[test]
    fn test_load_malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, "{not json").unwrap();
        let err = RunResults::load(&path);
        assert!(matches!(err, Err(ResultsError::Parse(_))));
    }
}
