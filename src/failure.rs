//! Types for extracted test failures and attachment classification.

use serde::{Deserialize, Serialize};

/// Terminal status of a failed test execution.
///
/// Playwright reports these as `"failed"` and `"timedOut"`; results in any
/// other status (`passed`, `skipped`, `interrupted`) are never extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureStatus {
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "timedOut")]
    TimedOut,
}

impl FailureStatus {
    /// Parse a raw Playwright status string; `None` for non-failure statuses.
    pub fn from_raw(status: &str) -> Option<Self> {
        match status {
            "failed" => Some(FailureStatus::Failed),
            "timedOut" => Some(FailureStatus::TimedOut),
            _ => None,
        }
    }

    /// The raw Playwright status string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStatus::Failed => "failed",
            FailureStatus::TimedOut => "timedOut",
        }
    }
}

/// Structured analysis result from the AI backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureAnalysis {
    pub root_cause: String,
    pub explanation: String,
    pub suggested_fix: String,
}

impl FailureAnalysis {
    pub fn new(
        root_cause: impl Into<String>,
        explanation: impl Into<String>,
        suggested_fix: impl Into<String>,
    ) -> Self {
        Self {
            root_cause: root_cause.into(),
            explanation: explanation.into(),
            suggested_fix: suggested_fix.into(),
        }
    }
}

/// A file reference produced during a test execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, rename = "contentType")]
    pub content_type: String,
}

/// A screenshot reference kept after classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screenshot {
    pub name: String,
    pub path: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
}

/// Attachments partitioned into the categories the report cares about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedAttachments {
    /// All screenshot attachments, in input order
    pub screenshots: Vec<Screenshot>,
    /// First trace archive, if any
    pub trace_path: Option<String>,
    /// First video recording, if any
    pub video_path: Option<String>,
}

/// Partition a result's attachments into screenshots, trace, and video.
///
/// Pure function over the input list. All screenshots accumulate; the trace
/// and video slots keep only the first qualifying attachment in input order.
/// An attachment matching no category is dropped from classification (it
/// remains in the failure's raw attachment list).
pub fn classify_attachments(attachments: &[Attachment]) -> ClassifiedAttachments {
    let mut classified = ClassifiedAttachments::default();

    for att in attachments {
        let name = att.name.to_lowercase();

        if name.contains("screenshot") || att.content_type.starts_with("image/") {
            classified.screenshots.push(Screenshot {
                name: if att.name.is_empty() {
                    "screenshot".to_string()
                } else {
                    att.name.clone()
                },
                path: att.path.clone(),
                content_type: att.content_type.clone(),
            });
        } else if name.contains("trace") || att.path.ends_with(".zip") {
            if classified.trace_path.is_none() {
                classified.trace_path = Some(att.path.clone());
            }
        } else if name.contains("video") || att.content_type.starts_with("video/") {
            if classified.video_path.is_none() {
                classified.video_path = Some(att.path.clone());
            }
        }
    }

    classified
}

/// A failed or timed-out test execution with its debugging context.
///
/// Created once per matching result node during the tree walk. The `analysis`
/// field is filled in exactly once by the [`crate::analyzer::FailureAnalyzer`];
/// screenshot and trace paths are rewritten to report-relative asset paths by
/// the report generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestFailure {
    /// Spec title (`"Unknown"` when the document omits it)
    pub test_name: String,

    /// File path inherited from the nearest enclosing suite declaring one
    pub test_file: String,

    /// Duration of the attempt in milliseconds
    pub duration_ms: u64,

    /// Error message (possibly empty)
    pub error_message: String,

    /// Error stack trace (possibly empty; truncated before prompt use)
    pub error_stack: String,

    /// Terminal status of the attempt
    pub status: FailureStatus,

    /// Raw attachment list, passed through unmodified
    pub attachments: Vec<Attachment>,

    /// Classified screenshot references
    pub screenshots: Vec<Screenshot>,

    /// Classified trace archive path
    pub trace_path: Option<String>,

    /// Classified video recording path
    pub video_path: Option<String>,

    /// AI analysis, attached after extraction
    pub analysis: Option<FailureAnalysis>,
}

impl TestFailure {
    /// Badge label for the HTML report
    pub fn badge_text(&self) -> &'static str {
        match self.status {
            FailureStatus::TimedOut => "TIMEOUT",
            FailureStatus::Failed => "FAILED",
        }
    }
}
