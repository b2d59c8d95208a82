//! Failure analysis via the Azure OpenAI backend.
//!
//! For each extracted failure the analyzer builds a bounded prompt, issues one
//! synchronous completion request, and parses the free-text response into the
//! three labeled fields of [`FailureAnalysis`]. Every error path degrades to a
//! placeholder analysis so the report pipeline never stalls on the backend.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::failure::{FailureAnalysis, TestFailure};
use crate::llm::{chat_completion, LlmConfig};

/// Stack traces are clipped to this many characters before prompt embedding,
/// bounding prompt size and cost.
const MAX_STACK_CHARS: usize = 2000;

/// Sentinel used for sections the model response did not provide
const SEE_EXPLANATION: &str = "See explanation";

/// Root cause label for failed backend requests
pub const ANALYSIS_ERROR_ROOT_CAUSE: &str = "AI Analysis Error";

/// Root cause label used when no credentials are present
pub const NOT_CONFIGURED_ROOT_CAUSE: &str = "Azure OpenAI not configured";

// Each section runs non-greedily until the next marker or end of text. The
// terminator is consumed, not peeked: every pattern is applied independently
// to the full response, so nothing downstream needs the consumed marker.
static ROOT_CAUSE_RE: Lazy<Regex> = Lazy::new(|| {
    section_regex(r"\*\*Root Cause:\*\*\s*(.+?)(?:\*\*Explanation:|$)")
});
static EXPLANATION_RE: Lazy<Regex> = Lazy::new(|| {
    section_regex(r"\*\*Explanation:\*\*\s*(.+?)(?:\*\*Suggested Fix:|$)")
});
static SUGGESTED_FIX_RE: Lazy<Regex> = Lazy::new(|| {
    section_regex(r"\*\*Suggested Fix:\*\*\s*(.+?)$")
});

fn section_regex(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .expect("section pattern is valid")
}

/// Analyzes test failures against the configured backend
pub struct FailureAnalyzer {
    config: LlmConfig,
}

impl FailureAnalyzer {
    /// Create an analyzer with an explicit backend configuration
    pub fn new(config: LlmConfig) -> Self {
        Self { config }
    }

    /// Create an analyzer from environment configuration
    pub fn from_env() -> Self {
        Self::new(LlmConfig::default())
    }

    /// Whether backend credentials are present
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Deployment name of the configured backend
    pub fn deployment(&self) -> &str {
        &self.config.deployment
    }

    /// Analyze one failure. Never fails: an unconfigured or erroring backend
    /// yields a placeholder analysis instead.
    pub fn analyze(&self, failure: &TestFailure) -> FailureAnalysis {
        if !self.config.is_configured() {
            return FailureAnalysis::new(
                NOT_CONFIGURED_ROOT_CAUSE,
                "Please set AZURE_OPENAI_ENDPOINT and AZURE_OPENAI_API_KEY environment variables.",
                "Configure Azure OpenAI credentials in your environment.",
            );
        }

        let prompt = build_prompt(failure);

        match chat_completion(&self.config, system_prompt(), &prompt) {
            Ok(content) => parse_response(&content),
            Err(e) => FailureAnalysis::new(
                ANALYSIS_ERROR_ROOT_CAUSE,
                format!("Failed to get AI analysis: {}", e),
                "Check Azure OpenAI configuration and connectivity.",
            ),
        }
    }
}

/// Fixed system instruction demanding the three-section response format
pub fn system_prompt() -> &'static str {
    "You are an expert test automation engineer and debugger. Your job is to analyze test failures and provide clear, actionable explanations.\n\
    \n\
    When analyzing a test failure, you should:\n\
    1. Identify the root cause of the failure\n\
    2. Explain what went wrong in plain English\n\
    3. Suggest specific fixes or debugging steps\n\
    \n\
    Structure your response with these exact sections:\n\
    **Root Cause:** [Brief description of the underlying cause]\n\
    \n\
    **Explanation:** [Detailed explanation of what went wrong]\n\
    \n\
    **Suggested Fix:** [Specific steps to fix this issue]\n\
    \n\
    Be concise but thorough. Focus on actionable insights."
}

/// Build the user prompt for one failure, with the stack trace clipped to a
/// bounded prefix.
pub fn build_prompt(failure: &TestFailure) -> String {
    let stack = if failure.error_stack.is_empty() {
        "No stack trace available".to_string()
    } else {
        truncate_chars(&failure.error_stack, MAX_STACK_CHARS)
    };

    format!(
        "## Test Failure Analysis Request\n\
        \n\
        ### Test Information\n\
        - **Test Name:** {}\n\
        - **Test File:** {}\n\
        - **Duration:** {}ms\n\
        - **Status:** {}\n\
        \n\
        ### Error Details\n\
        ```\n\
        {}\n\
        ```\n\
        \n\
        ### Stack Trace\n\
        ```\n\
        {}\n\
        ```\n\
        \n\
        Please analyze this test failure and provide:\n\
        1. **Root Cause:** What is the underlying cause of this failure?\n\
        2. **Explanation:** A plain English explanation of what went wrong\n\
        3. **Suggested Fix:** Specific steps to fix this issue",
        failure.test_name,
        failure.test_file,
        failure.duration_ms,
        failure.status.as_str(),
        failure.error_message,
        stack,
    )
}

/// Parse the model response into the three labeled fields.
///
/// Each section runs until the next marker or end of text. When none of the
/// three markers is found, the entire raw response becomes the explanation and
/// the other fields carry the "See explanation" sentinel — the analysis is
/// never silently empty when the backend returned text.
pub fn parse_response(response: &str) -> FailureAnalysis {
    let extract = |re: &Regex| {
        re.captures(response)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    };

    let root_cause = extract(&ROOT_CAUSE_RE);
    let explanation = extract(&EXPLANATION_RE);
    let suggested_fix = extract(&SUGGESTED_FIX_RE);

    if root_cause.is_empty() && explanation.is_empty() && suggested_fix.is_empty() {
        return FailureAnalysis::new(SEE_EXPLANATION, response, SEE_EXPLANATION);
    }

    FailureAnalysis {
        root_cause,
        explanation,
        suggested_fix,
    }
}

/// Truncate to a character prefix without splitting a multibyte boundary
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::{FailureStatus, TestFailure};
    use pretty_assertions::assert_eq;

    fn sample_failure() -> TestFailure {
        TestFailure {
            test_name: "user can log in".to_string(),
            test_file: "login.spec.ts".to_string(),
            duration_ms: 1234,
            error_message: "Timeout waiting for selector".to_string(),
            error_stack: "at line 10...".to_string(),
            status: FailureStatus::Failed,
            attachments: vec![],
            screenshots: vec![],
            trace_path: None,
            video_path: None,
            analysis: None,
        }
    }

    #[test]
    fn test_build_prompt_embeds_failure_context() {
        let prompt = build_prompt(&sample_failure());
        assert!(prompt.contains("user can log in"));
        assert!(prompt.contains("login.spec.ts"));
        assert!(prompt.contains("1234ms"));
        assert!(prompt.contains("failed"));
        assert!(prompt.contains("Timeout waiting for selector"));
        assert!(prompt.contains("at line 10..."));
    }

    #[test]
    fn test_build_prompt_empty_stack_placeholder() {
        let mut failure = sample_failure();
        failure.error_stack = String::new();
        let prompt = build_prompt(&failure);
        assert!(prompt.contains("No stack trace available"));
    }

    #[test]
    fn test_build_prompt_truncates_long_stack() {
        let mut failure = sample_failure();
        failure.error_stack = "x".repeat(5000);
        let prompt = build_prompt(&failure);
        assert!(!prompt.contains(&"x".repeat(2001)));
        assert!(prompt.contains(&"x".repeat(2000)));
    }

    #[test]
    fn test_truncate_chars_multibyte_safe() {
        let s = "é".repeat(3000);
        let clipped = truncate_chars(&s, 2000);
        assert_eq!(clipped.chars().count(), 2000);
    }

    #[test]
    fn test_parse_response_all_sections() {
        let response = "**Root Cause:** Selector changed\n\n\
            **Explanation:** The login button id was renamed.\n\n\
            **Suggested Fix:** Update the selector.";
        let analysis = parse_response(response);
        assert_eq!(analysis.root_cause, "Selector changed");
        assert_eq!(analysis.explanation, "The login button id was renamed.");
        assert_eq!(analysis.suggested_fix, "Update the selector.");
    }

    #[test]
    fn test_parse_response_case_insensitive_multiline() {
        let response = "**root cause:** A\nmore\n\n**EXPLANATION:** B\n\n**suggested fix:** C";
        let analysis = parse_response(response);
        assert_eq!(analysis.root_cause, "A\nmore");
        assert_eq!(analysis.explanation, "B");
        assert_eq!(analysis.suggested_fix, "C");
    }

    #[test]
    fn test_parse_response_partial_sections() {
        let response = "**Root Cause:** Flaky network";
        let analysis = parse_response(response);
        assert_eq!(analysis.root_cause, "Flaky network");
        assert_eq!(analysis.explanation, "");
        assert_eq!(analysis.suggested_fix, "");
    }

    #[test]
    fn test_parse_response_fallback_to_raw_text() {
        let response = "The model ignored the format entirely and rambled.";
        let analysis = parse_response(response);
        assert_eq!(analysis.explanation, response);
        assert_eq!(analysis.root_cause, "See explanation");
        assert_eq!(analysis.suggested_fix, "See explanation");
    }

    #[test]
    fn test_analyze_unconfigured_backend() {
        let analyzer = FailureAnalyzer::new(LlmConfig::unconfigured());
        let analysis = analyzer.analyze(&sample_failure());
        assert_eq!(analysis.root_cause, NOT_CONFIGURED_ROOT_CAUSE);
        assert!(analysis.explanation.contains("AZURE_OPENAI_ENDPOINT"));
    }
}
