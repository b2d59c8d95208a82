//! Integration tests for the full failure-extraction and report pipeline

use std::fs;

use fail_lens::analyzer::FailureAnalyzer;
use fail_lens::llm::LlmConfig;
use fail_lens::report::{ReportGenerator, HTML_REPORT_NAME, JSON_REPORT_NAME};
use fail_lens::results::RunResults;

const SAMPLE_RESULTS: &str = r#"{
    "suites": [
        {
            "file": "login.spec.ts",
            "specs": [
                {
                    "title": "user can log in",
                    "tests": [
                        {
                            "results": [
                                {
                                    "status": "failed",
                                    "duration": 1234,
                                    "error": {
                                        "message": "Timeout waiting for selector",
                                        "stack": "at line 10..."
                                    }
                                }
                            ]
                        }
                    ]
                },
                {
                    "title": "user sees the dashboard",
                    "tests": [
                        {
                            "results": [
                                {"status": "passed", "duration": 300}
                            ]
                        }
                    ]
                }
            ],
            "suites": [
                {
                    "specs": [
                        {
                            "title": "nested timeout",
                            "tests": [
                                {
                                    "results": [
                                        {"status": "timedOut", "duration": 30000}
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        }
    ]
}"#;

#[test]
fn test_pipeline_without_backend_produces_both_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let results_path = dir.path().join("results.json");
    fs::write(&results_path, SAMPLE_RESULTS).expect("write results");

    let results = RunResults::load(&results_path).expect("load results");
    let mut failures = results.extract_failures();
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].test_name, "user can log in");
    assert_eq!(failures[1].test_name, "nested timeout");
    // file path inherited by the nested suite
    assert_eq!(failures[1].test_file, "login.spec.ts");

    let analyzer = FailureAnalyzer::new(LlmConfig::unconfigured());
    for failure in &mut failures {
        failure.analysis = Some(analyzer.analyze(failure));
    }

    let output_dir = dir.path().join("report");
    let generator = ReportGenerator::new(&output_dir);
    let html_path = generator.generate_html_report(&mut failures).expect("html");
    let json_path = generator.generate_json_report(&failures).expect("json");

    assert!(html_path.ends_with(HTML_REPORT_NAME));
    assert!(json_path.ends_with(JSON_REPORT_NAME));

    let html = fs::read_to_string(&html_path).expect("read html");
    assert!(html.contains("user can log in"));
    assert!(html.contains("nested timeout"));
    assert!(html.contains("TIMEOUT"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("read json")).expect("parse");
    assert_eq!(report["total_failures"], 2);
    assert_eq!(report["failures"][0]["duration_ms"], 1234);
    assert_eq!(report["failures"][0]["status"], "failed");
    assert_eq!(report["failures"][1]["status"], "timedOut");
    assert_eq!(
        report["failures"][0]["ai_analysis"]["root_cause"],
        "Azure OpenAI not configured"
    );
}

#[test]
fn test_pipeline_zero_failures_still_reports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let results_path = dir.path().join("results.json");
    fs::write(
        &results_path,
        r#"{"suites": [{"file": "ok.spec.ts", "specs": [{"title": "t", "tests": [
            {"results": [{"status": "passed", "duration": 10}]}
        ]}]}]}"#,
    )
    .expect("write results");

    let results = RunResults::load(&results_path).expect("load");
    let mut failures = results.extract_failures();
    assert!(failures.is_empty());

    let output_dir = dir.path().join("report");
    let generator = ReportGenerator::new(&output_dir);
    generator.generate_html_report(&mut failures).expect("html");
    generator.generate_json_report(&failures).expect("json");

    let html = fs::read_to_string(output_dir.join(HTML_REPORT_NAME)).expect("read html");
    assert!(html.contains("All Tests Passed!"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join(JSON_REPORT_NAME)).expect("read"))
            .expect("parse");
    assert_eq!(report["total_failures"], 0);
}

#[test]
fn test_assets_copied_into_report_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let shot_path = dir.path().join("failure-shot.png");
    let trace_path = dir.path().join("trace.zip");
    fs::write(&shot_path, b"png bytes").expect("write shot");
    fs::write(&trace_path, b"zip bytes").expect("write trace");

    let results_json = format!(
        r#"{{"suites": [{{"file": "a.spec.ts", "specs": [{{"title": "t", "tests": [{{"results": [{{
            "status": "failed",
            "duration": 100,
            "attachments": [
                {{"name": "screenshot", "path": "{shot}", "contentType": "image/png"}},
                {{"name": "trace", "path": "{trace}", "contentType": "application/zip"}}
            ]
        }}]}}]}}]}}]}}"#,
        shot = shot_path.display(),
        trace = trace_path.display(),
    );
    let results: RunResults = serde_json::from_str(&results_json).expect("parse results");
    let mut failures = results.extract_failures();

    let output_dir = dir.path().join("report");
    let generator = ReportGenerator::new(&output_dir);
    generator.generate_html_report(&mut failures).expect("html");

    assert!(output_dir.join("assets/screenshot-0-0.png").exists());
    assert!(output_dir.join("assets/trace-0.zip").exists());
    assert_eq!(failures[0].screenshots[0].path, "assets/screenshot-0-0.png");
    assert_eq!(failures[0].trace_path.as_deref(), Some("assets/trace-0.zip"));

    let json_path = generator.generate_json_report(&failures).expect("json");
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("read")).expect("parse");
    assert_eq!(
        report["failures"][0]["screenshots"][0]["path"],
        "assets/screenshot-0-0.png"
    );
    assert_eq!(report["failures"][0]["trace_path"], "assets/trace-0.zip");
}

#[test]
fn test_analyzer_against_mock_server() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/openai/deployments/gpt-test/chat/completions")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices": [{"message": {"content":
                "**Root Cause:** Stale selector\n\n**Explanation:** The id changed.\n\n**Suggested Fix:** Update it."
            }}]}"#,
        )
        .create();

    let config = LlmConfig::new(server.url(), "test-key").deployment("gpt-test");
    let analyzer = FailureAnalyzer::new(config);

    let results: RunResults = serde_json::from_str(
        r#"{"suites": [{"file": "a.spec.ts", "specs": [{"title": "t", "tests": [{"results": [
            {"status": "failed", "duration": 10, "error": {"message": "boom", "stack": "s"}}
        ]}]}]}]}"#,
    )
    .expect("parse");
    let failures = results.extract_failures();

    let analysis = analyzer.analyze(&failures[0]);
    mock.assert();
    assert_eq!(analysis.root_cause, "Stale selector");
    assert_eq!(analysis.explanation, "The id changed.");
    assert_eq!(analysis.suggested_fix, "Update it.");
}

#[test]
fn test_analyzer_maps_backend_error_to_placeholder() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/openai/deployments/gpt-test/chat/completions")
        .match_query(mockito::Matcher::Any)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"code": "401", "message": "Access denied due to invalid key"}}"#)
        .create();

    let config = LlmConfig::new(server.url(), "bad-key").deployment("gpt-test");
    let analyzer = FailureAnalyzer::new(config);

    let results: RunResults = serde_json::from_str(
        r#"{"suites": [{"specs": [{"title": "t", "tests": [{"results": [
            {"status": "failed", "duration": 10}
        ]}]}]}]}"#,
    )
    .expect("parse");
    let failures = results.extract_failures();

    let analysis = analyzer.analyze(&failures[0]);
    assert_eq!(analysis.root_cause, "AI Analysis Error");
    assert!(analysis.explanation.contains("Access denied"));
}
