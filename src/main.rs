use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use fail_lens::analyzer::FailureAnalyzer;
use fail_lens::config::{DEFAULT_OUTPUT_DIR, DEFAULT_PLAYWRIGHT_REPORT_DIR};
use fail_lens::report::ReportGenerator;
use fail_lens::results::RunResults;

/// fail-lens - Playwright test failure analysis with AI-generated explanations
#[derive(Parser, Debug)]
#[command(
    name = "fail-lens",
    about = "Analyze Playwright test failures using Azure OpenAI",
    after_help = "ENVIRONMENT VARIABLES:\n\
        AZURE_OPENAI_ENDPOINT          Azure OpenAI resource endpoint URL\n\
        AZURE_OPENAI_API_KEY           API key for the resource\n\
        AZURE_OPENAI_DEPLOYMENT_NAME   Deployment (model) name\n\
        AZURE_OPENAI_API_VERSION       REST API version\n\
        FAIL_LENS_CONNECT_TIMEOUT      Connection timeout in seconds"
)]
struct Args {
    /// Path to the Playwright JSON results file (default: probe common locations)
    #[arg(short, long)]
    results_file: Option<PathBuf>,

    /// Output directory for reports
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Path to the Playwright HTML report directory (screenshot fallback lookup)
    #[arg(short, long, default_value = DEFAULT_PLAYWRIGHT_REPORT_DIR)]
    playwright_report: PathBuf,

    /// Inline screenshots into the HTML report as base64 data URIs
    #[arg(long)]
    embed_screenshots: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let results_file = match args.results_file.or_else(locate_results_file) {
        Some(path) if path.exists() => path,
        _ => {
            return Err("Could not find Playwright results file.\n\
                Run tests first, or specify a path: fail-lens --results-file PATH"
                .into());
        }
    };

    println!("\nTest Failure Explainer");
    println!("{}", "=".repeat(60));
    println!("Results file: {}", results_file.display());

    let results = RunResults::load(&results_file)?;
    let mut failures = results.extract_failures();
    println!("Found {} failed test(s)", failures.len());

    let generator = ReportGenerator::new(&args.output_dir)
        .playwright_report_dir(&args.playwright_report)
        .embed_images(args.embed_screenshots);

    if failures.is_empty() {
        println!("\nAll tests passed - no failures to analyze!");
        let html_path = generator.generate_html_report(&mut failures)?;
        let json_path = generator.generate_json_report(&failures)?;
        println!("\nReports generated:");
        println!("   HTML: {}", html_path.display());
        println!("   JSON: {}", json_path.display());
        return Ok(());
    }

    let analyzer = FailureAnalyzer::from_env();
    if !analyzer.is_configured() {
        println!("\nWarning: Azure OpenAI not configured!");
        println!("   Set environment variables:");
        println!("   - AZURE_OPENAI_ENDPOINT");
        println!("   - AZURE_OPENAI_API_KEY");
        println!("   - AZURE_OPENAI_DEPLOYMENT_NAME");
    } else {
        println!("Azure OpenAI configured: {}", analyzer.deployment());
    }

    println!("\nAnalyzing failures...");
    let total = failures.len();
    for (i, failure) in failures.iter_mut().enumerate() {
        println!("\n[{}/{}] {}", i + 1, total, failure.test_name);
        println!("    File: {}", failure.test_file);
        if !failure.screenshots.is_empty() {
            println!("    {} screenshot(s)", failure.screenshots.len());
        }
        if failure.trace_path.is_some() {
            println!("    Trace available");
        }

        let analysis = analyzer.analyze(failure);
        println!("    Root cause: {}", preview(&analysis.root_cause, 60));
        failure.analysis = Some(analysis);
    }

    println!("\nGenerating reports...");
    let html_path = generator.generate_html_report(&mut failures)?;
    let json_path = generator.generate_json_report(&failures)?;

    println!("\n{}", "=".repeat(60));
    println!("Analysis complete!");
    println!("\nReports saved to:");
    println!("   HTML: {}", html_path.display());
    println!("   JSON: {}", json_path.display());
    println!("\nOpen the HTML report in a browser to view detailed analysis.");

    Ok(())
}

/// Probe the conventional locations for a results file
fn locate_results_file() -> Option<PathBuf> {
    let candidates = [
        std::env::temp_dir().join("playwright-poc-output/results.json"),
        PathBuf::from("test-results/results.json"),
        PathBuf::from("playwright-report/results.json"),
    ];
    candidates.into_iter().find(|p| p.exists())
}

/// Clip a string for one-line progress output
fn preview(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let clipped: String = s.chars().take(max_chars).collect();
        format!("{}...", clipped)
    } else {
        s.to_string()
    }
}
