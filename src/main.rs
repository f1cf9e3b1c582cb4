use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use spanmark::audit::AuditLog;
use spanmark::engine::PlainTextEngine;
use spanmark::extraction;
use spanmark::highlight::HighlightColor;
use spanmark::highlighter::{Highlighter, HighlighterConfig};
use spanmark::matcher::DEFAULT_THRESHOLD;

#[derive(Parser, Debug)]
#[command(name = "spanmark")]
#[command(about = "Anchors extracted sentences in a document and highlights their exact spans")]
#[command(version)]
struct Args {
    /// Plain-text document to highlight
    document: PathBuf,

    /// Extraction result JSON with user stories and source sentences
    stories: PathBuf,

    /// Minimum fuzzy score (0-100) before an anchor search is attempted
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Audit log output path, overwritten every run
    #[arg(long, default_value = "highlight_log.md")]
    log_out: PathBuf,

    /// Optional JSON report of the applied highlight spans
    #[arg(long)]
    spans_out: Option<PathBuf>,

    /// Engine color name for stories without one (e.g. wdYellow)
    #[arg(long, default_value = "wdYellow")]
    default_color: String,

    /// Treat the stories file as a raw extraction reply instead of clean JSON
    #[arg(long)]
    accept_raw_reply: bool,
}

fn main() -> Result<()> {
    // WHY: structured JSON logging enables observability and debugging in production
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting spanmark");
    info!(?args, "Parsed CLI arguments");

    // WHY: validate inputs early to fail fast with clear errors
    if !args.document.exists() {
        anyhow::bail!("Document does not exist: {}", args.document.display());
    }
    if !args.stories.exists() {
        anyhow::bail!("Stories file does not exist: {}", args.stories.display());
    }

    let document_text = std::fs::read_to_string(&args.document)?;
    let stories_text = std::fs::read_to_string(&args.stories)?;

    let result = if args.accept_raw_reply {
        extraction::parse_reply(&stories_text)?
    } else {
        extraction::parse_result(&stories_text)?
    };
    info!("Parsed {} user stories", result.user_stories.len());

    let default_color = HighlightColor::from_engine_name(&args.default_color);
    let queries = extraction::to_query_sentences(&result, default_color);

    let config = HighlighterConfig {
        threshold: args.threshold,
        default_color,
    };
    let mut highlighter = Highlighter::new(PlainTextEngine::new(&document_text), config)?;
    let mut audit = AuditLog::new(args.document.display().to_string(), args.threshold);

    let run_result = highlighter.run(&queries, &mut audit);

    // The audit artifact is written even when the engine failed mid-run
    audit.write_to(&args.log_out);
    info!("Audit log written to {}", args.log_out.display());

    let summary = run_result?;

    if let Some(spans_out) = &args.spans_out {
        let report = serde_json::to_string_pretty(highlighter.engine().highlights())?;
        std::fs::write(spans_out, report)?;
        info!("Span report written to {}", spans_out.display());
    }

    println!(
        "spanmark v{} - highlighting run complete",
        env!("CARGO_PKG_VERSION")
    );
    println!("Sentences processed: {}", summary.outcomes.len());
    println!("  Highlighted: {}", summary.highlighted_count());
    if summary.gate_rejected_count() > 0 {
        println!("  Rejected by fuzzy gate: {}", summary.gate_rejected_count());
    }
    if summary.not_found_count() > 0 {
        println!("  No verified span: {}", summary.not_found_count());
    }
    println!("Detailed log: {}", args.log_out.display());

    Ok(())
}
