//! Process command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{FullRunResult, LocalRunResult, Orchestrator, ProcessOutcome};
use anyhow::Result;

/// Run the process command.
pub async fn run_process(url: &str, local: bool, mut settings: Settings) -> Result<()> {
    if local {
        settings.oracle.enabled = false;
    }

    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Process, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'brawlbrief doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    Output::info(&format!("Processing: {}", url));

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Running pipeline...");
    let outcome = orchestrator.process(url).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(ProcessOutcome::Local(result)) => print_local(&result),
        Ok(ProcessOutcome::Full(result)) => print_full(&result),
        Err(e) => {
            Output::error(&format!("Failed to process: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

fn print_local(result: &LocalRunResult) {
    Output::success(&format!(
        "Fetched transcript for '{}' ({} segments)",
        result.video_id, result.segments_count
    ));
    println!();
    Output::header("Transcript Preview");
    println!("{}", result.transcript_preview);
    println!();
    Output::info("Local mode: enable [oracle] in the config to extract and index.");
}

fn print_full(result: &FullRunResult) {
    Output::success(&format!(
        "Indexed '{}' ({} chunks)",
        result.title, result.chunk_count
    ));
    println!();
    Output::header("Brief");
    Output::kv("Video", &result.video_id);
    Output::kv("Published", &result.publish_date);
    Output::kv("Summary", &result.summary);
    if result.brawlers.is_empty() {
        Output::kv("Brawlers", "none mentioned");
    } else {
        Output::kv("Brawlers", &result.brawlers.join(", "));
    }
    Output::kv("Chunk file", &result.chunk_uri);
    Output::kv("Import operation", &result.import_operation);
    Output::kv("Usage", &result.usage.log_line());
    println!();
    Output::info("Import runs in the background; chunks become queryable shortly.");
}
