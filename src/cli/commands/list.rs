//! List command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Query, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'brawlbrief doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let corpus_name = settings.rag.corpus_name.clone();
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Listing corpus files...");
    let files = orchestrator.list_files().await;
    spinner.finish_and_clear();

    match files {
        Ok(files) => {
            if files.is_empty() {
                Output::info(&format!(
                    "Corpus '{}' has no imported files yet.",
                    corpus_name
                ));
                return Ok(());
            }

            Output::header(&format!("Files in '{}'", corpus_name));
            for file in &files {
                Output::list_item(&format!("{} ({})", file.display_name, file.name));
            }
            println!();
            Output::info(&format!("{} file(s) total", files.len()));
        }
        Err(e) => {
            Output::error(&format!("Failed to list files: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
