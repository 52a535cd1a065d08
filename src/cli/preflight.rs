//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and credentials are available before
//! starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{BriefError, Result};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Processing needs yt-dlp, plus the full credential set when the
    /// oracle is enabled.
    Process,
    /// Queries need the full-mode credential set.
    Query,
}

/// Run pre-flight checks for the given operation.
///
/// Mirrors exactly what orchestrator construction will demand for the
/// operation, so a credential problem surfaces here with a hint instead of
/// as a construction error.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Process => {
            check_tool("yt-dlp")?;
            if settings.oracle.enabled {
                check_openai_key()?;
                check_env(&settings.storage.token_env)?;
            }
        }
        Operation::Query => {
            if settings.oracle.enabled {
                check_openai_key()?;
                check_env(&settings.storage.token_env)?;
            }
        }
    }
    Ok(())
}

/// Check if the OpenAI API key is configured.
pub fn check_openai_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(BriefError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(BriefError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check that an environment variable is set and non-empty.
pub fn check_env(name: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(()),
        _ => Err(BriefError::Config(format!(
            "{} not set. Obtain one with: gcloud auth print-access-token",
            name
        ))),
    }
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(BriefError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(BriefError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(BriefError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_process_needs_no_credentials() {
        // Local mode only needs yt-dlp; credential checks must not run.
        let settings = Settings::default();
        match check(Operation::Process, &settings) {
            Ok(()) => {}
            Err(BriefError::ToolNotFound(tool)) => assert_eq!(tool, "yt-dlp"),
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_query_with_oracle_disabled_passes() {
        // Construction demands no credentials in local mode; neither may
        // the preflight.
        let mut settings = Settings::default();
        settings.storage.token_env = "BRAWLBRIEF_TEST_UNSET_TOKEN".to_string();
        assert!(check(Operation::Query, &settings).is_ok());
    }

    #[test]
    fn test_query_with_oracle_enabled_demands_credentials() {
        let mut settings = Settings::default();
        settings.oracle.enabled = true;
        settings.storage.token_env = "BRAWLBRIEF_TEST_UNSET_TOKEN".to_string();

        // Whichever credential is absent, the check fails before
        // construction would.
        let err = check(Operation::Query, &settings).unwrap_err();
        assert!(matches!(err, BriefError::Config(_)));
    }
}
