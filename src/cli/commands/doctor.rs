//! Doctor command - verify system requirements and configuration.

use crate::catalog::BrawlerCatalog;
use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Brawlbrief Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    // Check external tools
    println!("{}", style("External Tools").bold());
    let tool_check = check_tool("yt-dlp", "yt-dlp --version", install_hint_ytdlp());
    tool_check.print();
    checks.push(tool_check);

    println!();

    // Check credentials
    println!("{}", style("Credentials").bold());
    let api_check = check_openai_api_key(settings);
    api_check.print();
    checks.push(api_check);
    let token_check = check_gcp_token(settings);
    token_check.print();
    checks.push(token_check);

    println!();

    // Check GCP project configuration
    println!("{}", style("GCP Configuration").bold());
    let gcp_checks = check_gcp_settings(settings);
    for check in &gcp_checks {
        check.print();
    }
    checks.extend(gcp_checks);

    println!();

    // Check catalog
    println!("{}", style("Catalog").bold());
    let catalog_check = check_catalog(settings);
    catalog_check.print();
    checks.push(catalog_check);

    println!();

    // Check configuration file
    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using brawlbrief.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!(
            "All checks passed with {} warning(s).",
            warnings
        ));
    } else {
        Output::success("All checks passed! brawlbrief is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str, version_cmd: &str, hint: &str) -> CheckResult {
    let parts: Vec<&str> = version_cmd.split_whitespace().collect();
    let cmd = parts[0];
    let args = &parts[1..];

    match Command::new(cmd).args(args).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();

            let version_display = if version.len() > 50 {
                format!("{}...", &version[..50])
            } else {
                version
            };

            CheckResult::ok(name, &version_display)
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(name, "not found", hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

/// Check if OpenAI API key is configured.
fn check_openai_api_key(settings: &Settings) -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.chars().count() > 20 => {
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", mask_key(&key)))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) if !settings.oracle.enabled => CheckResult::warning(
            "OPENAI_API_KEY",
            "not set (oracle disabled, local mode only)",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check if the GCP access token is configured.
fn check_gcp_token(settings: &Settings) -> CheckResult {
    let name = settings.storage.token_env.clone();
    match std::env::var(&name) {
        Ok(token) if !token.is_empty() => {
            CheckResult::ok(&name, &format!("configured ({} chars)", token.len()))
        }
        _ if !settings.oracle.enabled => CheckResult::warning(
            &name,
            "not set (oracle disabled, local mode only)",
            "Set with: export GCP_ACCESS_TOKEN=$(gcloud auth print-access-token)",
        ),
        _ => CheckResult::error(
            &name,
            "not set",
            "Set with: export GCP_ACCESS_TOKEN=$(gcloud auth print-access-token)",
        ),
    }
}

/// Check GCP project, bucket, and corpus settings.
fn check_gcp_settings(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    match &settings.storage.project_id {
        Some(project) => {
            results.push(CheckResult::ok("Project", project));
            if let Some(bucket) = settings.storage.bucket_name() {
                results.push(CheckResult::ok("Bucket", &bucket));
            }
        }
        None => {
            results.push(CheckResult::warning(
                "Project",
                "not configured",
                "Set [storage] project_id in the config file",
            ));
        }
    }

    results.push(CheckResult::ok(
        "Corpus",
        &format!(
            "{} ({})",
            settings.rag.corpus_name, settings.rag.location
        ),
    ));

    results
}

/// Check that the brawler catalog loads.
fn check_catalog(settings: &Settings) -> CheckResult {
    match BrawlerCatalog::load(settings.catalog.path.as_deref()) {
        Ok(catalog) => {
            let source = match &settings.catalog.path {
                Some(path) => format!("{} brawlers from {}", catalog.len(), path),
                None => format!("{} brawlers (built-in)", catalog.len()),
            };
            CheckResult::ok("Brawler catalog", &source)
        }
        Err(e) => CheckResult::error(
            "Brawler catalog",
            &format!("failed to load: {}", e),
            "Check the [catalog] path in the config file",
        ),
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: brawlbrief config edit",
        )
    }
}

/// Mask a credential for display: first 7 and last 4 characters.
fn mask_key(key: &str) -> String {
    let total = key.chars().count();
    let head: String = key.chars().take(7).collect();
    let tail: String = key.chars().skip(total.saturating_sub(4)).collect();
    format!("{}...{}", head, tail)
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_mask_key_is_char_safe() {
        assert_eq!(mask_key("sk-proj-abcdefghij1234"), "sk-proj...1234");
        // Multibyte content at either boundary must not panic.
        let masked = mask_key("sk-projé-abcdefghij12é4");
        assert!(masked.starts_with("sk-proj"));
        assert!(masked.ends_with("12é4"));
    }

    #[test]
    fn test_catalog_check_uses_builtin_by_default() {
        let settings = Settings::default();
        let result = check_catalog(&settings);
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("built-in"));
    }
}
