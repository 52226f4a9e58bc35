// Webhook Activator - Main Entry Point
//
// One-shot tool that walks a list of GitHub organizations and turns every
// disabled organization and repository webhook back on:
// - Configuration loading and credential resolution
// - GitHub client construction (token or GitHub App)
// - The activation sweep and its failure digest

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use webhook_activator::config::{Config, LoggingConfig};
use webhook_activator::github::GithubClient;
use webhook_activator::sweep;

/// Webhook Activator: re-enable disabled GitHub webhooks
#[derive(Parser, Debug)]
#[command(name = "webhook-activator")]
#[command(author = "Webhook Activator Contributors")]
#[command(version)]
#[command(about = "Activate all disabled organization and repository webhooks", long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to a TOML config file
    #[arg(short, long, env = "WEBHOOK_ACTIVATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Organizations to sweep, comma or newline separated
    #[arg(long)]
    orgs: Option<String>,

    /// GitHub REST API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Exit with an error when any webhook activation failed
    #[arg(long)]
    fail_on_errors: bool,
}

impl Args {
    /// Command-line values override file and environment settings
    fn apply(&self, config: &mut Config) {
        if let Some(orgs) = &self.orgs {
            config.target.orgs = Some(orgs.clone());
        }
        if let Some(api_url) = &self.api_url {
            config.target.api_url = Some(api_url.clone());
        }
        if self.fail_on_errors {
            config.fail_on_errors = true;
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    args.apply(&mut config);

    init_tracing(&config)?;

    let resolved = config.resolve().context("Invalid configuration")?;
    info!(
        "Sweeping {} organization(s) on {} using {}",
        resolved.organizations.len(),
        resolved.api_url,
        resolved.credentials.kind()
    );

    let client = GithubClient::connect(&resolved.api_url, &resolved.credentials, &resolved.client)
        .await
        .context("Failed to create GitHub client")?;

    let outcome = sweep::run(&client, &resolved.organizations).await;

    // The digest is printed whether or not the sweep was aborted
    if let Some(report) = outcome.failure_report() {
        println!("{}", report);
    }

    if let Some(err) = outcome.aborted {
        return Err(anyhow::Error::new(err).context("Webhook sweep aborted"));
    }

    if resolved.fail_on_errors && !outcome.failures.is_empty() {
        anyhow::bail!("{} webhook activation(s) failed", outcome.failures.len());
    }

    Ok(())
}

/// Initialize tracing from the logging config; `RUST_LOG` still wins
fn init_tracing(config: &Config) -> Result<()> {
    let level: Level = config.log_level()?;
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(std::io::stdout().is_terminal());

    let LoggingConfig { format, .. } = &config.logging;
    match format.to_lowercase().as_str() {
        "json" => builder.json().init(),
        "pretty" => builder.pretty().init(),
        _ => builder.compact().init(),
    }

    Ok(())
}
