use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use filing_cli::config::{CliConfig, DEFAULT_CONFIG_FILE};
use filing_cli::inputs::WizardInputs;
use filing_cli::{logging, run};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Income-tax return filing wizard.
///
/// Creates a filing on the configured service, fills the input steps from
/// an inputs file, runs the tax computation, and prints the review.
#[derive(Debug, Parser)]
struct Cli {
    /// Answers for the input steps (TOML with [personal], [income], [deductions]).
    #[arg(long, short, env = "FILING_INPUTS")]
    inputs: PathBuf,

    /// Configuration file. Missing is fine; defaults apply.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Filing service base URL.
    #[arg(long)]
    endpoint: Option<String>,

    /// Bearer token for the filing service.
    #[arg(long)]
    token: Option<String>,

    /// Submit the filing after review.
    #[arg(long)]
    submit: bool,

    /// Print the report as JSON, including chart layouts.
    #[arg(long)]
    json: bool,

    /// Log level or EnvFilter directive (ignored when RUST_LOG is set).
    #[arg(long)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<CliConfig> {
        let mut config = CliConfig::load(&self.config)?;
        config.apply_process_env()?;
        if let Some(endpoint) = &self.endpoint {
            config.service.endpoint = endpoint.clone();
        }
        if let Some(token) = &self.token {
            config.service.access_token = Some(token.clone());
        }
        if let Some(level) = &self.log_level {
            config.log.level = level.clone();
        }
        if let Some(file) = &self.log_file {
            config.log.file = Some(file.clone());
        }
        Ok(config)
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    logging::init_logging(&config.log.level, config.log.file.as_deref())?;

    let inputs = WizardInputs::load(&cli.inputs)?;

    debug!("connecting to {} backend at {}", config.service.backend, config.service.endpoint);
    let service = run::build_registry()
        .create(&config.service)
        .await
        .context("cannot reach filing service")?;

    let report = run::run_wizard(service, &config, &inputs, cli.submit).await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    Ok(())
}
