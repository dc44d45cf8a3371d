// driftcheck CLI - post-migration drift audits for document stores

mod audit;
mod exit_codes;
mod report;
mod scan;
mod store_http;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_CONFIG_INVALID, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "driftcheck")]
#[command(about = "Audit source/destination document stores against a sync-failure trail")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full audit: replay the failure trail against both stores
    #[command(after_help = "\
Examples:
  driftcheck run audit.toml
  driftcheck run audit.toml --json
  driftcheck run --trail failures.csv --source https://src.internal/api --dest https://dst.internal/api
  driftcheck run audit.toml --output report.json

Exit code 1 indicates discrepancies: mismatched, single-sided, or
error-status checks. A clean audit exits 0.")]
    Run {
        /// Path to the audit .toml config (optional when the three
        /// --trail/--source/--dest flags are given)
        config: Option<PathBuf>,

        /// CSV failure trail (overrides the config value)
        #[arg(long)]
        trail: Option<PathBuf>,

        /// Source store base URL (overrides the config value)
        #[arg(long)]
        source: Option<String>,

        /// Destination store base URL (overrides the config value)
        #[arg(long)]
        dest: Option<String>,

        /// Source auth spec: none, bearer-env:VAR, header-env:NAME:VAR
        #[arg(long)]
        source_auth: Option<String>,

        /// Destination auth spec: none, bearer-env:VAR, header-env:NAME:VAR
        #[arg(long)]
        dest_auth: Option<String>,

        /// Per-lookup timeout in seconds (overrides the config value)
        #[arg(long)]
        timeout: Option<u64>,

        /// Output the report as JSON on stdout instead of the human summary
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Suppress stderr progress notes
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Extraction-only coverage audit of a trail (no store access)
    #[command(after_help = "\
Examples:
  driftcheck scan failures.csv
  driftcheck scan failures.csv --json")]
    Scan {
        /// CSV failure trail to scan
        trail: PathBuf,

        /// Output counts as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate an audit config without running
    #[command(after_help = "\
Examples:
  driftcheck validate audit.toml")]
    Validate {
        /// Path to the audit .toml config
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            trail,
            source,
            dest,
            source_auth,
            dest_auth,
            timeout,
            json,
            output,
            quiet,
        } => audit::cmd_run(audit::RunArgs {
            config,
            trail,
            source,
            dest,
            source_auth,
            dest_auth,
            timeout,
            json,
            output,
            quiet,
        }),
        Commands::Scan { trail, json } => scan::cmd_scan(trail, json),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path).map_err(|e| {
        CliError::io(format!("cannot read {}: {e}", config_path.display()))
    })?;
    driftcheck_recon::AuditConfig::from_toml(&config_str).map_err(|e| CliError {
        code: EXIT_CONFIG_INVALID,
        message: e.to_string(),
        hint: None,
    })?;
    println!("config OK: {}", config_path.display());
    Ok(())
}

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
