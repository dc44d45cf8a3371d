//! `driftcheck run` — the full audit pass.

use std::path::{Path, PathBuf};

use tracing::warn;

use driftcheck_recon::config::{AuditConfig, StoreConfig};
use driftcheck_recon::{reconcile, DocumentStore, ReportBuilder};
use driftcheck_trail::{Extractor, TrailReader};

use crate::exit_codes::{EXIT_CONFIG_INVALID, EXIT_DISCREPANCIES, EXIT_STORE_UNREACHABLE};
use crate::report::render_human;
use crate::store_http::HttpStore;
use crate::CliError;

pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub trail: Option<PathBuf>,
    pub source: Option<String>,
    pub dest: Option<String>,
    pub source_auth: Option<String>,
    pub dest_auth: Option<String>,
    pub timeout: Option<u64>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub quiet: bool,
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let (trail_path, source_config, dest_config) = resolve_inputs(&args)?;

    let source = HttpStore::new("source", &source_config)?;
    let dest = HttpStore::new("dest", &dest_config)?;

    // Unreachable stores abort before any reconciliation begins.
    for store in [&source, &dest] {
        store.probe().map_err(|e| CliError {
            code: EXIT_STORE_UNREACHABLE,
            message: format!("{} store is unreachable: {e}", store.label()),
            hint: Some("check the URL and network path, then re-run".into()),
        })?;
    }

    let reader = TrailReader::open(&trail_path)
        .map_err(|e| CliError::io(e.to_string()))?;
    let extractor = Extractor::new();
    let mut builder = ReportBuilder::new();
    let mut lines = 0usize;

    for item in reader {
        let line = match item {
            Ok(line) => line,
            Err(e) => {
                warn!(%e, "skipping unreadable trail record");
                continue;
            }
        };
        lines += 1;

        let Some(fact) = extractor.extract(&line.message) else {
            continue;
        };

        builder.record(reconcile(&source, &dest, &fact.namespace, fact.id));
    }

    if !args.quiet {
        eprintln!(
            "checked {} identifier(s) from {} trail line(s)",
            builder.checks_recorded(),
            lines
        );
    }

    let report = builder.finish();

    if let Some(ref path) = args.output {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
        if !args.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if args.json {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        print!("{}", render_human(&report));
    }

    if report.is_clean() {
        Ok(())
    } else {
        // Report already rendered; the exit code is the signal.
        Err(CliError {
            code: EXIT_DISCREPANCIES,
            message: String::new(),
            hint: None,
        })
    }
}

/// Merge config file and flags into the effective inputs. Flags win.
fn resolve_inputs(args: &RunArgs) -> Result<(PathBuf, StoreConfig, StoreConfig), CliError> {
    if let Some(ref config_path) = args.config {
        let config_str = std::fs::read_to_string(config_path).map_err(|e| {
            CliError::io(format!("cannot read {}: {e}", config_path.display()))
        })?;
        let config = AuditConfig::from_toml(&config_str).map_err(|e| CliError {
            code: EXIT_CONFIG_INVALID,
            message: e.to_string(),
            hint: None,
        })?;

        // Trail path is relative to the config file's directory.
        let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        let trail_path = match &args.trail {
            Some(flag) => flag.clone(),
            None => base_dir.join(&config.trail.file),
        };

        let source = override_store(config.stores.source, &args.source, &args.source_auth, args.timeout);
        let dest = override_store(config.stores.dest, &args.dest, &args.dest_auth, args.timeout);
        return Ok((trail_path, source, dest));
    }

    // No config file: the three core flags are required.
    let (trail, source_url, dest_url) = match (&args.trail, &args.source, &args.dest) {
        (Some(t), Some(s), Some(d)) => (t.clone(), s.clone(), d.clone()),
        _ => {
            return Err(CliError::args(
                "without a config file, --trail, --source and --dest are all required",
            )
            .with_hint("driftcheck run --trail failures.csv --source <url> --dest <url>"))
        }
    };

    let timeout_secs = args.timeout.unwrap_or(10);
    let source = StoreConfig {
        url: source_url,
        auth: args.source_auth.clone().unwrap_or_else(|| "none".into()),
        timeout_secs,
    };
    let dest = StoreConfig {
        url: dest_url,
        auth: args.dest_auth.clone().unwrap_or_else(|| "none".into()),
        timeout_secs,
    };
    Ok((trail, source, dest))
}

fn override_store(
    mut config: StoreConfig,
    url: &Option<String>,
    auth: &Option<String>,
    timeout: Option<u64>,
) -> StoreConfig {
    if let Some(url) = url {
        config.url = url.clone();
    }
    if let Some(auth) = auth {
        config.auth = auth.clone();
    }
    if let Some(timeout_secs) = timeout {
        config.timeout_secs = timeout_secs;
    }
    config
}
