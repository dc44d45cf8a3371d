//! `driftcheck scan` — extraction-only coverage audit.
//!
//! Replays the trail through the extractor without touching any store, so
//! operators can see how many lines carry usable facts versus malformed or
//! irrelevant content.

use std::path::PathBuf;

use serde::Serialize;

use driftcheck_trail::{ExtractOutcome, Extractor, TrailReader};

use crate::CliError;

#[derive(Debug, Default, Serialize)]
pub struct ScanCounts {
    pub lines: usize,
    pub facts: usize,
    pub irrelevant: usize,
    pub no_namespace: usize,
    pub no_id_fragment: usize,
    pub malformed_id: usize,
    pub invalid_namespace: usize,
    pub csv_errors: usize,
}

pub fn cmd_scan(trail: PathBuf, json: bool) -> Result<(), CliError> {
    let reader = TrailReader::open(&trail).map_err(|e| CliError::io(e.to_string()))?;
    let counts = scan_trail(reader);

    if json {
        let json_str = serde_json::to_string_pretty(&counts)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        println!("=== Extraction Coverage ===");
        println!("  Lines: {}", counts.lines);
        println!("  Facts: {}", counts.facts);
        println!("  Irrelevant: {}", counts.irrelevant);
        println!("  No namespace: {}", counts.no_namespace);
        println!("  No id fragment: {}", counts.no_id_fragment);
        println!("  Malformed id: {}", counts.malformed_id);
        println!("  Invalid namespace: {}", counts.invalid_namespace);
        println!("  CSV errors: {}", counts.csv_errors);
    }

    Ok(())
}

fn scan_trail<R: std::io::Read>(reader: TrailReader<R>) -> ScanCounts {
    let extractor = Extractor::new();
    let mut counts = ScanCounts::default();

    for item in reader {
        let line = match item {
            Ok(line) => line,
            Err(_) => {
                counts.csv_errors += 1;
                continue;
            }
        };
        counts.lines += 1;

        match extractor.scan(&line.message) {
            ExtractOutcome::Fact(_) => counts.facts += 1,
            ExtractOutcome::Irrelevant => counts.irrelevant += 1,
            ExtractOutcome::NoNamespace => counts.no_namespace += 1,
            ExtractOutcome::NoIdFragment => counts.no_id_fragment += 1,
            ExtractOutcome::MalformedId { .. } => counts.malformed_id += 1,
            ExtractOutcome::InvalidNamespace { .. } => counts.invalid_namespace += 1,
        }
    }

    counts
}
