use std::collections::BTreeMap;

use crate::model::{AuditMeta, AuditReport, CheckResult, CheckStatus, NamespaceStats};

/// Accumulates check results for one audit run. Explicit context object
/// owned by the driver; a pure order-preserving fold with no deduplication —
/// repeated identifiers count once per observation.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    stats: BTreeMap<String, NamespaceStats>,
    discrepancies: Vec<CheckResult>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: CheckResult) {
        let stats = self.stats.entry(result.namespace.to_string()).or_default();
        stats.total_checks += 1;
        match result.status {
            CheckStatus::Match => stats.matches += 1,
            CheckStatus::Mismatch => stats.mismatches += 1,
            CheckStatus::MissingInSource => stats.missing_in_source += 1,
            CheckStatus::MissingInDest => stats.missing_in_dest += 1,
            CheckStatus::Error => stats.errors += 1,
        }
        if result.status != CheckStatus::Match {
            self.discrepancies.push(result);
        }
    }

    pub fn checks_recorded(&self) -> usize {
        self.stats.values().map(|s| s.total_checks).sum()
    }

    pub fn finish(self) -> AuditReport {
        AuditReport {
            meta: AuditMeta {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
            },
            stats: self.stats,
            discrepancies: self.discrepancies,
        }
    }
}
