//! Human rendering of an audit report.

use std::fmt::Write;

use driftcheck_recon::AuditReport;

pub fn render_human(report: &AuditReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Audit Report ===");
    for (namespace, stats) in &report.stats {
        let _ = writeln!(out);
        let _ = writeln!(out, "Namespace: {}", namespace);
        let _ = writeln!(out, "  Total Checks: {}", stats.total_checks);
        let _ = writeln!(out, "  Matches: {}", stats.matches);
        let _ = writeln!(out, "  Mismatches: {}", stats.mismatches);
        let _ = writeln!(out, "  Missing in Source: {}", stats.missing_in_source);
        let _ = writeln!(out, "  Missing in Dest: {}", stats.missing_in_dest);
        let _ = writeln!(out, "  Errors: {}", stats.errors);
    }

    if !report.discrepancies.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "=== Discrepancies ===");
        for d in &report.discrepancies {
            if d.details.is_empty() {
                let _ = writeln!(out, "[{}] id={} status={}", d.namespace, d.id, d.status);
            } else {
                let _ = writeln!(
                    out,
                    "[{}] id={} status={} details={}",
                    d.namespace, d.id, d.status, d.details
                );
            }
        }
    }

    out
}
