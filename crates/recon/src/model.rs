use std::collections::BTreeMap;

use serde::Serialize;

use driftcheck_types::{Namespace, ObjectId};

// ---------------------------------------------------------------------------
// Check results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Match,
    Mismatch,
    MissingInSource,
    MissingInDest,
    Error,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Mismatch => "mismatch",
            Self::MissingInSource => "missing_in_source",
            Self::MissingInDest => "missing_in_dest",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of reconciling one identifier. Immutable once created; consumed
/// exactly once by the aggregator.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub namespace: Namespace,
    pub id: ObjectId,
    pub status: CheckStatus,
    pub details: String,
}

impl CheckResult {
    pub fn new(
        namespace: &Namespace,
        id: ObjectId,
        status: CheckStatus,
        details: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.clone(),
            id,
            status,
            details: details.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Per-namespace counters. Created on the first result for a namespace,
/// monotonically incremented, never reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamespaceStats {
    pub total_checks: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub missing_in_source: usize,
    pub missing_in_dest: usize,
    pub errors: usize,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AuditMeta {
    pub engine_version: String,
    pub run_at: String,
}

/// Final output of one audit pass. `stats` iterates in lexicographic
/// namespace order; `discrepancies` preserves processing order.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub meta: AuditMeta,
    pub stats: BTreeMap<String, NamespaceStats>,
    pub discrepancies: Vec<CheckResult>,
}

impl AuditReport {
    /// True when every recorded check came back `Match`.
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_snake_case_serialization() {
        let json = serde_json::to_string(&CheckStatus::MissingInDest).unwrap();
        assert_eq!(json, "\"missing_in_dest\"");
    }

    #[test]
    fn check_result_serializes_namespace_and_id_as_strings() {
        let ns = Namespace::new("testshard", "col2");
        let id = ObjectId::parse_hex("693885e2f227ce8067db8d33").unwrap();
        let result = CheckResult::new(&ns, id, CheckStatus::MissingInDest, "");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["namespace"], "testshard.col2");
        assert_eq!(json["id"], "693885e2f227ce8067db8d33");
        assert_eq!(json["status"], "missing_in_dest");
    }
}
