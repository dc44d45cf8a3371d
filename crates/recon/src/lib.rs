//! `driftcheck-recon` — cross-store reconciliation engine.
//!
//! Pure engine crate: receives facts and store handles, returns classified
//! results and aggregated statistics. No CLI or network dependencies; the
//! store capability is a trait implemented by the callers.

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod error;
pub mod memory;
pub mod model;
pub mod reconcile;
pub mod store;

pub use aggregate::ReportBuilder;
pub use config::AuditConfig;
pub use error::AuditError;
pub use model::{AuditReport, CheckResult, CheckStatus, NamespaceStats};
pub use reconcile::reconcile;
pub use store::{Document, DocumentStore, StoreError};
