//! `driftcheck-trail` — failure-trail ingestion.
//!
//! Reads the four-column CSV export of sync-failure log lines and extracts
//! `(namespace, id)` facts from the free-text message field. No store or
//! network dependencies.

pub mod error;
pub mod extract;
pub mod line;

pub use error::TrailError;
pub use extract::{ExtractOutcome, ExtractedFact, Extractor};
pub use line::{LogLine, TrailReader};
