use tracing::warn;

use driftcheck_types::{Namespace, ObjectId};

use crate::compare::documents_match;
use crate::model::{CheckResult, CheckStatus};
use crate::store::DocumentStore;

/// Classify one identifier's cross-store state. Single-shot: no retries,
/// and a source-side error short-circuits before the destination is
/// queried. Errors are terminal for this identifier only.
pub fn reconcile(
    source: &dyn DocumentStore,
    dest: &dyn DocumentStore,
    namespace: &Namespace,
    id: ObjectId,
) -> CheckResult {
    let src_doc = match source.find_by_id(namespace, &id) {
        Ok(doc) => doc,
        Err(e) => return lookup_error(source, namespace, id, e),
    };

    let dest_doc = match dest.find_by_id(namespace, &id) {
        Ok(doc) => doc,
        Err(e) => return lookup_error(dest, namespace, id, e),
    };

    match (src_doc, dest_doc) {
        // Both stores agree the document does not exist.
        (None, None) => CheckResult::new(
            namespace,
            id,
            CheckStatus::Match,
            "document absent from both stores",
        ),
        (None, Some(_)) => CheckResult::new(namespace, id, CheckStatus::MissingInSource, ""),
        (Some(_), None) => CheckResult::new(namespace, id, CheckStatus::MissingInDest, ""),
        (Some(src), Some(dst)) => {
            if documents_match(&src, &dst) {
                CheckResult::new(namespace, id, CheckStatus::Match, "")
            } else {
                CheckResult::new(namespace, id, CheckStatus::Mismatch, "documents differ")
            }
        }
    }
}

fn lookup_error(
    store: &dyn DocumentStore,
    namespace: &Namespace,
    id: ObjectId,
    err: crate::store::StoreError,
) -> CheckResult {
    warn!(store = store.label(), %namespace, %id, %err, "lookup failed");
    CheckResult::new(
        namespace,
        id,
        CheckStatus::Error,
        format!("{} lookup failed: {err}", store.label()),
    )
}
