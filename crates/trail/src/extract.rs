use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use driftcheck_types::{Namespace, ObjectId};

/// Marker phrase identifying a retry-failure record. Lines without it are
/// irrelevant to the audit; this is a cheap pre-filter, not a correctness
/// gate.
const RETRY_MARKER: &str = "Isolated retry still failed";

/// A `(namespace, id)` fact pulled out of one log message.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFact {
    pub namespace: Namespace,
    pub id: ObjectId,
}

/// Classification of one message. `MalformedId` and `InvalidNamespace` are
/// the logged-skip cases; the rest are silent skips.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractOutcome {
    Fact(ExtractedFact),
    /// Marker phrase absent.
    Irrelevant,
    /// Marker present but no namespace token.
    NoNamespace,
    /// Marker and namespace present but no identifier fragment.
    NoIdFragment,
    /// Identifier fragment present but undecodable.
    MalformedId { fragment: String, reason: String },
    /// Namespace token has no dot, or an empty half.
    InvalidNamespace { token: String },
}

/// Two independent matchers over the message text: one for the namespace
/// token, one for the quoted identifier fragment. Compiled once, reused for
/// every line; extraction has no cross-line state.
pub struct Extractor {
    namespace_re: Regex,
    id_re: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            namespace_re: Regex::new(r"collection:\s*([A-Za-z0-9_.]+)").unwrap(),
            // Non-greedy: capture up to the first `}` that is immediately
            // followed by the closing quote.
            id_re: Regex::new(r#"id="(\{.*?\})""#).unwrap(),
        }
    }

    /// Classify one message. Pure function of the text.
    pub fn scan(&self, message: &str) -> ExtractOutcome {
        if !message.contains(RETRY_MARKER) {
            return ExtractOutcome::Irrelevant;
        }

        let token = match self.namespace_re.captures(message) {
            Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(""),
            None => return ExtractOutcome::NoNamespace,
        };

        let fragment = match self.id_re.captures(message) {
            Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(""),
            None => return ExtractOutcome::NoIdFragment,
        };

        // One unescape pass: the inner backslash-quote layer that survives
        // the outer CSV unescaping.
        let cleaned = fragment.replace(r#"\""#, "\"");

        let id = match decode_extended_oid(&cleaned) {
            Ok(id) => id,
            Err(reason) => {
                return ExtractOutcome::MalformedId {
                    fragment: fragment.to_string(),
                    reason,
                }
            }
        };

        let namespace = match Namespace::parse(token) {
            Ok(ns) => ns,
            Err(_) => {
                return ExtractOutcome::InvalidNamespace {
                    token: token.to_string(),
                }
            }
        };

        ExtractOutcome::Fact(ExtractedFact { namespace, id })
    }

    /// Extract a fact, logging the malformed-but-present cases so extraction
    /// coverage can be audited separately from relevance filtering.
    pub fn extract(&self, message: &str) -> Option<ExtractedFact> {
        match self.scan(message) {
            ExtractOutcome::Fact(fact) => Some(fact),
            ExtractOutcome::MalformedId { fragment, reason } => {
                warn!(%fragment, %reason, "skipping line: malformed identifier fragment");
                None
            }
            ExtractOutcome::InvalidNamespace { token } => {
                warn!(%token, "skipping line: invalid namespace");
                None
            }
            ExtractOutcome::Irrelevant
            | ExtractOutcome::NoNamespace
            | ExtractOutcome::NoIdFragment => None,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// The identifier fragment is an extended-JSON object with a single
/// `"$oid"` field holding the 24-hex-character text form.
#[derive(Deserialize)]
struct ExtendedOid {
    #[serde(rename = "$oid")]
    oid: String,
}

fn decode_extended_oid(fragment: &str) -> Result<ObjectId, String> {
    let parsed: ExtendedOid =
        serde_json::from_str(fragment).map_err(|e| format!("invalid JSON: {e}"))?;
    ObjectId::parse_hex(&parsed.oid).map_err(|e| e.to_string())
}
