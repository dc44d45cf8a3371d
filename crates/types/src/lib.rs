//! `driftcheck-types` — core value types shared by the trail and recon crates.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// ObjectId
// ---------------------------------------------------------------------------

/// A 12-byte document identifier, round-tripped through its 24-character
/// hexadecimal text form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Parse the 24-hex-character text form. Case-insensitive.
    pub fn parse_hex(s: &str) -> Result<Self, IdParseError> {
        if s.len() != 24 {
            return Err(IdParseError::BadLength(s.len()));
        }
        let decoded = hex::decode(s).map_err(|_| IdParseError::BadHex(s.to_string()))?;
        let mut bytes = [0u8; 12];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self)
    }
}

impl FromStr for ObjectId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum IdParseError {
    /// Not exactly 24 characters.
    BadLength(usize),
    /// Non-hexadecimal content.
    BadHex(String),
}

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength(len) => write!(f, "expected 24 hex chars, got {len}"),
            Self::BadHex(s) => write!(f, "not a hex string: {s:?}"),
        }
    }
}

impl std::error::Error for IdParseError {}

// ---------------------------------------------------------------------------
// Namespace
// ---------------------------------------------------------------------------

/// A `database.collection` addressing pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace {
    pub database: String,
    pub collection: String,
}

impl Namespace {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }

    /// Split a dotted token on the FIRST dot only. Both halves must be
    /// non-empty; the collection half may itself contain dots.
    pub fn parse(token: &str) -> Result<Self, NamespaceError> {
        let (database, collection) = token
            .split_once('.')
            .ok_or_else(|| NamespaceError::NoDot(token.to_string()))?;
        if database.is_empty() || collection.is_empty() {
            return Err(NamespaceError::EmptyPart(token.to_string()));
        }
        Ok(Self::new(database, collection))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

impl FromStr for Namespace {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Namespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum NamespaceError {
    /// No dot separator at all.
    NoDot(String),
    /// Dot present but database or collection half is empty.
    EmptyPart(String),
}

impl fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDot(t) => write!(f, "namespace {t:?} has no dot separator"),
            Self::EmptyPart(t) => write!(f, "namespace {t:?} has an empty half"),
        }
    }
}

impl std::error::Error for NamespaceError {}
