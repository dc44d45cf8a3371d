use std::fmt;

#[derive(Debug)]
pub enum AuditError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty URL, zero timeout, etc.).
    ConfigValidation(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for AuditError {}
