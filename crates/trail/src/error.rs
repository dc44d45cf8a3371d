use std::fmt;

#[derive(Debug)]
pub enum TrailError {
    /// Cannot open or read the trail file.
    Io(String),
    /// CSV-level parse error on one record.
    Csv { line: u64, message: String },
    /// Record has fewer than the four expected columns.
    ShortRecord { line: u64, fields: usize },
}

impl fmt::Display for TrailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Csv { line, message } => write!(f, "line {line}: CSV error: {message}"),
            Self::ShortRecord { line, fields } => {
                write!(f, "line {line}: expected 4 columns, got {fields}")
            }
        }
    }
}

impl std::error::Error for TrailError {}
