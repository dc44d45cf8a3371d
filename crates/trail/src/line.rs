use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::TrailError;

/// One row of the failure trail. The first CSV row is a header and is
/// skipped; only `message` is read by extraction.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub date: String,
    pub pod: String,
    pub process_key: String,
    pub message: String,
}

/// Streaming reader over the trail CSV. Yields one `LogLine` per record;
/// a ragged or unparsable record surfaces as an `Err` item so the caller
/// can log it and keep going.
pub struct TrailReader<R: io::Read> {
    records: csv::StringRecordsIntoIter<R>,
}

impl<R: io::Read> std::fmt::Debug for TrailReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrailReader").finish_non_exhaustive()
    }
}

impl TrailReader<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TrailError> {
        let file = File::open(path.as_ref()).map_err(|e| {
            TrailError::Io(format!("cannot open {}: {e}", path.as_ref().display()))
        })?;
        Ok(Self::from_reader(file))
    }
}

impl<R: io::Read> TrailReader<R> {
    pub fn from_reader(reader: R) -> Self {
        let records = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader)
            .into_records();
        Self { records }
    }
}

impl<R: io::Read> Iterator for TrailReader<R> {
    type Item = Result<LogLine, TrailError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                return Some(Err(TrailError::Csv {
                    line,
                    message: e.to_string(),
                }));
            }
        };

        if record.len() < 4 {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Some(Err(TrailError::ShortRecord {
                line,
                fields: record.len(),
            }));
        }

        Some(Ok(LogLine {
            date: record[0].to_string(),
            pod: record[1].to_string(),
            process_key: record[2].to_string(),
            message: record[3].to_string(),
        }))
    }
}
