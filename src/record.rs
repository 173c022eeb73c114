//! Data records and the lazy CSV record source.

use crate::error::{LabelError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One data row: field names mapped to values, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set `name` to `value`, replacing an existing field in place or
    /// appending a new one.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (n, v) in iter {
            record.set(&n.into(), v);
        }
        record
    }
}

// ============================================================================
// CSV Record Source
// ============================================================================

/// Pulls records one at a time from a CSV stream whose first row names
/// the fields. Short rows simply lack the trailing fields.
pub struct CsvRecords<R: Read> {
    headers: Vec<String>,
    rows: csv::StringRecordsIntoIter<R>,
}

impl CsvRecords<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }
}

impl<R: Read> CsvRecords<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        Ok(Self {
            headers,
            rows: reader.into_records(),
        })
    }
}

impl<R: Read> Iterator for CsvRecords<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(row.map_err(LabelError::from).map(|row| {
            self.headers
                .iter()
                .zip(row.iter())
                .map(|(name, value)| (name.as_str(), value))
                .collect()
        }))
    }
}
