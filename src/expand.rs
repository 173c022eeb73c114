//! Record expansion: one data row per cask becomes one label per cask.

use crate::error::{LabelError, Result};
use crate::record::Record;
use tracing::debug;

/// Column pair driving repetition: how many copies, and where to write
/// the running 1-based copy number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repeat {
    pub quantity: String,
    pub counter: String,
}

impl Repeat {
    /// Repetition only applies when both columns are named.
    pub fn from_columns(quantity: Option<&str>, counter: Option<&str>) -> Option<Self> {
        match (quantity, counter) {
            (Some(quantity), Some(counter)) => Some(Self {
                quantity: quantity.to_string(),
                counter: counter.to_string(),
            }),
            _ => None,
        }
    }
}

/// Lazy adapter over a record stream. Holds at most one source record.
pub struct Expanded<I> {
    source: I,
    repeat: Option<Repeat>,
    pending: Option<(Record, u64, u64)>,
}

/// Expand `records` according to the quantity and counter columns. If
/// either is `None` the records pass through unchanged.
pub fn expand<I>(records: I, quantity: Option<&str>, counter: Option<&str>) -> Expanded<I::IntoIter>
where
    I: IntoIterator<Item = Result<Record>>,
{
    Expanded {
        source: records.into_iter(),
        repeat: Repeat::from_columns(quantity, counter),
        pending: None,
    }
}

fn parse_quantity(record: &Record, column: &str) -> Result<u64> {
    let value = record
        .get(column)
        .ok_or_else(|| LabelError::MissingQuantity(column.to_string()))?;
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| LabelError::BadQuantity {
            column: column.to_string(),
            value: value.to_string(),
        })
}

impl<I> Iterator for Expanded<I>
where
    I: Iterator<Item = Result<Record>>,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(repeat) = &self.repeat else {
            return self.source.next();
        };

        loop {
            if let Some((record, next, total)) = &mut self.pending {
                if *next <= *total {
                    let mut copy = record.clone();
                    copy.set(&repeat.counter, next.to_string());
                    *next += 1;
                    return Some(Ok(copy));
                }
            }
            self.pending = None;

            let record = match self.source.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e)),
            };
            let total = match parse_quantity(&record, &repeat.quantity) {
                Ok(total) => total,
                Err(e) => return Some(Err(e)),
            };
            if total == 0 {
                debug!("record has zero quantity, no labels produced");
            }
            self.pending = Some((record, 1, total));
        }
    }
}
