//! Maps publication timestamps to the calendar week they fall in.

use super::dates::DateParser;
use crate::error::IngestError;
use crate::models::WeekKey;

/// Resolves timestamp text to a [`WeekKey`] through a [`DateParser`].
#[derive(Debug, Clone)]
pub struct TimeBucketer<D> {
    parser: D,
}

impl<D: DateParser> TimeBucketer<D> {
    pub fn new(parser: D) -> Self {
        Self { parser }
    }

    pub fn bucket(&self, timestamp: &str) -> Result<WeekKey, IngestError> {
        self.parser
            .parse(timestamp)
            .map(|parsed| WeekKey::containing(parsed.date()))
            .ok_or_else(|| IngestError::UnparseableDate(timestamp.to_string()))
    }
}
