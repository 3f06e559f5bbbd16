//! Data models shared by the crawl, the aggregation and the outputs.
//!
//! - [`ArticleRecord`]: raw title and timestamp scraped from one article preview
//! - [`WeekKey`]: the Monday..Sunday week an article was published in
//! - [`ReportProjection`]: finalized top words per week, ready for rendering

use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used for both ends of a [`WeekKey`], e.g. `28-12-2009`.
pub const WEEK_DATE_FORMAT: &str = "%d-%m-%Y";

/// One article preview found on a listing page.
///
/// Records are produced by the extractor and handed straight to the
/// collector; nothing keeps them around afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// The title text as it appears on the page.
    pub title: String,
    /// The publication timestamp text as it appears on the page.
    pub timestamp: String,
}

impl ArticleRecord {
    pub fn new(title: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Calendar week, Monday to Sunday, both ends inclusive.
///
/// Two instants on the same calendar week always produce the same key,
/// whatever their time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekKey {
    start: NaiveDate,
}

impl WeekKey {
    /// The week that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let weekday_index = date.weekday().num_days_from_monday();
        Self {
            start: date - TimeDelta::days(i64::from(weekday_index)),
        }
    }

    /// Monday of the week.
    #[cfg(test)]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Sunday of the week.
    pub fn end(&self) -> NaiveDate {
        self.start + TimeDelta::days(6)
    }

    pub fn start_label(&self) -> String {
        self.start.format(WEEK_DATE_FORMAT).to_string()
    }

    pub fn end_label(&self) -> String {
        self.end().format(WEEK_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_label(), self.end_label())
    }
}

/// Top words for every week seen during a crawl.
///
/// Weeks keep the order in which the collector first saw them, which for a
/// listing sorted newest-first means the most recent week comes first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportProjection {
    entries: Vec<(WeekKey, String)>,
}

impl ReportProjection {
    pub fn new(entries: Vec<(WeekKey, String)>) -> Self {
        Self { entries }
    }

    /// The space-joined words for `week`, if the week was seen.
    #[cfg(test)]
    pub fn get(&self, week: &WeekKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == week)
            .map(|(_, words)| words.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WeekKey, &str)> {
        self.entries.iter().map(|(key, words)| (key, words.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten into serializable rows with formatted week labels.
    pub fn rows(&self) -> Vec<ProjectionRow> {
        self.iter()
            .map(|(week, words)| ProjectionRow {
                week_start: week.start_label(),
                week_end: week.end_label(),
                words: words.to_string(),
            })
            .collect()
    }
}

/// A single week of the report in its exported form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectionRow {
    pub week_start: String,
    pub week_end: String,
    pub words: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_key_spans_new_year() {
        // 1 January 2010 was a Friday
        let key = WeekKey::containing(date(2010, 1, 1));
        assert_eq!(key.start_label(), "28-12-2009");
        assert_eq!(key.end_label(), "03-01-2010");
    }

    #[test]
    fn test_week_key_starts_on_monday_and_lasts_seven_days() {
        let mut day = date(2019, 12, 20);
        for _ in 0..30 {
            let key = WeekKey::containing(day);
            assert_eq!(key.start().weekday(), Weekday::Mon);
            assert_eq!(key.end() - key.start(), TimeDelta::days(6));
            assert!(key.start() <= day && day <= key.end());
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_week_key_same_for_whole_week() {
        let monday = WeekKey::containing(date(2018, 3, 12));
        let sunday = WeekKey::containing(date(2018, 3, 18));
        let next_monday = WeekKey::containing(date(2018, 3, 19));
        assert_eq!(monday, sunday);
        assert_ne!(sunday, next_monday);
    }

    #[test]
    fn test_week_key_display() {
        let key = WeekKey::containing(date(2010, 1, 1));
        assert_eq!(key.to_string(), "28-12-2009..03-01-2010");
    }

    #[test]
    fn test_projection_lookup_and_rows() {
        let week = WeekKey::containing(date(2010, 1, 1));
        let projection = ReportProjection::new(vec![(week, "закон инженерия".to_string())]);

        assert_eq!(projection.get(&week), Some("закон инженерия"));
        assert_eq!(projection.len(), 1);
        assert_eq!(
            projection.rows(),
            vec![ProjectionRow {
                week_start: "28-12-2009".to_string(),
                week_end: "03-01-2010".to_string(),
                words: "закон инженерия".to_string(),
            }]
        );
    }

    #[test]
    fn test_projection_row_serialization() {
        let row = ProjectionRow {
            week_start: "28-12-2009".to_string(),
            week_end: "03-01-2010".to_string(),
            words: "закон".to_string(),
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"week_start\":\"28-12-2009\""));
        let back: ProjectionRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
