//! Streaming per-week aggregation of title nouns.
//!
//! [`AggregationCollector`] is fed one [`ArticleRecord`] at a time, in page
//! order and document order within a page. It never needs to know how many
//! records will arrive and never holds on to them: only the per-week counts
//! survive an `ingest` call.
//!
//! A record whose timestamp cannot be parsed is rejected before anything is
//! counted, so a bad record never disturbs other weeks.

use super::bucketer::TimeBucketer;
use super::counts::FrequencyTable;
use super::dates::DateParser;
use super::normalizer::{MorphAnalyzer, TitleNormalizer};
use crate::error::IngestError;
use crate::models::{ArticleRecord, ReportProjection};
use itertools::Itertools;
use tracing::trace;

/// Number of words reported per week.
pub const TOP_WORDS: usize = 3;

/// Owns the frequency table for a single crawl run.
pub struct AggregationCollector<M, D> {
    normalizer: TitleNormalizer<M>,
    bucketer: TimeBucketer<D>,
    table: FrequencyTable,
}

impl<M: MorphAnalyzer, D: DateParser> AggregationCollector<M, D> {
    pub fn new(normalizer: TitleNormalizer<M>, bucketer: TimeBucketer<D>) -> Self {
        Self {
            normalizer,
            bucketer,
            table: FrequencyTable::default(),
        }
    }

    /// Count the nouns of `record`'s title under its publication week.
    pub fn ingest(&mut self, record: &ArticleRecord) -> Result<(), IngestError> {
        let week = self.bucketer.bucket(&record.timestamp)?;
        let nouns = self.normalizer.normalize(&record.title);
        trace!(%week, nouns = nouns.len(), title = %record.title, "Ingested article");
        self.table.week_mut(week).merge(&nouns);
        Ok(())
    }

    /// Top words for every week seen so far.
    ///
    /// Words are ranked by count, ties going to the word counted first in that
    /// week. Calling this again without further ingestion gives the same result.
    pub fn finalize(&self) -> ReportProjection {
        ReportProjection::new(
            self.table
                .iter()
                .map(|(week, counts)| (*week, counts.top(TOP_WORDS).join(" ")))
                .collect(),
        )
    }

    /// Weeks seen so far, in first-seen order.
    #[cfg(test)]
    pub fn weeks(&self) -> impl Iterator<Item = &crate::models::WeekKey> {
        self.table.iter().map(|(week, _)| week)
    }

    #[cfg(test)]
    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dates::HumanDateParser;
    use crate::analysis::lexicon::{Lexicon, tests::TEST_DICTIONARY};
    use crate::models::WeekKey;
    use chrono::NaiveDate;

    type TestCollector = AggregationCollector<Lexicon, HumanDateParser>;

    fn collector() -> TestCollector {
        let lexicon = Lexicon::from_reader(TEST_DICTIONARY.as_bytes()).unwrap();
        AggregationCollector::new(
            TitleNormalizer::new(lexicon),
            TimeBucketer::new(HumanDateParser::new(
                NaiveDate::from_ymd_opt(2010, 1, 2).unwrap(),
            )),
        )
    }

    fn article() -> ArticleRecord {
        ArticleRecord::new("(Законы Акина) законы космической инженерии", "1 января 2010")
    }

    fn new_year_week() -> WeekKey {
        WeekKey::containing(NaiveDate::from_ymd_opt(2010, 1, 1).unwrap())
    }

    #[test]
    fn test_starts_empty() {
        let collector = collector();
        assert!(collector.is_empty());
        assert!(collector.finalize().is_empty());
    }

    #[test]
    fn test_is_empty_until_a_record_is_bucketed() {
        let mut collector = collector();
        assert!(collector.ingest(&ArticleRecord::new("окно", "не дата")).is_err());
        assert!(collector.is_empty());

        collector
            .ingest(&ArticleRecord::new("космической", "1 января 2010"))
            .unwrap();
        assert!(!collector.is_empty());
    }

    #[test]
    fn test_updates_in_real_time() {
        let mut collector = collector();
        collector.ingest(&article()).unwrap();

        let counts = collector.table().week(&new_year_week()).unwrap();
        assert_eq!(
            counts.iter().collect::<Vec<_>>(),
            vec![("закон", 2), ("инженерия", 1)]
        );
    }

    #[test]
    fn test_result_for_single_article() {
        let mut collector = collector();
        collector.ingest(&article()).unwrap();

        let projection = collector.finalize();
        assert_eq!(projection.len(), 1);
        assert_eq!(projection.get(&new_year_week()), Some("закон инженерия"));
        assert_eq!(
            projection.rows()[0].week_start.as_str(),
            "28-12-2009"
        );
        assert_eq!(projection.rows()[0].week_end.as_str(), "03-01-2010");
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut collector = collector();
        collector.ingest(&article()).unwrap();
        collector
            .ingest(&ArticleRecord::new("Окно задачи", "4 января 2010"))
            .unwrap();

        assert_eq!(collector.finalize(), collector.finalize());
    }

    #[test]
    fn test_keeps_only_three_words() {
        let mut collector = collector();
        for title in ["окно задача менеджер", "решение проблема", "проблема окно"] {
            collector
                .ingest(&ArticleRecord::new(title, "1 января 2010"))
                .unwrap();
        }
        assert_eq!(
            collector.finalize().get(&new_year_week()),
            Some("окно проблема задача")
        );
    }

    #[test]
    fn test_tie_break_follows_ingestion_order() {
        let first = ArticleRecord::new("окно", "1 января 2010");
        let second = ArticleRecord::new("задача", "31 декабря 2009");

        let mut forward = collector();
        forward.ingest(&first).unwrap();
        forward.ingest(&second).unwrap();

        let mut backward = collector();
        backward.ingest(&second).unwrap();
        backward.ingest(&first).unwrap();

        let week = new_year_week();
        // Same counts either way
        for collector in [&forward, &backward] {
            let counts = collector.table().week(&week).unwrap();
            assert_eq!(counts.get("окно"), 1);
            assert_eq!(counts.get("задача"), 1);
        }
        // Ranking depends on which word was counted first
        assert_eq!(forward.finalize().get(&week), Some("окно задача"));
        assert_eq!(backward.finalize().get(&week), Some("задача окно"));
    }

    #[test]
    fn test_separate_weeks() {
        let mut collector = collector();
        collector
            .ingest(&ArticleRecord::new("окно", "5 января 2010"))
            .unwrap();
        collector.ingest(&article()).unwrap();

        let projection = collector.finalize();
        let rows = projection.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].week_start, "04-01-2010");
        assert_eq!(rows[0].words, "окно");
        assert_eq!(rows[1].week_start, "28-12-2009");
        assert_eq!(rows[1].words, "закон инженерия");
    }

    #[test]
    fn test_bad_date_does_not_touch_counts() {
        let mut collector = collector();
        collector.ingest(&article()).unwrap();
        let before = collector.finalize();

        let err = collector
            .ingest(&ArticleRecord::new("окно окно окно", "не дата"))
            .unwrap_err();
        assert_eq!(err, IngestError::UnparseableDate("не дата".to_string()));
        assert_eq!(collector.finalize(), before);
        assert_eq!(collector.weeks().count(), 1);
    }

    #[test]
    fn test_week_without_nouns_is_reported_empty() {
        let mut collector = collector();
        collector
            .ingest(&ArticleRecord::new("космической", "1 января 2010"))
            .unwrap();
        assert_eq!(collector.finalize().get(&new_year_week()), Some(""));
    }
}
