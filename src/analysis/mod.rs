//! Turning scraped article records into weekly word statistics.
//!
//! | Module | Role |
//! |--------|------|
//! | [`normalizer`] | title -> counts of noun lemmas, through a [`MorphAnalyzer`] |
//! | [`lexicon`] | OpenCorpora dictionary implementing [`MorphAnalyzer`] |
//! | [`dates`] | timestamp text -> absolute date, through a [`DateParser`] |
//! | [`bucketer`] | timestamp text -> [`crate::models::WeekKey`] |
//! | [`counts`] | insertion-ordered counters |
//! | [`collector`] | streaming `ingest` / `finalize` over the above |

pub mod bucketer;
pub mod collector;
pub mod counts;
pub mod dates;
pub mod lexicon;
pub mod normalizer;

pub use bucketer::TimeBucketer;
pub use collector::AggregationCollector;
pub use dates::{DateParser, HumanDateParser};
pub use lexicon::Lexicon;
pub use normalizer::{MorphAnalyzer, TitleNormalizer};
