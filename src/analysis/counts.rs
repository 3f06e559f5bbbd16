//! Insertion-ordered counters backing the weekly frequency table.
//!
//! Ranking ties are broken by the order in which a word was first counted,
//! so both levels of the table remember insertion order instead of relying on
//! hash order.

use crate::models::WeekKey;
use itertools::Itertools;
use std::collections::HashMap;

/// Multiset of words that remembers first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCounts {
    entries: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl WordCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `word`.
    pub fn add(&mut self, word: &str, count: u32) {
        match self.index.get(word) {
            Some(&slot) => self.entries[slot].1 += count,
            None => {
                self.index.insert(word.to_string(), self.entries.len());
                self.entries.push((word.to_string(), count));
            }
        }
    }

    /// Add every word of `other`, in `other`'s order.
    pub fn merge(&mut self, other: &WordCounts) {
        for (word, count) in &other.entries {
            self.add(word, *count);
        }
    }

    #[cfg(test)]
    pub fn get(&self, word: &str) -> u32 {
        self.index
            .get(word)
            .map_or(0, |&slot| self.entries[slot].1)
    }

    /// Words with their counts, in first-occurrence order.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(word, count)| (word.as_str(), *count))
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` most frequent words, highest count first.
    ///
    /// The sort is stable, so equal counts keep first-occurrence order.
    pub fn top(&self, n: usize) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(n)
            .map(|(word, _)| word.as_str())
    }
}

impl<'a> FromIterator<&'a str> for WordCounts {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counts = WordCounts::new();
        for word in iter {
            counts.add(word, 1);
        }
        counts
    }
}

/// Word counts per week, weeks in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    weeks: Vec<(WeekKey, WordCounts)>,
    index: HashMap<WeekKey, usize>,
}

impl FrequencyTable {
    /// Counts for `week`, created empty on first sight.
    pub fn week_mut(&mut self, week: WeekKey) -> &mut WordCounts {
        let slot = match self.index.get(&week) {
            Some(&slot) => slot,
            None => {
                self.index.insert(week, self.weeks.len());
                self.weeks.push((week, WordCounts::new()));
                self.weeks.len() - 1
            }
        };
        &mut self.weeks[slot].1
    }

    #[cfg(test)]
    pub fn week(&self, week: &WeekKey) -> Option<&WordCounts> {
        self.index.get(week).map(|&slot| &self.weeks[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WeekKey, &WordCounts)> {
        self.weeks.iter().map(|(week, counts)| (week, counts))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}
