//! Title normalization: from a raw headline to a multiset of noun lemmas.
//!
//! The steps run in a fixed order:
//!
//! 1. lowercase the whole title
//! 2. trim [`TRIMMED_PUNCTUATION`] from the outer boundary of the whole string
//! 3. split on single spaces
//! 4. look every word up in a [`MorphAnalyzer`]
//! 5. keep words tagged [`NOUN`] and count their lemmas
//!
//! Trimming only touches the ends of the title. Punctuation glued to a word in
//! the middle (`"акина)"`) survives the split, the analyzer does not know the
//! word, and it is dropped.

use super::counts::WordCounts;
use std::collections::BTreeSet;

/// Grammeme marking nouns.
pub const NOUN: &str = "NOUN";

/// Characters stripped from both ends of a title before splitting.
pub const TRIMMED_PUNCTUATION: &[char] = &[
    '!', '"', '#', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';', '<',
    '=', '>', '?', '@', '[', '\\', ']', '^', '_', '`', '{', '|', '}', '~', '«', '»', '„', '“',
    '”', '…',
];

/// Most likely reading of a single word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Dictionary form.
    pub lemma: String,
    /// Grammatical tags such as `NOUN`, `ADJF`, `plur`, `gent`.
    pub grammemes: BTreeSet<String>,
}

impl Analysis {
    pub fn has(&self, grammeme: &str) -> bool {
        self.grammemes.contains(grammeme)
    }
}

/// Morphological analyzer: word in, most likely lemma and tags out.
///
/// Returns `None` for words it cannot analyze.
pub trait MorphAnalyzer {
    fn analyze(&self, word: &str) -> Option<Analysis>;
}

impl<T: MorphAnalyzer + ?Sized> MorphAnalyzer for &T {
    fn analyze(&self, word: &str) -> Option<Analysis> {
        (**self).analyze(word)
    }
}

/// Turns titles into counts of the nouns they mention.
#[derive(Debug, Clone)]
pub struct TitleNormalizer<M> {
    analyzer: M,
}

impl<M: MorphAnalyzer> TitleNormalizer<M> {
    pub fn new(analyzer: M) -> Self {
        Self { analyzer }
    }

    pub fn normalize(&self, title: &str) -> WordCounts {
        let lowered = title.to_lowercase();
        let mut nouns = WordCounts::new();

        for word in lowered.trim_matches(TRIMMED_PUNCTUATION).split(' ') {
            if let Some(analysis) = self.analyzer.analyze(word) {
                if analysis.has(NOUN) {
                    nouns.add(&analysis.lemma, 1);
                }
            }
        }
        nouns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::lexicon::{Lexicon, tests::TEST_DICTIONARY};

    fn normalizer() -> TitleNormalizer<Lexicon> {
        TitleNormalizer::new(Lexicon::from_reader(TEST_DICTIONARY.as_bytes()).unwrap())
    }

    #[test]
    fn test_normalizes_article_title() {
        let counts = normalizer().normalize("(Законы Акина) законы космической инженерии");
        assert_eq!(
            counts.iter().collect::<Vec<_>>(),
            vec![("закон", 2), ("инженерия", 1)]
        );
    }

    #[test]
    fn test_title_without_nouns_is_empty() {
        assert!(normalizer().normalize("космической").is_empty());
        assert!(normalizer().normalize("").is_empty());
    }

    #[test]
    fn test_outer_punctuation_is_ignored() {
        let normalizer = normalizer();
        let plain = normalizer.normalize("законы инженерии");
        for decorated in [
            "«законы инженерии»",
            "...законы инженерии?!",
            "\"законы инженерии\"",
            "(законы инженерии)",
        ] {
            assert_eq!(normalizer.normalize(decorated), plain, "{decorated}");
        }
    }

    #[test]
    fn test_interior_punctuation_hides_word() {
        let counts = normalizer().normalize("законы, инженерии");
        // "законы," is not a dictionary word
        assert_eq!(counts.get("закон"), 0);
        assert_eq!(counts.get("инженерия"), 1);
    }

    #[test]
    fn test_splits_on_single_spaces_only() {
        let counts = normalizer().normalize("законы  инженерии");
        assert_eq!(counts.get("закон"), 1);
        assert_eq!(counts.get("инженерия"), 1);
    }

    struct EchoAnalyzer;

    impl MorphAnalyzer for EchoAnalyzer {
        fn analyze(&self, word: &str) -> Option<Analysis> {
            Some(Analysis {
                lemma: word.to_string(),
                grammemes: BTreeSet::from([NOUN.to_string()]),
            })
        }
    }

    #[test]
    fn test_lowercases_before_analysis() {
        let counts = TitleNormalizer::new(EchoAnalyzer).normalize("Rust RUST rust");
        assert_eq!(counts.iter().collect::<Vec<_>>(), vec![("rust", 3)]);
    }
}
