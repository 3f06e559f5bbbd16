//! Dictionary-backed [`MorphAnalyzer`] reading the OpenCorpora plain-text format.
//!
//! The dictionary (`dict.opcorpora.txt`) is a sequence of lexemes separated by
//! blank lines. Each lexeme starts with its numeric id, followed by one line
//! per word form: the form, a tab, and its grammemes. The first form of a
//! lexeme is its dictionary form (lemma).
//!
//! ```text
//! 1
//! ЗАКОН	NOUN,inan,masc sing,nomn
//! ЗАКОНЫ	NOUN,inan,masc plur,nomn
//!
//! 2
//! ИНЖЕНЕРИЯ	NOUN,inan,femn sing,nomn
//! ```
//!
//! Forms are looked up lowercased with `ё` folded to `е`; lemmas keep their
//! dictionary spelling, lowercased. When a form belongs to several lexemes, the
//! one that comes first in the file wins.

use super::normalizer::{Analysis, MorphAnalyzer};
use crate::error::ConfigError;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy)]
struct Reading {
    lemma: u32,
    tags: u32,
}

/// In-memory morphology dictionary.
#[derive(Debug, Default)]
pub struct Lexicon {
    forms: HashMap<String, Vec<Reading>>,
    lemmas: Vec<String>,
    tag_sets: Vec<BTreeSet<String>>,
    tag_index: HashMap<String, u32>,
}

impl Lexicon {
    /// Load a dictionary file from disk.
    ///
    /// # Arguments
    ///
    /// * `path` - An OpenCorpora `dict.opcorpora.txt` export
    ///
    /// # Returns
    ///
    /// The parsed dictionary. The full export is large and read synchronously,
    /// so call this off the async runtime (`spawn_blocking`).
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Io`] if the file cannot be opened
    /// * [`ConfigError::Dictionary`] with the offending line number if the
    ///   file is not in the expected format
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::from_reader(BufReader::new(file))?;
        info!(
            forms = lexicon.form_count(),
            lemmas = lexicon.lemma_count(),
            "Loaded morphology dictionary"
        );
        Ok(lexicon)
    }

    /// Parse a dictionary from any buffered reader.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, ConfigError> {
        let mut lexicon = Self::default();
        let mut expecting_id = true;
        let mut current_lemma: Option<u32> = None;

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|e| ConfigError::Dictionary {
                line: line_no,
                reason: e.to_string(),
            })?;
            let line = line.trim_end_matches('\r');

            if line.trim().is_empty() {
                expecting_id = true;
                current_lemma = None;
                continue;
            }

            if expecting_id {
                if !line.trim().chars().all(|c| c.is_ascii_digit()) {
                    return Err(ConfigError::Dictionary {
                        line: line_no,
                        reason: format!("expected a lexeme id, found \"{line}\""),
                    });
                }
                expecting_id = false;
                continue;
            }

            let (form, grammemes) = line.split_once('\t').ok_or_else(|| ConfigError::Dictionary {
                line: line_no,
                reason: "word form is not followed by a tab and grammemes".to_string(),
            })?;
            let form = form.trim();
            if form.is_empty() {
                return Err(ConfigError::Dictionary {
                    line: line_no,
                    reason: "empty word form".to_string(),
                });
            }

            let lemma = match current_lemma {
                Some(lemma) => lemma,
                None => {
                    let lemma = lexicon.intern_lemma(form.to_lowercase());
                    current_lemma = Some(lemma);
                    lemma
                }
            };
            let tags = lexicon.intern_tags(grammemes.trim());
            lexicon
                .forms
                .entry(fold(form))
                .or_default()
                .push(Reading { lemma, tags });
        }

        Ok(lexicon)
    }

    /// Number of distinct word forms.
    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    /// Number of lexemes.
    pub fn lemma_count(&self) -> usize {
        self.lemmas.len()
    }

    fn intern_lemma(&mut self, lemma: String) -> u32 {
        self.lemmas.push(lemma);
        (self.lemmas.len() - 1) as u32
    }

    fn intern_tags(&mut self, raw: &str) -> u32 {
        if let Some(&id) = self.tag_index.get(raw) {
            return id;
        }
        let set = raw
            .split([',', ' '])
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();
        let id = self.tag_sets.len() as u32;
        self.tag_sets.push(set);
        self.tag_index.insert(raw.to_string(), id);
        id
    }
}

impl MorphAnalyzer for Lexicon {
    fn analyze(&self, word: &str) -> Option<Analysis> {
        let reading = self.forms.get(&fold(word))?.first()?;
        Some(Analysis {
            lemma: self.lemmas[reading.lemma as usize].clone(),
            grammemes: self.tag_sets[reading.tags as usize].clone(),
        })
    }
}

/// Lowercase and fold `ё` into `е`.
fn fold(word: &str) -> String {
    word.to_lowercase().replace('ё', "е")
}
