//! Selector-driven extraction of article records from a listing page.
//!
//! For every element matching the `article` selector, in document order, the
//! first descendant matching `title` and the first matching `timestamp` are
//! read. A preview missing either child is reported as an [`ExtractionGap`]
//! and the rest of the page carries on.

use crate::error::ConfigError;
use crate::models::ArticleRecord;
use crate::site::{ARTICLE_FIELD, Selector, SiteProfile, TIMESTAMP_FIELD, TITLE_FIELD};
use scraper::{ElementRef, Html};
use thiserror::Error;

/// An article preview without one of its required children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("article preview has no \"{missing}\" element")]
pub struct ExtractionGap {
    pub missing: &'static str,
}

/// A [`Selector`] ready to run against a parsed document.
#[derive(Debug, Clone)]
pub struct CompiledSelector {
    selector: Selector,
    css: scraper::Selector,
}

impl CompiledSelector {
    pub fn compile(selector: &Selector) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidSelector {
            tag: selector.tag.clone(),
        };
        let valid_tag = !selector.tag.is_empty()
            && selector
                .tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid_tag {
            return Err(invalid());
        }
        let css = scraper::Selector::parse(&selector.tag).map_err(|_| invalid())?;
        Ok(Self {
            selector: selector.clone(),
            css,
        })
    }

    /// Class matches the whole `class` attribute or any single class in it;
    /// id matches exactly.
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        let element = element.value();
        let class_ok = self.selector.class.as_deref().is_none_or(|wanted| {
            element.attr("class").is_some_and(|classes| {
                classes == wanted || classes.split_whitespace().any(|class| class == wanted)
            })
        });
        let id_ok = self
            .selector
            .id
            .as_deref()
            .is_none_or(|wanted| element.id() == Some(wanted));
        class_ok && id_ok
    }

    /// First matching element inside `scope`.
    fn find_first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        scope.select(&self.css).find(|element| self.matches(element))
    }
}

/// The three selectors extraction needs, resolved and compiled up front.
#[derive(Debug, Clone)]
pub struct ArticleSelectors {
    article: CompiledSelector,
    title: CompiledSelector,
    timestamp: CompiledSelector,
}

impl ArticleSelectors {
    /// Fails when the profile lacks a field or a tag is not an element name.
    pub fn from_profile(profile: &SiteProfile) -> Result<Self, ConfigError> {
        Ok(Self {
            article: CompiledSelector::compile(profile.resolve(ARTICLE_FIELD)?)?,
            title: CompiledSelector::compile(profile.resolve(TITLE_FIELD)?)?,
            timestamp: CompiledSelector::compile(profile.resolve(TIMESTAMP_FIELD)?)?,
        })
    }
}

/// A parsed listing page.
///
/// Holds a `scraper` document, which is not `Send`; parse, extract and drop it
/// without awaiting in between.
pub struct ListingPage {
    document: Html,
}

impl ListingPage {
    pub fn parse(raw: &str) -> Self {
        Self {
            document: Html::parse_document(raw),
        }
    }

    /// Article records in document order, one per matching preview.
    pub fn articles<'a>(
        &'a self,
        selectors: &'a ArticleSelectors,
    ) -> impl Iterator<Item = Result<ArticleRecord, ExtractionGap>> + 'a {
        self.document
            .select(&selectors.article.css)
            .filter(|preview| selectors.article.matches(preview))
            .map(|preview| -> Result<ArticleRecord, ExtractionGap> {
                let title = selectors.title.find_first(preview).ok_or(ExtractionGap {
                    missing: TITLE_FIELD,
                })?;
                let timestamp = selectors
                    .timestamp
                    .find_first(preview)
                    .ok_or(ExtractionGap {
                        missing: TIMESTAMP_FIELD,
                    })?;
                Ok(ArticleRecord::new(text_of(title), text_of(timestamp)))
            })
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
