//! Site profiles: where the listing pages live and how to find articles on them.
//!
//! A [`SiteProfile`] ties a site id to a base URL, a pagination template and a
//! set of named [`Selector`]s. Profiles are collected in an immutable
//! [`ProfileSet`] built once at startup and passed by reference into the crawl.
//!
//! Extra profiles can be loaded from YAML:
//!
//! ```yaml
//! habr:
//!   url: https://habr.com/all/
//!   pagination: page{page}/
//!   selectors:
//!     article: { tag: article, class: post post_preview }
//!     title: { tag: a, class: post__title_link }
//!     timestamp: { tag: span, class: post__time }
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, instrument};
use url::Url;

/// Placeholder replaced by the page number in pagination templates.
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Profile used when no `--site` is given.
pub const DEFAULT_SITE: &str = "habr";

/// Field holding the selector for a whole article preview.
pub const ARTICLE_FIELD: &str = "article";
/// Field holding the selector for the title inside an article preview.
pub const TITLE_FIELD: &str = "title";
/// Field holding the selector for the timestamp inside an article preview.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Structural matching rule: element name plus optional class and id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Selector {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Selector {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: None,
            id: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    #[cfg(test)]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Everything needed to crawl one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    id: String,
    base_url: String,
    pagination: String,
    fields: BTreeMap<String, Selector>,
}

impl SiteProfile {
    /// Build a profile, validating the base URL and the pagination template.
    pub fn new(
        id: impl Into<String>,
        base_url: impl Into<String>,
        pagination: impl Into<String>,
        fields: impl IntoIterator<Item = (String, Selector)>,
    ) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let pagination = pagination.into();

        Url::parse(&base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            source,
        })?;
        if !pagination.contains(PAGE_PLACEHOLDER) {
            return Err(ConfigError::MissingPagePlaceholder(pagination));
        }

        Ok(Self {
            id: id.into(),
            base_url,
            pagination,
            fields: fields.into_iter().collect(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up a named selector.
    pub fn resolve(&self, field: &str) -> Result<&Selector, ConfigError> {
        self.fields
            .get(field)
            .ok_or_else(|| ConfigError::MissingField {
                site_url: self.base_url.clone(),
                field: field.to_string(),
            })
    }

    /// URL of listing page `page` (1-based).
    pub fn listing_url(&self, page: u32) -> String {
        format!(
            "{}{}",
            self.base_url,
            self.pagination.replace(PAGE_PLACEHOLDER, &page.to_string())
        )
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// On-disk shape of a profile in a YAML profiles file.
#[derive(Debug, Deserialize)]
struct ProfileDefinition {
    url: String,
    pagination: String,
    selectors: BTreeMap<String, Selector>,
}

/// Immutable collection of site profiles keyed by site id.
#[derive(Debug, Clone, Default)]
pub struct ProfileSet {
    profiles: BTreeMap<String, SiteProfile>,
}

impl ProfileSet {
    /// Profiles compiled into the binary.
    pub fn builtin() -> Self {
        let habr = SiteProfile {
            id: DEFAULT_SITE.to_string(),
            base_url: "https://habr.com/all/".to_string(),
            pagination: "page{page}/".to_string(),
            fields: BTreeMap::from([
                (
                    ARTICLE_FIELD.to_string(),
                    Selector::new("article").with_class("post post_preview"),
                ),
                (
                    TITLE_FIELD.to_string(),
                    Selector::new("a").with_class("post__title_link"),
                ),
                (
                    TIMESTAMP_FIELD.to_string(),
                    Selector::new("span").with_class("post__time"),
                ),
            ]),
        };

        let profiles = BTreeMap::from([(habr.id.clone(), habr)]);
        Self { profiles }
    }

    /// Parse a YAML mapping of site id to profile definition.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let definitions: BTreeMap<String, ProfileDefinition> = serde_yaml::from_str(yaml)?;
        let mut profiles = BTreeMap::new();
        for (id, def) in definitions {
            let profile = SiteProfile::new(id.clone(), def.url, def.pagination, def.selectors)?;
            debug!(site = %id, fields = ?profile.field_names().collect::<Vec<_>>(), "Loaded site profile");
            profiles.insert(id, profile);
        }
        Ok(Self { profiles })
    }

    /// Read a YAML profiles file.
    ///
    /// # Arguments
    ///
    /// * `path` - File holding a mapping of site id to `{ url, pagination, selectors }`
    ///
    /// # Returns
    ///
    /// The profiles defined in the file, validated. Merge them over the
    /// built-ins with [`ProfileSet::extend`].
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Io`] if the file cannot be read
    /// * [`ConfigError::Yaml`] if it is not a valid profiles mapping
    /// * [`ConfigError::InvalidBaseUrl`] or [`ConfigError::MissingPagePlaceholder`]
    ///   if a profile fails validation
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::from_yaml_str(&yaml)?;
        info!(count = set.len(), "Loaded site profiles file");
        Ok(set)
    }

    /// Merge `other` over `self`; profiles in `other` win on id clashes.
    pub fn extend(mut self, other: ProfileSet) -> Self {
        self.profiles.extend(other.profiles);
        self
    }

    pub fn get(&self, site: &str) -> Result<&SiteProfile, ConfigError> {
        self.profiles
            .get(site)
            .ok_or_else(|| ConfigError::UnknownSite(site.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }
}
