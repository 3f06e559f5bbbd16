//! Error types for each stage of the pipeline.
//!
//! Errors are split by how the run reacts to them:
//!
//! | Error | Raised by | Policy |
//! |-------|-----------|--------|
//! | [`ConfigError`] | profiles, selectors, dictionary loading | fatal, aborts before crawling |
//! | [`FetchError`] | [`crate::scrapers::fetcher`] | page is logged and skipped |
//! | [`IngestError`] | [`crate::analysis::collector`] | record is logged and skipped |

use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration problems. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no site profile registered for \"{0}\"")]
    UnknownSite(String),

    #[error("\"{field}\" not defined in {site_url} profile")]
    MissingField { site_url: String, field: String },

    #[error("selector tag \"{tag}\" is not a valid element name")]
    InvalidSelector { tag: String },

    #[error("invalid base url \"{url}\": {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("pagination template \"{0}\" has no {{page}} placeholder")]
    MissingPagePlaceholder(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site profiles: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("malformed dictionary entry at line {line}: {reason}")]
    Dictionary { line: usize, reason: String },
}

/// A listing page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// A single article record could not be aggregated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("unparseable publication date \"{0}\"")]
    UnparseableDate(String),
}
