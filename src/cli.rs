//! Command-line interface definitions.
//!
//! Arguments can be given as flags; file locations can also come from
//! environment variables.

use crate::site::DEFAULT_SITE;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Print the 3 most popular nouns from article titles, week by week.
///
/// # Examples
///
/// ```sh
/// # Crawl the default 10 pages of Habr
/// habr_trends --dictionary dict.opcorpora.txt
///
/// # 50 pages with a progress bar, give up after two minutes
/// habr_trends -d dict.opcorpora.txt --pages 50 --show-progress --timeout-secs 120
///
/// # Also write the report as JSON
/// habr_trends -d dict.opcorpora.txt --json-output ./out/report.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// How many listing pages to crawl
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Show a progress bar while crawling
    #[arg(long)]
    pub show_progress: bool,

    /// Site profile to crawl
    #[arg(long, default_value = DEFAULT_SITE)]
    pub site: String,

    /// YAML file with extra site profiles
    #[arg(long, env = "HABR_TRENDS_PROFILES")]
    pub profiles: Option<PathBuf>,

    /// OpenCorpora morphology dictionary (dict.opcorpora.txt)
    #[arg(short, long, env = "HABR_TRENDS_DICTIONARY")]
    pub dictionary: PathBuf,

    /// Stop crawling after this many seconds and report what was collected
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Also write the report as JSON to this file
    #[arg(short, long)]
    pub json_output: Option<PathBuf>,
}

impl Cli {
    pub fn crawl_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["habr_trends", "--dictionary", "dict.txt"]);

        assert_eq!(cli.pages, 10);
        assert!(!cli.show_progress);
        assert_eq!(cli.site, "habr");
        assert_eq!(cli.dictionary, PathBuf::from("dict.txt"));
        assert_eq!(cli.crawl_timeout(), None);
        assert_eq!(cli.request_timeout(), Duration::from_secs(30));
        assert!(cli.json_output.is_none());
    }

    #[test]
    fn test_cli_all_flags() {
        let cli = Cli::parse_from([
            "habr_trends",
            "-d",
            "/tmp/dict.txt",
            "--pages",
            "3",
            "--show-progress",
            "--site",
            "test",
            "--timeout-secs",
            "60",
            "-j",
            "/tmp/report.json",
        ]);

        assert_eq!(cli.pages, 3);
        assert!(cli.show_progress);
        assert_eq!(cli.site, "test");
        assert_eq!(cli.crawl_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(cli.json_output, Some(PathBuf::from("/tmp/report.json")));
    }

    #[test]
    fn test_cli_rejects_zero_pages() {
        let err = Cli::try_parse_from(["habr_trends", "-d", "dict.txt", "--pages", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_rejects_negative_pages() {
        assert!(Cli::try_parse_from(["habr_trends", "-d", "dict.txt", "--pages", "-3"]).is_err());
        assert!(Cli::try_parse_from(["habr_trends", "-d", "dict.txt", "--pages", "many"]).is_err());
    }
}
