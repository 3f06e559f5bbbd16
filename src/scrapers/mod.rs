//! Crawling listing pages and feeding their articles to the collector.
//!
//! The crawl walks pages `1..=pages` strictly in order:
//!
//! 1. **Fetching**: download the listing page through a [`PageFetcher`]
//! 2. **Extraction**: pull article records out of it with [`ArticleSelectors`]
//! 3. **Ingestion**: hand every record to the [`AggregationCollector`]
//!
//! Page N is fully ingested before page N+1 is requested. Failures are local:
//! a page that cannot be fetched, a preview with missing fields, or a record
//! with an unreadable date is logged and skipped. An optional whole-run
//! timeout abandons the remaining pages and keeps what was ingested.

pub mod extractor;
pub mod fetcher;

use crate::analysis::{AggregationCollector, DateParser, MorphAnalyzer};
use crate::site::SiteProfile;
use crate::utils::truncate_for_log;
use extractor::{ArticleSelectors, ListingPage};
use fetcher::PageFetcher;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::pin::pin;
use std::time::Duration;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, instrument, warn};

/// How a crawl run is bounded and displayed.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Number of listing pages, starting at page 1.
    pub pages: u32,
    /// Draw a progress bar on stderr.
    pub show_progress: bool,
    /// Stop fetching new pages once this much time has passed.
    pub timeout: Option<Duration>,
}

/// What happened during a crawl run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_fetched: u32,
    pub pages_failed: u32,
    pub articles_ingested: usize,
    pub articles_skipped: usize,
    pub timed_out: bool,
}

/// Crawl `profile`'s listing pages into `collector`.
///
/// Pages `1..=settings.pages` are fetched one at a time; each is parsed and
/// fully ingested before the next request goes out.
///
/// # Arguments
///
/// * `fetcher` - Source of listing page bodies
/// * `profile` - Site whose listing URLs are crawled
/// * `selectors` - Compiled article, title and timestamp selectors for `profile`
/// * `collector` - Receives every extracted record
/// * `settings` - Page count, progress bar and optional whole-run timeout
///
/// # Returns
///
/// A [`CrawlStats`] summary. The crawl itself never fails: unreachable pages,
/// incomplete previews and unreadable dates are counted and skipped, and a
/// timeout keeps whatever was ingested before it fired.
#[instrument(level = "info", skip_all, fields(site = %profile.id(), pages = settings.pages))]
pub async fn crawl<F, M, D>(
    fetcher: &F,
    profile: &SiteProfile,
    selectors: &ArticleSelectors,
    collector: &mut AggregationCollector<M, D>,
    settings: &CrawlSettings,
) -> CrawlStats
where
    F: PageFetcher,
    M: MorphAnalyzer,
    D: DateParser,
{
    let mut stats = CrawlStats::default();
    let progress = progress_bar(settings);
    let deadline = settings.timeout.map(|timeout| Instant::now() + timeout);

    let mut pages = pin!(stream::iter(1..=settings.pages).then(|page| {
        let url = profile.listing_url(page);
        async move {
            let result = fetcher.fetch(&url).await;
            (page, url, result)
        }
    }));

    loop {
        let next = match deadline {
            Some(deadline) => match timeout_at(deadline, pages.next()).await {
                Ok(next) => next,
                Err(_) => {
                    warn!(
                        fetched = stats.pages_fetched,
                        "Crawl timeout reached; abandoning remaining pages"
                    );
                    stats.timed_out = true;
                    break;
                }
            },
            None => pages.next().await,
        };
        let Some((page, url, result)) = next else {
            break;
        };

        match result {
            Ok(body) => {
                stats.pages_fetched += 1;
                ingest_page(page, &body, selectors, collector, &mut stats);
            }
            Err(e) => {
                stats.pages_failed += 1;
                warn!(page, %url, error = %e, "Failed to fetch listing page; skipping");
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    info!(
        pages_fetched = stats.pages_fetched,
        pages_failed = stats.pages_failed,
        articles_ingested = stats.articles_ingested,
        articles_skipped = stats.articles_skipped,
        timed_out = stats.timed_out,
        "Crawl finished"
    );
    stats
}

/// Parse one page and ingest its articles. Synchronous on purpose: the parsed
/// document must not live across an `.await`.
fn ingest_page<M, D>(
    page: u32,
    body: &str,
    selectors: &ArticleSelectors,
    collector: &mut AggregationCollector<M, D>,
    stats: &mut CrawlStats,
) where
    M: MorphAnalyzer,
    D: DateParser,
{
    let listing = ListingPage::parse(body);
    let mut found = 0usize;

    for item in listing.articles(selectors) {
        found += 1;
        match item {
            Ok(record) => match collector.ingest(&record) {
                Ok(()) => stats.articles_ingested += 1,
                Err(e) => {
                    stats.articles_skipped += 1;
                    debug!(
                        page,
                        error = %e,
                        title = %truncate_for_log(&record.title, 80),
                        "Skipping article"
                    );
                }
            },
            Err(gap) => {
                stats.articles_skipped += 1;
                debug!(page, error = %gap, "Skipping article preview");
            }
        }
    }

    if found == 0 {
        warn!(page, "No articles found on listing page");
    } else {
        debug!(page, found, "Processed listing page");
    }
}

fn progress_bar(settings: &CrawlSettings) -> ProgressBar {
    if !settings.show_progress {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(u64::from(settings.pages));
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar
}
