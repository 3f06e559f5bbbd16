//! # Habr Trends
//!
//! Crawls the paginated article feed of a content site (Habr by default),
//! extracts every article's title and publication date, and prints the three
//! most frequent nouns of each calendar week as a text table.
//!
//! ## Usage
//!
//! ```sh
//! habr_trends --dictionary dict.opcorpora.txt --pages 10 --show-progress
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: resolve the site profile and its selectors, load the
//!    morphology dictionary; any problem here aborts before the first request
//! 2. **Crawling**: fetch listing pages one by one, extract article previews
//! 3. **Aggregation**: bucket each article by week, count its title nouns
//! 4. **Output**: print the weekly top-3 table, optionally write JSON

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analysis;
mod cli;
mod error;
mod models;
mod outputs;
mod scrapers;
mod site;
mod utils;

use analysis::{AggregationCollector, HumanDateParser, Lexicon, TimeBucketer, TitleNormalizer};
use cli::Cli;
use outputs::{json, table};
use scrapers::extractor::ArticleSelectors;
use scrapers::fetcher::HttpFetcher;
use scrapers::{CrawlSettings, crawl};
use site::ProfileSet;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("habr_trends starting up");

    // Parse CLI; --pages <= 0 is rejected here, before any network activity
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Site profiles ----
    let mut profiles = ProfileSet::builtin();
    if let Some(path) = &args.profiles {
        match ProfileSet::load_file(path) {
            Ok(extra) => profiles = profiles.extend(extra),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load site profiles");
                return Err(e.into());
            }
        }
    }

    let profile = match profiles.get(&args.site) {
        Ok(profile) => profile,
        Err(e) => {
            error!(
                site = %args.site,
                known = ?profiles.ids().collect::<Vec<_>>(),
                error = %e,
                "Unknown site"
            );
            return Err(e.into());
        }
    };

    let selectors = match ArticleSelectors::from_profile(profile) {
        Ok(selectors) => selectors,
        Err(e) => {
            error!(site = %profile.id(), error = %e, "Site profile is incomplete");
            return Err(e.into());
        }
    };
    info!(site = %profile.id(), url = %profile.base_url(), "Using site profile");

    // ---- Morphology dictionary ----
    let dictionary_path = args.dictionary.clone();
    let lexicon = match tokio::task::spawn_blocking(move || Lexicon::load_file(dictionary_path)).await? {
        Ok(lexicon) => lexicon,
        Err(e) => {
            error!(
                path = %args.dictionary.display(),
                error = %e,
                "Failed to load morphology dictionary"
            );
            return Err(e.into());
        }
    };

    // ---- Crawl ----
    let fetcher = HttpFetcher::new(args.request_timeout())?;
    let mut collector = AggregationCollector::new(
        TitleNormalizer::new(&lexicon),
        TimeBucketer::new(HumanDateParser::today()),
    );
    let settings = CrawlSettings {
        pages: args.pages,
        show_progress: args.show_progress,
        timeout: args.crawl_timeout(),
    };

    let stats = crawl(&fetcher, profile, &selectors, &mut collector, &settings).await;

    // ---- Output ----
    if collector.is_empty() {
        warn!(
            pages_failed = stats.pages_failed,
            "No articles were aggregated; the report is empty"
        );
    }
    let projection = collector.finalize();
    print!("{}", table::render(&projection));

    if let Some(path) = &args.json_output {
        let report = json::JsonReport::new(profile.id(), args.pages, &projection);
        if let Err(e) = json::write_report(&report, path).await {
            error!(path = %path.display(), error = %e, "Failed to write JSON report");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        weeks = projection.len(),
        articles = stats.articles_ingested,
        finished_at = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        "Execution complete"
    );

    Ok(())
}
