use crate::fetch::extract::extract_main_content;
use crate::fetch::fetcher::PageFetcher;
use crate::fetch::markdown::save_markdown;
use crate::fetch::worklist::Worklist;
use crate::types::Result;
use chrono::Local;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub config: PathBuf,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub user_agent: String,
}

/// Counts from one pass over the worklist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub succeeded: usize,
    pub failed: usize,
    pub removed: usize,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchSummary {
    /// Entries in `to_be_fetched` when the run started
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub remaining: usize,
    pub total_fetched: usize,
    pub duration: Duration,
}

fn is_http_url(entry: &str) -> bool {
    entry.starts_with("http://") || entry.starts_with("https://")
}

/// Fetch every pending URL once, moving successes to `fetched`.
///
/// Invalid entries and entries that were already fetched are dropped.
/// Failures stay in `to_be_fetched` for the next run.
pub async fn process_worklist(
    worklist: &mut Worklist,
    fetcher: &PageFetcher,
    output_dir: &Path,
) -> ProcessReport {
    let mut report = ProcessReport::default();
    let mut newly_fetched: Vec<String> = Vec::new();
    let mut seen_this_run: HashSet<String> = HashSet::new();
    let mut pending: Vec<String> = Vec::new();

    for url in std::mem::take(&mut worklist.to_be_fetched) {
        if !is_http_url(&url) {
            tracing::warn!("Skipping invalid or non-HTTP(S) URL in 'to_be_fetched': {}", url);
            report.removed += 1;
            report.changed = true;
            continue;
        }

        if worklist.fetched.contains(&url) || seen_this_run.contains(&url) {
            tracing::info!("Skipping URL already present in 'fetched' list: {}", url);
            report.removed += 1;
            report.changed = true;
            continue;
        }

        tracing::info!("Processing URL: {}", url);
        match fetcher.fetch(&url).await {
            Ok(page) => {
                let text = extract_main_content(&page.body);
                if let Err(e) = save_markdown(output_dir, &url, &text, &Local::now()) {
                    tracing::error!("Error saving content for {}: {}", url, e);
                }
                // an earlier copy of this URL may have failed this run
                pending.retain(|u| u != &url);
                seen_this_run.insert(url.clone());
                newly_fetched.push(url);
                report.succeeded += 1;
                report.changed = true;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                report.failed += 1;
                pending.push(url);
            }
        }
    }

    worklist.to_be_fetched = pending;

    let mut added = 0;
    for url in newly_fetched {
        if !worklist.fetched.contains(&url) {
            worklist.fetched.push(url);
            added += 1;
        }
    }
    if added > 0 {
        tracing::info!("Added {} newly fetched URLs to the 'fetched' list.", added);
    }

    report
}

/// Load the worklist, process it, save it if anything changed, and log a summary
pub async fn run_fetch(options: &FetchOptions) -> Result<FetchSummary> {
    tracing::info!("--- Starting webpage fetch process ---");
    tracing::info!("Using worklist file: {}", options.config.display());
    tracing::info!("Request timeout: {}s", options.timeout.as_secs());
    tracing::info!("User-Agent: {}", options.user_agent);
    tracing::info!("Output directory: {}", options.output_dir.display());

    let start = Instant::now();
    let fetcher = PageFetcher::new(&options.user_agent, options.timeout)?;
    let mut worklist = Worklist::load(&options.config);

    let attempted = worklist.to_be_fetched.len();
    if attempted == 0 {
        tracing::info!("No URLs found in 'to_be_fetched' list. Nothing to do.");
    } else {
        tracing::info!("Found {} URLs in 'to_be_fetched' list.", attempted);
    }

    let report = process_worklist(&mut worklist, &fetcher, &options.output_dir).await;

    if report.changed {
        tracing::info!("Saving updated worklist.");
        if let Err(e) = worklist.save(&options.config) {
            tracing::error!("Error saving worklist {}: {}", options.config.display(), e);
        }
    } else {
        tracing::info!("No changes made to the worklist this run.");
    }

    let summary = FetchSummary {
        attempted,
        succeeded: report.succeeded,
        failed: report.failed,
        remaining: worklist.to_be_fetched.len(),
        total_fetched: worklist.fetched.len(),
        duration: start.elapsed(),
    };

    tracing::info!("--- Webpage fetch process finished ---");
    tracing::info!(
        "Attempted to process {} URLs from the initial list in {:.2} seconds.",
        summary.attempted,
        summary.duration.as_secs_f64()
    );
    tracing::info!(
        "Successfully fetched: {}, Failed: {}",
        summary.succeeded,
        summary.failed
    );
    tracing::info!("URLs currently in 'to_be_fetched': {}", summary.remaining);
    tracing::info!("Total URLs in 'fetched': {}", summary.total_fetched);

    Ok(summary)
}
