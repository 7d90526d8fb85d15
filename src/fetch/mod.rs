//! Webpage fetcher
//!
//! Reads a YAML worklist (`to_be_fetched` / `fetched`), downloads each
//! pending page, extracts its main text and writes it as Markdown under a
//! dated output directory. Successful URLs move to `fetched`; failures stay
//! queued for the next run.

pub mod extract;
pub mod fetcher;
pub mod markdown;
pub mod runner;
pub mod worklist;

pub use extract::extract_main_content;
pub use fetcher::{FetchedPage, PageFetcher, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use markdown::{sanitize_filename, save_markdown};
pub use runner::{process_worklist, run_fetch, FetchOptions, FetchSummary, ProcessReport};
pub use worklist::Worklist;

/// Default worklist location
pub const DEFAULT_CONFIG: &str = "weblinks.yml";
pub const DEFAULT_LOG_FILE: &str = "logs/fetch_webpage.log";
pub const DEFAULT_OUTPUT_DIR: &str = "output/fetched_pages";
