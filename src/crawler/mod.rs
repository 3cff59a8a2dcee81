//! The crawl engine: HTTP fetching, HTML parsing, and the worker/supervisor
//! pair that drives them against the shared coordination store.

pub mod fetcher;
pub mod parser;
pub mod supervisor;
pub mod worker;

pub use fetcher::FetchOutcome;
pub use supervisor::MetricsSummary;
pub use worker::Worker;
