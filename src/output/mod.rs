//! Reporting surfaces for the CLI: `stats`, `domain-stats`, the `run`
//! metrics summary, and the `dump-status` snapshot.

mod domain_stats;
mod metrics;
mod stats;
mod status;

pub use domain_stats::{load_domain_stats, print_table, DomainStats};
pub use metrics::{write_metrics, write_metrics_to};
pub use stats::{load_stats, print_stats, Stats};
pub use status::{load_status, write_status, write_status_to, StatusSnapshot};
