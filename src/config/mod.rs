//! Configuration module
//!
//! Loads crawler configuration from the process environment (optionally
//! preceded by a `.env` file in the working directory), matching the
//! variables documented in `SPEC_FULL.md` §6.
//!
//! # Example
//!
//! ```no_run
//! use driftline::config::load_config;
//!
//! let config = load_config().unwrap();
//! println!("Concurrency: {}", config.concurrency);
//! ```

mod parser;
mod types;
mod validation;

pub use parser::{load_config, load_config_from_map};
pub use types::Config;
