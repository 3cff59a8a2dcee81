//! URL canonicalization and host helpers.
//!
//! Link extraction lives in [`crate::crawler::parser`]; this module owns only
//! the single-URL concerns: resolving a link against its page's base URL and
//! picking its host apart.

mod domain;
mod normalize;

pub use domain::{extract_domain, strip_www};
pub use normalize::normalize;
