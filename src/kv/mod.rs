//! The shared coordination store: everything workers agree on through Redis
//! rather than through in-process state, so any number of worker processes
//! can drain the same crawl.
//!
//! Each sub-module owns one Redis key (or key pair) and the atomic script
//! that operates on it. None of these types talk to each other directly —
//! composing them is [`crate::crawler::worker::Worker`]'s job.

mod frontier;
mod rate_limiter;
mod visited;

pub use frontier::Frontier;
pub use rate_limiter::RateLimiter;
pub use visited::Visited;
