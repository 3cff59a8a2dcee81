//! Entry point for the `tests/integration/` test modules. Cargo only
//! auto-discovers `.rs` files directly under `tests/`; this file pulls in
//! the subdirectory module so `cargo test` actually runs it.

#[path = "integration/crawl_tests.rs"]
mod crawl_tests;
