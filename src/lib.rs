// Library target for the integration tests and criterion benchmarks.
// The binary entry point is main.rs, which declares the same module tree.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod event;
pub mod export;
pub mod logging;
pub mod quiz;
pub mod session;
pub mod ui;
