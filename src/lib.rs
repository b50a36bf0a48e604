pub mod analyzer;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
#[cfg(feature = "tui")]
pub mod tui;
