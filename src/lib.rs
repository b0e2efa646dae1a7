pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;
pub use config::ScoutConfig;

pub use adapters::{HtmlDom, HttpRenderer, SqliteStore};
pub use crate::core::{engine::ScrapeEngine, extractor::Extractor, rules::ExtractionRules};
pub use domain::model::{DomElement, HistoryEntry, Outcome, ProductRecord};
pub use utils::error::{Result, ScrapeError};
