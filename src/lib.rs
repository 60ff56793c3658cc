//! game-insights: multi-source Steam game data aggregation.
//!
//! This crate queries nine independent game-data providers (store metadata,
//! review scores, player-count charts, completion times, compatibility
//! tiers, sales estimates, achievements, user libraries), normalizes their
//! heterogeneous responses into one unified record per game, and reports
//! partial failures without aborting the whole batch.
//!
//! The binary (`game-insights`) is a thin wrapper around this library so
//! that the collection logic is testable without spawning processes.

// Core modules
pub mod collector;
pub mod config;
pub mod error;
pub mod model;
pub mod sources;
pub mod utils;

// CLI surface used by the binary
pub mod cli;

#[cfg(test)]
pub mod testing;

// Re-export main types for convenience
pub use collector::{
    classify_fetch_failure, classify_source_error, Collector, CollectorOptions, FailureMode,
    FetchOptions, FetchOutcome, Scope, SourceBinding,
};
pub use error::{GameInsightsError, Result};
pub use model::{GameData, FIELD_ORDER, RECAP_FIELDS};
pub use sources::{FieldMap, Source, SourceResult};

/// Collect merged game data for the given appids with default settings.
pub fn collect_games_data(
    steam_appids: &[String],
    options: &FetchOptions,
) -> Result<Vec<serde_json::Value>> {
    let collector = Collector::new(CollectorOptions::default())?;
    collector.get_games_data(steam_appids, options)
}
