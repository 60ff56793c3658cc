//! Unified game record: construction, coercion, and projections.

mod coerce;
mod game_data;

pub use game_data::{GameData, FIELD_ORDER, RECAP_FIELDS};
