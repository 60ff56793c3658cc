//! Data sources.
//!
//! Each provider is an independent unit implementing [`Source`]: given an
//! identifier (a Steam appid, a steamid, or a game name, depending on the
//! source) it returns a [`SourceResult`]: a field map on success, a raw
//! error string on failure. The collector depends only on this interface;
//! whether the data came from a JSON API, an HTML scrape, or a multi-step
//! token workflow is each source's private business.
//!
//! Failure strings are part of the contract: the collector's classifier
//! matches on the provider-specific wording, so the messages here are kept
//! stable.

pub mod context;

mod gamalytic;
mod howlongtobeat;
mod protondb;
mod steam_achievements;
mod steam_charts;
mod steam_review;
mod steam_spy;
mod steam_store;
mod steam_user;

use std::collections::HashMap;

use serde_json::Value;
use tracing::{error, warn};

pub use context::{
    ConnectionPool, HttpMethod, RawResponse, RequestSpec, SourceContext, Transport,
    SYNTHETIC_ERROR_CODE,
};
pub use gamalytic::Gamalytic;
pub use howlongtobeat::HowLongToBeat;
pub use protondb::ProtonDb;
pub use steam_achievements::SteamAchievements;
pub use steam_charts::SteamCharts;
pub use steam_review::{ReviewQuery, SteamReview};
pub use steam_spy::SteamSpy;
pub use steam_store::SteamStore;
pub use steam_user::SteamUser;

/// Field name -> value mapping produced by a source.
pub type FieldMap = HashMap<String, Value>;

/// Outcome of a single source fetch. Exactly one variant is populated;
/// failures carry the raw provider error text, never a typed error.
#[derive(Debug, Clone)]
pub enum SourceResult {
    Success { data: FieldMap },
    Failure { error: String },
}

impl SourceResult {
    pub fn success(data: FieldMap) -> Self {
        Self::Success { data }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The field map, when successful.
    pub fn data(&self) -> Option<&FieldMap> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// The raw error text, when failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }
}

/// Capability interface every provider implements.
pub trait Source {
    /// Stable source name, used in logs, metrics, and error classification.
    fn name(&self) -> &'static str;

    /// The fixed set of field names this source can produce.
    fn valid_labels(&self) -> &'static [&'static str];

    /// Fetch data for one identifier. Total function: never panics, reports
    /// every failure through [`SourceResult::Failure`].
    fn fetch(&self, identifier: &str, selected_labels: Option<&[&str]>) -> SourceResult;
}

/// Log and wrap a failure message.
pub(crate) fn fail(source: &str, message: impl Into<String>) -> SourceResult {
    let message = message.into();
    error!(source, "{message}");
    SourceResult::failure(message)
}

/// Keep only labels declared valid for the source, warning about the rest.
pub(crate) fn filter_valid_labels<'a>(
    source: &str,
    selected: &[&'a str],
    valid: &[&str],
) -> Vec<&'a str> {
    let (kept, invalid): (Vec<&str>, Vec<&str>) = selected
        .iter()
        .copied()
        .partition(|label| valid.contains(label));
    if !invalid.is_empty() {
        warn!(
            source,
            "Ignoring the following invalid labels: {invalid:?}, valid labels are: {valid:?}"
        );
    }
    kept
}

/// Restrict a field map to the selected labels (all fields when `None`).
pub(crate) fn apply_label_filter(
    data: FieldMap,
    selected: Option<&[&str]>,
    source: &str,
    valid: &[&str],
) -> FieldMap {
    match selected {
        None => data,
        Some(labels) => {
            let kept = filter_valid_labels(source, labels, valid);
            data.into_iter()
                .filter(|(key, _)| kept.contains(&key.as_str()))
                .collect()
        }
    }
}
