//! ProtonDB source.
//!
//! Linux/Steam Deck compatibility summaries from the ProtonDB JSON API.
//! ProtonDB grades games with a tier ladder (pending, bronze, silver, gold,
//! platinum) plus a confidence level and a 0-1 score.
//!
//! Data attribution: compatibility data is sourced from protondb.com.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::context::{RequestSpec, SourceContext, Transport};
use super::{apply_label_filter, fail, FieldMap, Source, SourceResult};

const PROTONDB_LABELS: &[&str] = &[
    "steam_appid",
    "protondb_tier",
    "protondb_score",
    "protondb_trending",
    "protondb_confidence",
    "protondb_total",
];

/// Compatibility report summaries from ProtonDB.
pub struct ProtonDb {
    ctx: SourceContext,
}

impl ProtonDb {
    pub const NAME: &'static str = "ProtonDB";
    const BASE_URL: &'static str = "https://www.protondb.com";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            ctx: SourceContext::new(transport),
        }
    }

    fn transform(summary: &Value) -> FieldMap {
        let mappings = [
            ("protondb_tier", "tier"),
            ("protondb_score", "score"),
            ("protondb_trending", "trendingTier"),
            ("protondb_confidence", "confidence"),
            ("protondb_total", "total"),
        ];
        mappings
            .into_iter()
            .map(|(label, key)| {
                (
                    label.to_string(),
                    summary.get(key).cloned().unwrap_or(Value::Null),
                )
            })
            .collect()
    }
}

impl Source for ProtonDb {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn valid_labels(&self) -> &'static [&'static str] {
        PROTONDB_LABELS
    }

    fn fetch(&self, identifier: &str, selected_labels: Option<&[&str]>) -> SourceResult {
        debug!(source = Self::NAME, appid = identifier, "fetching compatibility summary");

        let spec = RequestSpec::get(format!(
            "{}/api/v1/reports/summaries/{identifier}.json",
            Self::BASE_URL
        ));
        let response = self.ctx.request(&spec);
        if response.status == 404 {
            return fail(
                Self::NAME,
                format!("Game {identifier} not found on ProtonDB."),
            );
        }
        if response.status != 200 {
            return fail(
                Self::NAME,
                format!("Failed to fetch data with status code: {}", response.status),
            );
        }

        let summary: Value = match response.json() {
            Ok(value) => value,
            Err(_) => {
                return fail(
                    Self::NAME,
                    format!("Failed to parse ProtonDB response for game {identifier}."),
                )
            }
        };

        let mut packed = Self::transform(&summary);
        packed.insert("steam_appid".to_string(), json!(identifier));

        SourceResult::success(apply_label_filter(
            packed,
            selected_labels,
            Self::NAME,
            PROTONDB_LABELS,
        ))
    }
}
