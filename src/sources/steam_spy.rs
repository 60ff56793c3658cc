//! SteamSpy source.
//!
//! Concurrent-player counts, community tags and the current discount from
//! the SteamSpy appdetails API. SteamSpy answers 200 even for unknown
//! appids; an empty name field is its "not found".

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::context::{RequestSpec, SourceContext, Transport};
use super::{apply_label_filter, fail, FieldMap, Source, SourceResult};

const STEAMSPY_LABELS: &[&str] = &[
    "steam_appid",
    "name",
    "positive",
    "negative",
    "ccu",
    "tags",
    "discount",
];

/// Player and tag stats from SteamSpy.
pub struct SteamSpy {
    ctx: SourceContext,
}

impl SteamSpy {
    pub const NAME: &'static str = "SteamSpy";
    const BASE_URL: &'static str = "https://steamspy.com/api.php";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            ctx: SourceContext::new(transport),
        }
    }

    fn transform(data: &Value, appid: &str) -> FieldMap {
        let mut packed = FieldMap::new();
        packed.insert(
            "steam_appid".to_string(),
            data.get("appid").cloned().unwrap_or_else(|| json!(appid)),
        );
        for label in ["name", "positive", "negative", "ccu", "discount"] {
            packed.insert(label.to_string(), data.get(label).cloned().unwrap_or(Value::Null));
        }
        // Tags arrive as {"Indie": 431, ...}; only the names are kept.
        let tags = match data.get("tags") {
            Some(Value::Object(map)) => Value::Array(map.keys().map(|k| json!(k)).collect()),
            Some(Value::Array(list)) => Value::Array(list.clone()),
            _ => Value::Null,
        };
        packed.insert("tags".to_string(), tags);
        packed
    }
}

impl Source for SteamSpy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn valid_labels(&self) -> &'static [&'static str] {
        STEAMSPY_LABELS
    }

    fn fetch(&self, identifier: &str, selected_labels: Option<&[&str]>) -> SourceResult {
        debug!(source = Self::NAME, appid = identifier, "fetching player stats");

        let spec = RequestSpec::get(Self::BASE_URL)
            .query("request", "appdetails")
            .query("appid", identifier);

        let response = self.ctx.request(&spec);
        if response.status != 200 {
            return fail(
                Self::NAME,
                format!("Failed to fetch data with status code: {}", response.status),
            );
        }

        let data: Value = match response.json() {
            Ok(value) => value,
            Err(_) => {
                return fail(
                    Self::NAME,
                    format!("Failed to parse SteamSpy response for appid {identifier}."),
                )
            }
        };

        let name_missing = data
            .get("name")
            .map(|name| name.is_null() || name.as_str().is_some_and(str::is_empty))
            .unwrap_or(true);
        if name_missing {
            return fail(
                Self::NAME,
                format!("Game with appid {identifier} is not found."),
            );
        }

        let packed = Self::transform(&data, identifier);
        SourceResult::success(apply_label_filter(
            packed,
            selected_labels,
            Self::NAME,
            STEAMSPY_LABELS,
        ))
    }
}
