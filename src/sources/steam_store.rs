//! Steam Store source.
//!
//! Fetches store metadata from the appdetails endpoint. This is the primary
//! source for game data: its failure message is the authoritative signal
//! that an appid does not exist in the requested region/language, and the
//! classifier maps that exact wording to a not-found error.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::context::{RequestSpec, SourceContext, Transport};
use super::{apply_label_filter, fail, FieldMap, Source, SourceResult};

const STEAMSTORE_LABELS: &[&str] = &[
    "steam_appid",
    "name",
    "developers",
    "publishers",
    "type",
    "price_currency",
    "price_initial",
    "price_final",
    "categories",
    "platforms",
    "genres",
    "metacritic_score",
    "release_date",
    "content_rating",
    "is_free",
    "is_coming_soon",
    "recommendations",
];

/// Store metadata from the Steam appdetails API.
pub struct SteamStore {
    ctx: SourceContext,
    region: String,
    language: String,
    api_key: Option<String>,
}

impl SteamStore {
    pub const NAME: &'static str = "SteamStore";
    const BASE_URL: &'static str = "https://store.steampowered.com/api/appdetails";

    pub fn new(
        transport: Arc<dyn Transport>,
        region: impl Into<String>,
        language: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            ctx: SourceContext::new(transport),
            region: region.into(),
            language: language.into(),
            api_key,
        }
    }

    fn not_available_message(&self, appid: &str) -> String {
        format!(
            "Failed to fetch data for appid {appid}, or appid is not available in the specified region ({}) or language ({}).",
            self.region, self.language
        )
    }

    /// Repack the raw appdetails entry into the declared labels.
    fn transform(&self, data: &Value, appid: &str) -> FieldMap {
        let mut packed = FieldMap::new();

        packed.insert(
            "steam_appid".to_string(),
            data.get("steam_appid").cloned().unwrap_or_else(|| json!(appid)),
        );
        for label in ["name", "type", "is_free", "developers", "publishers"] {
            packed.insert(
                label.to_string(),
                data.get(label).cloned().unwrap_or(Value::Null),
            );
        }

        packed.insert(
            "is_coming_soon".to_string(),
            data.pointer("/release_date/coming_soon")
                .cloned()
                .unwrap_or(Value::Null),
        );
        packed.insert(
            "release_date".to_string(),
            data.pointer("/release_date/date").cloned().unwrap_or(Value::Null),
        );
        packed.insert(
            "recommendations".to_string(),
            data.pointer("/recommendations/total")
                .cloned()
                .unwrap_or(Value::Null),
        );
        packed.insert(
            "metacritic_score".to_string(),
            data.pointer("/metacritic/score").cloned().unwrap_or(Value::Null),
        );

        // Prices are reported in cents.
        packed.insert(
            "price_currency".to_string(),
            data.pointer("/price_overview/currency")
                .cloned()
                .unwrap_or(Value::Null),
        );
        for (label, key) in [("price_initial", "initial"), ("price_final", "final")] {
            let value = data
                .pointer(&format!("/price_overview/{key}"))
                .and_then(Value::as_f64)
                .map(|cents| json!(cents / 100.0))
                .unwrap_or(Value::Null);
            packed.insert(label.to_string(), value);
        }

        for label in ["categories", "genres"] {
            let descriptions = data
                .get(label)
                .and_then(Value::as_array)
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|entry| entry.get("description").cloned())
                        .collect::<Vec<Value>>()
                })
                .map(Value::Array)
                .unwrap_or(Value::Null);
            packed.insert(label.to_string(), descriptions);
        }

        // Platforms arrive as {"windows": true, "mac": false, ...}.
        let platforms = data
            .get("platforms")
            .and_then(Value::as_object)
            .map(|flags| {
                let mut enabled: Vec<Value> = flags
                    .iter()
                    .filter(|(_, on)| on.as_bool().unwrap_or(false))
                    .map(|(platform, _)| json!(platform))
                    .collect();
                enabled.sort_by_key(|v| v.as_str().map(str::to_string));
                Value::Array(enabled)
            })
            .unwrap_or(Value::Null);
        packed.insert("platforms".to_string(), platforms);

        // Ratings arrive as {"pegi": {"rating": "12", ...}, ...}.
        let ratings = data
            .get("ratings")
            .and_then(Value::as_object)
            .map(|agencies| {
                let entries: Vec<Value> = agencies
                    .iter()
                    .map(|(agency, body)| {
                        json!({
                            "agency": agency,
                            "rating": body.get("rating").cloned().unwrap_or(Value::Null),
                            "descriptors": body.get("descriptors").cloned().unwrap_or(Value::Null),
                        })
                    })
                    .collect();
                Value::Array(entries)
            })
            .unwrap_or(Value::Null);
        packed.insert("content_rating".to_string(), ratings);

        packed
    }
}

impl Source for SteamStore {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn valid_labels(&self) -> &'static [&'static str] {
        STEAMSTORE_LABELS
    }

    fn fetch(&self, identifier: &str, selected_labels: Option<&[&str]>) -> SourceResult {
        debug!(source = Self::NAME, appid = identifier, "fetching store metadata");

        let mut spec = RequestSpec::get(Self::BASE_URL)
            .query("appids", identifier)
            .query("cc", &self.region)
            .query("l", &self.language);
        if let Some(key) = &self.api_key {
            spec = spec.query("key", key);
        }

        let response = self.ctx.request(&spec);
        if response.status != 200 {
            return fail(
                Self::NAME,
                format!("Failed to fetch data with status code: {}", response.status),
            );
        }

        let body: Value = match response.json() {
            Ok(value) => value,
            Err(_) => {
                return fail(
                    Self::NAME,
                    format!("Failed to parse SteamStore response for appid {identifier}."),
                )
            }
        };

        let entry = body.get(identifier);
        let success = entry
            .and_then(|e| e.get("success"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let data = match entry.and_then(|e| e.get("data")) {
            Some(data) if success => data,
            _ => return fail(Self::NAME, self.not_available_message(identifier)),
        };

        let packed = self.transform(data, identifier);
        SourceResult::success(apply_label_filter(
            packed,
            selected_labels,
            Self::NAME,
            STEAMSTORE_LABELS,
        ))
    }
}
