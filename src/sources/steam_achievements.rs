//! Steam achievements source.
//!
//! Global achievement completion percentages from the Steam Web API. When a
//! Steam API key is available, the game schema call enriches the list with
//! display names and descriptions; without a key the percentages alone are
//! returned.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::context::{RequestSpec, SourceContext, Transport};
use super::{apply_label_filter, fail, FieldMap, Source, SourceResult};

const STEAMACHIEVEMENTS_LABELS: &[&str] = &[
    "steam_appid",
    "achievements_count",
    "achievements_percentage_average",
    "achievements_list",
];

/// Achievement stats from the Steam Web API.
pub struct SteamAchievements {
    ctx: SourceContext,
    api_key: Option<String>,
}

impl SteamAchievements {
    pub const NAME: &'static str = "SteamAchievements";
    const PERCENTAGES_URL: &'static str =
        "https://api.steampowered.com/ISteamUserStats/GetGlobalAchievementPercentagesForApp/v0002/";
    const SCHEMA_URL: &'static str =
        "https://api.steampowered.com/ISteamUserStats/GetSchemaForGame/v0002/";

    pub fn new(transport: Arc<dyn Transport>, api_key: Option<String>) -> Self {
        Self {
            ctx: SourceContext::new(transport),
            api_key,
        }
    }

    /// Schema lookup: achievement name -> (display name, description).
    /// Best-effort; any failure simply yields no enrichment.
    fn fetch_schema(&self, appid: &str) -> HashMap<String, (Option<String>, Option<String>)> {
        let Some(key) = &self.api_key else {
            return HashMap::new();
        };
        let spec = RequestSpec::get(Self::SCHEMA_URL)
            .query("key", key)
            .query("appid", appid);
        let response = self.ctx.request(&spec);
        if response.status != 200 {
            return HashMap::new();
        }
        let Ok(body) = response.json() else {
            return HashMap::new();
        };
        body.pointer("/game/availableGameStats/achievements")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let name = entry.get("name")?.as_str()?.to_string();
                        let display = entry
                            .get("displayName")
                            .and_then(Value::as_str)
                            .map(str::to_string);
                        let description = entry
                            .get("description")
                            .and_then(Value::as_str)
                            .map(str::to_string);
                        Some((name, (display, description)))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Source for SteamAchievements {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn valid_labels(&self) -> &'static [&'static str] {
        STEAMACHIEVEMENTS_LABELS
    }

    fn fetch(&self, identifier: &str, selected_labels: Option<&[&str]>) -> SourceResult {
        debug!(source = Self::NAME, appid = identifier, "fetching achievement stats");

        let spec = RequestSpec::get(Self::PERCENTAGES_URL)
            .query("gameid", identifier)
            .query("format", "json");
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
                    format!("Failed to parse SteamAchievements response for appid {identifier}."),
                )
            }
        };

        let Some(entries) = body
            .pointer("/achievementpercentages/achievements")
            .and_then(Value::as_array)
            .filter(|entries| !entries.is_empty())
        else {
            return fail(
                Self::NAME,
                format!("Achievements for appid {identifier} not found."),
            );
        };

        let schema = self.fetch_schema(identifier);

        let mut percentages: Vec<f64> = Vec::new();
        let mut achievements: Vec<Value> = Vec::new();
        for entry in entries {
            let Some(name) = entry.get("name").and_then(Value::as_str) else {
                continue;
            };
            // Percentages arrive as strings ("12.3") or numbers.
            let percent = match entry.get("percent") {
                Some(Value::Number(n)) => n.as_f64(),
                Some(Value::String(s)) => s.parse::<f64>().ok(),
                _ => None,
            };
            if let Some(percent) = percent {
                percentages.push(percent);
            }
            let (display, description) = schema.get(name).cloned().unwrap_or((None, None));
            achievements.push(json!({
                "name": name,
                "percent": percent,
                "display_name": display,
                "description": description,
            }));
        }

        let average = if percentages.is_empty() {
            Value::Null
        } else {
            json!(percentages.iter().sum::<f64>() / percentages.len() as f64)
        };

        let mut packed = FieldMap::new();
        packed.insert("steam_appid".to_string(), json!(identifier));
        packed.insert("achievements_count".to_string(), json!(achievements.len()));
        packed.insert("achievements_percentage_average".to_string(), average);
        packed.insert("achievements_list".to_string(), Value::Array(achievements));

        SourceResult::success(apply_label_filter(
            packed,
            selected_labels,
            Self::NAME,
            STEAMACHIEVEMENTS_LABELS,
        ))
    }
}
