//! HowLongToBeat source.
//!
//! Completion-time data scraped from howlongtobeat.com. This source is
//! name-keyed: it is queried with the game name produced by the primary
//! source, not with an appid.
//!
//! Workflow:
//! 1. GET /api/finder/init to obtain a session token
//! 2. POST /api/finder with the x-auth-token header to search by name
//! 3. GET /game/{id} and read __NEXT_DATA__ for the full record, falling
//!    back to the search hit when the page fetch fails
//!
//! Data attribution: completion times are sourced from howlongtobeat.com.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, error};

use super::context::{RawResponse, RequestSpec, SourceContext, Transport};
use super::{apply_label_filter, fail, FieldMap, Source, SourceResult};

const HOWLONGTOBEAT_LABELS: &[&str] = &[
    "game_id",
    "game_name",
    "game_type",
    "comp_main",
    "comp_plus",
    "comp_100",
    "comp_all",
    "comp_main_count",
    "comp_plus_count",
    "comp_100_count",
    "comp_all_count",
    "invested_co",
    "invested_mp",
    "invested_co_count",
    "invested_mp_count",
    "count_comp",
    "count_speed_run",
    "count_backlog",
    "count_review",
    "review_score",
    "count_playing",
    "count_retired",
];

/// Labels whose value is read from the `<label>_avg` key and reported in
/// minutes instead of seconds.
const AVG_TIME_LABELS: &[&str] = &[
    "comp_main",
    "comp_plus",
    "comp_100",
    "comp_all",
    "invested_co",
    "invested_mp",
];

static NEXT_DATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<script id="__NEXT_DATA__"[^>]*>(.*?)</script>"#).expect("valid regex")
});

/// Completion times from HowLongToBeat.
pub struct HowLongToBeat {
    ctx: SourceContext,
}

impl HowLongToBeat {
    pub const NAME: &'static str = "HowLongToBeat";
    const BASE_URL: &'static str = "https://www.howlongtobeat.com/";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            ctx: SourceContext::new(transport),
        }
    }

    fn browser_headers(spec: RequestSpec) -> RequestSpec {
        spec.header("Accept", "*/*")
            .header("Referer", Self::BASE_URL)
            .header("Sec-Fetch-Dest", "empty")
            .header("Sec-Fetch-Mode", "cors")
            .header("Sec-Fetch-Site", "same-origin")
    }

    /// Step 1: session token from the finder init endpoint.
    fn search_token(&self) -> Option<String> {
        let spec = Self::browser_headers(RequestSpec::get(format!(
            "{}api/finder/init",
            Self::BASE_URL
        )));
        let response = self.ctx.request(&spec);
        if response.status != 200 {
            error!(
                source = Self::NAME,
                "token request failed with status {}", response.status
            );
            return None;
        }
        match response.json() {
            Ok(body) => body
                .get("token")
                .and_then(Value::as_str)
                .map(str::to_string),
            Err(e) => {
                error!(source = Self::NAME, "token parsing failed: {e}");
                None
            }
        }
    }

    /// Step 2: search by name. `None` on synthetic (transport-level) errors.
    fn search(&self, game_name: &str, token: &str) -> Option<RawResponse> {
        let spec = Self::browser_headers(RequestSpec::post(format!(
            "{}api/finder",
            Self::BASE_URL
        )))
        .header("Content-Type", "application/json")
        .header("Origin", Self::BASE_URL.trim_end_matches('/'))
        .header("x-auth-token", token)
        .json(Self::search_payload(game_name));

        let response = self.ctx.request(&spec);
        if response.is_synthetic() {
            return None;
        }
        Some(response)
    }

    /// Step 3: full record from the game page's __NEXT_DATA__ blob.
    fn game_page(&self, game_id: i64) -> Option<Value> {
        let spec = RequestSpec::get(format!("{}game/{game_id}", Self::BASE_URL))
            .header("Referer", Self::BASE_URL);
        let response = self.ctx.request(&spec);
        if response.status != 200 {
            return None;
        }
        let blob = NEXT_DATA_RE.captures(&response.body)?;
        let next_data: Value = serde_json::from_str(blob.get(1)?.as_str()).ok()?;
        next_data
            .pointer("/props/pageProps/game/data/game/0")
            .cloned()
    }

    fn search_payload(game_name: &str) -> Value {
        json!({
            "searchType": "games",
            "searchTerms": game_name.split_whitespace().collect::<Vec<&str>>(),
            "searchPage": 1,
            "size": 1,
            "searchOptions": {
                "games": {
                    "userId": 0,
                    "platform": "",
                    "sortCategory": "popular",
                    "rangeCategory": "main",
                    "rangeTime": {"min": 0, "max": 0},
                    "gameplay": {
                        "perspective": "",
                        "flow": "",
                        "genre": "",
                        "difficulty": "",
                    },
                    "rangeYear": {"max": "", "min": ""},
                    "modifier": "",
                },
                "users": {"sortCategory": "postcount"},
                "lists": {"sortCategory": "follows"},
                "filter": "",
                "sort": 0,
                "randomizer": 0,
            },
            "useCache": true,
        })
    }

    /// Repack the raw record. Time values arrive in seconds and are reported
    /// in minutes; the base time labels map to their `_avg` counterparts as
    /// shown on the website.
    fn transform(data: &Value) -> FieldMap {
        let mut packed = FieldMap::new();
        for label in HOWLONGTOBEAT_LABELS {
            let avg_key = format!("{label}_avg");
            let raw = if AVG_TIME_LABELS.contains(label) {
                data.get(avg_key.as_str())
            } else {
                data.get(*label)
            };
            let value = match raw {
                Some(value) if label.starts_with("comp_") || label.starts_with("invested_") => {
                    value.as_i64().map(|secs| json!(secs / 60)).unwrap_or(Value::Null)
                }
                Some(value) => value.clone(),
                None => Value::Null,
            };
            packed.insert(label.to_string(), value);
        }
        packed
    }
}

impl Source for HowLongToBeat {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn valid_labels(&self) -> &'static [&'static str] {
        HOWLONGTOBEAT_LABELS
    }

    fn fetch(&self, identifier: &str, selected_labels: Option<&[&str]>) -> SourceResult {
        debug!(source = Self::NAME, game = identifier, "fetching completion times");

        let Some(token) = self.search_token() else {
            return fail(Self::NAME, "Failed to obtain search token.");
        };

        let Some(response) = self.search(identifier, &token) else {
            return fail(Self::NAME, "Failed to fetch data.");
        };

        let search_result: Value = match response.json() {
            Ok(value) => value,
            Err(_) => return fail(Self::NAME, "Failed to parse search response."),
        };

        if search_result.get("count").and_then(Value::as_i64) == Some(0) {
            return fail(Self::NAME, "Game is not found.");
        }

        let Some(first) = search_result
            .pointer("/data/0")
            .filter(|hit| hit.is_object())
            .cloned()
        else {
            return fail(Self::NAME, "Failed to parse search response.");
        };

        let Some(game_id) = first.get("game_id").and_then(Value::as_i64) else {
            return fail(Self::NAME, "No game ID in search result.");
        };

        let full = self.game_page(game_id).unwrap_or(first);
        let packed = Self::transform(&full);

        SourceResult::success(apply_label_filter(
            packed,
            selected_labels,
            Self::NAME,
            HOWLONGTOBEAT_LABELS,
        ))
    }
}
