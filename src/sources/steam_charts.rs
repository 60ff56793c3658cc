//! SteamCharts source.
//!
//! Active-player numbers scraped from the steamcharts.com app page. The page
//! carries three headline "app-stat" blocks (playing now, 24-hour peak,
//! all-time peak) and a month-by-month table of average and peak players.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use tracing::debug;

use super::context::{RequestSpec, SourceContext, Transport};
use super::{apply_label_filter, fail, FieldMap, Source, SourceResult};

const STEAMCHARTS_LABELS: &[&str] = &[
    "steam_appid",
    "name",
    "active_player_24h",
    "peak_active_player_all_time",
    "monthly_active_player",
];

static APP_TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<h1 id="app-title"[^>]*><a[^>]*>(.*?)</a>"#).expect("valid regex")
});
static APP_STAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<div class="app-stat">.*?<span class="num">([^<]*)</span>"#)
        .expect("valid regex")
});
static TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<table class="common-table">.*?<tbody>(.*?)</tbody>"#).expect("valid regex")
});
static ROW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<tr[^>]*>(.*?)</tr>").expect("valid regex"));
static CELL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<td[^>]*>(.*?)</td>").expect("valid regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Player-count data scraped from SteamCharts.
pub struct SteamCharts {
    ctx: SourceContext,
}

impl SteamCharts {
    pub const NAME: &'static str = "SteamCharts";
    const BASE_URL: &'static str = "https://steamcharts.com/app";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            ctx: SourceContext::new(transport),
        }
    }

    fn strip_tags(fragment: &str) -> String {
        TAG_RE.replace_all(fragment, "").trim().to_string()
    }

    fn parse_int(text: &str) -> Option<i64> {
        text.replace(',', "").trim().parse::<i64>().ok()
    }

    fn parse_float(text: &str) -> Option<f64> {
        text.replace(',', "").trim().parse::<f64>().ok()
    }

    /// Extract the declared labels out of the raw page HTML.
    fn parse_page(html: &str, appid: &str) -> Result<FieldMap, String> {
        let name = APP_TITLE_RE
            .captures(html)
            .map(|c| Self::strip_tags(&c[1]))
            .filter(|name| !name.is_empty())
            .ok_or_else(|| "Failed to parse data, game name is not found.".to_string())?;

        let stats: Vec<&str> = APP_STAT_RE
            .captures_iter(html)
            .map(|c| c.get(1).map_or("", |m| m.as_str()))
            .collect();
        if stats.len() < 3 {
            return Err("Failed to parse data, expecting atleast 3 'app-stat' divs.".to_string());
        }
        // stats[0] is "playing now"; the headline labels come from the
        // 24-hour and all-time peaks.
        let peak_24h = Self::parse_int(stats[1]);
        let peak_all_time = Self::parse_int(stats[2]);
        if peak_24h.is_none() || peak_all_time.is_none() {
            return Err("Failed to parse data, incorrect app-stat structure.".to_string());
        }

        let table = TABLE_RE
            .captures(html)
            .map(|c| c[1].to_string())
            .ok_or_else(|| "Failed to parse data, active player data table is not found.".to_string())?;

        let mut monthly: Vec<Value> = Vec::new();
        for row in ROW_RE.captures_iter(&table) {
            let cells: Vec<String> = CELL_RE
                .captures_iter(row.get(1).map_or("", |m| m.as_str()))
                .map(|c| Self::strip_tags(c.get(1).map_or("", |m| m.as_str())))
                .collect();
            if cells.len() != 5 {
                return Err(
                    "Failed to parse data, the structure of player data table is incorrect."
                        .to_string(),
                );
            }
            monthly.push(json!({
                "month": cells[0],
                "average_players": Self::parse_float(&cells[1]),
                "gain": Self::parse_float(&cells[2]),
                "percentage_gain": cells[3],
                "peak_players": Self::parse_int(&cells[4]),
            }));
        }

        let mut packed = FieldMap::new();
        packed.insert("steam_appid".to_string(), json!(appid));
        packed.insert("name".to_string(), json!(name));
        packed.insert("active_player_24h".to_string(), json!(peak_24h));
        packed.insert("peak_active_player_all_time".to_string(), json!(peak_all_time));
        packed.insert("monthly_active_player".to_string(), Value::Array(monthly));
        Ok(packed)
    }
}

impl Source for SteamCharts {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn valid_labels(&self) -> &'static [&'static str] {
        STEAMCHARTS_LABELS
    }

    fn fetch(&self, identifier: &str, selected_labels: Option<&[&str]>) -> SourceResult {
        debug!(source = Self::NAME, appid = identifier, "fetching active player data");

        let spec = RequestSpec::get(format!("{}/{identifier}", Self::BASE_URL));
        let response = self.ctx.request(&spec);
        if response.status != 200 {
            return fail(
                Self::NAME,
                format!("Failed to fetch data with status code: {}", response.status),
            );
        }

        let packed = match Self::parse_page(&response.body, identifier) {
            Ok(packed) => packed,
            Err(message) => return fail(Self::NAME, message),
        };

        SourceResult::success(apply_label_filter(
            packed,
            selected_labels,
            Self::NAME,
            STEAMCHARTS_LABELS,
        ))
    }
}
