//! The unified per-game record assembled from all sources.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

use super::coerce;
use crate::error::{GameInsightsError, Result};
use crate::sources::FieldMap;

/// Canonical column order for tabular output, matching declaration order of
/// the serialized fields.
pub const FIELD_ORDER: &[&str] = &[
    "steam_appid",
    "name",
    "developers",
    "publishers",
    "type",
    "is_free",
    "is_coming_soon",
    "recommendations",
    "price_currency",
    "price_initial",
    "price_final",
    "metacritic_score",
    "release_date",
    "days_since_release",
    "average_playtime",
    "copies_sold",
    "estimated_revenue",
    "owners",
    "followers",
    "early_access",
    "ccu",
    "active_player_24h",
    "peak_active_player_all_time",
    "monthly_active_player",
    "review_score",
    "review_score_desc",
    "total_positive",
    "total_negative",
    "total_reviews",
    "achievements_count",
    "achievements_percentage_average",
    "achievements_list",
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
    "count_playing",
    "count_retired",
    "languages",
    "platforms",
    "categories",
    "genres",
    "tags",
    "content_rating",
    "protondb_tier",
    "protondb_score",
    "protondb_trending",
    "protondb_confidence",
    "protondb_total",
];

/// Fields included in the reduced "recap" projection.
pub const RECAP_FIELDS: &[&str] = &[
    "steam_appid",
    "name",
    "developers",
    "publishers",
    "type",
    "release_date",
    "days_since_release",
    "price_currency",
    "price_initial",
    "price_final",
    "copies_sold",
    "estimated_revenue",
    "owners",
    "followers",
    "total_positive",
    "total_negative",
    "total_reviews",
    "comp_main",
    "comp_plus",
    "comp_100",
    "comp_all",
    "invested_co",
    "invested_mp",
    "average_playtime",
    "active_player_24h",
    "peak_active_player_all_time",
    "achievements_count",
    "achievements_percentage_average",
    "categories",
    "genres",
    "tags",
    "is_free",
    "protondb_tier",
    "early_access",
    "metacritic_score",
];

/// Complete game data merged from all sources.
///
/// `steam_appid` is the only required field; a null raw value coerces to an
/// empty string, which callers must treat as missing data. Everything else
/// defaults to absent/empty when the owning source did not contribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameData {
    pub steam_appid: String,
    pub name: Option<String>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub r#type: Option<String>,
    pub is_free: Option<bool>,
    pub is_coming_soon: Option<bool>,
    pub recommendations: Option<i64>,
    /// Working field from SteamSpy; not part of the serialized record.
    #[serde(skip_serializing)]
    pub discount: Option<f64>,
    pub price_currency: Option<String>,
    pub price_initial: Option<f64>,
    pub price_final: Option<f64>,
    pub metacritic_score: Option<i64>,
    pub release_date: Option<NaiveDateTime>,
    pub days_since_release: Option<i64>,
    /// Working field in hours; the serialized record carries
    /// `average_playtime` in seconds instead.
    #[serde(skip_serializing)]
    pub average_playtime_h: Option<f64>,
    pub average_playtime: Option<i64>,
    pub copies_sold: Option<i64>,
    pub estimated_revenue: Option<i64>,
    pub owners: Option<i64>,
    pub followers: Option<i64>,
    pub early_access: Option<bool>,
    pub ccu: Option<i64>,
    pub active_player_24h: Option<i64>,
    pub peak_active_player_all_time: Option<i64>,
    pub monthly_active_player: Vec<Value>,
    pub review_score: Option<i64>,
    pub review_score_desc: Option<String>,
    pub total_positive: Option<i64>,
    pub total_negative: Option<i64>,
    pub total_reviews: Option<i64>,
    pub achievements_count: Option<i64>,
    pub achievements_percentage_average: Option<f64>,
    pub achievements_list: Vec<Value>,
    pub comp_main: Option<i64>,
    pub comp_plus: Option<i64>,
    pub comp_100: Option<i64>,
    pub comp_all: Option<i64>,
    pub comp_main_count: Option<i64>,
    pub comp_plus_count: Option<i64>,
    pub comp_100_count: Option<i64>,
    pub comp_all_count: Option<i64>,
    pub invested_co: Option<i64>,
    pub invested_mp: Option<i64>,
    pub invested_co_count: Option<i64>,
    pub invested_mp_count: Option<i64>,
    pub count_comp: Option<i64>,
    pub count_speed_run: Option<i64>,
    pub count_backlog: Option<i64>,
    pub count_review: Option<i64>,
    pub count_playing: Option<i64>,
    pub count_retired: Option<i64>,
    pub languages: Vec<String>,
    pub platforms: Vec<String>,
    pub categories: Vec<String>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub content_rating: Vec<Value>,
    pub protondb_tier: Option<String>,
    pub protondb_score: Option<f64>,
    pub protondb_trending: Option<String>,
    pub protondb_confidence: Option<String>,
    pub protondb_total: Option<i64>,
}

impl GameData {
    /// Build a validated record from the raw accumulator map.
    ///
    /// The only hard requirement is the presence of the `steam_appid` key;
    /// every other field is coerced leniently, with invalid values treated
    /// as absent.
    pub fn from_raw(raw: &FieldMap) -> Result<Self> {
        let appid = raw
            .get("steam_appid")
            .ok_or_else(|| GameInsightsError::invalid_request("missing required field 'steam_appid'"))?;

        let mut data = GameData {
            steam_appid: coerce::required_string(appid),
            ..Default::default()
        };

        data.name = coerce::optional_string(raw.get("name"));
        data.developers = coerce::string_list(raw.get("developers"));
        data.publishers = coerce::string_list(raw.get("publishers"));
        data.r#type = coerce::optional_string(raw.get("type"));
        data.is_free = coerce::optional_bool(raw.get("is_free"));
        data.is_coming_soon = coerce::optional_bool(raw.get("is_coming_soon"));
        data.recommendations = coerce::optional_i64(raw.get("recommendations"));
        data.discount = coerce::optional_f64(raw.get("discount"));
        data.price_currency = coerce::optional_string(raw.get("price_currency"));
        data.price_initial = coerce::optional_f64(raw.get("price_initial"));
        data.price_final = coerce::optional_f64(raw.get("price_final"));
        data.metacritic_score = coerce::optional_i64(raw.get("metacritic_score"));
        data.release_date = coerce::release_date(raw.get("release_date"));
        data.average_playtime_h = coerce::optional_f64(raw.get("average_playtime_h"));
        data.copies_sold = coerce::optional_i64(raw.get("copies_sold"));
        data.estimated_revenue = coerce::optional_i64(raw.get("estimated_revenue"));
        data.owners = coerce::optional_i64(raw.get("owners"));
        data.followers = coerce::optional_i64(raw.get("followers"));
        data.early_access = coerce::optional_bool(raw.get("early_access"));
        data.ccu = coerce::optional_i64(raw.get("ccu"));
        data.active_player_24h = coerce::optional_i64(raw.get("active_player_24h"));
        data.peak_active_player_all_time =
            coerce::optional_i64(raw.get("peak_active_player_all_time"));
        data.monthly_active_player = coerce::value_list(raw.get("monthly_active_player"));
        data.review_score = coerce::optional_i64(raw.get("review_score"));
        data.review_score_desc = coerce::optional_string(raw.get("review_score_desc"));
        data.total_positive = coerce::optional_i64(raw.get("total_positive"));
        data.total_negative = coerce::optional_i64(raw.get("total_negative"));
        data.total_reviews = coerce::optional_i64(raw.get("total_reviews"));
        data.achievements_count = coerce::optional_i64(raw.get("achievements_count"));
        data.achievements_percentage_average =
            coerce::optional_f64(raw.get("achievements_percentage_average"));
        data.achievements_list = coerce::value_list(raw.get("achievements_list"));
        data.comp_main = coerce::optional_i64(raw.get("comp_main"));
        data.comp_plus = coerce::optional_i64(raw.get("comp_plus"));
        data.comp_100 = coerce::optional_i64(raw.get("comp_100"));
        data.comp_all = coerce::optional_i64(raw.get("comp_all"));
        data.comp_main_count = coerce::optional_i64(raw.get("comp_main_count"));
        data.comp_plus_count = coerce::optional_i64(raw.get("comp_plus_count"));
        data.comp_100_count = coerce::optional_i64(raw.get("comp_100_count"));
        data.comp_all_count = coerce::optional_i64(raw.get("comp_all_count"));
        data.invested_co = coerce::optional_i64(raw.get("invested_co"));
        data.invested_mp = coerce::optional_i64(raw.get("invested_mp"));
        data.invested_co_count = coerce::optional_i64(raw.get("invested_co_count"));
        data.invested_mp_count = coerce::optional_i64(raw.get("invested_mp_count"));
        data.count_comp = coerce::optional_i64(raw.get("count_comp"));
        data.count_speed_run = coerce::optional_i64(raw.get("count_speed_run"));
        data.count_backlog = coerce::optional_i64(raw.get("count_backlog"));
        data.count_review = coerce::optional_i64(raw.get("count_review"));
        data.count_playing = coerce::optional_i64(raw.get("count_playing"));
        data.count_retired = coerce::optional_i64(raw.get("count_retired"));
        data.languages = coerce::string_list(raw.get("languages"));
        data.platforms = coerce::string_list(raw.get("platforms"));
        data.categories = coerce::string_list(raw.get("categories"));
        data.genres = coerce::string_list(raw.get("genres"));
        data.tags = coerce::string_list(raw.get("tags"));
        data.content_rating = coerce::value_list(raw.get("content_rating"));
        data.protondb_tier = coerce::optional_string(raw.get("protondb_tier"));
        data.protondb_score = coerce::optional_f64(raw.get("protondb_score"));
        data.protondb_trending = coerce::optional_string(raw.get("protondb_trending"));
        data.protondb_confidence = coerce::optional_string(raw.get("protondb_confidence"));
        data.protondb_total = coerce::optional_i64(raw.get("protondb_total"));

        data.compute_average_playtime();
        data.compute_days_since_release();

        Ok(data)
    }

    fn compute_average_playtime(&mut self) {
        if let Some(hours) = self.average_playtime_h {
            self.average_playtime = Some((hours * 3600.0) as i64);
        }
    }

    fn compute_days_since_release(&mut self) {
        if let Some(released) = self.release_date {
            let days = Local::now()
                .naive_local()
                .signed_duration_since(released)
                .num_days();
            self.days_since_release = Some(days);
        }
    }

    /// Serialize the full record. Dates render as ISO 8601 strings and all
    /// numbers are finite, so the result is always JSON-representable.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn to_json_map(&self) -> Result<Map<String, Value>> {
        match self.to_json()? {
            Value::Object(map) => Ok(map),
            other => Err(GameInsightsError::general(format!(
                "expected object serialization for GameData, got {other}"
            ))),
        }
    }

    /// Reduced projection carrying only [`RECAP_FIELDS`].
    pub fn recap(&self) -> Result<Map<String, Value>> {
        let full = self.to_json_map()?;
        Ok(RECAP_FIELDS
            .iter()
            .filter_map(|field| full.get(*field).map(|value| (field.to_string(), value.clone())))
            .collect())
    }
}
