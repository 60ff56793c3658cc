//! Steam review source.
//!
//! Review score summaries from the public appreviews endpoint. The trait
//! `fetch` pulls the summary only (`num_per_page=0`); [`SteamReview::fetch_reviews`]
//! pulls the review texts themselves for the review-listing flow.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::context::{RequestSpec, SourceContext, Transport};
use super::{apply_label_filter, fail, FieldMap, Source, SourceResult};

const STEAMREVIEW_LABELS: &[&str] = &[
    "steam_appid",
    "review_score",
    "review_score_desc",
    "total_positive",
    "total_negative",
    "total_reviews",
];

const SUMMARY_FIELDS: &[&str] = &[
    "review_score",
    "review_score_desc",
    "total_positive",
    "total_negative",
    "total_reviews",
];

/// Query knobs for the full-review listing.
#[derive(Debug, Clone)]
pub struct ReviewQuery {
    pub filter: String,
    pub language: String,
    pub review_type: String,
    pub purchase_type: String,
}

impl Default for ReviewQuery {
    fn default() -> Self {
        Self {
            filter: "all".to_string(),
            language: "all".to_string(),
            review_type: "all".to_string(),
            purchase_type: "all".to_string(),
        }
    }
}

/// Review score data from the Steam appreviews API.
pub struct SteamReview {
    ctx: SourceContext,
}

impl SteamReview {
    pub const NAME: &'static str = "SteamReview";
    const BASE_URL: &'static str = "https://store.steampowered.com/appreviews";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            ctx: SourceContext::new(transport),
        }
    }

    fn request(&self, appid: &str, query: &ReviewQuery, num_per_page: u32) -> RequestSpec {
        RequestSpec::get(format!("{}/{appid}", Self::BASE_URL))
            .query("json", "1")
            .query("filter", &query.filter)
            .query("language", &query.language)
            .query("review_type", &query.review_type)
            .query("purchase_type", &query.purchase_type)
            .query("num_per_page", num_per_page.to_string())
    }

    fn parse_body(&self, response: super::RawResponse, appid: &str) -> Result<Value, SourceResult> {
        if response.status != 200 {
            return Err(fail(
                Self::NAME,
                format!("Failed to fetch data with status code: {}", response.status),
            ));
        }
        let body: Value = match response.json() {
            Ok(value) => value,
            Err(_) => {
                return Err(fail(
                    Self::NAME,
                    format!("Failed to parse SteamReview response for appid {appid}."),
                ))
            }
        };
        if body.get("success").and_then(Value::as_i64) != Some(1) {
            return Err(fail(
                Self::NAME,
                format!("Failed to fetch review data for appid {appid}."),
            ));
        }
        Ok(body)
    }

    fn summary_fields(body: &Value) -> FieldMap {
        let mut packed = FieldMap::new();
        for label in SUMMARY_FIELDS {
            packed.insert(
                label.to_string(),
                body.pointer(&format!("/query_summary/{label}"))
                    .cloned()
                    .unwrap_or(Value::Null),
            );
        }
        packed
    }

    /// Fetch the full review payload: the review list plus the summary
    /// fields, in one map.
    pub fn fetch_reviews(&self, appid: &str, query: &ReviewQuery) -> SourceResult {
        debug!(source = Self::NAME, appid, "fetching review listing");

        let response = self.ctx.request(&self.request(appid, query, 100));
        let body = match self.parse_body(response, appid) {
            Ok(body) => body,
            Err(failure) => return failure,
        };

        let mut packed = Self::summary_fields(&body);
        packed.insert("steam_appid".to_string(), json!(appid));
        packed.insert(
            "reviews".to_string(),
            body.get("reviews").cloned().unwrap_or_else(|| json!([])),
        );
        SourceResult::success(packed)
    }
}

impl Source for SteamReview {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn valid_labels(&self) -> &'static [&'static str] {
        STEAMREVIEW_LABELS
    }

    fn fetch(&self, identifier: &str, selected_labels: Option<&[&str]>) -> SourceResult {
        debug!(source = Self::NAME, appid = identifier, "fetching review summary");

        let response = self
            .ctx
            .request(&self.request(identifier, &ReviewQuery::default(), 0));
        let body = match self.parse_body(response, identifier) {
            Ok(body) => body,
            Err(failure) => return failure,
        };

        let mut packed = Self::summary_fields(&body);
        packed.insert("steam_appid".to_string(), json!(identifier));
        SourceResult::success(apply_label_filter(
            packed,
            selected_labels,
            Self::NAME,
            STEAMREVIEW_LABELS,
        ))
    }
}
