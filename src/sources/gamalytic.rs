//! Gamalytic source.
//!
//! Sales estimates, playtime and audience stats from the Gamalytic game API.
//! An API key is optional; without one the public (rate-limited) endpoint is
//! used.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::context::{RequestSpec, SourceContext, Transport};
use super::{apply_label_filter, fail, FieldMap, Source, SourceResult};

const GAMALYTIC_LABELS: &[&str] = &[
    "steam_appid",
    "name",
    "average_playtime_h",
    "copies_sold",
    "estimated_revenue",
    "owners",
    "languages",
    "followers",
    "early_access",
];

/// Sales and audience estimates from Gamalytic.
pub struct Gamalytic {
    ctx: SourceContext,
    api_key: Option<String>,
}

impl Gamalytic {
    pub const NAME: &'static str = "Gamalytic";
    const BASE_URL: &'static str = "https://api.gamalytic.com/game";

    pub fn new(transport: Arc<dyn Transport>, api_key: Option<String>) -> Self {
        Self {
            ctx: SourceContext::new(transport),
            api_key,
        }
    }

    fn transform(data: &Value, appid: &str) -> FieldMap {
        let mut packed = FieldMap::new();
        packed.insert(
            "steam_appid".to_string(),
            data.get("steamId")
                .cloned()
                .unwrap_or_else(|| Value::String(appid.to_string())),
        );
        let mappings = [
            ("name", "name"),
            ("average_playtime_h", "avgPlaytime"),
            ("copies_sold", "copiesSold"),
            ("estimated_revenue", "revenue"),
            ("owners", "owners"),
            ("languages", "languages"),
            ("followers", "followers"),
            ("early_access", "earlyAccess"),
        ];
        for (label, key) in mappings {
            packed.insert(label.to_string(), data.get(key).cloned().unwrap_or(Value::Null));
        }
        packed
    }
}

impl Source for Gamalytic {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn valid_labels(&self) -> &'static [&'static str] {
        GAMALYTIC_LABELS
    }

    fn fetch(&self, identifier: &str, selected_labels: Option<&[&str]>) -> SourceResult {
        debug!(source = Self::NAME, appid = identifier, "fetching sales estimates");

        let mut spec = RequestSpec::get(format!("{}/{identifier}", Self::BASE_URL));
        if let Some(key) = &self.api_key {
            spec = spec.header("api-key", key);
        }

        let response = self.ctx.request(&spec);
        if response.status == 404 {
            return fail(
                Self::NAME,
                format!("Game with appid {identifier} is not found."),
            );
        }
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
                    format!("Failed to parse Gamalytic response for appid {identifier}."),
                )
            }
        };

        let packed = Self::transform(&data, identifier);
        SourceResult::success(apply_label_filter(
            packed,
            selected_labels,
            Self::NAME,
            GAMALYTIC_LABELS,
        ))
    }
}
