//! Steam user source.
//!
//! Player profiles and owned-game libraries from the Steam Web API. This is
//! the primary source for the user-data flow: an empty players list is the
//! authoritative "steamid does not exist" signal. Requires a Steam API key.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::context::{RequestSpec, SourceContext, Transport};
use super::{apply_label_filter, fail, FieldMap, Source, SourceResult};

const STEAMUSER_LABELS: &[&str] = &[
    "steamid",
    "persona_name",
    "profile_url",
    "real_name",
    "country_code",
    "time_created",
    "last_logoff",
    "profile_public",
    "game_count",
    "games",
];

/// Player profile and library data from the Steam Web API.
pub struct SteamUser {
    ctx: SourceContext,
    api_key: Option<String>,
}

impl SteamUser {
    pub const NAME: &'static str = "SteamUser";
    const SUMMARIES_URL: &'static str =
        "https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/";
    const OWNED_GAMES_URL: &'static str =
        "https://api.steampowered.com/IPlayerService/GetOwnedGames/v0001/";

    pub fn new(transport: Arc<dyn Transport>, api_key: Option<String>) -> Self {
        Self {
            ctx: SourceContext::new(transport),
            api_key,
        }
    }

    /// Fetch profile plus owned games for one steamid.
    pub fn fetch_user(&self, steamid: &str, include_free_games: bool) -> SourceResult {
        debug!(source = Self::NAME, steamid, "fetching user profile");

        let Some(key) = &self.api_key else {
            return fail(Self::NAME, "Failed to fetch data, Steam API key is required.");
        };

        let spec = RequestSpec::get(Self::SUMMARIES_URL)
            .query("key", key)
            .query("steamids", steamid);
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
                    format!("Failed to parse SteamUser response for steamid {steamid}."),
                )
            }
        };

        let Some(player) = body
            .pointer("/response/players")
            .and_then(Value::as_array)
            .and_then(|players| players.first())
        else {
            return fail(Self::NAME, format!("steamid {steamid} not found."));
        };

        let mut packed = FieldMap::new();
        packed.insert("steamid".to_string(), json!(steamid));
        let mappings = [
            ("persona_name", "personaname"),
            ("profile_url", "profileurl"),
            ("real_name", "realname"),
            ("country_code", "loccountrycode"),
            ("time_created", "timecreated"),
            ("last_logoff", "lastlogoff"),
        ];
        for (label, key) in mappings {
            packed.insert(label.to_string(), player.get(key).cloned().unwrap_or(Value::Null));
        }
        // Visibility state 3 is a public profile.
        packed.insert(
            "profile_public".to_string(),
            player
                .get("communityvisibilitystate")
                .and_then(Value::as_i64)
                .map(|state| json!(state == 3))
                .unwrap_or(Value::Null),
        );

        let (game_count, games) = self.fetch_owned_games(key, steamid, include_free_games);
        packed.insert("game_count".to_string(), game_count);
        packed.insert("games".to_string(), games);

        SourceResult::success(packed)
    }

    /// Owned games, best-effort: a private or failing library yields nulls
    /// rather than failing the whole user fetch.
    fn fetch_owned_games(&self, key: &str, steamid: &str, include_free_games: bool) -> (Value, Value) {
        let spec = RequestSpec::get(Self::OWNED_GAMES_URL)
            .query("key", key)
            .query("steamid", steamid)
            .query("include_appinfo", "1")
            .query(
                "include_played_free_games",
                if include_free_games { "1" } else { "0" },
            )
            .query("format", "json");
        let response = self.ctx.request(&spec);
        if response.status != 200 {
            return (Value::Null, json!([]));
        }
        let Ok(body) = response.json() else {
            return (Value::Null, json!([]));
        };
        let game_count = body.pointer("/response/game_count").cloned().unwrap_or(Value::Null);
        let games = body
            .pointer("/response/games")
            .and_then(Value::as_array)
            .map(|games| {
                Value::Array(
                    games
                        .iter()
                        .map(|game| {
                            json!({
                                "appid": game.get("appid").cloned().unwrap_or(Value::Null),
                                "name": game.get("name").cloned().unwrap_or(Value::Null),
                                "playtime_forever": game
                                    .get("playtime_forever")
                                    .cloned()
                                    .unwrap_or(Value::Null),
                            })
                        })
                        .collect(),
                )
            })
            .unwrap_or_else(|| json!([]));
        (game_count, games)
    }
}

impl Source for SteamUser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn valid_labels(&self) -> &'static [&'static str] {
        STEAMUSER_LABELS
    }

    fn fetch(&self, identifier: &str, selected_labels: Option<&[&str]>) -> SourceResult {
        match self.fetch_user(identifier, true) {
            SourceResult::Success { data } => SourceResult::success(apply_label_filter(
                data,
                selected_labels,
                Self::NAME,
                STEAMUSER_LABELS,
            )),
            failure => failure,
        }
    }
}
