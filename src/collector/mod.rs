//! The collector: multi-source fetch orchestration.
//!
//! One `Collector` owns a connection pool, the nine source instances, and
//! their static bindings (which output fields each source is authoritative
//! for, and which source is primary). Per identifier it fans out to the
//! id-keyed sources in declaration order, merges successful field subsets
//! into one accumulator, then runs the name-keyed sources against the name
//! the primary source produced. Batches iterate identifiers strictly in
//! input order.
//!
//! Failure policy is caller-selected: under [`FailureMode::Absorb`] (the
//! default) every source failure is recorded and skipped, and callers get a
//! best-effort merged record; under [`FailureMode::Propagate`] a primary
//! source failure is classified and returned as a typed error immediately.
//!
//! Thread safety: a `Collector` is not thread-safe and must not be shared
//! across threads. Concurrent callers own independent collectors, each with
//! its own pool.

pub mod classify;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

use crate::error::{GameInsightsError, Result};
use crate::model::GameData;
use crate::sources::{
    ConnectionPool, FieldMap, Gamalytic, HowLongToBeat, ProtonDb, ReviewQuery, Source,
    SourceResult, SteamAchievements, SteamCharts, SteamReview, SteamSpy, SteamStore, SteamUser,
    Transport,
};
use crate::utils::{MetricsCollector, RateLimiter};

pub use classify::classify_source_error;

const STEAMSTORE_FIELDS: &[&str] = &[
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

const GAMALYTIC_FIELDS: &[&str] = &[
    "average_playtime_h",
    "copies_sold",
    "estimated_revenue",
    "owners",
    "languages",
    "followers",
    "early_access",
];

const STEAMSPY_FIELDS: &[&str] = &["ccu", "tags", "discount"];

const STEAMCHARTS_FIELDS: &[&str] = &[
    "active_player_24h",
    "peak_active_player_all_time",
    "monthly_active_player",
];

const STEAMREVIEW_FIELDS: &[&str] = &[
    "review_score",
    "review_score_desc",
    "total_positive",
    "total_negative",
    "total_reviews",
];

const STEAMACHIEVEMENTS_FIELDS: &[&str] = &[
    "achievements_count",
    "achievements_percentage_average",
    "achievements_list",
];

const PROTONDB_FIELDS: &[&str] = &[
    "protondb_tier",
    "protondb_score",
    "protondb_trending",
    "protondb_confidence",
    "protondb_total",
];

// The review_score entry intentionally shadows SteamReview's value when the
// name-keyed pass succeeds.
const HOWLONGTOBEAT_FIELDS: &[&str] = &[
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

/// Collector construction parameters.
#[derive(Debug, Clone)]
pub struct CollectorOptions {
    pub region: String,
    pub language: String,
    pub steam_api_key: Option<String>,
    pub gamalytic_api_key: Option<String>,
    /// Collector-level rate limit: `calls` per `period`.
    pub calls: u32,
    pub period: Duration,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            region: "us".to_string(),
            language: "english".to_string(),
            steam_api_key: None,
            gamalytic_api_key: None,
            calls: 60,
            period: Duration::from_secs(60),
        }
    }
}

/// Whether source failures surface as typed errors or are recorded and
/// skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Record failures and return best-effort partial data (the default).
    #[default]
    Absorb,
    /// Classify and return the primary source's failure immediately.
    Propagate,
}

/// Per-call options for the game-data batch methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Return the reduced recap projection instead of the full record.
    pub recap: bool,
    pub mode: FailureMode,
}

/// Which lookup key a source call used; carried in logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Id,
    Name,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Id => "id",
            Scope::Name => "name",
        }
    }
}

/// Result of fetching data for a single identifier within a batch.
/// Exactly one of `data`/`error` is set, per `success`.
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    pub identifier: String,
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn success(identifier: impl Into<String>, data: Value) -> Self {
        Self {
            identifier: identifier.into(),
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(identifier: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Static association of one source with the output fields it is
/// authoritative for. Constructed once at collector initialization; the
/// binding list's shape never changes afterwards.
pub struct SourceBinding {
    pub source: Box<dyn Source>,
    pub fields: Vec<String>,
    pub is_primary: bool,
}

impl SourceBinding {
    pub fn new(source: Box<dyn Source>, fields: &[&str]) -> Self {
        Self {
            source,
            fields: fields.iter().map(|f| f.to_string()).collect(),
            is_primary: false,
        }
    }

    pub fn primary(source: Box<dyn Source>, fields: &[&str]) -> Self {
        Self {
            is_primary: true,
            ..Self::new(source, fields)
        }
    }
}

/// Classify a source failure, downgrading supplementary not-found.
///
/// `is_primary` marks the authoritative existence check (SteamStore for
/// games, SteamUser for user data). A supplementary source failing with
/// "not found" never implies the entity doesn't exist; it is re-classified
/// as unavailable regardless of its raw text.
pub fn classify_fetch_failure(
    source_name: &str,
    error_message: &str,
    is_primary: bool,
) -> GameInsightsError {
    let classified = classify_source_error(source_name, error_message);
    if !is_primary {
        if let GameInsightsError::NotFound { .. } = classified {
            return GameInsightsError::source_unavailable(source_name, error_message);
        }
    }
    classified
}

/// Multi-source game data collector.
pub struct Collector {
    options: CollectorOptions,
    transport: Option<Arc<dyn Transport>>,
    id_sources: Vec<SourceBinding>,
    name_sources: Vec<SourceBinding>,
    metrics: MetricsCollector,
    limiter: RefCell<RateLimiter>,
    closed: bool,
}

impl Collector {
    /// Build a collector with its own connection pool and the nine standard
    /// sources.
    pub fn new(options: CollectorOptions) -> Result<Self> {
        let pool: Arc<dyn Transport> = Arc::new(ConnectionPool::new()?);
        Ok(Self::with_transport(options, pool))
    }

    /// Build the standard sources over the given transport. This is also the
    /// seam integration tests use to substitute a canned transport.
    pub fn with_transport(options: CollectorOptions, transport: Arc<dyn Transport>) -> Self {
        let (id_sources, name_sources) = Self::build_bindings(&options, &transport);
        Self {
            limiter: RefCell::new(RateLimiter::new(options.calls, options.period)),
            options,
            transport: Some(transport),
            id_sources,
            name_sources,
            metrics: MetricsCollector::from_env(),
            closed: false,
        }
    }

    /// Build a collector over arbitrary bindings. This is the seam unit
    /// tests use to substitute mock sources; the review/user flows are
    /// unavailable without a transport.
    pub fn with_sources(
        options: CollectorOptions,
        id_sources: Vec<SourceBinding>,
        name_sources: Vec<SourceBinding>,
    ) -> Self {
        debug_assert!(
            id_sources.iter().filter(|b| b.is_primary).count() <= 1,
            "at most one primary id-keyed source"
        );
        Self {
            limiter: RefCell::new(RateLimiter::new(options.calls, options.period)),
            options,
            transport: None,
            id_sources,
            name_sources,
            metrics: MetricsCollector::from_env(),
            closed: false,
        }
    }

    /// Replace the metrics collector (builder-style, used by tests to force
    /// recording on).
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    fn build_bindings(
        options: &CollectorOptions,
        transport: &Arc<dyn Transport>,
    ) -> (Vec<SourceBinding>, Vec<SourceBinding>) {
        let id_sources = vec![
            SourceBinding::primary(
                Box::new(SteamStore::new(
                    transport.clone(),
                    options.region.clone(),
                    options.language.clone(),
                    options.steam_api_key.clone(),
                )),
                STEAMSTORE_FIELDS,
            ),
            SourceBinding::new(
                Box::new(Gamalytic::new(
                    transport.clone(),
                    options.gamalytic_api_key.clone(),
                )),
                GAMALYTIC_FIELDS,
            ),
            SourceBinding::new(Box::new(SteamSpy::new(transport.clone())), STEAMSPY_FIELDS),
            SourceBinding::new(
                Box::new(SteamCharts::new(transport.clone())),
                STEAMCHARTS_FIELDS,
            ),
            SourceBinding::new(
                Box::new(SteamReview::new(transport.clone())),
                STEAMREVIEW_FIELDS,
            ),
            SourceBinding::new(
                Box::new(SteamAchievements::new(
                    transport.clone(),
                    options.steam_api_key.clone(),
                )),
                STEAMACHIEVEMENTS_FIELDS,
            ),
            SourceBinding::new(Box::new(ProtonDb::new(transport.clone())), PROTONDB_FIELDS),
        ];
        let name_sources = vec![SourceBinding::new(
            Box::new(HowLongToBeat::new(transport.clone())),
            HOWLONGTOBEAT_FIELDS,
        )];
        (id_sources, name_sources)
    }

    /// Rebuild the source instances after a configuration change. The
    /// binding shape (order, fields, primary flag) is identical; only the
    /// sources' settings differ.
    fn rebuild_sources(&mut self) {
        if let Some(transport) = &self.transport {
            let (id_sources, name_sources) = Self::build_bindings(&self.options, transport);
            self.id_sources = id_sources;
            self.name_sources = name_sources;
        }
        self.limiter
            .borrow_mut()
            .reconfigure(self.options.calls, self.options.period);
    }

    pub fn options(&self) -> &CollectorOptions {
        &self.options
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn id_sources(&self) -> &[SourceBinding] {
        &self.id_sources
    }

    pub fn name_sources(&self) -> &[SourceBinding] {
        &self.name_sources
    }

    pub fn set_region(&mut self, region: impl Into<String>) {
        let region = region.into();
        if self.options.region != region {
            self.options.region = region;
            self.rebuild_sources();
        }
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        let language = language.into();
        if self.options.language != language {
            self.options.language = language;
            self.rebuild_sources();
        }
    }

    pub fn set_steam_api_key(&mut self, api_key: Option<String>) {
        if self.options.steam_api_key != api_key {
            self.options.steam_api_key = api_key;
            self.rebuild_sources();
        }
    }

    pub fn set_gamalytic_api_key(&mut self, api_key: Option<String>) {
        if self.options.gamalytic_api_key != api_key {
            self.options.gamalytic_api_key = api_key;
            self.rebuild_sources();
        }
    }

    /// Keep only the id-keyed sources whose name matches one of `names`
    /// (case-insensitive). Used by the CLI's `--source` filter.
    pub fn retain_id_sources(&mut self, names: &[&str]) {
        self.id_sources.retain(|binding| {
            names
                .iter()
                .any(|name| name.eq_ignore_ascii_case(binding.source.name()))
        });
    }

    /// Release the shared connection pool. Idempotent: calling this again
    /// has no effect after the first call.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            debug!("collector closed, connection pool released");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn source_by_name(&self, name: &str) -> Option<&dyn Source> {
        self.id_sources
            .iter()
            .map(|binding| binding.source.as_ref())
            .find(|source| source.name() == name)
    }

    fn transport(&self) -> Result<&Arc<dyn Transport>> {
        self.transport.as_ref().ok_or_else(|| {
            GameInsightsError::general("Collector was built without a transport.")
        })
    }

    /// Wrap one source call with timing, counters, and start/complete
    /// events. Side-effect only: the result passes through unchanged.
    fn fetch_with_observability(
        &self,
        source: &dyn Source,
        identifier: &str,
        scope: Scope,
        selected_labels: Option<&[&str]>,
    ) -> SourceResult {
        let source_name = source.name();
        let scope_name = scope.as_str();
        let tags = [("source", source_name), ("scope", scope_name)];

        debug!(
            source = source_name,
            scope = scope_name,
            identifier,
            "source_fetch_start"
        );

        let timer = self.metrics.timer("source_fetch_duration_seconds", &tags);
        let result = source.fetch(identifier, selected_labels);
        let duration_ms = timer.observe().as_secs_f64() * 1000.0;

        self.metrics.counter("source_fetch_total", &tags);
        if result.is_success() {
            self.metrics.counter("source_fetch_success_total", &tags);
        } else {
            self.metrics.counter("source_fetch_error_total", &tags);
        }

        debug!(
            source = source_name,
            scope = scope_name,
            identifier,
            success = result.is_success(),
            duration_ms,
            "source_fetch_complete"
        );

        result
    }

    /// Fetch and merge data from all sources for one appid.
    ///
    /// The accumulator is seeded with the identifier and updated in place as
    /// each source succeeds; partial failures are never rolled back. When
    /// the primary source produced a non-empty name, the name-keyed sources
    /// run with that name as the lookup key; otherwise they are skipped
    /// entirely.
    pub fn fetch_raw_data(&self, steam_appid: &str, mode: FailureMode) -> Result<GameData> {
        self.limiter.borrow_mut().acquire();

        let mut raw: FieldMap = FieldMap::new();
        raw.insert("steam_appid".to_string(), json!(steam_appid));

        for binding in &self.id_sources {
            let result =
                self.fetch_with_observability(binding.source.as_ref(), steam_appid, Scope::Id, None);
            match result {
                SourceResult::Success { data } => {
                    for field in &binding.fields {
                        if let Some(value) = data.get(field) {
                            raw.insert(field.clone(), value.clone());
                        }
                    }
                }
                SourceResult::Failure { error } => {
                    if mode == FailureMode::Propagate && binding.is_primary {
                        return Err(classify_fetch_failure(
                            binding.source.name(),
                            &error,
                            true,
                        ));
                    }
                    // Supplementary failure (or absorb mode): the source
                    // already logged; the accumulator simply lacks its
                    // fields.
                }
            }
        }

        // No name from the primary source means the name-keyed sources have
        // nothing to look up.
        let game_name = raw
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        if let Some(game_name) = game_name {
            for binding in &self.name_sources {
                let result = self.fetch_with_observability(
                    binding.source.as_ref(),
                    &game_name,
                    Scope::Name,
                    None,
                );
                if let SourceResult::Success { data } = result {
                    for field in &binding.fields {
                        if let Some(value) = data.get(field) {
                            raw.insert(field.clone(), value.clone());
                        }
                    }
                }
            }
        }

        GameData::from_raw(&raw)
    }

    fn collect_games(
        &self,
        steam_appids: &[String],
        options: &FetchOptions,
    ) -> Result<(Vec<Value>, Vec<FetchOutcome>)> {
        if options.mode == FailureMode::Propagate && steam_appids.is_empty() {
            return Err(GameInsightsError::invalid_request(
                "steam_appids must be a non-empty list.",
            ));
        }

        let total = steam_appids.len();
        let mut records: Vec<Value> = Vec::with_capacity(total);
        let mut outcomes: Vec<FetchOutcome> = Vec::with_capacity(total);

        for (idx, appid) in steam_appids.iter().enumerate() {
            info!(
                "Fetching {} of {total} game data: steam appid {appid}..",
                idx + 1
            );
            match self.fetch_raw_data(appid, options.mode).and_then(|game| {
                if options.recap {
                    game.recap().map(Value::Object)
                } else {
                    game.to_json()
                }
            }) {
                Ok(payload) => {
                    records.push(payload.clone());
                    outcomes.push(FetchOutcome::success(appid.clone(), payload));
                }
                Err(err) => {
                    // Propagate takes precedence over outcome collection:
                    // the batch stops at the first failure with no partial
                    // result.
                    if options.mode == FailureMode::Propagate {
                        return Err(err);
                    }
                    error!("Error fetching data for game {appid}: {err}");
                    outcomes.push(FetchOutcome::failure(appid.clone(), err.to_string()));
                }
            }
        }

        Ok((records, outcomes))
    }

    /// Fetch merged game data for each appid, in input order.
    ///
    /// Under [`FailureMode::Absorb`] an empty input yields an empty result
    /// and failed identifiers are skipped; under [`FailureMode::Propagate`]
    /// an empty input is an `InvalidRequest` and the first classified
    /// failure aborts the batch.
    pub fn get_games_data(
        &self,
        steam_appids: &[String],
        options: &FetchOptions,
    ) -> Result<Vec<Value>> {
        Ok(self.collect_games(steam_appids, options)?.0)
    }

    /// Like [`Collector::get_games_data`], also returning one
    /// [`FetchOutcome`] per identifier. Propagate mode still takes
    /// precedence: on failure the whole call returns the error and no
    /// partial outcome list.
    pub fn get_games_data_with_outcomes(
        &self,
        steam_appids: &[String],
        options: &FetchOptions,
    ) -> Result<(Vec<Value>, Vec<FetchOutcome>)> {
        self.collect_games(steam_appids, options)
    }

    fn collect_active_players(
        &self,
        steam_appids: &[String],
        fill_na_as: i64,
    ) -> Result<(Vec<Value>, Vec<FetchOutcome>)> {
        if steam_appids.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }
        let Some(charts) = self.source_by_name(SteamCharts::NAME) else {
            return Err(GameInsightsError::general(
                "SteamCharts source is not configured.",
            ));
        };

        let selected: &[&str] = &["name", "peak_active_player_all_time", "monthly_active_player"];
        let total = steam_appids.len();
        let mut all_months: BTreeSet<String> = BTreeSet::new();
        let mut all_data: Vec<Map<String, Value>> = Vec::with_capacity(total);
        let mut outcomes: Vec<FetchOutcome> = Vec::with_capacity(total);

        for (idx, appid) in steam_appids.iter().enumerate() {
            info!(
                "Fetching {} of {total}: active player data for appid {appid}..",
                idx + 1
            );
            let mut record = Map::new();
            record.insert("steam_appid".to_string(), json!(appid));

            let result = self.fetch_with_observability(charts, appid, Scope::Id, Some(selected));
            match result {
                SourceResult::Success { data } => {
                    if let Some(months) = data.get("monthly_active_player").and_then(Value::as_array)
                    {
                        for month in months {
                            let (Some(label), Some(average)) = (
                                month.get("month").and_then(Value::as_str),
                                month.get("average_players"),
                            ) else {
                                continue;
                            };
                            record.insert(label.to_string(), average.clone());
                            all_months.insert(label.to_string());
                        }
                    }
                    record.insert(
                        "name".to_string(),
                        data.get("name").cloned().unwrap_or(Value::Null),
                    );
                    record.insert(
                        "peak_active_player_all_time".to_string(),
                        data.get("peak_active_player_all_time")
                            .cloned()
                            .unwrap_or(Value::Null),
                    );
                    outcomes.push(FetchOutcome::success(
                        appid.clone(),
                        Value::Object(record.clone()),
                    ));
                }
                SourceResult::Failure { error } => {
                    error!("Error fetching active player data for appid {appid}: {error}");
                    outcomes.push(FetchOutcome::failure(appid.clone(), error));
                }
            }
            // The record is kept even on failure, with gaps filled below.
            all_data.push(record);
        }

        // Normalize: every record carries the same columns, numeric gaps
        // filled with `fill_na_as`, string gaps left null.
        let fixed_columns = ["steam_appid", "name", "peak_active_player_all_time"];
        let mut normalized: Vec<Value> = Vec::with_capacity(all_data.len());
        for record in all_data {
            let mut row = Map::new();
            for column in fixed_columns
                .iter()
                .copied()
                .chain(all_months.iter().map(String::as_str))
            {
                let value = record.get(column).cloned().unwrap_or(Value::Null);
                let numeric = column == "peak_active_player_all_time" || all_months.contains(column);
                let value = if numeric && value.is_null() {
                    json!(fill_na_as)
                } else {
                    value
                };
                row.insert(column.to_string(), value);
            }
            normalized.push(Value::Object(row));
        }

        Ok((normalized, outcomes))
    }

    /// Fetch month-by-month active player data for each appid.
    ///
    /// Records are normalized across the batch: the column set is the union
    /// of all months seen, numeric gaps are filled with `fill_na_as`, and
    /// string columns stay null. A failed appid still yields a row.
    pub fn get_games_active_player_data(
        &self,
        steam_appids: &[String],
        fill_na_as: i64,
    ) -> Result<Vec<Value>> {
        Ok(self.collect_active_players(steam_appids, fill_na_as)?.0)
    }

    /// Like [`Collector::get_games_active_player_data`], also returning one
    /// [`FetchOutcome`] per identifier.
    pub fn get_games_active_player_data_with_outcomes(
        &self,
        steam_appids: &[String],
        fill_na_as: i64,
    ) -> Result<(Vec<Value>, Vec<FetchOutcome>)> {
        self.collect_active_players(steam_appids, fill_na_as)
    }

    /// Fetch recent reviews for one appid. With `review_only` the plain
    /// review list is returned; otherwise a single record carrying the full
    /// review payload (summary plus reviews).
    pub fn get_game_review(&self, steam_appid: &str, review_only: bool) -> Result<Vec<Value>> {
        if steam_appid.is_empty() {
            return Err(GameInsightsError::invalid_request(
                "steam_appid must be a non-empty string.",
            ));
        }

        info!("Fetching reviews for appid {steam_appid}..");

        let source = SteamReview::new(self.transport()?.clone());
        let query = ReviewQuery {
            filter: "recent".to_string(),
            ..ReviewQuery::default()
        };

        match source.fetch_reviews(steam_appid, &query) {
            SourceResult::Success { data } => {
                if review_only {
                    Ok(data
                        .get("reviews")
                        .and_then(Value::as_array)
                        .cloned()
                        .unwrap_or_default())
                } else {
                    Ok(vec![Value::Object(data.into_iter().collect())])
                }
            }
            SourceResult::Failure { error } => {
                error!("Error fetching reviews for appid {steam_appid}: {error}");
                Ok(Vec::new())
            }
        }
    }

    /// Fetch user data for each steamid. Absorb-only: a failed steamid
    /// yields a record containing just the steamid.
    ///
    /// A brief pause between users keeps the call pacing polite on top of
    /// the per-source rate limit.
    pub fn get_user_data(
        &self,
        steamids: &[String],
        include_free_games: bool,
    ) -> Result<Vec<Value>> {
        let source = SteamUser::new(
            self.transport()?.clone(),
            self.options.steam_api_key.clone(),
        );

        let total = steamids.len();
        let mut results: Vec<Value> = Vec::with_capacity(total);

        for (idx, steamid) in steamids.iter().enumerate() {
            info!("Fetching {} of {total}: user with steamid {steamid}", idx + 1);
            match source.fetch_user(steamid, include_free_games) {
                SourceResult::Success { data } => {
                    results.push(Value::Object(data.into_iter().collect()));
                }
                SourceResult::Failure { error } => {
                    error!("Error fetching data for steamid {steamid}: {error}");
                    results.push(json!({ "steamid": steamid }));
                }
            }
            // Brief pacing between users on top of the source rate limit.
            std::thread::sleep(Duration::from_millis(250));
        }

        Ok(results)
    }
}
