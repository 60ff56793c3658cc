//! Integration tests for the collector: fetch orchestration, failure
//! policy, batch behavior, and observability.

mod common;

use common::*;
use serde_json::{json, Value};

use game_insights::utils::MetricsCollector;
use game_insights::{
    classify_fetch_failure, Collector, CollectorOptions, FailureMode, FetchOptions,
    GameInsightsError, SourceBinding, SourceResult,
};

const PLAYER_FIELDS: &[&str] = &[
    "active_player_24h",
    "peak_active_player_all_time",
    "monthly_active_player",
];

const REGION_MESSAGE_99999: &str = "Failed to fetch data for appid 99999, or appid is not available in the specified region (us) or language (english).";

fn store_success() -> SourceResult {
    SourceResult::success(fields(&[
        ("steam_appid", json!("12345")),
        ("name", json!("Mock Game")),
    ]))
}

fn absorb() -> FetchOptions {
    FetchOptions {
        recap: false,
        mode: FailureMode::Absorb,
    }
}

fn propagate() -> FetchOptions {
    FetchOptions {
        recap: false,
        mode: FailureMode::Propagate,
    }
}

// =========================================================================
// FETCH ORCHESTRATION
// =========================================================================

#[test]
fn merges_primary_and_tolerates_supplementary_timeout() {
    // End-to-end: primary succeeds, the player-count source times out; the
    // identifier still succeeds with null player fields.
    let collector = collector_with(
        vec![
            primary_success(),
            SourceBinding::new(
                Box::new(StubSource::failing("SteamCharts", "Request timeout")),
                PLAYER_FIELDS,
            ),
        ],
        vec![],
    );

    let (records, outcomes) = collector
        .get_games_data_with_outcomes(&["12345".to_string()], &absorb())
        .unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["steam_appid"], json!("12345"));
    assert_eq!(record["name"], json!("Mock Game"));
    assert_eq!(record["price_final"], json!(12.34));
    assert_eq!(record["active_player_24h"], Value::Null);

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].success);
    assert_eq!(outcomes[0].identifier, "12345");
}

#[test]
fn absorb_mode_never_fails_even_when_every_source_fails() {
    let collector = collector_with(
        vec![
            SourceBinding::primary(
                Box::new(StubSource::failing("SteamStore", REGION_MESSAGE_99999)),
                &["steam_appid", "name"],
            ),
            SourceBinding::new(
                Box::new(StubSource::failing("SteamCharts", "Request timeout")),
                PLAYER_FIELDS,
            ),
        ],
        vec![],
    );

    let (records, outcomes) = collector
        .get_games_data_with_outcomes(&["99999".to_string()], &absorb())
        .unwrap();

    // Best-effort record: only the seeded identifier survives.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["steam_appid"], json!("99999"));
    assert_eq!(records[0]["name"], Value::Null);
    assert!(outcomes[0].success);
}

#[test]
fn propagate_mode_raises_not_found_from_primary_region_message() {
    // End-to-end: primary reports the region message; the typed error
    // carries the extracted identifier.
    let collector = collector_with(
        vec![SourceBinding::primary(
            Box::new(StubSource::failing("SteamStore", REGION_MESSAGE_99999)),
            &["steam_appid", "name"],
        )],
        vec![],
    );

    let err = collector
        .get_games_data(&["99999".to_string()], &propagate())
        .unwrap_err();
    match err {
        GameInsightsError::NotFound { identifier, .. } => assert_eq!(identifier, "99999"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn propagate_mode_ignores_supplementary_failures() {
    let collector = collector_with(
        vec![
            primary_success(),
            SourceBinding::new(
                Box::new(StubSource::failing(
                    "ProtonDB",
                    "Game 12345 not found on ProtonDB.",
                )),
                &["protondb_tier"],
            ),
        ],
        vec![],
    );

    let records = collector
        .get_games_data(&["12345".to_string()], &propagate())
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["protondb_tier"], Value::Null);
}

#[test]
fn propagate_mode_classifies_primary_connectivity_as_unavailable() {
    let collector = collector_with(
        vec![SourceBinding::primary(
            Box::new(StubSource::failing("SteamStore", "Failed to connect. Status code: 599.")),
            &["steam_appid", "name"],
        )],
        vec![],
    );

    let err = collector
        .get_games_data(&["12345".to_string()], &propagate())
        .unwrap_err();
    match err {
        GameInsightsError::SourceUnavailable { source_name: source, .. } => assert_eq!(source, "SteamStore"),
        other => panic!("expected SourceUnavailable, got {other:?}"),
    }
}

#[test]
fn name_keyed_sources_receive_the_primary_name() {
    let hltb = StubSource::succeeding(
        "HowLongToBeat",
        fields(&[("comp_main", json!(200)), ("review_score", json!(88))]),
    );
    let hltb_calls = hltb.call_log();

    let collector = collector_with(
        vec![primary_success()],
        vec![SourceBinding::new(
            Box::new(hltb),
            &["comp_main", "review_score"],
        )],
    );

    let records = collector
        .get_games_data(&["12345".to_string()], &absorb())
        .unwrap();

    assert_eq!(*hltb_calls.borrow(), ["Mock Game"]);
    assert_eq!(records[0]["comp_main"], json!(200));
    // The name-keyed pass runs after the id-keyed one, so its review_score
    // wins.
    assert_eq!(records[0]["review_score"], json!(88));
}

#[test]
fn name_keyed_sources_are_skipped_when_primary_fails() {
    let hltb = StubSource::succeeding("HowLongToBeat", fields(&[("comp_main", json!(200))]));
    let hltb_calls = hltb.call_log();

    let collector = collector_with(
        vec![SourceBinding::primary(
            Box::new(StubSource::failing("SteamStore", "Request timeout")),
            &["steam_appid", "name"],
        )],
        vec![SourceBinding::new(Box::new(hltb), &["comp_main"])],
    );

    collector
        .get_games_data(&["12345".to_string()], &absorb())
        .unwrap();

    assert!(hltb_calls.borrow().is_empty());
}

#[test]
fn undeclared_fields_are_not_merged() {
    // The source returns more fields than its binding declares; only the
    // declared ones reach the record.
    let collector = collector_with(
        vec![SourceBinding::primary(
            Box::new(StubSource::succeeding(
                "SteamStore",
                fields(&[
                    ("steam_appid", json!("12345")),
                    ("name", json!("Mock Game")),
                    ("ccu", json!(4321)),
                ]),
            )),
            &["steam_appid", "name"],
        )],
        vec![],
    );

    let records = collector
        .get_games_data(&["12345".to_string()], &absorb())
        .unwrap();
    assert_eq!(records[0]["ccu"], Value::Null);
}

// =========================================================================
// BATCH BEHAVIOR
// =========================================================================

#[test]
fn propagate_short_circuits_on_first_failing_identifier() {
    let primary = StubSource::scripted(
        "SteamStore",
        vec![
            store_success(),
            SourceResult::failure(REGION_MESSAGE_99999),
        ],
        SourceResult::failure("unexpected extra call"),
    );
    let calls = primary.call_log();

    let collector = collector_with(
        vec![SourceBinding::primary(
            Box::new(primary),
            &["steam_appid", "name"],
        )],
        vec![],
    );

    let err = collector
        .get_games_data_with_outcomes(
            &["12345".to_string(), "99999".to_string(), "11111".to_string()],
            &propagate(),
        )
        .unwrap_err();

    assert!(matches!(err, GameInsightsError::NotFound { .. }));
    // The batch stopped at the second identifier; the third was never
    // fetched and no partial outcome list was returned.
    assert_eq!(*calls.borrow(), ["12345", "99999"]);
}

#[test]
fn absorb_mode_continues_past_failures() {
    let primary = StubSource::scripted(
        "SteamStore",
        vec![
            store_success(),
            SourceResult::failure(REGION_MESSAGE_99999),
            store_success(),
        ],
        SourceResult::failure("unexpected extra call"),
    );

    let collector = collector_with(
        vec![SourceBinding::primary(
            Box::new(primary),
            &["steam_appid", "name"],
        )],
        vec![],
    );

    let (records, outcomes) = collector
        .get_games_data_with_outcomes(
            &["12345".to_string(), "99999".to_string(), "11111".to_string()],
            &absorb(),
        )
        .unwrap();

    // All three yield records (the failed one best-effort), all succeed at
    // the identifier level since only the primary's raise path gates that.
    assert_eq!(records.len(), 3);
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|outcome| outcome.success));
}

#[test]
fn empty_input_absorb_returns_empty() {
    let collector = collector_with(vec![primary_success()], vec![]);
    let (records, outcomes) = collector
        .get_games_data_with_outcomes(&[], &absorb())
        .unwrap();
    assert!(records.is_empty());
    assert!(outcomes.is_empty());
}

#[test]
fn empty_input_propagate_is_invalid_request() {
    let collector = collector_with(vec![primary_success()], vec![]);
    let err = collector.get_games_data(&[], &propagate()).unwrap_err();
    assert!(matches!(err, GameInsightsError::InvalidRequest { .. }));
}

#[test]
fn duplicate_identifiers_are_processed_independently() {
    let primary = StubSource::succeeding(
        "SteamStore",
        fields(&[("steam_appid", json!("12345")), ("name", json!("Mock Game"))]),
    );
    let calls = primary.call_log();

    let collector = collector_with(
        vec![SourceBinding::primary(
            Box::new(primary),
            &["steam_appid", "name"],
        )],
        vec![],
    );

    let records = collector
        .get_games_data(&["12345".to_string(), "12345".to_string()], &absorb())
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["steam_appid"], json!("12345"));
    assert_eq!(records[1]["steam_appid"], json!("12345"));
    assert_eq!(*calls.borrow(), ["12345", "12345"]);
}

#[test]
fn recap_projection_restricts_fields() {
    let collector = collector_with(vec![primary_success()], vec![]);

    let records = collector
        .get_games_data(
            &["12345".to_string()],
            &FetchOptions {
                recap: true,
                mode: FailureMode::Absorb,
            },
        )
        .unwrap();

    let record = records[0].as_object().unwrap();
    for key in record.keys() {
        assert!(
            game_insights::RECAP_FIELDS.contains(&key.as_str()),
            "unexpected field {key} in recap"
        );
    }
    assert!(record.contains_key("name"));
    // Full-record-only fields are projected away.
    assert!(!record.contains_key("review_score_desc"));
    assert!(!record.contains_key("monthly_active_player"));
}

// =========================================================================
// CLASSIFICATION AND DOWNGRADE
// =========================================================================

#[test]
fn supplementary_not_found_downgrades_to_unavailable() {
    let err = classify_fetch_failure("ProtonDB", "Game 12345 not found on ProtonDB.", false);
    match err {
        GameInsightsError::SourceUnavailable { source_name: source, .. } => assert_eq!(source, "ProtonDB"),
        other => panic!("expected SourceUnavailable, got {other:?}"),
    }
}

#[test]
fn primary_not_found_stays_not_found() {
    let err = classify_fetch_failure("SteamStore", "Game with appid 12345 is not found.", true);
    match err {
        GameInsightsError::NotFound { identifier, .. } => assert_eq!(identifier, "12345"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn primary_network_error_is_unavailable() {
    let err = classify_fetch_failure("SteamStore", "Connection timeout", true);
    assert!(matches!(err, GameInsightsError::SourceUnavailable { .. }));
}

// =========================================================================
// OBSERVABILITY AND LIFECYCLE
// =========================================================================

#[test]
fn metrics_are_emitted_per_source_and_outcome() {
    let collector = collector_with(
        vec![
            primary_success(),
            SourceBinding::new(
                Box::new(StubSource::failing("SteamCharts", "Request timeout")),
                PLAYER_FIELDS,
            ),
        ],
        vec![],
    )
    .with_metrics(MetricsCollector::new(true));

    collector
        .get_games_data(&["12345".to_string()], &absorb())
        .unwrap();

    let metrics = collector.metrics();
    let store_tags = [("source", "SteamStore"), ("scope", "id")];
    let charts_tags = [("source", "SteamCharts"), ("scope", "id")];

    assert_eq!(metrics.counter_value("source_fetch_total", &store_tags), 1);
    assert_eq!(metrics.counter_value("source_fetch_success_total", &store_tags), 1);
    assert_eq!(metrics.counter_value("source_fetch_error_total", &charts_tags), 1);
    assert_eq!(
        metrics.duration_count("source_fetch_duration_seconds", &store_tags),
        1
    );
}

#[test]
fn metrics_disabled_by_default_still_returns_data() {
    let collector = collector_with(vec![primary_success()], vec![])
        .with_metrics(MetricsCollector::new(false));

    let records = collector
        .get_games_data(&["12345".to_string()], &absorb())
        .unwrap();
    assert_eq!(records.len(), 1);
    assert!(collector.metrics().counters_snapshot().is_empty());
}

#[test]
fn close_is_idempotent() {
    let mut collector = collector_with(vec![primary_success()], vec![]);
    assert!(!collector.is_closed());
    collector.close();
    assert!(collector.is_closed());
    // A second close has no observable effect.
    collector.close();
    assert!(collector.is_closed());
}

#[test]
fn retain_id_sources_filters_by_name_case_insensitively() {
    let mut collector = collector_with(
        vec![
            primary_success(),
            SourceBinding::new(
                Box::new(StubSource::succeeding("SteamCharts", fields(&[]))),
                PLAYER_FIELDS,
            ),
        ],
        vec![],
    );

    collector.retain_id_sources(&["steamstore"]);
    assert_eq!(collector.id_sources().len(), 1);
    assert_eq!(collector.id_sources()[0].source.name(), "SteamStore");
}

#[test]
fn reconfiguration_updates_options() {
    let mut collector = Collector::with_sources(
        CollectorOptions::default(),
        vec![primary_success()],
        vec![],
    );
    collector.set_region("de");
    collector.set_language("german");
    collector.set_steam_api_key(Some("key".to_string()));
    assert_eq!(collector.options().region, "de");
    assert_eq!(collector.options().language, "german");
    assert_eq!(collector.options().steam_api_key.as_deref(), Some("key"));
}

// =========================================================================
// ACTIVE PLAYER BATCH
// =========================================================================

#[test]
fn active_player_batch_normalizes_month_columns() {
    let charts = StubSource::scripted(
        "SteamCharts",
        vec![
            SourceResult::success(fields(&[
                ("name", json!("Mock Game")),
                ("peak_active_player_all_time", json!(12345)),
                (
                    "monthly_active_player",
                    json!([
                        {"month": "June 2025", "average_players": 123.45},
                        {"month": "July 2025", "average_players": 234.56},
                    ]),
                ),
            ])),
            SourceResult::failure("Request timeout"),
        ],
        SourceResult::failure("unexpected extra call"),
    );

    let collector = collector_with(
        vec![SourceBinding::new(Box::new(charts), PLAYER_FIELDS)],
        vec![],
    );

    let (records, outcomes) = collector
        .get_games_active_player_data_with_outcomes(
            &["12345".to_string(), "99999".to_string()],
            -1,
        )
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].success);
    assert!(!outcomes[1].success);

    // The successful row carries its months; the failed row is normalized
    // with numeric fills and null name.
    let ok = records[0].as_object().unwrap();
    assert_eq!(ok["name"], json!("Mock Game"));
    assert_eq!(ok["June 2025"], json!(123.45));
    let failed = records[1].as_object().unwrap();
    assert_eq!(failed["steam_appid"], json!("99999"));
    assert_eq!(failed["name"], Value::Null);
    assert_eq!(failed["peak_active_player_all_time"], json!(-1));
    assert_eq!(failed["June 2025"], json!(-1));
    assert_eq!(failed["July 2025"], json!(-1));
}

#[test]
fn active_player_empty_input_returns_empty() {
    let collector = collector_with(vec![], vec![]);
    let (records, outcomes) = collector
        .get_games_active_player_data_with_outcomes(&[], -1)
        .unwrap();
    assert!(records.is_empty());
    assert!(outcomes.is_empty());
}
