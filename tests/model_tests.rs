//! Integration tests for record construction, coercion, and projections.

mod common;

use common::fields;
use serde_json::{json, Value};

use game_insights::{GameData, GameInsightsError, RECAP_FIELDS};

#[test]
fn builds_from_typical_raw_fields() {
    let raw = fields(&[
        ("steam_appid", json!("12345")),
        ("name", json!("Mock Game: The Adventure")),
        ("developers", json!(["Mock Dev"])),
        ("publishers", json!(["Mock Pub"])),
        ("type", json!("game")),
        ("is_free", json!(false)),
        ("price_currency", json!("USD")),
        ("price_initial", json!(19.99)),
        ("price_final", json!(12.34)),
        ("metacritic_score", json!("87")),
        ("release_date", json!("Jun 15, 2023")),
        ("copies_sold", json!(100000)),
        ("tags", json!(["Indie", "Action"])),
    ]);

    let game = GameData::from_raw(&raw).unwrap();
    assert_eq!(game.steam_appid, "12345");
    assert_eq!(game.name.as_deref(), Some("Mock Game: The Adventure"));
    assert_eq!(game.price_final, Some(12.34));
    assert_eq!(game.metacritic_score, Some(87));
    assert_eq!(game.copies_sold, Some(100000));
    assert_eq!(game.tags, vec!["Indie", "Action"]);
    assert_eq!(
        game.release_date.unwrap().format("%Y-%m-%d").to_string(),
        "2023-06-15"
    );
    // Derived from the release date.
    assert!(game.days_since_release.is_some());
}

#[test]
fn missing_required_field_is_an_error() {
    let raw = fields(&[("name", json!("No Appid"))]);
    let err = GameData::from_raw(&raw).unwrap_err();
    assert!(matches!(err, GameInsightsError::InvalidRequest { .. }));
}

#[test]
fn null_appid_coerces_to_empty_string() {
    let raw = fields(&[("steam_appid", json!(null))]);
    let game = GameData::from_raw(&raw).unwrap();
    assert_eq!(game.steam_appid, "");
}

#[test]
fn numeric_appid_coerces_to_string() {
    let raw = fields(&[("steam_appid", json!(12345))]);
    let game = GameData::from_raw(&raw).unwrap();
    assert_eq!(game.steam_appid, "12345");
}

#[test]
fn invalid_values_become_absent_not_errors() {
    let raw = fields(&[
        ("steam_appid", json!("12345")),
        ("metacritic_score", json!("not a number")),
        ("price_final", json!("NaN")),
        ("copies_sold", json!({"unexpected": "object"})),
        ("release_date", json!("next year")),
    ]);

    let game = GameData::from_raw(&raw).unwrap();
    assert_eq!(game.metacritic_score, None);
    assert_eq!(game.price_final, None);
    assert_eq!(game.copies_sold, None);
    assert_eq!(game.release_date, None);
    assert_eq!(game.days_since_release, None);
}

#[test]
fn list_fields_default_and_wrap_scalars() {
    let raw = fields(&[
        ("steam_appid", json!("12345")),
        ("genres", json!(null)),
        ("tags", json!("Action")),
        ("monthly_active_player", json!({"month": "June 2025"})),
    ]);

    let game = GameData::from_raw(&raw).unwrap();
    assert!(game.genres.is_empty());
    assert_eq!(game.tags, vec!["Action"]);
    assert_eq!(game.monthly_active_player, vec![json!({"month": "June 2025"})]);
    assert!(game.developers.is_empty());
}

#[test]
fn average_playtime_derives_seconds_from_hours() {
    let raw = fields(&[
        ("steam_appid", json!("12345")),
        ("average_playtime_h", json!(12.5)),
    ]);
    let game = GameData::from_raw(&raw).unwrap();
    assert_eq!(game.average_playtime, Some(45000));
}

#[test]
fn working_fields_are_excluded_from_serialization() {
    let raw = fields(&[
        ("steam_appid", json!("12345")),
        ("average_playtime_h", json!(1.0)),
        ("discount", json!(25.5)),
    ]);
    let game = GameData::from_raw(&raw).unwrap();
    let serialized = game.to_json().unwrap();
    let object = serialized.as_object().unwrap();

    assert!(!object.contains_key("average_playtime_h"));
    assert!(!object.contains_key("discount"));
    assert_eq!(object["average_playtime"], json!(3600));
}

#[test]
fn recap_contains_only_recap_fields_and_is_json_safe() {
    let raw = fields(&[
        ("steam_appid", json!("12345")),
        ("name", json!("Mock Game")),
        ("price_final", json!(12.34)),
        ("release_date", json!("2023-06-15")),
        ("review_score_desc", json!("Mostly Positive")),
    ]);
    let game = GameData::from_raw(&raw).unwrap();
    let recap = game.recap().unwrap();

    for key in recap.keys() {
        assert!(
            RECAP_FIELDS.contains(&key.as_str()),
            "unexpected field {key} in recap"
        );
    }
    // Full-record-only field projected away.
    assert!(!recap.contains_key("review_score_desc"));

    // Dates render as strings; every value is JSON-representable with no
    // non-finite numbers.
    assert!(recap["release_date"].is_string());
    fn assert_finite(value: &Value) {
        match value {
            Value::Number(n) => assert!(n.as_f64().map_or(true, f64::is_finite)),
            Value::Array(items) => items.iter().for_each(assert_finite),
            Value::Object(map) => map.values().for_each(assert_finite),
            _ => {}
        }
    }
    recap.values().for_each(assert_finite);
}

#[test]
fn serialized_record_matches_declared_field_order() {
    let raw = fields(&[("steam_appid", json!("12345"))]);
    let game = GameData::from_raw(&raw).unwrap();
    let object = game.to_json().unwrap();
    let object = object.as_object().unwrap();

    // Every serialized key is declared in FIELD_ORDER and vice versa.
    for key in object.keys() {
        assert!(
            game_insights::FIELD_ORDER.contains(&key.as_str()),
            "serialized field {key} missing from FIELD_ORDER"
        );
    }
    for field in game_insights::FIELD_ORDER {
        assert!(
            object.contains_key(*field),
            "FIELD_ORDER field {field} missing from serialization"
        );
    }
}

#[test]
fn integer_strings_and_float_truncation() {
    let raw = fields(&[
        ("steam_appid", json!("12345")),
        ("owners", json!("5000")),
        ("followers", json!(1234.9)),
        ("total_reviews", json!(true)),
    ]);
    let game = GameData::from_raw(&raw).unwrap();
    assert_eq!(game.owners, Some(5000));
    assert_eq!(game.followers, Some(1234));
    assert_eq!(game.total_reviews, Some(1));
}
