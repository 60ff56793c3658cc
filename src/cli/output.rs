//! Rendering collected records as JSON or CSV.

use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::error::Result;

/// Output format for collected records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

/// Pretty-printed JSON for the record list.
pub fn render_json(records: &[Value]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Column order for records with no declared schema: union of keys, with
/// the identifier columns first and the rest alphabetical.
pub fn infer_columns(records: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for lead in ["steam_appid", "steamid", "name"] {
        if records
            .iter()
            .any(|r| r.as_object().is_some_and(|o| o.contains_key(lead)))
        {
            columns.push(lead.to_string());
        }
    }
    let mut rest: Vec<String> = records
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|o| o.keys().cloned())
        .filter(|key| !columns.contains(key))
        .collect();
    rest.sort();
    rest.dedup();
    columns.extend(rest);
    columns
}

fn render_cell(value: Option<&Value>) -> Result<String> {
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        // Lists and objects are JSON-encoded inline.
        Some(other) => serde_json::to_string(other)?,
    })
}

/// Render records as CSV with the given column order.
pub fn render_csv(records: &[Value], columns: &[String]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;
    for record in records {
        let object = record.as_object();
        let mut row: Vec<String> = Vec::with_capacity(columns.len());
        for column in columns {
            row.push(render_cell(object.and_then(|o| o.get(column)))?);
        }
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| crate::error::GameInsightsError::general(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write rendered output to a file, or stdout when no path is given.
pub fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn csv_renders_lists_as_json_and_nulls_as_empty() {
        let records = vec![json!({
            "steam_appid": "12345",
            "name": "Mock Game",
            "genres": ["Action", "Indie"],
            "price_final": 12.34,
            "copies_sold": null,
        })];
        let columns = vec![
            "steam_appid".to_string(),
            "name".to_string(),
            "price_final".to_string(),
            "copies_sold".to_string(),
            "genres".to_string(),
        ];
        let csv = render_csv(&records, &columns).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "steam_appid,name,price_final,copies_sold,genres"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("12345,Mock Game,12.34,,"));
        assert!(row.contains("Action"));
    }

    #[test]
    fn inferred_columns_lead_with_identifier() {
        let records = vec![
            json!({"steam_appid": "1", "zeta": 1, "alpha": 2}),
            json!({"steam_appid": "2", "beta": 3}),
        ];
        let columns = infer_columns(&records);
        assert_eq!(columns[0], "steam_appid");
        assert_eq!(columns[1..], ["alpha", "beta", "zeta"]);
    }

    #[test]
    fn json_round_trips() {
        let records = vec![json!({"steam_appid": "12345"})];
        let rendered = render_json(&records).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn emit_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        emit("steam_appid\n12345\n", Some(&path)).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("steam_appid"));
    }
}
