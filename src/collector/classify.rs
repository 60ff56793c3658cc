//! Error classification: the single authoritative mapping from a source's
//! raw error string to the public error taxonomy.
//!
//! Matching is ordered, first match wins, and order is significant because
//! later rules are broader. The text patterns are contract coupling to the
//! providers' wording and must not be reworded here without changing the
//! sources in lockstep.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::GameInsightsError;

static APPID_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"appid\s+(\S+)").expect("valid regex"));
static STEAMID_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"steamid\s+(\S+)").expect("valid regex"));
// Matches both "status code: 503" and "status 503".
static HTTP_STATUS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"status(?:\s+code)?:?\s*[45]\d{2}").expect("valid regex"));

const NETWORK_KEYWORDS: &[&str] = &[
    "status code: 599",
    "failed to connect",
    "connection",
    "timeout",
    "ssl",
    "toomanyredirects",
];

fn extract_hint(lowered: &str, patterns: &[&Lazy<Regex>]) -> String {
    patterns
        .iter()
        .find_map(|re| {
            re.captures(lowered)
                .map(|c| c[1].trim_end_matches(['.', ',']).to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Translate a raw error string into a typed error.
///
/// Classification rules, first match wins:
/// 1. the SteamStore "not available in the specified region" phrasing ->
///    `NotFound` (this is the primary source's "game doesn't exist" message;
///    the narrow phrasing avoids false positives from transient errors like
///    "service not available")
/// 2. "failed to parse" -> `SourceUnavailable`; checked before "not found"
///    because parse errors may quote a "not found" sub-message
/// 3. "failed to fetch" / "failed to obtain" -> `SourceUnavailable`
/// 4. network/transport keywords (599, connection, timeout, ssl, ...) ->
///    `SourceUnavailable`
/// 5. HTTP 4xx/5xx status patterns -> `SourceUnavailable`
/// 6. "not found" with an appid/steamid hint -> `NotFound`
/// 7. anything else -> `General`
///
/// Total function: always classifies, never fails, tolerates empty input.
pub fn classify_source_error(source_name: &str, error_message: &str) -> GameInsightsError {
    let lowered = error_message.to_lowercase();

    if lowered.contains("not available in the specified region") {
        let identifier = extract_hint(&lowered, &[&APPID_HINT_RE]);
        return GameInsightsError::NotFound {
            identifier,
            message: error_message.to_string(),
        };
    }

    if lowered.contains("failed to parse") {
        return GameInsightsError::source_unavailable(source_name, error_message);
    }

    if lowered.contains("failed to fetch") || lowered.contains("failed to obtain") {
        return GameInsightsError::source_unavailable(source_name, error_message);
    }

    if NETWORK_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        return GameInsightsError::source_unavailable(source_name, error_message);
    }

    if HTTP_STATUS_RE.is_match(&lowered) {
        return GameInsightsError::source_unavailable(source_name, error_message);
    }

    if lowered.contains("not found") {
        let identifier = extract_hint(&lowered, &[&APPID_HINT_RE, &STEAMID_HINT_RE]);
        return GameInsightsError::NotFound {
            identifier,
            message: error_message.to_string(),
        };
    }

    GameInsightsError::general(error_message)
}
