//! Ordered field-extraction strategies
//!
//! The upstream API has shipped at least two incompatible shapes for the
//! same logical fields: a flat form (`item.recovery_score`) and a nested
//! form (`item.score.recovery_score`). Each canonical field is described
//! by an explicit ordered list of [`FieldSource`]s, tried in priority
//! order. Absence is a value, never an error.

use chrono::NaiveDate;
use serde_json::Value;

/// One place a logical field may live in a raw record.
#[derive(Debug, Clone, Copy)]
pub enum FieldSource<'a> {
    /// Top-level key on the record object
    Flat(&'a str),
    /// Key inside a nested object (`parent.key`)
    Nested(&'a str, &'a str),
}

impl FieldSource<'_> {
    /// Looks this source up in `raw`, returning the value if present.
    fn lookup<'v>(&self, raw: &'v Value) -> Option<&'v Value> {
        match self {
            FieldSource::Flat(key) => raw.get(key),
            FieldSource::Nested(parent, key) => raw.get(parent).and_then(|p| p.get(key)),
        }
    }
}

/// Extracts a numeric field, trying each source in order.
///
/// Integers widen to `f64`; string and null values are treated as absent.
pub fn extract_f64(raw: &Value, sources: &[FieldSource]) -> Option<f64> {
    sources
        .iter()
        .find_map(|source| source.lookup(raw).and_then(Value::as_f64))
}

/// Extracts a string field, trying each source in order.
pub fn extract_string(raw: &Value, sources: &[FieldSource]) -> Option<String> {
    sources
        .iter()
        .find_map(|source| source.lookup(raw).and_then(Value::as_str))
        .map(str::to_string)
}

/// Candidate key names for the record date, in fixed precedence order.
///
/// The provider has used all of these across API versions.
const DATE_KEYS: [&str; 4] = ["date", "start", "start_time", "created_at"];

/// Extracts the record's calendar date.
///
/// Tries each candidate key in order and takes the first present.
/// ISO-8601 timestamps (`2024-01-01T06:30:00.000Z`) are truncated to
/// their date component. Returns `None` when no candidate parses; the
/// caller drops the record with a skip diagnostic rather than failing
/// the batch.
pub fn extract_date(raw: &Value) -> Option<NaiveDate> {
    DATE_KEYS
        .iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_str).and_then(parse_date))
}

/// Parses a date from either a bare `YYYY-MM-DD` or the date prefix of an
/// ISO-8601 timestamp.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let prefix = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_key_takes_precedence_over_nested() {
        let raw = json!({"recovery_score": 10, "score": {"recovery_score": 99}});
        let sources = [
            FieldSource::Flat("recovery_score"),
            FieldSource::Nested("score", "recovery_score"),
        ];
        assert_eq!(extract_f64(&raw, &sources), Some(10.0));
    }

    #[test]
    fn test_nested_key_is_fallback() {
        let raw = json!({"score": {"recovery_score": 67}});
        let sources = [
            FieldSource::Flat("recovery_score"),
            FieldSource::Nested("score", "recovery_score"),
        ];
        assert_eq!(extract_f64(&raw, &sources), Some(67.0));
    }

    #[test]
    fn test_missing_everywhere_is_none() {
        let raw = json!({"unrelated": 1});
        let sources = [
            FieldSource::Flat("recovery_score"),
            FieldSource::Nested("score", "recovery_score"),
        ];
        assert_eq!(extract_f64(&raw, &sources), None);
    }

    #[test]
    fn test_non_numeric_value_is_absent() {
        let raw = json!({"recovery_score": "high"});
        assert_eq!(extract_f64(&raw, &[FieldSource::Flat("recovery_score")]), None);
    }

    #[test]
    fn test_extract_string_in_order() {
        let raw = json!({"name": "Jo", "display_name": "Jo Smith"});
        let sources = [FieldSource::Flat("display_name"), FieldSource::Flat("name")];
        assert_eq!(extract_string(&raw, &sources), Some("Jo Smith".to_string()));
    }

    #[test]
    fn test_extract_date_plain() {
        let raw = json!({"date": "2024-01-01"});
        assert_eq!(
            extract_date(&raw),
            Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_extract_date_truncates_timestamp() {
        let raw = json!({"start": "2024-03-15T06:30:00.000Z"});
        assert_eq!(
            extract_date(&raw),
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_extract_date_candidate_order() {
        // "date" wins over "created_at" even when both are present.
        let raw = json!({"created_at": "2020-01-01", "date": "2024-06-01"});
        assert_eq!(
            extract_date(&raw),
            Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        );
    }

    #[test]
    fn test_extract_date_absent_everywhere() {
        let raw = json!({"score": {"recovery_score": 50}});
        assert_eq!(extract_date(&raw), None);
    }

    #[test]
    fn test_extract_date_unparseable_is_none() {
        let raw = json!({"date": "yesterday"});
        assert_eq!(extract_date(&raw), None);
    }
}
