//! Per-domain normalizers
//!
//! Pure, total mappings from raw provider JSON to canonical records.
//! Numeric fields use the flat-then-nested extraction order from
//! [`super::extract`]; unit conversion is part of normalization. The
//! batch helpers preserve upstream array order and never fail the batch
//! for one bad record.

use serde_json::Value;

use super::extract::{extract_date, extract_f64, extract_string, FieldSource};
use super::{CycleRecord, ProfileRecord, RecoveryRecord};

/// Kilojoules per kilocalorie. Fixed thermochemical constant, not
/// configurable.
const KILOJOULES_PER_KCAL: f64 = 4.184;

/// Result of normalizing one raw array element.
#[derive(Debug)]
pub enum BatchOutcome<T> {
    /// The record normalized cleanly.
    Normalized(T),
    /// The record carried no usable date and was dropped. The payload is
    /// a short diagnostic naming what was missing.
    Skipped(String),
}

impl<T> BatchOutcome<T> {
    /// The normalized record, if this element produced one.
    pub fn into_normalized(self) -> Option<T> {
        match self {
            BatchOutcome::Normalized(record) => Some(record),
            BatchOutcome::Skipped(_) => None,
        }
    }
}

/// Normalizes one raw recovery object.
///
/// Field order per the provider's observed shapes: flat key first, then
/// `score.*`, then a zero default. Returns `None` only when the record
/// has no usable date.
pub fn normalize_recovery(raw: &Value) -> Option<RecoveryRecord> {
    let date = extract_date(raw)?;
    Some(RecoveryRecord {
        date,
        recovery_score: extract_f64(
            raw,
            &[
                FieldSource::Flat("recovery_score"),
                FieldSource::Nested("score", "recovery_score"),
            ],
        )
        .unwrap_or(0.0),
        hrv_ms: extract_f64(
            raw,
            &[
                FieldSource::Flat("hrv_rmssd_milli"),
                FieldSource::Nested("score", "hrv_rmssd_milli"),
            ],
        )
        .unwrap_or(0.0),
        resting_hr_bpm: extract_f64(
            raw,
            &[
                FieldSource::Flat("resting_heart_rate"),
                FieldSource::Nested("score", "resting_heart_rate"),
            ],
        )
        .unwrap_or(0.0),
    })
}

/// Normalizes one raw cycle (strain) object.
///
/// Calories are derived from the provider's kilojoule field; the provider
/// has never reported kcal directly.
pub fn normalize_cycle(raw: &Value) -> Option<CycleRecord> {
    let date = extract_date(raw)?;
    let kilojoules = extract_f64(
        raw,
        &[
            FieldSource::Flat("kilojoule"),
            FieldSource::Nested("score", "kilojoule"),
        ],
    )
    .unwrap_or(0.0);

    Some(CycleRecord {
        date,
        strain: extract_f64(
            raw,
            &[
                FieldSource::Flat("strain"),
                FieldSource::Nested("score", "strain"),
            ],
        )
        .unwrap_or(0.0),
        calories_kcal: kilojoules / KILOJOULES_PER_KCAL,
        avg_hr_bpm: extract_f64(
            raw,
            &[
                FieldSource::Flat("average_heart_rate"),
                FieldSource::Nested("score", "average_heart_rate"),
            ],
        )
        .unwrap_or(0.0),
        max_hr_bpm: extract_f64(
            raw,
            &[
                FieldSource::Flat("max_heart_rate"),
                FieldSource::Nested("score", "max_heart_rate"),
            ],
        )
        .unwrap_or(0.0),
    })
}

/// Normalizes the user profile object.
///
/// Profiles have no date, so nothing is ever skipped. The display name
/// falls back to joining `first_name` and `last_name` when no single
/// name field exists; body measurements accept both the versioned
/// (`height_meter`) and bare (`height`) key names.
pub fn normalize_profile(raw: &Value) -> ProfileRecord {
    let display_name = extract_string(
        raw,
        &[FieldSource::Flat("display_name"), FieldSource::Flat("name")],
    )
    .unwrap_or_else(|| {
        let first = extract_string(raw, &[FieldSource::Flat("first_name")]);
        let last = extract_string(raw, &[FieldSource::Flat("last_name")]);
        match (first, last) {
            (Some(f), Some(l)) => format!("{f} {l}"),
            (Some(f), None) => f,
            (None, Some(l)) => l,
            (None, None) => String::new(),
        }
    });

    ProfileRecord {
        display_name,
        email: extract_string(raw, &[FieldSource::Flat("email")]),
        height_m: extract_f64(
            raw,
            &[
                FieldSource::Flat("height_meter"),
                FieldSource::Flat("height"),
            ],
        ),
        weight_kg: extract_f64(
            raw,
            &[
                FieldSource::Flat("weight_kilogram"),
                FieldSource::Flat("weight"),
            ],
        ),
    }
}

/// Normalizes a raw recovery array, preserving upstream order.
///
/// Records without a date become [`BatchOutcome::Skipped`] with a warning
/// diagnostic; the batch continues. Any downstream sort is the
/// presentation layer's job.
pub fn normalize_recovery_batch(raw_records: &[Value]) -> Vec<BatchOutcome<RecoveryRecord>> {
    normalize_batch(raw_records, normalize_recovery)
}

/// Normalizes a raw cycle array, preserving upstream order.
pub fn normalize_cycle_batch(raw_records: &[Value]) -> Vec<BatchOutcome<CycleRecord>> {
    normalize_batch(raw_records, normalize_cycle)
}

fn normalize_batch<T>(
    raw_records: &[Value],
    normalize_one: fn(&Value) -> Option<T>,
) -> Vec<BatchOutcome<T>> {
    raw_records
        .iter()
        .enumerate()
        .map(|(index, raw)| match normalize_one(raw) {
            Some(record) => BatchOutcome::Normalized(record),
            None => {
                let diagnostic = format!("record {index} has no usable date field, skipping");
                tracing::warn!("{diagnostic}");
                BatchOutcome::Skipped(diagnostic)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -----------------------------------------------------------------------
    // normalize_recovery
    // -----------------------------------------------------------------------

    #[test]
    fn test_recovery_nested_shape() {
        let raw = json!({
            "date": "2024-01-01",
            "score": {
                "recovery_score": 80,
                "hrv_rmssd_milli": 55,
                "resting_heart_rate": 48
            }
        });
        let record = normalize_recovery(&raw).unwrap();
        assert_eq!(record.date, date(2024, 1, 1));
        assert_eq!(record.recovery_score, 80.0);
        assert_eq!(record.hrv_ms, 55.0);
        assert_eq!(record.resting_hr_bpm, 48.0);
    }

    #[test]
    fn test_recovery_flat_and_nested_shapes_agree() {
        let flat = json!({"date": "2024-01-01", "recovery_score": 67});
        let nested = json!({"date": "2024-01-01", "score": {"recovery_score": 67}});
        assert_eq!(
            normalize_recovery(&flat).unwrap().recovery_score,
            normalize_recovery(&nested).unwrap().recovery_score
        );
    }

    #[test]
    fn test_recovery_missing_score_defaults_to_zero() {
        let raw = json!({"date": "2024-01-01"});
        let record = normalize_recovery(&raw).unwrap();
        assert_eq!(record.recovery_score, 0.0);
        assert_eq!(record.hrv_ms, 0.0);
        assert_eq!(record.resting_hr_bpm, 0.0);
    }

    #[test]
    fn test_recovery_without_any_date_is_dropped() {
        let raw = json!({"score": {"recovery_score": 80}});
        assert!(normalize_recovery(&raw).is_none());
    }

    #[test]
    fn test_recovery_is_idempotent() {
        let raw = json!({"start": "2024-02-02T08:00:00Z", "score": {"recovery_score": 33}});
        assert_eq!(normalize_recovery(&raw), normalize_recovery(&raw));
    }

    // -----------------------------------------------------------------------
    // normalize_cycle
    // -----------------------------------------------------------------------

    #[test]
    fn test_cycle_kilojoule_conversion() {
        let raw = json!({"date": "2024-01-01", "score": {"kilojoule": 500}});
        let record = normalize_cycle(&raw).unwrap();
        assert!((record.calories_kcal - 119.5).abs() < 0.05);
    }

    #[test]
    fn test_cycle_full_nested_shape() {
        let raw = json!({
            "start": "2024-01-05T04:00:00.000Z",
            "score": {
                "strain": 14.2,
                "kilojoule": 8368.0,
                "average_heart_rate": 72,
                "max_heart_rate": 165
            }
        });
        let record = normalize_cycle(&raw).unwrap();
        assert_eq!(record.date, date(2024, 1, 5));
        assert_eq!(record.strain, 14.2);
        assert!((record.calories_kcal - 2000.0).abs() < 0.01);
        assert_eq!(record.avg_hr_bpm, 72.0);
        assert_eq!(record.max_hr_bpm, 165.0);
    }

    #[test]
    fn test_cycle_missing_fields_default_to_zero() {
        let raw = json!({"date": "2024-01-01"});
        let record = normalize_cycle(&raw).unwrap();
        assert_eq!(record.strain, 0.0);
        assert_eq!(record.calories_kcal, 0.0);
    }

    // -----------------------------------------------------------------------
    // normalize_profile
    // -----------------------------------------------------------------------

    #[test]
    fn test_profile_name_parts_are_joined() {
        let raw = json!({"first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com"});
        let record = normalize_profile(&raw);
        assert_eq!(record.display_name, "Ada Lovelace");
        assert_eq!(record.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_profile_display_name_wins_over_parts() {
        let raw = json!({"display_name": "Ada L.", "first_name": "Ada", "last_name": "Lovelace"});
        assert_eq!(normalize_profile(&raw).display_name, "Ada L.");
    }

    #[test]
    fn test_profile_body_measurement_keys() {
        let raw = json!({"height_meter": 1.7, "weight_kilogram": 64.5});
        let record = normalize_profile(&raw);
        assert_eq!(record.height_m, Some(1.7));
        assert_eq!(record.weight_kg, Some(64.5));
    }

    #[test]
    fn test_profile_empty_object_is_total() {
        let record = normalize_profile(&json!({}));
        assert_eq!(record.display_name, "");
        assert!(record.email.is_none());
        assert!(record.height_m.is_none());
        assert!(record.weight_kg.is_none());
    }

    // -----------------------------------------------------------------------
    // batch normalization
    // -----------------------------------------------------------------------

    #[test]
    fn test_batch_preserves_order_and_skips_dateless() {
        let raws = vec![
            json!({"date": "2024-01-03", "score": {"recovery_score": 70}}),
            json!({"score": {"recovery_score": 99}}),
            json!({"date": "2024-01-01", "score": {"recovery_score": 50}}),
        ];
        let outcomes = normalize_recovery_batch(&raws);
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[1], BatchOutcome::Skipped(_)));

        let records: Vec<_> = outcomes
            .into_iter()
            .filter_map(BatchOutcome::into_normalized)
            .collect();
        // Upstream order, not chronological.
        assert_eq!(records[0].date, date(2024, 1, 3));
        assert_eq!(records[1].date, date(2024, 1, 1));
    }

    #[test]
    fn test_skip_diagnostic_names_the_record() {
        let raws = vec![json!({"nonsense": true})];
        let outcomes = normalize_cycle_batch(&raws);
        match &outcomes[0] {
            BatchOutcome::Skipped(diagnostic) => assert!(diagnostic.contains("record 0")),
            BatchOutcome::Normalized(_) => panic!("expected skip"),
        }
    }
}
