//! Canonical records and the schema-tolerant normalizer
//!
//! Every raw JSON object the provider returns maps to exactly one
//! canonical record per domain, independent of which API version produced
//! it. Missing numeric fields default to zero; a record is dropped only
//! when it carries no usable date at all.

pub mod extract;
pub mod normalize;

pub use normalize::{
    normalize_cycle, normalize_cycle_batch, normalize_profile, normalize_recovery,
    normalize_recovery_batch, BatchOutcome,
};

use chrono::NaiveDate;
use serde::Serialize;

/// One day of recovery data in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryRecord {
    /// Calendar date the recovery was scored for
    pub date: NaiveDate,
    /// Recovery score on the provider's 0-100 scale; 0 when unreported
    pub recovery_score: f64,
    /// Heart-rate variability (RMSSD) in milliseconds; 0 when unreported
    pub hrv_ms: f64,
    /// Resting heart rate in beats per minute; 0 when unreported
    pub resting_hr_bpm: f64,
}

/// One physiological cycle (roughly one day of strain) in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleRecord {
    /// Calendar date the cycle started
    pub date: NaiveDate,
    /// Strain on the provider's open-ended scale; 0 when unreported
    pub strain: f64,
    /// Energy expenditure in kilocalories, converted from kilojoules
    pub calories_kcal: f64,
    /// Average heart rate over the cycle in beats per minute
    pub avg_hr_bpm: f64,
    /// Maximum heart rate over the cycle in beats per minute
    pub max_hr_bpm: f64,
}

/// The user's profile in canonical form.
///
/// Unlike the time-series domains, profile fields stay optional: there is
/// no meaningful zero for an email address or a height.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRecord {
    /// Display name; assembled from name parts when no single field exists
    pub display_name: String,
    /// Account email, when the granted scopes expose it
    pub email: Option<String>,
    /// Height in meters
    pub height_m: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
}
