// Outbound dashboard message projected from a decoded sample.
// Invariants: field names and order match what the dashboard client reads.

use serde::Serialize;

use super::TelemetrySample;

/// Gear is not decoded from the export; the dashboard always receives neutral.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Gear {
    #[serde(rename = "N")]
    Unimplemented,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Active,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryMessage {
    pub speed: i64,
    pub rpm: i64,
    pub rpm_percent: i64,
    pub gas: f64,
    pub gear: Gear,
    pub status: SessionStatus,
}

impl From<&TelemetrySample> for TelemetryMessage {
    fn from(sample: &TelemetrySample) -> Self {
        Self {
            speed: sample.speed as i64,
            rpm: sample.rpm as i64,
            rpm_percent: sample.rpm_percent() as i64,
            gas: round_to_hundredths(f64::from(sample.throttle)),
            gear: Gear::Unimplemented,
            status: SessionStatus::Active,
        }
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
