// Decoded telemetry sample.

/// Values read from one telemetry frame. Built only by [`crate::parser::decode`].
///
/// ```compile_fail
/// let sample = telemetry_core::TelemetrySample {
///     speed: 0.0,
///     rpm: 0.0,
///     max_rpm: 0.0,
///     throttle: 0.0,
/// };
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct TelemetrySample {
    pub speed: f32,
    pub rpm: f32,
    pub max_rpm: f32,
    pub throttle: f32,
}

impl TelemetrySample {
    /// Engine speed as a percentage of the rev limit, unclamped.
    /// Zero when the frame reports no positive rev limit.
    pub fn rpm_percent(&self) -> f64 {
        if self.max_rpm > 0.0 {
            f64::from(self.rpm) / f64::from(self.max_rpm) * 100.0
        } else {
            0.0
        }
    }
}
