// Core data models for decoded samples and outbound dashboard messages.

mod message;
mod sample;

pub use message::{Gear, SessionStatus, TelemetryMessage};
pub use sample::TelemetrySample;
