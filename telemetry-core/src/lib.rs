// Shared telemetry frame decoding and message model.

pub mod control;
pub mod model;
pub mod packet;
pub mod parser;

pub use control::ControlDatagram;
pub use model::{TelemetryMessage, TelemetrySample};
pub use parser::{decode, DecodeError};
