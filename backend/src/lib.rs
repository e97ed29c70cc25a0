// Crate root for the Assetto Corsa dashboard bridge.

pub mod app;
pub mod bridge;
pub mod config;
pub mod constants;
pub mod http;
pub mod net;
pub mod tasks;
pub mod telemetry;
pub mod udp;
pub mod ws;
