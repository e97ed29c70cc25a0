// HTTP response payload types.

use serde::Serialize;

use crate::app::FeedStatsSnapshot;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub uptime_ms: u64,
    pub clients: usize,
    #[serde(flatten)]
    pub feed: FeedStatsSnapshot,
}
