// Shared constants for bridge timing, protocol defaults, and buffers.

pub const DEFAULT_HTTP_PORT: u16 = 8112;
pub const DEFAULT_SIM_HOST: &str = "127.0.0.1";
pub const DEFAULT_SIM_PORT: u16 = 9996;
pub const DEFAULT_UDP_BIND: &str = "0.0.0.0:0";
pub const DEFAULT_POLL_INTERVAL_US: u64 = 1_000;
pub const KEEPALIVE_INTERVAL_MS: u64 = 1_000;
pub const FEED_CAPACITY: usize = 256;
pub const FEED_RESTART_DELAY_MS: u64 = 1_000;
pub const RECV_BUFFER_LEN: usize = 2048;
pub const TELEMETRY_ROUTE: &str = "/telemetry";
