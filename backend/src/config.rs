// Runtime configuration read from environment variables.
// Invariants: numeric values that fail to parse fall back to defaults; bad addresses are errors.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{
    DEFAULT_HTTP_PORT, DEFAULT_POLL_INTERVAL_US, DEFAULT_SIM_HOST, DEFAULT_SIM_PORT,
    DEFAULT_UDP_BIND, FEED_CAPACITY, FEED_RESTART_DELAY_MS, KEEPALIVE_INTERVAL_MS,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    InvalidAddress { key: &'static str, value: String },
    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl AllowedOrigins {
    fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    pub http_addr: SocketAddr,
    pub sim_host: String,
    pub sim_port: u16,
    pub udp_bind: SocketAddr,
    pub poll_interval: Duration,
    pub keepalive_interval: Duration,
    pub restart_delay: Duration,
    pub feed_capacity: usize,
    pub allowed_origins: AllowedOrigins,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_HTTP_PORT),
            sim_host: DEFAULT_SIM_HOST.to_string(),
            sim_port: DEFAULT_SIM_PORT,
            udp_bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            poll_interval: Duration::from_micros(DEFAULT_POLL_INTERVAL_US),
            keepalive_interval: Duration::from_millis(KEEPALIVE_INTERVAL_MS),
            restart_delay: Duration::from_millis(FEED_RESTART_DELAY_MS),
            feed_capacity: FEED_CAPACITY,
            allowed_origins: AllowedOrigins::Any,
        }
    }
}

impl BridgeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let http_bind = lookup("HTTP_BIND")
            .map(|value| parse_addr::<IpAddr>("HTTP_BIND", &value))
            .transpose()?
            .unwrap_or(defaults.http_addr.ip());
        let http_port = parse_number(&lookup, "HTTP_PORT").unwrap_or(DEFAULT_HTTP_PORT);

        let sim_host = match lookup("SIM_HOST") {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::Empty { key: "SIM_HOST" })
            }
            Some(value) => value.trim().to_string(),
            None => defaults.sim_host,
        };
        let sim_port = parse_number(&lookup, "SIM_PORT").unwrap_or(DEFAULT_SIM_PORT);

        let udp_bind = parse_addr::<SocketAddr>(
            "UDP_BIND",
            &lookup("UDP_BIND").unwrap_or_else(|| DEFAULT_UDP_BIND.to_string()),
        )?;

        let poll_interval = parse_number::<u64, _>(&lookup, "POLL_INTERVAL_US")
            .filter(|value| *value > 0)
            .map(Duration::from_micros)
            .unwrap_or(defaults.poll_interval);
        let keepalive_interval = parse_number::<u64, _>(&lookup, "KEEPALIVE_INTERVAL_MS")
            .filter(|value| *value > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.keepalive_interval);
        let feed_capacity = parse_number::<usize, _>(&lookup, "FEED_CAPACITY")
            .filter(|value| *value > 0)
            .unwrap_or(defaults.feed_capacity);
        let allowed_origins = lookup("CORS_ALLOW_ORIGINS")
            .map(|value| AllowedOrigins::parse(&value))
            .unwrap_or(defaults.allowed_origins);

        Ok(Self {
            http_addr: SocketAddr::new(http_bind, http_port),
            sim_host,
            sim_port,
            udp_bind,
            poll_interval,
            keepalive_interval,
            restart_delay: defaults.restart_delay,
            feed_capacity,
            allowed_origins,
        })
    }
}

fn parse_number<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|value| value.trim().parse::<T>().ok())
}

fn parse_addr<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidAddress {
            key,
            value: value.to_string(),
        })
}
