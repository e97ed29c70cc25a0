// Telemetry bridge: keepalive plus receive-decode-forward over one shared UDP socket.
// Invariants: frames are published in arrival order; a failed feed run is restarted, never fatal.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::app::{AppState, FeedStats};
use crate::config::BridgeConfig;
use crate::constants::RECV_BUFFER_LEN;
use crate::net::resolve_simulator_addr;
use crate::tasks::keepalive_task;
use crate::telemetry::publish_frame;
use crate::udp::{ReceiveError, Received, TelemetrySource};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to bind udp socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to resolve simulator {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Receive(#[from] ReceiveError),
}

#[derive(Clone, Debug)]
pub struct BridgeSettings {
    pub sim_host: String,
    pub sim_port: u16,
    pub udp_bind: SocketAddr,
    pub poll_interval: Duration,
    pub keepalive_interval: Duration,
    pub restart_delay: Duration,
}

impl From<&BridgeConfig> for BridgeSettings {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            sim_host: config.sim_host.clone(),
            sim_port: config.sim_port,
            udp_bind: config.udp_bind,
            poll_interval: config.poll_interval,
            keepalive_interval: config.keepalive_interval,
            restart_delay: config.restart_delay,
        }
    }
}

pub struct TelemetryBridge {
    settings: BridgeSettings,
    tx: broadcast::Sender<String>,
    stats: Arc<FeedStats>,
    start: Instant,
}

impl TelemetryBridge {
    pub fn new(settings: BridgeSettings, app_state: &AppState) -> Self {
        Self {
            settings,
            tx: app_state.tx.clone(),
            stats: app_state.stats.clone(),
            start: app_state.start_instant,
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }

    /// Runs feed after feed until cancelled. Each run binds a fresh socket.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            let run_cancel = cancel.child_token();
            let result = tokio::select! {
                _ = cancel.cancelled() => Ok(()),
                result = self.run_feed(run_cancel.clone()) => result,
            };
            run_cancel.cancel();

            match result {
                Ok(()) => break,
                Err(err) => {
                    warn!(
                        %err,
                        retry_ms = self.settings.restart_delay.as_millis() as u64,
                        "telemetry feed stopped, restarting"
                    );
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = time::sleep(self.settings.restart_delay) => {}
            }
        }
        info!("telemetry bridge stopped");
    }

    async fn run_feed(&self, cancel: CancellationToken) -> Result<(), BridgeError> {
        let settings = &self.settings;
        let source = TelemetrySource::bind(settings.udp_bind)
            .await
            .map_err(|source| BridgeError::Bind {
                addr: settings.udp_bind,
                source,
            })?;
        let local = source.local_addr().unwrap_or(settings.udp_bind);
        let target = resolve_simulator_addr(&settings.sim_host, settings.sim_port, local)
            .await
            .map_err(|source| BridgeError::Resolve {
                host: settings.sim_host.clone(),
                port: settings.sim_port,
                source,
            })?;
        info!(%local, %target, "telemetry feed started");

        let keepalive = tokio::spawn(keepalive_task(
            source.socket(),
            target,
            settings.keepalive_interval,
            cancel.clone(),
        ));

        let result = forward_loop(
            &source,
            &self.tx,
            &self.stats,
            self.start,
            settings.poll_interval,
            &cancel,
        )
        .await;

        cancel.cancel();
        let _ = keepalive.await;
        result.map_err(BridgeError::from)
    }
}

/// Polls the source until cancelled, yielding `poll_interval` whenever no datagram is ready.
pub async fn forward_loop(
    source: &TelemetrySource,
    tx: &broadcast::Sender<String>,
    stats: &FeedStats,
    start: Instant,
    poll_interval: Duration,
    cancel: &CancellationToken,
) -> Result<(), ReceiveError> {
    let mut buf = [0u8; RECV_BUFFER_LEN];
    while !cancel.is_cancelled() {
        match source.try_receive(&mut buf)? {
            Received::Frame(frame) => {
                publish_frame(frame, tx, stats, start);
                // Hand the scheduler back between frames during a burst.
                tokio::task::yield_now().await;
            }
            Received::NoData => {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = time::sleep(poll_interval) => {}
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UdpSocket;

    #[tokio::test]
    async fn forward_loop_returns_when_cancelled() {
        let source = TelemetrySource::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let (tx, _) = broadcast::channel(4);
        let stats = FeedStats::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = forward_loop(
            &source,
            &tx,
            &stats,
            Instant::now(),
            Duration::from_millis(1),
            &cancel,
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn forward_loop_skips_short_frames() {
        let source = TelemetrySource::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let target = source.local_addr().unwrap();
        let (tx, mut rx) = broadcast::channel(4);
        let stats = Arc::new(FeedStats::default());
        let cancel = CancellationToken::new();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(&[0u8; 40], target).await.unwrap();
        let mut valid = [0u8; 80];
        valid[68..72].copy_from_slice(&4000.0f32.to_le_bytes());
        valid[72..76].copy_from_slice(&8000.0f32.to_le_bytes());
        sender.send_to(&valid, target).await.unwrap();

        let loop_stats = stats.clone();
        let loop_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            forward_loop(
                &source,
                &tx,
                &loop_stats,
                Instant::now(),
                Duration::from_millis(1),
                &loop_cancel,
            )
            .await
        });

        let payload = time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("message within timeout")
            .unwrap();
        assert!(payload.contains("\"rpmPercent\":50"));

        cancel.cancel();
        task.await.unwrap().unwrap();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.frames_received, 2);
        assert_eq!(snapshot.frames_discarded, 1);
        assert_eq!(snapshot.messages_published, 1);
    }
}
