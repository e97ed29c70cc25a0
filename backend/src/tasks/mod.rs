// Background keepalive task that keeps the simulator streaming.
// Invariants: fixed cadence, no backoff; send failures never end the task.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use telemetry_core::ControlDatagram;
use tokio::net::UdpSocket;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[async_trait]
pub trait ControlSink: Send + Sync {
    async fn send_control(&self, payload: &[u8], target: SocketAddr) -> io::Result<usize>;
}

#[async_trait]
impl ControlSink for UdpSocket {
    async fn send_control(&self, payload: &[u8], target: SocketAddr) -> io::Result<usize> {
        self.send_to(payload, target).await
    }
}

pub async fn keepalive_task<S>(
    sink: Arc<S>,
    target: SocketAddr,
    period: Duration,
    cancel: CancellationToken,
) where
    S: ControlSink + ?Sized,
{
    let handshake = ControlDatagram::Handshake.encode();
    let subscribe = ControlDatagram::Subscribe.encode();
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(%target, period_ms = period.as_millis() as u64, "keepalive task started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                for payload in [&handshake, &subscribe] {
                    if let Err(err) = sink.send_control(payload, target).await {
                        debug!(?err, %target, "keepalive send failed");
                    }
                }
            }
        }
    }
    info!(%target, "keepalive task stopped");
}
