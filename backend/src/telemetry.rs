// Frame handling shared by the receive loop: decode, project, publish.

use telemetry_core::{decode, TelemetryMessage};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{trace, warn};

use crate::app::FeedStats;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Published,
    Discarded,
}

pub fn publish_frame(
    frame: &[u8],
    tx: &broadcast::Sender<String>,
    stats: &FeedStats,
    start: Instant,
) -> FrameOutcome {
    stats.record_frame(start);

    let sample = match decode(frame) {
        Ok(sample) => sample,
        Err(err) => {
            trace!(%err, "frame discarded");
            stats.record_discard();
            return FrameOutcome::Discarded;
        }
    };

    let message = TelemetryMessage::from(&sample);
    let payload = match serde_json::to_string(&message) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(?err, "failed to serialize telemetry message");
            stats.record_discard();
            return FrameOutcome::Discarded;
        }
    };

    // No subscribers is not an error; the frame is simply dropped.
    match tx.send(payload) {
        Ok(receivers) => {
            trace!(receivers, rpm = message.rpm, "telemetry published");
            stats.record_publish();
        }
        Err(_) => trace!(rpm = message.rpm, "no subscribers, telemetry dropped"),
    }
    FrameOutcome::Published
}
