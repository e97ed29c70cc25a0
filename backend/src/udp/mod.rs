// UDP telemetry source.
// Invariants: never blocks; raw payloads are handed on without logging their bytes.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::debug;

use crate::net::bind_udp_socket;

#[derive(Debug, Error)]
pub enum ReceiveError {
    #[error("udp receive failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Received<'a> {
    Frame(&'a [u8]),
    NoData,
}

pub struct TelemetrySource {
    socket: Arc<UdpSocket>,
}

impl TelemetrySource {
    pub async fn bind(bind_addr: SocketAddr) -> io::Result<Self> {
        let socket = bind_udp_socket(bind_addr).await?;
        Ok(Self::from_socket(Arc::new(socket)))
    }

    pub fn from_socket(socket: Arc<UdpSocket>) -> Self {
        Self { socket }
    }

    /// Socket handle shared with the keepalive task; the simulator streams
    /// back to whichever address the handshake was sent from.
    pub fn socket(&self) -> Arc<UdpSocket> {
        self.socket.clone()
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn try_receive<'a>(&self, buf: &'a mut [u8]) -> Result<Received<'a>, ReceiveError> {
        match self.socket.try_recv_from(buf) {
            Ok((len, _source)) => Ok(Received::Frame(&buf[..len])),
            Err(err) if is_transient(&err) => {
                if err.kind() != io::ErrorKind::WouldBlock {
                    debug!(kind = ?err.kind(), "transient udp receive error");
                }
                Ok(Received::NoData)
            }
            Err(err) => Err(ReceiveError::Io(err)),
        }
    }
}

// ConnectionReset/Refused echo an ICMP port-unreachable for a keepalive sent
// while the simulator was not listening.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock
            | io::ErrorKind::Interrupted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::time::{self, Instant};

    async fn local_source() -> TelemetrySource {
        TelemetrySource::bind("127.0.0.1:0".parse().unwrap())
            .await
            .expect("bind source")
    }

    #[tokio::test]
    async fn empty_socket_reports_no_data_without_blocking() {
        let source = local_source().await;
        let mut buf = [0u8; 64];
        let started = Instant::now();
        assert_eq!(source.try_receive(&mut buf).unwrap(), Received::NoData);
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn returns_datagram_bytes() {
        let source = local_source().await;
        let target = source.local_addr().unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(&[7u8; 96], target).await.unwrap();

        let mut buf = [0u8; 2048];
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match source.try_receive(&mut buf).unwrap() {
                Received::Frame(frame) => {
                    assert_eq!(frame.len(), 96);
                    assert!(frame.iter().all(|byte| *byte == 7));
                    break;
                }
                Received::NoData => {
                    assert!(Instant::now() < deadline, "datagram never arrived");
                    time::sleep(Duration::from_millis(1)).await;
                }
            }
        }
    }

    #[test]
    fn classifies_errors() {
        assert!(is_transient(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(is_transient(&io::Error::from(io::ErrorKind::ConnectionReset)));
        assert!(!is_transient(&io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(!is_transient(&io::Error::from(io::ErrorKind::InvalidInput)));
    }
}
