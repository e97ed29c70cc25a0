// Network helpers for the simulator UDP socket.

use std::io;
use std::net::SocketAddr;

use tokio::net::{lookup_host, UdpSocket};
use tracing::info;

pub async fn bind_udp_socket(bind_addr: SocketAddr) -> io::Result<UdpSocket> {
    let socket = UdpSocket::bind(bind_addr).await?;
    info!(local_addr = %socket.local_addr()?, "udp socket bound");
    Ok(socket)
}

/// Resolves the simulator endpoint, preferring an address family the local socket can reach.
pub async fn resolve_simulator_addr(host: &str, port: u16, local: SocketAddr) -> io::Result<SocketAddr> {
    let candidates: Vec<SocketAddr> = lookup_host((host, port)).await?.collect();
    candidates
        .iter()
        .find(|addr| addr.is_ipv4() == local.is_ipv4())
        .or_else(|| candidates.first())
        .copied()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address found for {host}:{port}"),
            )
        })
}
