// WebSocket stream endpoint: one forwarding session per connected dashboard.

use std::net::SocketAddr;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, State as AxumState};
use axum::response::IntoResponse;
use futures::StreamExt;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::app::AppState;

pub async fn ws_handler(
    AxumState(app_state): AxumState<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, peer))
}

async fn handle_socket(mut socket: WebSocket, app_state: AppState, peer: SocketAddr) {
    let mut rx = app_state.tx.subscribe();
    info!(%peer, clients = app_state.tx.receiver_count(), "ws connected");

    let mut skipped: u64 = 0;
    loop {
        tokio::select! {
            outbound = rx.recv() => {
                match outbound {
                    Ok(payload) => {
                        if socket.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        skipped += count;
                        debug!(%peer, count, "ws client lagging, oldest messages dropped");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            inbound = socket.next() => {
                match inbound {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(%peer, ?err, "ws error");
                        break;
                    }
                    None => break,
                }
            }
        }
    }
    drop(rx);
    info!(%peer, skipped, clients = app_state.tx.receiver_count(), "ws disconnected");
}
