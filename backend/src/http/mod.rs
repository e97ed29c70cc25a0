// HTTP handlers and routing.

use axum::extract::State as AxumState;
use axum::http::{HeaderValue, Method};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::app::{monotonic_ms, AppState};
use crate::config::AllowedOrigins;
use crate::constants::TELEMETRY_ROUTE;
use crate::ws::ws_handler;

mod types;
use types::*;

pub fn router(app_state: AppState, origins: &AllowedOrigins) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route(TELEMETRY_ROUTE, get(ws_handler))
        .layer(cors_layer(origins))
        .with_state(app_state)
}

fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);
    match origins {
        AllowedOrigins::Any => layer.allow_origin(Any),
        AllowedOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(%origin, "ignoring invalid cors origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(values))
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

async fn status(AxumState(app_state): AxumState<AppState>) -> impl IntoResponse {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        uptime_ms: monotonic_ms(app_state.start_instant),
        clients: app_state.tx.receiver_count(),
        feed: app_state.stats.snapshot(),
    })
}
