//! Connectivity endpoints
//!
//! Degraded connectivity sticks until a reconnect probe succeeds.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::AppState;
use crate::content::Connectivity;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/connectivity", get(get_connectivity))
        .route("/connectivity/reconnect", axum::routing::post(reconnect))
}

#[derive(Debug, Serialize)]
pub struct ConnectivityResponse {
    pub connectivity: Connectivity,
    /// Configured to never contact the content API
    pub offline: bool,
}

async fn get_connectivity(State(state): State<AppState>) -> Json<ConnectivityResponse> {
    Json(ConnectivityResponse {
        connectivity: state.connectivity.get(),
        offline: state.config.strapi.offline,
    })
}

/// POST /api/v1/connectivity/reconnect - probe the content API
async fn reconnect(State(state): State<AppState>) -> Json<ConnectivityResponse> {
    let offline = state.config.strapi.offline;
    if offline {
        tracing::info!("Offline mode configured, not probing the content API");
    } else {
        let connectivity = state.client.reconnect().await;
        state.connectivity.set(connectivity);
    }

    Json(ConnectivityResponse {
        connectivity: state.connectivity.get(),
        offline,
    })
}
