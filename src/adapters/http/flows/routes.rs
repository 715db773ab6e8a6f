//! Route configuration for flow endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{health, invoke_flow, list_flows, FlowsAppState};

/// Creates the flows router.
///
/// Routes:
/// - `GET /health` - Liveness and provider info
/// - `GET /flows` - Registered flow names
/// - `POST /flows/:name` - Run a flow
pub fn flows_router() -> Router<FlowsAppState> {
    Router::new()
        .route("/health", get(health))
        .route("/flows", get(list_flows))
        .route("/flows/:name", post(invoke_flow))
}
