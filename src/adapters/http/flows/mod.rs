//! HTTP adapter for flow invocation.
//!
//! # Endpoints
//!
//! - `GET /health` - Liveness and provider capabilities
//! - `GET /flows` - Names of every registered flow
//! - `POST /flows/:name` - Run a flow on a JSON input document

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{FlowApiError, FlowsAppState};
pub use routes::flows_router;
