//! HTTP adapter - the REST surface over the flow dispatcher.

pub mod flows;

use std::time::Duration;

use axum::Router;
use http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use flows::{flows_router, FlowsAppState};

/// Builds the full application router with transport layers applied.
pub fn app_router(state: FlowsAppState, server: &ServerConfig) -> Router {
    flows_router()
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_secs,
        )))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS from the configured origins. With none configured, development
/// environments allow any origin and production allows none.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() && !server.is_production() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockGenerationProvider;
    use crate::adapters::prompts::InMemoryPromptStore;
    use crate::adapters::validation::JsonSchemaValidator;
    use crate::application::{FlowDispatcher, FlowServices};
    use crate::config::Environment;
    use crate::ports::GenerationPort;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> FlowsAppState {
        let provider = MockGenerationProvider::new();
        let info = provider.provider_info();
        FlowsAppState::new(
            FlowDispatcher::new(FlowServices::new(
                Arc::new(provider),
                Arc::new(InMemoryPromptStore::new()),
                Arc::new(JsonSchemaValidator::new()),
            )),
            info,
        )
    }

    #[tokio::test]
    async fn configured_origin_is_echoed() {
        let server = ServerConfig {
            cors_origins: Some("http://localhost:5173".to_string()),
            environment: Environment::Production,
            ..Default::default()
        };

        let response = app_router(state(), &server)
            .oneshot(
                Request::builder()
                    .uri("/flows")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://localhost:5173"))
        );
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = app_router(state(), &ServerConfig::default())
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
