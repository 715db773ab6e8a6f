//! agent-flows server binary.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use agent_flows::adapters::http::{app_router, FlowsAppState};
use agent_flows::adapters::{
    FilePromptStore, GeminiConfig, GeminiProvider, InMemoryPromptStore, JsonSchemaValidator,
    MockGenerationProvider,
};
use agent_flows::application::{FlowDispatcher, FlowServices};
use agent_flows::config::{AiConfig, AiProvider, AppConfig, LogFormat, ServerConfig, ValidationError};
use agent_flows::ports::{GenerationPort, PromptStore, SchemaValidator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let validator: Arc<dyn SchemaValidator> = Arc::new(JsonSchemaValidator::new());
    let generator = build_generator(&config.ai, validator.clone())?;
    let provider = generator.provider_info();
    let prompts = build_prompt_store(&config);

    let services = FlowServices::new(generator, prompts, validator);
    let state = FlowsAppState::new(FlowDispatcher::new(services), provider.clone());
    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        provider = %provider.name,
        model = %provider.model,
        environment = ?config.server.environment,
        "agent-flows listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("agent-flows stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    match server.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

fn build_generator(
    ai: &AiConfig,
    validator: Arc<dyn SchemaValidator>,
) -> Result<Arc<dyn GenerationPort>, Box<dyn std::error::Error>> {
    match ai.provider {
        AiProvider::Gemini => {
            let key = ai
                .gemini_api_key
                .as_ref()
                .ok_or(ValidationError::MissingRequired("AI__GEMINI_API_KEY"))?;
            let provider = GeminiProvider::new(
                GeminiConfig::new(key.expose_secret().as_str())
                    .with_model(&ai.model)
                    .with_base_url(&ai.base_url)
                    .with_timeout(ai.timeout()),
                validator,
            )?;
            Ok(Arc::new(provider))
        }
        AiProvider::Mock => {
            tracing::warn!("Using mock generation provider; responses are canned");
            Ok(Arc::new(MockGenerationProvider::new()))
        }
    }
}

fn build_prompt_store(config: &AppConfig) -> Arc<dyn PromptStore> {
    match &config.prompts.directory {
        Some(dir) => {
            tracing::info!(directory = %dir.display(), "Reading prompts from directory");
            Arc::new(FilePromptStore::new(dir.clone()))
        }
        None => {
            tracing::info!("Serving built-in prompts");
            Arc::new(InMemoryPromptStore::with_builtin_personas())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
