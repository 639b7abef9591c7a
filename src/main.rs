//! Interview orchestrator server.
//!
//! Wires configuration, tracing, adapters and the interview service into an
//! axum server.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use interview_orchestrator::adapters::ai::{OpenAIConfig, OpenAIProvider};
use interview_orchestrator::adapters::competency::{
    HttpCompetencyTracker, HttpTrackerConfig, InMemoryCompetencyTracker,
};
use interview_orchestrator::adapters::http::{api_router, InterviewAppState};
use interview_orchestrator::adapters::storage::{FileSessionStore, InMemorySessionStore};
use interview_orchestrator::application::{
    Collaborator, CollaboratorConfig, EngineConfig, ExtractionParams, InterviewService,
};
use interview_orchestrator::config::{
    AiConfig, AppConfig, InterviewConfig, ServerConfig, ValidationError,
};
use interview_orchestrator::ports::{CompetencyTracker, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let addr = config.server.socket_addr()?;
    let service = Arc::new(build_service(&config)?);
    let app = with_middleware(api_router(InterviewAppState::new(service)), &config.server);

    tracing::info!(
        addr = %addr,
        environment = ?config.server.environment,
        model = %config.ai.model,
        "Interview orchestrator listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// JSON logs in production, pretty logs otherwise. `RUST_LOG` wins over the config.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));

    if server.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).pretty().init();
    }
}

fn build_service(config: &AppConfig) -> Result<InterviewService, Box<dyn std::error::Error>> {
    let api_key = config
        .ai
        .api_key
        .clone()
        .ok_or(ValidationError::MissingRequired("AI__API_KEY"))?;
    let provider = OpenAIProvider::new(
        OpenAIConfig::from_secret(api_key)
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    )?;
    let collaborator = Collaborator::new(Arc::new(provider), collaborator_config(&config.ai));

    let store: Arc<dyn SessionStore> = match config.storage.data_dir() {
        Some(dir) => {
            tracing::info!(data_dir = %dir.display(), "Using file session store");
            Arc::new(FileSessionStore::new(dir))
        }
        None => {
            tracing::warn!("No data_dir configured, sessions are kept in memory only");
            Arc::new(InMemorySessionStore::new())
        }
    };

    let tracker: Arc<dyn CompetencyTracker> = match config.competency.endpoint() {
        Some(endpoint) => Arc::new(HttpCompetencyTracker::new(
            HttpTrackerConfig::new(endpoint).with_timeout(config.competency.timeout()),
        )?),
        None => Arc::new(InMemoryCompetencyTracker::new()),
    };

    Ok(InterviewService::new(
        collaborator,
        store,
        tracker,
        engine_config(&config.interview),
    ))
}

fn collaborator_config(ai: &AiConfig) -> CollaboratorConfig {
    CollaboratorConfig {
        timeout: ai.timeout(),
        max_retries: ai.max_retries,
        retry_base_delay: ai.retry_base_delay(),
    }
}

fn engine_config(interview: &InterviewConfig) -> EngineConfig {
    EngineConfig {
        reply_temperature: interview.reply_temperature,
        reply_max_tokens: interview.reply_max_tokens,
        extraction: ExtractionParams {
            temperature: interview.extraction_temperature,
            max_tokens: interview.extraction_max_tokens,
        },
        context_messages: interview.context_messages,
        question_cache_ttl: interview.question_cache_ttl(),
        repetition_limit: interview.repetition_limit,
        history_capacity: interview.history_capacity,
    }
}

fn with_middleware(router: Router, server: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    router
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
