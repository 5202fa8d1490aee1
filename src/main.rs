use std::sync::Arc;

use med_assistant::api::{build_router, AppState};
use med_assistant::config::Config;
use med_assistant::engine::{ResolutionEngine, SafetyConfig, SafetyFilter};
use med_assistant::history::ChatLog;
use med_assistant::knowledge::{
    load_source, register_verified_facts, CannedResponses, TopicMatcher, VerifiedStore,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    dotenvy::dotenv().ok();

    let config_path = std::env::args().nth(1);
    let config = match Config::load(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            // Malformed configuration is reported once; the service still
            // starts with defaults rather than refusing to answer
            eprintln!("Failed to load configuration: {}, using defaults", e);
            Config::default()
        }
    };

    init_logging(&config);

    // Build the verified knowledge store: built-in facts first, then file
    // sources layered on top
    let mut verified = VerifiedStore::new();
    register_verified_facts(&mut verified);

    for source in &config.knowledge.verified_sources {
        match load_source(std::path::Path::new(source)) {
            Ok(entries) => verified.merge(entries),
            Err(e) => {
                // Missing or malformed sources degrade to builtin-only
                // knowledge; startup proceeds
                warn!(source = %source, "skipping knowledge source: {}", e);
            }
        }
    }
    info!(entries = verified.len(), "verified knowledge store ready");

    // Generative tier is optional; a failed probe degrades to
    // knowledge-base-only mode
    let model_id = config.model.as_ref().map(|m| m.model_id.clone());
    let provider = med_assistant::generation::init_provider(config.model.clone()).await;

    let mut engine = ResolutionEngine::new(
        verified,
        TopicMatcher::new(),
        CannedResponses::standard(),
        SafetyFilter::new(SafetyConfig::default()),
    );
    if let Some(provider) = provider {
        engine = engine.with_provider(provider);
    }
    let model_loaded = engine.has_provider();

    let history = ChatLog::open(&config.history);

    let state = AppState {
        engine: Arc::new(engine),
        history: Arc::new(history),
        model_id: if model_loaded { model_id } else { None },
    };

    let router = build_router(state, config.server.max_body_bytes);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, model_loaded, "medical assistant server ready");

    if let Err(e) = axum::serve(listener, router).await {
        error!("server error: {}", e);
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
