//! Generative model integration
//!
//! The generative tier is optional: the service runs in
//! knowledge-base-only mode when no backend is configured or the startup
//! probe fails. Generation failures at query time are never fatal; the
//! resolution engine falls through to the next tier.

pub mod circuit_breaker;
pub mod client;
pub mod config;
pub mod provider;

pub use circuit_breaker::{BreakerState, CircuitBreaker, CircuitBreakerConfig};
pub use client::InferenceClient;
pub use config::ModelConfig;
pub use provider::{GenerationError, GenerationOptions, GenerativeProvider};

use std::sync::Arc;
use tracing::{info, warn};

/// Initialize the generative provider from configuration.
///
/// Returns `None` (knowledge-base-only mode) when no model section is
/// configured, the section is disabled, or the backend fails its readiness
/// probe. The failure is reported once here, not per request.
pub async fn init_provider(config: Option<ModelConfig>) -> Option<Arc<dyn GenerativeProvider>> {
    let config = match config {
        Some(c) => c.from_env(),
        None => {
            info!("no model configured, running in knowledge-base-only mode");
            return None;
        }
    };

    if !config.enabled {
        info!("generative model disabled by configuration");
        return None;
    }

    let model_id = config.model_id.clone();
    let endpoint = config.endpoint.clone();

    let client = match InferenceClient::new(config) {
        Ok(c) => c,
        Err(e) => {
            warn!("failed to create inference client: {}, degrading to knowledge-base-only mode", e);
            return None;
        }
    };

    match client.probe().await {
        Ok(()) => {
            info!(model = %model_id, endpoint = %endpoint, "generative model ready");
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!(
                model = %model_id,
                endpoint = %endpoint,
                "model backend not ready: {}, degrading to knowledge-base-only mode",
                e
            );
            None
        }
    }
}
