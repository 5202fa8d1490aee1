//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, Counter, CounterVec, HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> =
    Lazy::new(|| Arc::new(Metrics::new().expect("Failed to initialize metrics")));

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Resolution metrics
    pub resolution_requests: CounterVec,
    pub resolution_duration: HistogramVec,

    // Generation metrics
    pub generation_requests: CounterVec,
    pub generation_duration: HistogramVec,
    pub generation_circuit_open: Counter,

    // Safety filter metrics
    pub safety_rejections: CounterVec,

    // Knowledge base metrics
    pub knowledge_entries_loaded: Counter,
    pub knowledge_shadowed_lookups: Counter,

    // Chat history metrics
    pub history_append_failures: Counter,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let resolution_requests = register_counter_vec_with_registry!(
            Opts::new(
                "resolution_requests_total",
                "Total resolution requests by answering tier"
            ),
            &["provenance"],
            registry
        )?;

        let resolution_duration = register_histogram_vec_with_registry!(
            "resolution_duration_seconds",
            "Resolution duration in seconds by answering tier",
            &["provenance"],
            registry
        )?;

        let generation_requests = register_counter_vec_with_registry!(
            Opts::new(
                "generation_requests_total",
                "Total generative model requests"
            ),
            &["status"],
            registry
        )?;

        let generation_duration = register_histogram_vec_with_registry!(
            "generation_duration_seconds",
            "Generative model request duration in seconds",
            &["operation"],
            registry
        )?;

        let generation_circuit_open = register_counter_with_registry!(
            Opts::new(
                "generation_circuit_open_total",
                "Requests rejected because the generation circuit breaker was open"
            ),
            registry
        )?;

        let safety_rejections = register_counter_vec_with_registry!(
            Opts::new(
                "safety_rejections_total",
                "Generated responses rejected by the safety filter"
            ),
            &["reason"],
            registry
        )?;

        let knowledge_entries_loaded = register_counter_with_registry!(
            Opts::new(
                "knowledge_entries_loaded_total",
                "Fact entries loaded into the knowledge stores"
            ),
            registry
        )?;

        let knowledge_shadowed_lookups = register_counter_with_registry!(
            Opts::new(
                "knowledge_shadowed_lookups_total",
                "Substring lookups where an earlier key shadowed a later match"
            ),
            registry
        )?;

        let history_append_failures = register_counter_with_registry!(
            Opts::new(
                "history_append_failures_total",
                "Chat history persistence failures"
            ),
            registry
        )?;

        Ok(Self {
            registry,
            resolution_requests,
            resolution_duration,
            generation_requests,
            generation_duration,
            generation_circuit_open,
            safety_rejections,
            knowledge_entries_loaded,
            knowledge_shadowed_lookups,
            history_append_failures,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a resolved request by provenance tag
    pub fn record_resolution(&self, provenance: &str, duration_secs: f64) {
        self.resolution_requests
            .with_label_values(&[provenance])
            .inc();
        self.resolution_duration
            .with_label_values(&[provenance])
            .observe(duration_secs);
    }

    /// Record a generation attempt
    pub fn record_generation(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.generation_requests.with_label_values(&[status]).inc();
    }

    /// Record a safety filter rejection
    pub fn record_safety_rejection(&self, reason: &str) {
        self.safety_rejections.with_label_values(&[reason]).inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
