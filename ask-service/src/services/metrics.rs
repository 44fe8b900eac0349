//! Prometheus metrics for ask-service.

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

struct AskMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    upstream_latency_seconds: HistogramVec,
    upstream_tokens_total: IntCounterVec,
    context_chars: Histogram,
}

static METRICS: OnceLock<AskMetrics> = OnceLock::new();

impl AskMetrics {
    fn new() -> Self {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("ask_requests_total", "Total /ask requests by outcome"),
            &["outcome"],
        )
        .expect("Failed to create ask_requests_total metric");

        let upstream_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "ask_upstream_latency_seconds",
                "Upstream generation latency in seconds",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
            &["provider", "model"],
        )
        .expect("Failed to create ask_upstream_latency_seconds metric");

        let upstream_tokens_total = IntCounterVec::new(
            Opts::new("ask_upstream_tokens_total", "Tokens reported by the upstream"),
            &["model", "type"], // type: input, output
        )
        .expect("Failed to create ask_upstream_tokens_total metric");

        let context_chars = Histogram::with_opts(
            HistogramOpts::new("ask_context_chars", "Characters of context sent upstream")
                .buckets(vec![0.0, 1_000.0, 2_500.0, 5_000.0, 10_000.0, 14_000.0, 50_000.0]),
        )
        .expect("Failed to create ask_context_chars metric");

        registry
            .register(Box::new(requests_total.clone()))
            .expect("Failed to register ask_requests_total");
        registry
            .register(Box::new(upstream_latency_seconds.clone()))
            .expect("Failed to register ask_upstream_latency_seconds");
        registry
            .register(Box::new(upstream_tokens_total.clone()))
            .expect("Failed to register ask_upstream_tokens_total");
        registry
            .register(Box::new(context_chars.clone()))
            .expect("Failed to register ask_context_chars");

        Self {
            registry,
            requests_total,
            upstream_latency_seconds,
            upstream_tokens_total,
            context_chars,
        }
    }
}

/// Initialize all metrics. Safe to call more than once.
pub fn init_metrics() {
    if METRICS.get().is_none() {
        METRICS.get_or_init(AskMetrics::new);
        tracing::info!("Prometheus metrics initialized");
    }
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let Some(metrics) = METRICS.get() else {
        tracing::error!("Metrics registry not initialized");
        return "# Metrics registry not initialized\n".to_string();
    };

    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&metrics.registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

// Helper functions for recording metrics

/// Record a finished `/ask` request.
pub fn record_request(outcome: &str) {
    if let Some(metrics) = METRICS.get() {
        metrics.requests_total.with_label_values(&[outcome]).inc();
    }
}

/// Record upstream latency.
pub fn record_upstream_latency(provider: &str, model: &str, duration_secs: f64) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .upstream_latency_seconds
            .with_label_values(&[provider, model])
            .observe(duration_secs);
    }
}

/// Record token usage reported by the upstream.
pub fn record_tokens(model: &str, input_tokens: i32, output_tokens: i32) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .upstream_tokens_total
            .with_label_values(&[model, "input"])
            .inc_by(input_tokens.max(0) as u64);
        metrics
            .upstream_tokens_total
            .with_label_values(&[model, "output"])
            .inc_by(output_tokens.max(0) as u64);
    }
}

/// Record the size of the context built for a request.
pub fn record_context_chars(chars: usize) {
    if let Some(metrics) = METRICS.get() {
        metrics.context_chars.observe(chars as f64);
    }
}
