//! Prometheus request metrics.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

const NAMESPACE: &str = "cogbattery";
const ENDPOINT: &str = "/metrics";

/// Build the request metrics middleware, which also serves `/metrics`.
///
/// Probe traffic is excluded so scrape counters reflect participant requests.
pub(crate) fn request_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(NAMESPACE)
        .endpoint(ENDPOINT)
        .exclude("/health/ready")
        .exclude("/health/live")
        .build()
        .map_err(|err| std::io::Error::other(format!("prometheus metrics setup failed: {err}")))
}
