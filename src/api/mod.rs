//! HTTP surface for the clinic dashboard
//!
//! Serves the page shell and the HTML fragments it swaps in, a JSON stats
//! endpoint, and Prometheus metrics.

pub mod handlers;
pub mod routes;

pub use routes::configure;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the process-wide Prometheus recorder once and return its handle.
pub fn install_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    PROMETHEUS.get_or_try_init(|| PrometheusBuilder::new().install_recorder())
}
