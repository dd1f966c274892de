//! Metrics for the feed normalizers
//!
//! Thin wrappers over the `metrics` facade. Without an installed recorder the
//! calls are no-ops, so library users that never call [`init`] pay nothing.

use std::fmt;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// All metric names used in the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Seismic metrics
    SeismicFetchSuccess,
    SeismicFetchError,
    SeismicRecordsAccepted,
    SeismicRecordsRejected,

    // Weather metrics
    WeatherLiveFeatures,
    WeatherFallbackFeatures,
    WeatherAuthRejected,

    // Upstream requests
    UpstreamRequestDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::SeismicFetchSuccess => "sig_seismic_fetch_success_total",
            MetricName::SeismicFetchError => "sig_seismic_fetch_error_total",
            MetricName::SeismicRecordsAccepted => "sig_seismic_records_accepted_total",
            MetricName::SeismicRecordsRejected => "sig_seismic_records_rejected_total",
            MetricName::WeatherLiveFeatures => "sig_weather_live_features_total",
            MetricName::WeatherFallbackFeatures => "sig_weather_fallback_features_total",
            MetricName::WeatherAuthRejected => "sig_weather_auth_rejected_total",
            MetricName::UpstreamRequestDuration => "sig_upstream_request_duration_seconds",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus recorder and return a handle for rendering
pub fn init() -> Result<PrometheusHandle, String> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;
    info!("Metrics system initialized");
    Ok(handle)
}

pub mod seismic {
    use super::MetricName;

    pub fn fetch_success() {
        ::metrics::counter!(MetricName::SeismicFetchSuccess.as_str()).increment(1);
    }

    pub fn fetch_error() {
        ::metrics::counter!(MetricName::SeismicFetchError.as_str()).increment(1);
    }

    pub fn records_accepted(count: usize) {
        ::metrics::counter!(MetricName::SeismicRecordsAccepted.as_str()).increment(count as u64);
    }

    pub fn record_rejected() {
        ::metrics::counter!(MetricName::SeismicRecordsRejected.as_str()).increment(1);
    }
}

pub mod weather {
    use super::MetricName;

    pub fn live_feature() {
        ::metrics::counter!(MetricName::WeatherLiveFeatures.as_str()).increment(1);
    }

    pub fn fallback_features(count: usize) {
        ::metrics::counter!(MetricName::WeatherFallbackFeatures.as_str()).increment(count as u64);
    }

    pub fn auth_rejected() {
        ::metrics::counter!(MetricName::WeatherAuthRejected.as_str()).increment(1);
    }
}

pub mod upstream {
    use super::MetricName;

    /// Record how long one upstream GET took, labelled by host
    pub fn request_duration(host: &str, secs: f64) {
        ::metrics::histogram!(
            MetricName::UpstreamRequestDuration.as_str(),
            "host" => host.to_string()
        )
        .record(secs);
    }
}
