use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Logs go to stderr so stdout stays free for command output.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Register descriptions for every metric the engine emits.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "static_publish_jobs_enqueued_total",
            Unit::Count,
            "Total number of static cache jobs accepted by the job queue."
        );
        describe_counter!(
            "static_publish_urls_enqueued_total",
            Unit::Count,
            "Total number of URLs carried by accepted static cache jobs."
        );
        describe_counter!(
            "static_publish_submit_failed_total",
            Unit::Count,
            "Total number of static cache jobs the job queue rejected."
        );
        describe_counter!(
            "static_publish_collect_total",
            Unit::Count,
            "Total number of change collections answered by a change provider."
        );
        describe_histogram!(
            "static_publish_flush_ms",
            Unit::Milliseconds,
            "Latency of flushing a pending change set in milliseconds."
        );
    });
}
