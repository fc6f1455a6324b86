use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,wxc=debug";

/// Initialize logging for a job binary.
/// - JSON logs, one object per line, so the scheduler's log capture can parse them
/// - RUST_LOG respected; default to "info,wxc=debug"
pub fn init(job_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second init (e.g. from a test harness) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init();

    tracing::info!(job = %job_name, "Logging initialized");
}
