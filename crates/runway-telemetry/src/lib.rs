mod funnel;
mod monitor;

pub use funnel::{DwellSummary, FunnelQuery, FunnelRecorder, FunnelRow, FunnelSummary};
pub use monitor::{MonitoringSink, NullSink, WizardMonitor};

use std::path::PathBuf;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Configuration for the telemetry subsystem.
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    /// Default log level. Overridden by RUST_LOG env var.
    pub log_level: Level,
    /// Whether funnel events are recorded at all.
    pub funnel_enabled: bool,
    /// Path to the funnel database.
    pub funnel_db_path: PathBuf,
    /// How many days of funnel events to retain.
    pub funnel_retention_days: u32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        let runway_dir = dirs_fallback();
        Self {
            log_level: Level::INFO,
            funnel_enabled: true,
            funnel_db_path: runway_dir.join("database/funnel.db"),
            funnel_retention_days: 90,
        }
    }
}

/// Handle to the telemetry subsystem.
pub struct TelemetryGuard {
    funnel: Option<Arc<FunnelRecorder>>,
}

impl TelemetryGuard {
    /// Access the funnel recorder for recording and querying.
    pub fn funnel(&self) -> Option<Arc<FunnelRecorder>> {
        self.funnel.clone()
    }
}

/// Initialize the telemetry subsystem. Call once at startup.
/// A funnel DB that fails to open degrades to logging only; the wizard
/// itself never sees a telemetry error.
pub fn init_telemetry(config: TelemetryConfig) -> TelemetryGuard {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_lowercase()));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(fmt_layer).init();

    let funnel = if config.funnel_enabled {
        match FunnelRecorder::new(&config.funnel_db_path) {
            Ok(recorder) => Some(Arc::new(recorder)),
            Err(e) => {
                tracing::warn!("runway-telemetry: failed to open funnel DB: {e}");
                None
            }
        }
    } else {
        None
    };

    TelemetryGuard { funnel }
}

/// Fallback home dir for default paths.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join(".runway")
}
