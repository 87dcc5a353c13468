use crate::error::TelemetryError;
use opentelemetry::global;
use opentelemetry_sdk::metrics::MeterProvider;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset and no verbosity flag is given.
const DEFAULT_FILTER: &str = "warn,kelp_kv=info";

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `--debug` selects `debug`, `--verbose`
/// selects `info`, and the default keeps dependencies at `warn`.
pub fn init_logging(verbose: bool, debug: bool) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(default_directive(verbose, debug))
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

fn default_directive(verbose: bool, debug: bool) -> &'static str {
    if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        DEFAULT_FILTER
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub enable_metrics: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enable_metrics: true,
        }
    }
}

impl From<&crate::config::TelemetrySettings> for TelemetryConfig {
    fn from(settings: &crate::config::TelemetrySettings) -> Self {
        Self {
            enable_metrics: settings.enable_metrics,
        }
    }
}

pub struct TelemetryService {
    config: TelemetryConfig,
}

impl TelemetryService {
    pub fn new(config: TelemetryConfig) -> Self {
        if config.enable_metrics {
            // SDK provider for push-based export; without it every instrument is a no-op.
            let provider = MeterProvider::builder().build();
            global::set_meter_provider(provider);
        }

        Self { config }
    }

    pub fn metrics_enabled(&self) -> bool {
        self.config.enable_metrics
    }
}

pub fn init_telemetry() -> Result<TelemetryService, TelemetryError> {
    init_telemetry_with_config(TelemetryConfig::default())
}

pub fn init_telemetry_with_config(config: TelemetryConfig) -> Result<TelemetryService, TelemetryError> {
    let service = TelemetryService::new(config);

    if !service.metrics_enabled() {
        info!("Metrics collection disabled");
        return Ok(service);
    }

    crate::metrics::Metrics::init();
    info!("OpenTelemetry metrics initialized");
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false, false), DEFAULT_FILTER);
        assert_eq!(default_directive(true, false), "info");
        assert_eq!(default_directive(true, true), "debug");
        assert_eq!(default_directive(false, true), "debug");
    }

    #[test]
    fn test_directives_parse() {
        for directive in [DEFAULT_FILTER, "info", "debug"] {
            assert!(EnvFilter::try_new(directive).is_ok());
        }
    }

    #[test]
    fn test_disabled_metrics() {
        let service = init_telemetry_with_config(TelemetryConfig {
            enable_metrics: false,
        })
        .unwrap();
        assert!(!service.metrics_enabled());
    }

    #[test]
    fn test_enabled_metrics() {
        let service = init_telemetry().unwrap();
        assert!(service.metrics_enabled());
        crate::metrics::Metrics::get().record_command("ping", 0.0);
    }

    #[test]
    fn test_config_from_settings() {
        let settings = crate::config::TelemetrySettings {
            enable_metrics: false,
        };
        assert!(!TelemetryConfig::from(&settings).enable_metrics);
    }
}
