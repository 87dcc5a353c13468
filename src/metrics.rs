use opentelemetry::metrics::{Counter, Histogram, UpDownCounter};
use opentelemetry::{global, KeyValue};
use std::sync::OnceLock;
use std::time::Instant;

/// OpenTelemetry metrics for server observability.
///
/// Tracks connections, commands and errors. Singleton instance accessed via
/// `Metrics::get()`. Recording is a no-op until a meter provider is installed.
pub struct Metrics {
    // Connection metrics
    pub connections_total: Counter<u64>,
    pub connections_active: UpDownCounter<i64>,

    // Command metrics
    pub commands_total: Counter<u64>,
    pub command_duration: Histogram<f64>,
    pub command_errors_total: Counter<u64>,

    pub protocol_errors_total: Counter<u64>,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

impl Metrics {
    pub fn init() -> &'static Self {
        METRICS.get_or_init(|| {
            let meter = global::meter("kelp-kv");

            Metrics {
                connections_total: meter
                    .u64_counter("kelp_connections_total")
                    .with_description("Total number of accepted client connections")
                    .init(),

                connections_active: meter
                    .i64_up_down_counter("kelp_connections_active")
                    .with_description("Number of open client connections")
                    .init(),

                commands_total: meter
                    .u64_counter("kelp_commands_total")
                    .with_description("Total number of commands executed")
                    .init(),

                command_duration: meter
                    .f64_histogram("kelp_command_duration_seconds")
                    .with_description("Command execution duration in seconds")
                    .init(),

                command_errors_total: meter
                    .u64_counter("kelp_command_errors_total")
                    .with_description("Total number of error replies")
                    .init(),

                protocol_errors_total: meter
                    .u64_counter("kelp_protocol_errors_total")
                    .with_description("Total number of connections closed on a framing error")
                    .init(),
            }
        })
    }

    pub fn get() -> &'static Self {
        METRICS.get().unwrap_or_else(|| Self::init())
    }

    pub fn record_command(&self, command: &str, duration: f64) {
        let labels = &[KeyValue::new("command", command.to_string())];
        self.commands_total.add(1, labels);
        self.command_duration.record(duration, labels);
    }

    pub fn record_error(&self, error_type: &str, command: Option<&str>) {
        let mut labels = vec![KeyValue::new("error_type", error_type.to_string())];
        if let Some(cmd) = command {
            labels.push(KeyValue::new("command", cmd.to_string()));
        }
        self.command_errors_total.add(1, &labels);
    }

    pub fn record_protocol_error(&self) {
        self.protocol_errors_total.add(1, &[]);
    }

    pub fn increment_connections(&self) {
        self.connections_total.add(1, &[]);
        self.connections_active.add(1, &[]);
    }

    pub fn decrement_connections(&self) {
        self.connections_active.add(-1, &[]);
    }
}

// Timer utility for measuring durations
pub struct Timer {
    start: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
