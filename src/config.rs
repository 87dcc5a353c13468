use crate::cli::Cli;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

/// Main configuration combining server and telemetry settings.
///
/// Can be loaded from files, env vars, or CLI args with precedence order:
/// CLI > File > Environment > Defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_connections: default_max_connections(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Validation("host must not be empty".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Validation(
                "max_connections must be at least 1".to_string(),
            ));
        }
        // Connection slots are semaphore permits.
        if self.max_connections > Semaphore::MAX_PERMITS {
            return Err(ConfigError::Validation(format!(
                "max_connections must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default = "default_enable_metrics")]
    pub enable_metrics: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enable_metrics: default_enable_metrics(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_max_connections() -> usize {
    1024
}

fn default_enable_metrics() -> bool {
    true
}

impl Config {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("KELP_HOST") {
            config.server.host = host;
        }

        if let Some(port) = lookup("KELP_PORT") {
            config.server.port = parse_var("KELP_PORT", &port)?;
        }

        if let Some(max) = lookup("KELP_MAX_CONNECTIONS") {
            config.server.max_connections = parse_var("KELP_MAX_CONNECTIONS", &max)?;
        }

        if let Some(flag) = lookup("KELP_METRICS") {
            config.telemetry.enable_metrics = match flag.to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => true,
                "0" | "false" | "off" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "KELP_METRICS",
                        value: flag,
                    })
                }
            };
        }

        Ok(config)
    }

    /// Create config with CLI args taking precedence over file and environment.
    ///
    /// Precedence: CLI > File > Environment > Defaults
    pub fn from_sources(cli: &Cli) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;
        Self::merge(cli, env_config)
    }

    fn merge(cli: &Cli, env_config: Config) -> Result<Self, ConfigError> {
        let file_config = cli
            .config
            .as_ref()
            .map(Self::load_from_file)
            .transpose()?;
        let base = file_config.unwrap_or(env_config);

        let config = Config {
            server: ServerConfig {
                host: cli.host.clone().unwrap_or(base.server.host),
                port: cli.port.unwrap_or(base.server.port),
                max_connections: cli.max_connections.unwrap_or(base.server.max_connections),
            },
            telemetry: TelemetrySettings {
                enable_metrics: !cli.no_metrics && base.telemetry.enable_metrics,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot start with. Port 0 is allowed and
    /// means "any free port".
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()
    }

    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        value: value.to_string(),
    })
}
