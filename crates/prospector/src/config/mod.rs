use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub collectors: CollectorConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let history_path = env::var("APP_STORAGE_PATH")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);
        let history_limit = env::var("APP_HISTORY_LIMIT")
            .unwrap_or_else(|_| DEFAULT_HISTORY_LIMIT.to_string())
            .parse::<usize>()
            .ok()
            .filter(|limit| (1..=MAX_HISTORY_LIMIT).contains(limit))
            .ok_or(ConfigError::InvalidHistoryLimit)?;

        let timeout_secs = env::var("APP_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;
        let user_agent = non_empty_var("APP_USER_AGENT", default_user_agent())?;
        let lighthouse_bin = non_empty_var("APP_LIGHTHOUSE_BIN", "lighthouse".to_string())?;
        let competitor_samples = match env::var("APP_COMPETITOR_SAMPLES") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                variable: "APP_COMPETITOR_SAMPLES",
            })?,
            Err(_) => false,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig {
                history_path,
                history_limit,
            },
            collectors: CollectorConfig {
                http_timeout: Duration::from_secs(timeout_secs),
                user_agent,
                lighthouse_bin,
                competitor_samples,
            },
        })
    }
}

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const MAX_HISTORY_LIMIT: usize = 1_000;

fn default_user_agent() -> String {
    format!("prospector/{}", env!("CARGO_PKG_VERSION"))
}

fn non_empty_var(variable: &'static str, default: String) -> Result<String, ConfigError> {
    match env::var(variable) {
        Ok(raw) if raw.trim().is_empty() => Err(ConfigError::EmptyValue { variable }),
        Ok(raw) => Ok(raw.trim().to_string()),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where analysis history lives. Without a path, history is kept in memory.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub history_path: Option<PathBuf>,
    pub history_limit: usize,
}

/// Settings shared by the signal collectors.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub http_timeout: Duration,
    pub user_agent: String,
    pub lighthouse_bin: String,
    pub competitor_samples: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(30),
            user_agent: default_user_agent(),
            lighthouse_bin: "lighthouse".to_string(),
            competitor_samples: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidHistoryLimit,
    InvalidTimeout,
    InvalidFlag { variable: &'static str },
    EmptyValue { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidHistoryLimit => write!(
                f,
                "APP_HISTORY_LIMIT must be between 1 and {MAX_HISTORY_LIMIT}"
            ),
            ConfigError::InvalidTimeout => {
                write!(f, "APP_HTTP_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::InvalidFlag { variable } => {
                write!(f, "{variable} must be true or false")
            }
            ConfigError::EmptyValue { variable } => write!(f, "{variable} must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
