use std::env;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::scoring::ScoringConfig;

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
    pub scoring: ScoringConfig,
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

        let scoring = match env::var("DEAL_SCORE_CONFIG") {
            Ok(path) if !path.trim().is_empty() => load_scoring_config(path.trim())?,
            _ => ScoringConfig::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring,
        })
    }
}

/// Read a JSON scoring rubric and validate it.
pub fn load_scoring_config<P: AsRef<Path>>(path: P) -> Result<ScoringConfig, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadScoring {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scoring_config(&raw).map_err(|err| match err {
        ConfigError::ParseScoring { source, .. } => ConfigError::ParseScoring {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parse and validate a JSON scoring rubric held in memory.
pub fn parse_scoring_config(raw: &str) -> Result<ScoringConfig, ConfigError> {
    let config: ScoringConfig =
        serde_json::from_str(raw).map_err(|source| ConfigError::ParseScoring {
            path: PathBuf::from("<inline>"),
            source,
        })?;
    config
        .validate()
        .map_err(|errors| ConfigError::InvalidScoring { errors })?;
    Ok(config)
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("failed to read scoring config at {}", path.display())]
    ReadScoring {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid scoring config JSON in {}", path.display())]
    ParseScoring {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("scoring config rejected: {}", errors.join("; "))]
    InvalidScoring { errors: Vec<String> },
}
