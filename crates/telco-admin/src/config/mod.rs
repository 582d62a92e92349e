use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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

/// Top-level configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub nbn: NbnConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            nbn: NbnConfig::from_env()?,
        })
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Settings for the NBN order workflow: where the real B2B endpoint lives
/// and which canned response to replay when the real request is disabled.
#[derive(Debug, Clone)]
pub struct NbnConfig {
    /// Fixture filename inside `stubs_dir`, from NBN_RESPONSE_FILE.
    pub response_file: String,
    /// Directory holding canned provider responses, from NBN_STUBS_DIR.
    pub stubs_dir: PathBuf,
    /// Provider order endpoint, from NBN_B2B_ENDPOINT.
    pub endpoint: Option<String>,
    /// When set, POST to the endpoint instead of replaying a fixture.
    pub use_real_request: bool,
}

impl NbnConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let response_file = env::var("NBN_RESPONSE_FILE")
            .unwrap_or_else(|_| "nbn-successful-response.json".to_string());
        let stubs_dir =
            PathBuf::from(env::var("NBN_STUBS_DIR").unwrap_or_else(|_| "tests/stubs".to_string()));
        let endpoint = env::var("NBN_B2B_ENDPOINT")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let use_real_request = match env::var("USE_REAL_REQUEST") {
            Err(_) => false,
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag { value: raw })?,
        };

        if use_real_request && endpoint.is_none() {
            return Err(ConfigError::MissingEndpoint);
        }

        Ok(Self {
            response_file,
            stubs_dir,
            endpoint,
            use_real_request,
        })
    }

    /// Full path of the fixture file the stubbed gateway replays.
    pub fn fixture_path(&self) -> PathBuf {
        self.stubs_dir.join(&self.response_file)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Some(false),
        "1" | "true" | "yes" | "on" => Some(true),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { value: String },
    MissingEndpoint,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { value } => {
                write!(f, "USE_REAL_REQUEST must be a boolean, got '{}'", value)
            }
            ConfigError::MissingEndpoint => {
                write!(f, "NBN_B2B_ENDPOINT is required when USE_REAL_REQUEST is on")
            }
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
