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

/// Top-level configuration for the application. Built once at startup and
/// passed down explicitly; nothing reads the environment after `load`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub intake: IntakeConfig,
    pub pipedrive: Option<PipedriveSettings>,
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

        let csv_path = PathBuf::from(
            env::var("APP_CSV_PATH").unwrap_or_else(|_| "data/assessments.csv".to_string()),
        );
        let admin_email =
            env::var("APP_ADMIN_EMAIL").unwrap_or_else(|_| "info@recruitmentapk.nl".to_string());
        let mail_relay_url = env::var("APP_MAIL_RELAY_URL").ok().filter(|v| !v.is_empty());

        let max_requests = parse_env_number("APP_RATE_LIMIT_MAX", 5)?;
        let window_secs = parse_env_number("APP_RATE_LIMIT_WINDOW_SECS", 3600)?;

        let pipedrive = match env::var("PIPEDRIVE_API_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Some(PipedriveSettings {
                api_token: token,
                base_url: env::var("PIPEDRIVE_API_URL")
                    .unwrap_or_else(|_| "https://api.pipedrive.com/v1".to_string()),
                pipeline_keyword: env::var("PIPEDRIVE_PIPELINE_NAME")
                    .unwrap_or_else(|_| "recruitmentapk".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            intake: IntakeConfig {
                csv_path,
                admin_email,
                mail_relay_url,
                rate_limit: RateLimitConfig {
                    max_requests,
                    window_secs,
                },
            },
            pipedrive,
        })
    }
}

fn parse_env_number(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { var }),
        Err(_) => Ok(default),
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

/// Settings for the submission pipeline: where the CSV backup lives, who gets
/// notified, and how aggressively the endpoint is rate limited.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub csv_path: PathBuf,
    pub admin_email: String,
    /// HTTP mail relay endpoint; unset disables the notification sink.
    pub mail_relay_url: Option<String>,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u64,
    pub window_secs: u64,
}

/// Pipedrive credentials and pipeline selection. Absent token disables the
/// CRM sink entirely.
#[derive(Debug, Clone)]
pub struct PipedriveSettings {
    pub api_token: String,
    pub base_url: String,
    pub pipeline_keyword: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { var: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { var } => {
                write!(f, "{var} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
