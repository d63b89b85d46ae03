use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::admission::{
    AdvisorSettings, RankingWeights, TierTargets, DEFAULT_HISTORY_YEARS, MAX_HISTORY_YEARS,
    MAX_TIER_COUNT,
};

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
    pub advisor: AdvisorConfig,
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
            advisor: AdvisorConfig::from_env()?,
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

/// Engine defaults and optional catalog files.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub history_years: usize,
    pub tier_targets: TierTargets,
    pub college_level_weight: f64,
    pub inventory_csv: Option<PathBuf>,
    pub history_csv: Option<PathBuf>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            history_years: DEFAULT_HISTORY_YEARS,
            tier_targets: TierTargets::default(),
            college_level_weight: RankingWeights::default().college_level_weight,
            inventory_csv: None,
            history_csv: None,
        }
    }
}

impl AdvisorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let history_years = parse_var("ADVISOR_HISTORY_YEARS", defaults.history_years)?;
        if !(1..=MAX_HISTORY_YEARS).contains(&history_years) {
            return Err(ConfigError::InvalidAdvisorSetting {
                name: "ADVISOR_HISTORY_YEARS",
                value: history_years.to_string(),
            });
        }

        let tier_targets = TierTargets {
            rush: tier_count("ADVISOR_RUSH_COUNT", defaults.tier_targets.rush)?,
            stable: tier_count("ADVISOR_STABLE_COUNT", defaults.tier_targets.stable)?,
            safe: tier_count("ADVISOR_SAFE_COUNT", defaults.tier_targets.safe)?,
        };

        let college_level_weight: f64 =
            parse_var("ADVISOR_COLLEGE_LEVEL_WEIGHT", defaults.college_level_weight)?;
        if !college_level_weight.is_finite() || college_level_weight < 0.0 {
            return Err(ConfigError::InvalidAdvisorSetting {
                name: "ADVISOR_COLLEGE_LEVEL_WEIGHT",
                value: college_level_weight.to_string(),
            });
        }

        Ok(Self {
            history_years,
            tier_targets,
            college_level_weight,
            inventory_csv: path_var("ADVISOR_INVENTORY_CSV"),
            history_csv: path_var("ADVISOR_HISTORY_CSV"),
        })
    }

    pub fn settings(&self) -> AdvisorSettings {
        AdvisorSettings {
            history_years: self.history_years,
            tier_targets: self.tier_targets,
            weights: RankingWeights {
                college_level_weight: self.college_level_weight,
                ..RankingWeights::default()
            },
        }
    }
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidAdvisorSetting { name, value: raw })
        }
        _ => Ok(default),
    }
}

fn tier_count(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    let count = parse_var(name, default)?;
    if count > MAX_TIER_COUNT {
        return Err(ConfigError::InvalidAdvisorSetting {
            name,
            value: count.to_string(),
        });
    }
    Ok(count)
}

fn path_var(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidAdvisorSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidAdvisorSetting { name, value } => {
                write!(f, "{name} has an invalid value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidAdvisorSetting { .. } => None,
        }
    }
}
