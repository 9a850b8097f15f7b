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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub data: DataConfig,
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
            data: DataConfig::from_env()?,
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

/// External data sources. Any source left unset falls back to the built-in Daejeon data set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataConfig {
    pub survey_json: Option<PathBuf>,
    pub catalog_csv: Option<PathBuf>,
    pub plan_json: Option<PathBuf>,
    pub road_network: Option<RoadNetworkPaths>,
}

/// Node and edge exports describing the road graph used for segment routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadNetworkPaths {
    pub nodes_csv: PathBuf,
    pub edges_csv: PathBuf,
}

impl DataConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let road_network = match (
            path_var("DAETRIP_ROAD_NODES_CSV"),
            path_var("DAETRIP_ROAD_EDGES_CSV"),
        ) {
            (Some(nodes_csv), Some(edges_csv)) => Some(RoadNetworkPaths {
                nodes_csv,
                edges_csv,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteRoadNetwork),
        };

        Ok(Self {
            survey_json: path_var("DAETRIP_SURVEY_JSON"),
            catalog_csv: path_var("DAETRIP_CATALOG_CSV"),
            plan_json: path_var("DAETRIP_PLAN_JSON"),
            road_network,
        })
    }
}

fn path_var(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    IncompleteRoadNetwork,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::IncompleteRoadNetwork => write!(
                f,
                "DAETRIP_ROAD_NODES_CSV and DAETRIP_ROAD_EDGES_CSV must be set together"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::IncompleteRoadNetwork => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
