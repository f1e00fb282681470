//! Deployment configuration.
//!
//! Everything here is read once at startup. The endpoint and token are
//! static for the life of the process.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, RoutePair, RoutePairCatalog};
use crate::navitia::NavitiaConfig;

/// Default listen address for the HTTP adapter.
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Errors raised while loading configuration or building clients.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed
    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },

    /// Token cannot be sent as an HTTP header
    #[error("invalid token format")]
    InvalidToken,

    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    /// Route catalog file could not be loaded
    #[error("failed to load route catalog from {path:?}: {message}")]
    Routes { path: PathBuf, message: String },

    /// Route catalog is unusable
    #[error("route catalog: {0}")]
    Catalog(#[from] DomainError),

    /// Mock fixtures could not be loaded
    #[error("mock fixtures: {message}")]
    Fixture { message: String },
}

/// Where journeys come from.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    /// Live Navitia API
    Navitia(NavitiaConfig),
    /// Canned fixtures from a directory
    Mock(PathBuf),
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Journey source
    pub source: SourceConfig,
    /// Address the HTTP adapter listens on
    pub listen_addr: SocketAddr,
    /// Optional JSON route catalog; the built-in catalog is used otherwise
    pub routes_file: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `NAVITIA_TOKEN` | API token (required unless `JOURNEY_BOARD_MOCK_DIR` is set) |
    /// | `NAVITIA_ENDPOINT` | Journeys endpoint URL |
    /// | `NAVITIA_TIMEOUT_SECS` | Request timeout |
    /// | `JOURNEY_BOARD_ADDR` | Listen address |
    /// | `JOURNEY_BOARD_ROUTES` | JSON route catalog file |
    /// | `JOURNEY_BOARD_MOCK_DIR` | Serve fixtures instead of calling the API |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let source = match get("JOURNEY_BOARD_MOCK_DIR") {
            Some(dir) => SourceConfig::Mock(PathBuf::from(dir)),
            None => {
                let token = get("NAVITIA_TOKEN").ok_or(ConfigError::Missing("NAVITIA_TOKEN"))?;
                let mut navitia = NavitiaConfig::new(token);
                if let Some(endpoint) = get("NAVITIA_ENDPOINT") {
                    navitia = navitia.with_endpoint(endpoint);
                }
                if let Some(secs) = get("NAVITIA_TIMEOUT_SECS") {
                    let secs = secs.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                        name: "NAVITIA_TIMEOUT_SECS",
                        message: e.to_string(),
                    })?;
                    navitia = navitia.with_timeout(secs);
                }
                SourceConfig::Navitia(navitia)
            }
        };

        let addr = get("JOURNEY_BOARD_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = addr.trim().parse::<SocketAddr>().map_err(|e| {
            ConfigError::Invalid {
                name: "JOURNEY_BOARD_ADDR",
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            source,
            listen_addr,
            routes_file: get("JOURNEY_BOARD_ROUTES").map(PathBuf::from),
        })
    }

    /// Load the route catalog this configuration points at.
    pub fn catalog(&self) -> Result<RoutePairCatalog, ConfigError> {
        match &self.routes_file {
            Some(path) => load_catalog(path),
            None => Ok(RoutePairCatalog::default()),
        }
    }
}

/// Load a route catalog from a JSON array of route pairs.
pub fn load_catalog(path: &Path) -> Result<RoutePairCatalog, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Routes {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let pairs: Vec<RoutePair> = serde_json::from_str(&json).map_err(|e| ConfigError::Routes {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(RoutePairCatalog::new(pairs)?)
}
