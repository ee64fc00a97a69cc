use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use radio_service::TracksServiceConfig;
use radio_service::config::{
    DEFAULT_MAX_TALLY_ATTEMPTS, DEFAULT_SEARCH_SCAN_LIMIT, DEFAULT_TRENDING_LIMIT,
};
use tracing::warn;

use crate::errors::ServerError;

/// Default address the server binds to.
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Default port the server listens on.
const DEFAULT_PORT: u16 = 8080;

/// Where votes and tracks are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL via `DATABASE_URL`.
    Postgres,
    /// Process memory; everything is lost on restart.
    Memory,
}

impl StorageBackend {
    /// Valid values: "postgres" or "memory" (case-insensitive).
    /// Defaults to "postgres" if not set or invalid.
    fn parse(value: Option<String>) -> Self {
        let Some(value) = value else {
            return Self::Postgres;
        };
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Self::Postgres,
            "memory" | "in-memory" => Self::Memory,
            other => {
                warn!(value = other, "Invalid STORAGE_BACKEND, defaulting to 'postgres'");
                Self::Postgres
            }
        }
    }
}

/// Settings of the API binary.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub seed_tracks_path: Option<PathBuf>,
    pub service: TracksServiceConfig,
}

impl ApiConfig {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `STORAGE_BACKEND`: "postgres" or "memory" (default: postgres)
    /// - `DATABASE_URL`: PostgreSQL connection string (required for postgres)
    /// - `API_HOST`: Bind address (default: 127.0.0.1)
    /// - `API_PORT`: Bind port (default: 8080)
    /// - `SEED_TRACKS_PATH`: JSON file of tracks loaded into the memory backend
    /// - `TALLY_MAX_ATTEMPTS`: Tally write attempts per vote step (default: 5)
    /// - `SEARCH_SCAN_LIMIT`: Tracks scanned per search (default: 100)
    /// - `TRENDING_LIMIT`: Default size of the trending listing (default: 20)
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = StorageBackend::parse(lookup("STORAGE_BACKEND"));
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ServerError::config(
                "DATABASE_URL must be set when STORAGE_BACKEND is postgres",
            ));
        }

        let service = TracksServiceConfig::default()
            .with_max_tally_attempts(parse_or_default(
                &lookup,
                "TALLY_MAX_ATTEMPTS",
                DEFAULT_MAX_TALLY_ATTEMPTS,
            ))
            .with_search_scan_limit(parse_or_default(
                &lookup,
                "SEARCH_SCAN_LIMIT",
                DEFAULT_SEARCH_SCAN_LIMIT,
            ))
            .with_trending_limit(parse_or_default(
                &lookup,
                "TRENDING_LIMIT",
                DEFAULT_TRENDING_LIMIT,
            ));

        Ok(Self {
            storage,
            database_url,
            host: parse_or_default(&lookup, "API_HOST", DEFAULT_HOST),
            port: parse_or_default(&lookup, "API_PORT", DEFAULT_PORT),
            seed_tracks_path: lookup("SEED_TRACKS_PATH").map(PathBuf::from),
            service,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or_default<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + fmt::Display,
{
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
    }
}
