use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use custodia_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendConfig {
    Memory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_host: String,
    pub api_port: u16,
    pub storage: StorageBackendConfig,
    pub principals: Vec<(String, String)>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_sources(env::args().nth(1), |name| env::var(name).ok())
    }

    fn from_sources(
        first_argument: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let migrate_only = first_argument.as_deref() == Some("migrate");

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let storage = match lookup("STORAGE_BACKEND")
            .unwrap_or_else(|| "postgres".to_owned())
            .as_str()
        {
            "memory" => StorageBackendConfig::Memory,
            "postgres" => {
                let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
                    Some(value) => value.parse::<u32>().map_err(|error| {
                        AppError::Validation(format!("invalid DATABASE_MAX_CONNECTIONS: {error}"))
                    })?,
                    None => DEFAULT_MAX_CONNECTIONS,
                };

                StorageBackendConfig::Postgres {
                    database_url: required_non_empty(&lookup, "DATABASE_URL")?,
                    max_connections,
                }
            }
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        if migrate_only && storage == StorageBackendConfig::Memory {
            return Err(AppError::Validation(
                "migrate requires STORAGE_BACKEND=postgres".to_owned(),
            ));
        }

        let principals = parse_principals(required_non_empty(&lookup, "API_PRINCIPALS")?.as_str())?;
        if principals.is_empty() {
            return Err(AppError::Validation(
                "API_PRINCIPALS must name at least one principal".to_owned(),
            ));
        }

        Ok(Self {
            migrate_only,
            api_host,
            api_port,
            storage,
            principals,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Parses `name:password` pairs separated by commas.
fn parse_principals(value: &str) -> Result<Vec<(String, String)>, AppError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, password) = entry.split_once(':').ok_or_else(|| {
                AppError::Validation(
                    "API_PRINCIPALS entries must have the form name:password".to_owned(),
                )
            })?;
            let name = name.trim();
            if name.is_empty() || password.is_empty() {
                return Err(AppError::Validation(
                    "API_PRINCIPALS entries need a name and a password".to_owned(),
                ));
            }

            Ok((name.to_owned(), password.to_owned()))
        })
        .collect()
}

fn required_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
