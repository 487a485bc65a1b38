use std::time::Duration;

use lakecat_io::{sql::SqlPoolOptions, IOConfig, Properties};

use crate::error::{CatalogError, CatalogResult};

/// Connection string of the relational store.
pub const URI: &str = "uri";
/// Upper bound on pooled connections to the relational store.
pub const POOL_MAX_CONNECTIONS: &str = "pool.max-connections";
/// How long an operation waits for a pooled connection, in milliseconds.
pub const POOL_ACQUIRE_TIMEOUT_MS: &str = "pool.acquire-timeout-ms";

/// Everything needed to open a [`super::SqlCatalog`].
#[derive(Debug, Clone, PartialEq)]
pub struct SqlCatalogConfig {
    pub name: String,
    pub uri: String,
    pub pool: SqlPoolOptions,
    /// Remaining catalog properties, forwarded verbatim to the file store.
    pub io_config: IOConfig,
}

impl SqlCatalogConfig {
    /// Splits catalog properties into connection settings and file io properties.
    ///
    /// `uri` is required. The `pool.*` keys are consumed here; every other key
    /// ends up in [`SqlCatalogConfig::io_config`].
    pub fn from_properties<S: Into<String>>(name: S, mut properties: Properties) -> CatalogResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CatalogError::invalid_config("catalog name must not be empty"));
        }

        let uri = match properties.shift_remove(URI) {
            Some(uri) if !uri.is_empty() => uri,
            _ => {
                return Err(CatalogError::invalid_config(format!(
                    "missing required property `{URI}` for catalog {name}"
                )))
            }
        };

        let mut pool = SqlPoolOptions::default();
        if let Some(value) = properties.shift_remove(POOL_MAX_CONNECTIONS) {
            pool.max_connections = parse_property(POOL_MAX_CONNECTIONS, &value)?;
            if pool.max_connections == 0 {
                return Err(CatalogError::invalid_config(format!(
                    "`{POOL_MAX_CONNECTIONS}` must be at least 1"
                )));
            }
        }
        if let Some(value) = properties.shift_remove(POOL_ACQUIRE_TIMEOUT_MS) {
            pool.acquire_timeout =
                Duration::from_millis(parse_property(POOL_ACQUIRE_TIMEOUT_MS, &value)?);
        }

        Ok(Self {
            name,
            uri,
            pool,
            io_config: IOConfig::new(properties),
        })
    }
}

fn parse_property<T: std::str::FromStr>(key: &str, value: &str) -> CatalogResult<T> {
    value.parse().map_err(|_| {
        CatalogError::invalid_config(format!("invalid value `{value}` for property `{key}`"))
    })
}
