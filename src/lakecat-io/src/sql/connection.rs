use std::time::Duration;

use snafu::ResultExt;
use sqlx::{
    any::{install_default_drivers, AnyPoolOptions},
    pool::PoolConnection,
    Any, AnyPool, Transaction,
};

use crate::sql::errors::{AcquireSnafu, ConnectionSnafu, SqlResult, TransactionSnafu};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlPoolOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for SqlPoolOptions {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

/// An owned pool of connections to the relational store.
///
/// Cloning is cheap and shares the underlying pool.
#[derive(Debug, Clone)]
pub struct SqlConnectionPool {
    pool: AnyPool,
    uri: String,
}

impl SqlConnectionPool {
    pub async fn new(connection_string: &str) -> SqlResult<Self> {
        Self::with_options(connection_string, SqlPoolOptions::default()).await
    }

    /// Connects eagerly so a bad connection string fails here rather than on first use.
    pub async fn with_options(connection_string: &str, options: SqlPoolOptions) -> SqlResult<Self> {
        install_default_drivers();
        let uri = redact_uri(connection_string);
        log::debug!(
            "Connecting to {uri} with max_connections: {}, acquire_timeout: {:?}",
            options.max_connections,
            options.acquire_timeout
        );

        let pool = AnyPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect(connection_string)
            .await
            .context(ConnectionSnafu { uri: uri.clone() })?;

        Ok(Self { pool, uri })
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// The connection string with any password masked.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Checks out a single connection; it goes back to the pool when dropped.
    pub async fn acquire(&self) -> SqlResult<PoolConnection<Any>> {
        self.pool
            .acquire()
            .await
            .context(AcquireSnafu { uri: self.uri.clone() })
    }

    /// Starts a transaction; it is rolled back if dropped without a commit.
    pub async fn begin(&self) -> SqlResult<Transaction<'static, Any>> {
        self.pool.begin().await.context(TransactionSnafu)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn redact_uri(uri: &str) -> String {
    match url::Url::parse(uri) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("****")).is_ok() {
                url.to_string()
            } else {
                uri.to_string()
            }
        }
        _ => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::sql::SqlError;

    #[rstest]
    #[case("postgres://admin:hunter2@db:5432/catalog", "postgres://admin:****@db:5432/catalog")]
    #[case("postgres://admin@db:5432/catalog", "postgres://admin@db:5432/catalog")]
    #[case("sqlite::memory:", "sqlite::memory:")]
    #[case("not a url", "not a url")]
    fn test_redact_uri(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(redact_uri(input), expected);
    }

    #[tokio::test]
    async fn test_connect_sqlite() -> SqlResult<()> {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("sqlite://{}?mode=rwc", dir.path().join("catalog.db").display());

        let pool = SqlConnectionPool::with_options(
            &uri,
            SqlPoolOptions {
                max_connections: 1,
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(pool.uri(), uri);

        let mut conn = pool.acquire().await?;
        let one: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(one, 1);
        drop(conn);

        // the single connection went back to the pool
        let tx = pool.begin().await?;
        tx.rollback().await.unwrap();

        pool.close().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_connect_unknown_driver() {
        let err = SqlConnectionPool::new("nosuchdb://localhost/catalog")
            .await
            .unwrap_err();
        assert!(matches!(err, SqlError::Connection { uri, .. } if uri == "nosuchdb://localhost/catalog"));
    }
}
