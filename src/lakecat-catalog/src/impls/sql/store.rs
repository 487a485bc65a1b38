use std::collections::BTreeSet;

use lakecat_io::{
    sql::{QuerySnafu, SqlConnectionPool, SqlResult, TransactionSnafu},
    Properties,
};
use snafu::ResultExt;
use sqlx::{pool::PoolConnection, Any};

use super::namespace::like_prefix_pattern;

pub const TABLES_TABLE: &str = "iceberg_tables";
pub const NAMESPACE_PROPERTIES_TABLE: &str = "iceberg_namespace_properties";

const CREATE_TABLES_TABLE: &str = "CREATE TABLE IF NOT EXISTS iceberg_tables (
    catalog_name VARCHAR(255) NOT NULL,
    table_namespace VARCHAR(255) NOT NULL,
    table_name VARCHAR(255) NOT NULL,
    metadata_location VARCHAR(255) NOT NULL,
    previous_metadata_location VARCHAR(255)
)";

const CREATE_NAMESPACE_PROPERTIES_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS iceberg_namespace_properties (
    catalog_name VARCHAR(255) NOT NULL,
    namespace VARCHAR(255) NOT NULL,
    property_key VARCHAR(255) NOT NULL,
    property_value VARCHAR(255) NOT NULL
)";

/// Read access to the two catalog relations, scoped to one catalog name.
///
/// The store holds no state besides the pool; every [`StoreSession`] owns one
/// pooled connection for the duration of a single catalog operation.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    pool: SqlConnectionPool,
    catalog_name: String,
}

impl CatalogStore {
    pub fn new(pool: SqlConnectionPool, catalog_name: String) -> Self {
        Self { pool, catalog_name }
    }

    pub fn catalog_name(&self) -> &str {
        &self.catalog_name
    }

    pub fn pool(&self) -> &SqlConnectionPool {
        &self.pool
    }

    /// Checks out a connection for one logical operation.
    pub async fn session(&self) -> SqlResult<StoreSession<'_>> {
        let conn = self.pool.acquire().await?;
        Ok(StoreSession {
            conn,
            catalog_name: &self.catalog_name,
        })
    }

    /// Creates both catalog relations if missing, in a single transaction. Never writes rows.
    pub async fn create_catalog_tables(&self) -> SqlResult<()> {
        log::info!(
            "Creating {TABLES_TABLE} and {NAMESPACE_PROPERTIES_TABLE} in {}",
            self.pool.uri()
        );
        let mut tx = self.pool.begin().await?;
        for statement in [CREATE_TABLES_TABLE, CREATE_NAMESPACE_PROPERTIES_TABLE] {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .context(QuerySnafu)?;
        }
        tx.commit().await.context(TransactionSnafu)
    }
}

/// A pooled connection bound to one catalog; returned to the pool on drop.
pub struct StoreSession<'a> {
    conn: PoolConnection<Any>,
    catalog_name: &'a str,
}

impl StoreSession<'_> {
    /// Returns the metadata pointer of a table; with duplicate rows, whichever the store returns first.
    pub async fn find_metadata_location(
        &mut self,
        namespace: &str,
        table_name: &str,
    ) -> SqlResult<Option<String>> {
        log::debug!(
            "Looking up metadata location of {namespace}.{table_name} in catalog {}",
            self.catalog_name
        );
        sqlx::query_scalar::<_, String>(
            "SELECT metadata_location FROM iceberg_tables \
             WHERE catalog_name = $1 AND table_namespace = $2 AND table_name = $3 \
             LIMIT 1",
        )
        .bind(self.catalog_name)
        .bind(namespace)
        .bind(table_name)
        .fetch_optional(&mut *self.conn)
        .await
        .context(QuerySnafu)
    }

    pub async fn list_table_names(&mut self, namespace: &str) -> SqlResult<Vec<String>> {
        log::debug!(
            "Listing tables in {namespace} of catalog {}",
            self.catalog_name
        );
        sqlx::query_scalar::<_, String>(
            "SELECT table_name FROM iceberg_tables \
             WHERE catalog_name = $1 AND table_namespace = $2 \
             ORDER BY table_name",
        )
        .bind(self.catalog_name)
        .bind(namespace)
        .fetch_all(&mut *self.conn)
        .await
        .context(QuerySnafu)
    }

    /// Distinct `table_namespace` values starting with `prefix`; an empty prefix matches all.
    pub async fn list_distinct_table_namespaces(
        &mut self,
        prefix: &str,
    ) -> SqlResult<BTreeSet<String>> {
        self.list_distinct_namespaces(TABLES_TABLE, "table_namespace", prefix)
            .await
    }

    /// Distinct `namespace` values starting with `prefix`; an empty prefix matches all.
    pub async fn list_distinct_property_namespaces(
        &mut self,
        prefix: &str,
    ) -> SqlResult<BTreeSet<String>> {
        self.list_distinct_namespaces(NAMESPACE_PROPERTIES_TABLE, "namespace", prefix)
            .await
    }

    async fn list_distinct_namespaces(
        &mut self,
        table: &str,
        column: &str,
        prefix: &str,
    ) -> SqlResult<BTreeSet<String>> {
        log::debug!(
            "Listing distinct {table}.{column} with prefix {prefix:?} in catalog {}",
            self.catalog_name
        );
        let rows = if prefix.is_empty() {
            let sql = format!("SELECT DISTINCT {column} FROM {table} WHERE catalog_name = $1");
            sqlx::query_scalar::<_, String>(&sql)
                .bind(self.catalog_name)
                .fetch_all(&mut *self.conn)
                .await
                .context(QuerySnafu)?
        } else {
            let sql = format!(
                "SELECT DISTINCT {column} FROM {table} \
                 WHERE catalog_name = $1 AND {column} LIKE $2 ESCAPE '\\'"
            );
            sqlx::query_scalar::<_, String>(&sql)
                .bind(self.catalog_name)
                .bind(like_prefix_pattern(prefix))
                .fetch_all(&mut *self.conn)
                .await
                .context(QuerySnafu)?
        };

        // LIKE ignores case on some engines, so re-check the exact prefix.
        Ok(rows
            .into_iter()
            .filter(|namespace| namespace.starts_with(prefix))
            .collect())
    }

    pub async fn list_namespace_properties(&mut self, namespace: &str) -> SqlResult<Properties> {
        log::debug!(
            "Loading properties of namespace {namespace} in catalog {}",
            self.catalog_name
        );
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT property_key, property_value FROM iceberg_namespace_properties \
             WHERE catalog_name = $1 AND namespace = $2 \
             ORDER BY property_key",
        )
        .bind(self.catalog_name)
        .bind(namespace)
        .fetch_all(&mut *self.conn)
        .await
        .context(QuerySnafu)?;
        Ok(rows.into_iter().collect())
    }

    /// True if a table row has exactly this namespace.
    pub async fn table_namespace_exists(&mut self, namespace: &str) -> SqlResult<bool> {
        self.exists_exact(TABLES_TABLE, "table_namespace", namespace)
            .await
    }

    /// True if a property row has exactly this namespace.
    pub async fn property_namespace_exists(&mut self, namespace: &str) -> SqlResult<bool> {
        self.exists_exact(NAMESPACE_PROPERTIES_TABLE, "namespace", namespace)
            .await
    }

    async fn exists_exact(&mut self, table: &str, column: &str, namespace: &str) -> SqlResult<bool> {
        let sql = format!(
            "SELECT {column} FROM {table} WHERE catalog_name = $1 AND {column} = $2 LIMIT 1"
        );
        let found = sqlx::query_scalar::<_, String>(&sql)
            .bind(self.catalog_name)
            .bind(namespace)
            .fetch_optional(&mut *self.conn)
            .await
            .context(QuerySnafu)?;
        Ok(found.is_some())
    }
}
