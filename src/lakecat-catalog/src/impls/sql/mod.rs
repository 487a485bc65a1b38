mod config;
mod namespace;
mod store;

use std::sync::Arc;

use async_trait::async_trait;
pub use config::{SqlCatalogConfig, POOL_ACQUIRE_TIMEOUT_MS, POOL_MAX_CONNECTIONS, URI};
use lakecat_io::{sql::SqlConnectionPool, IOClient, IOConfig, Properties};
use snafu::ResultExt;
pub use store::{CatalogStore, StoreSession, NAMESPACE_PROPERTIES_TABLE, TABLES_TABLE};

use crate::{
    error::{CatalogError, CatalogResult, ReadMetadataSnafu},
    Catalog, CatalogRef, Identifier, Namespace, PropertiesUpdateSummary, Table, TableCreation,
    TableMetadata,
};

/// A read-only catalog over the `iceberg_tables` and `iceberg_namespace_properties` relations.
///
/// Rows are filtered by the catalog name, so several catalogs can share one database.
/// Namespaces only exist through the rows that mention them, and the hierarchy is derived
/// from their dotted names. Every mutator fails with [`CatalogError::Unsupported`].
#[derive(Debug)]
pub struct SqlCatalog {
    name: String,
    store: CatalogStore,
    io_config: Arc<IOConfig>,
}

impl SqlCatalog {
    /// Opens the connection pool; an unreachable store fails here rather than on first use.
    pub async fn connect(config: SqlCatalogConfig) -> CatalogResult<Self> {
        let SqlCatalogConfig {
            name,
            uri,
            pool,
            io_config,
        } = config;
        let pool = SqlConnectionPool::with_options(&uri, pool).await?;
        log::info!("Opened sql catalog {name} on {}", pool.uri());
        Ok(Self::with_pool(name, pool, io_config))
    }

    pub async fn from_properties<S: Into<String>>(
        name: S,
        properties: Properties,
    ) -> CatalogResult<Self> {
        Self::connect(SqlCatalogConfig::from_properties(name, properties)?).await
    }

    /// Builds a catalog on an existing pool, e.g. one shared between catalogs.
    pub fn with_pool(name: String, pool: SqlConnectionPool, io_config: IOConfig) -> Self {
        Self {
            store: CatalogStore::new(pool, name.clone()),
            name,
            io_config: Arc::new(io_config),
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn io_config(&self) -> &Arc<IOConfig> {
        &self.io_config
    }

    pub fn arced(self) -> CatalogRef {
        Arc::new(self)
    }

    /// Exact match against either relation; a namespace with only deeper descendants does not exist.
    async fn namespace_exists(session: &mut StoreSession<'_>, namespace: &str) -> CatalogResult<bool> {
        if session.table_namespace_exists(namespace).await? {
            return Ok(true);
        }
        Ok(session.property_namespace_exists(namespace).await?)
    }

    async fn require_namespace(
        &self,
        session: &mut StoreSession<'_>,
        namespace: &Namespace,
    ) -> CatalogResult<()> {
        if Self::namespace_exists(session, &namespace.serialize()).await? {
            Ok(())
        } else {
            Err(CatalogError::namespace_not_found(&self.name, namespace))
        }
    }

    async fn load_table_metadata(&self, location: &str) -> CatalogResult<TableMetadata> {
        log::debug!("Reading table metadata from {location}");
        let io = IOClient::new(self.io_config.clone());
        let bytes = io
            .read_bytes(location)
            .await
            .context(ReadMetadataSnafu { location })?;
        TableMetadata::from_json_bytes(location, &bytes)
    }

    fn unsupported(&self, operation: &str) -> CatalogError {
        CatalogError::unsupported(format!(
            "{operation} is not supported by the read-only sql catalog {}",
            self.name
        ))
    }
}

#[async_trait]
impl Catalog for SqlCatalog {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn create_namespace(
        &self,
        _namespace: &Namespace,
        _properties: Properties,
    ) -> CatalogResult<()> {
        Err(self.unsupported("create_namespace"))
    }

    async fn create_table(
        &self,
        _ident: &Identifier,
        _creation: TableCreation,
    ) -> CatalogResult<Table> {
        Err(self.unsupported("create_table"))
    }

    async fn drop_namespace(&self, _namespace: &Namespace) -> CatalogResult<()> {
        Err(self.unsupported("drop_namespace"))
    }

    async fn drop_table(&self, _ident: &Identifier) -> CatalogResult<()> {
        Err(self.unsupported("drop_table"))
    }

    async fn purge_table(&self, _ident: &Identifier) -> CatalogResult<()> {
        Err(self.unsupported("purge_table"))
    }

    async fn rename_table(&self, _from: &Identifier, _to: &Identifier) -> CatalogResult<Table> {
        Err(self.unsupported("rename_table"))
    }

    async fn get_table(&self, ident: &Identifier) -> CatalogResult<Table> {
        let (namespace, name) = ident.table_parts()?;

        let mut session = self.store.session().await?;
        self.require_namespace(&mut session, namespace).await?;
        let location = session
            .find_metadata_location(&namespace.serialize(), name)
            .await?
            .ok_or_else(|| CatalogError::table_not_found(&self.name, ident))?;
        drop(session);

        let metadata = self.load_table_metadata(&location).await?;
        let io_config = self.io_config.merge(metadata.properties());
        Ok(Table::new(
            ident.clone(),
            Arc::new(metadata),
            location,
            Arc::new(IOClient::new(Arc::new(io_config))),
        ))
    }

    async fn has_namespace(&self, namespace: &Namespace) -> CatalogResult<bool> {
        let mut session = self.store.session().await?;
        Self::namespace_exists(&mut session, &namespace.serialize()).await
    }

    async fn has_table(&self, ident: &Identifier) -> CatalogResult<bool> {
        let Ok((namespace, name)) = ident.table_parts() else {
            return Ok(false);
        };
        let mut session = self.store.session().await?;
        Ok(session
            .find_metadata_location(&namespace.serialize(), name)
            .await?
            .is_some())
    }

    async fn list_namespaces(&self, parent: &Namespace) -> CatalogResult<Vec<Namespace>> {
        let mut session = self.store.session().await?;
        if !parent.is_root() {
            self.require_namespace(&mut session, parent).await?;
        }

        let prefix = parent.serialize();
        let tables = session.list_distinct_table_namespaces(&prefix).await?;
        let properties = session.list_distinct_property_namespaces(&prefix).await?;
        Ok(namespace::child_namespaces(
            parent,
            tables.into_iter().chain(properties),
        ))
    }

    async fn list_tables(&self, namespace: &Namespace) -> CatalogResult<Vec<Identifier>> {
        let mut session = self.store.session().await?;
        self.require_namespace(&mut session, namespace).await?;
        let names = session.list_table_names(&namespace.serialize()).await?;
        Ok(names
            .into_iter()
            .map(|name| Identifier::from_stored(namespace.clone(), name))
            .collect())
    }

    async fn load_namespace_properties(&self, namespace: &Namespace) -> CatalogResult<Properties> {
        let mut session = self.store.session().await?;
        self.require_namespace(&mut session, namespace).await?;
        Ok(session.list_namespace_properties(&namespace.serialize()).await?)
    }

    async fn update_namespace_properties(
        &self,
        _namespace: &Namespace,
        _removals: &[String],
        _updates: Properties,
    ) -> CatalogResult<PropertiesUpdateSummary> {
        Err(self.unsupported("update_namespace_properties"))
    }
}
