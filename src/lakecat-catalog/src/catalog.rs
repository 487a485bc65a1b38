use std::sync::Arc;

use async_trait::async_trait;
use lakecat_io::Properties;

use crate::{
    error::CatalogResult,
    table::{PropertiesUpdateSummary, Table, TableCreation},
    Identifier, Namespace,
};

/// Catalog implementation reference.
pub type CatalogRef = Arc<dyn Catalog>;

/// A catalog provides object metadata such as namespaces and tables.
///
/// Every operation is a full trait member so callers can rely on a uniform
/// surface; read-only implementations reject the mutators with
/// [`crate::CatalogError::Unsupported`].
#[async_trait]
pub trait Catalog: Sync + Send + std::fmt::Debug {
    /// Returns the catalog name.
    fn name(&self) -> String;

    /// Creates a namespace with the given properties.
    async fn create_namespace(&self, namespace: &Namespace, properties: Properties)
        -> CatalogResult<()>;

    /// Creates a table from the given schema and options.
    async fn create_table(&self, ident: &Identifier, creation: TableCreation) -> CatalogResult<Table>;

    /// Drops an empty namespace.
    async fn drop_namespace(&self, namespace: &Namespace) -> CatalogResult<()>;

    /// Drops a table, keeping its files.
    async fn drop_table(&self, ident: &Identifier) -> CatalogResult<()>;

    /// Drops a table and deletes its files.
    async fn purge_table(&self, ident: &Identifier) -> CatalogResult<()>;

    /// Renames a table, returning the table under its new identifier.
    async fn rename_table(&self, from: &Identifier, to: &Identifier) -> CatalogResult<Table>;

    /// Returns the table, loading its current metadata snapshot.
    async fn get_table(&self, ident: &Identifier) -> CatalogResult<Table>;

    /// Returns true iff the namespace exists.
    async fn has_namespace(&self, namespace: &Namespace) -> CatalogResult<bool>;

    /// Returns true iff the table exists, without loading its metadata.
    async fn has_table(&self, ident: &Identifier) -> CatalogResult<bool>;

    /// Lists the namespaces under `parent`; the root lists every known namespace.
    async fn list_namespaces(&self, parent: &Namespace) -> CatalogResult<Vec<Namespace>>;

    /// Lists the tables directly in the namespace.
    async fn list_tables(&self, namespace: &Namespace) -> CatalogResult<Vec<Identifier>>;

    /// Returns the namespace properties, which may be empty.
    async fn load_namespace_properties(&self, namespace: &Namespace) -> CatalogResult<Properties>;

    /// Removes then sets namespace properties.
    async fn update_namespace_properties(
        &self,
        namespace: &Namespace,
        removals: &[String],
        updates: Properties,
    ) -> CatalogResult<PropertiesUpdateSummary>;
}
