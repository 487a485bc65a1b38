//! A table catalog over relational metadata pointers.
//!
//! Namespaces and tables live in two relations of a SQL database; a table row only
//! points at a metadata document, which is read through [`lakecat_io::IOClient`].
mod catalog;
mod error;
mod identifier;
pub mod impls;
mod table;

pub use catalog::{Catalog, CatalogRef};
pub use error::{CatalogError, CatalogResult};
pub use identifier::{Identifier, Namespace, SEPARATOR};
pub use impls::sql::{CatalogStore, SqlCatalog, SqlCatalogConfig, StoreSession};
pub use lakecat_io::Properties;
pub use table::{PropertiesUpdateSummary, Table, TableCreation, TableMetadata, TableMetadataRef};
