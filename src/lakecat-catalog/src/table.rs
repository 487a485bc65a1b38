use std::sync::Arc;

use lakecat_io::{IOClient, Properties};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::{
    error::{CatalogResult, ParseMetadataSnafu},
    Identifier,
};

pub type TableMetadataRef = Arc<TableMetadata>;

/// An immutable metadata snapshot as stored in the file store.
///
/// Only the fields the catalog needs are typed; the rest of the document
/// (schemas, partition specs, snapshots, ...) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableMetadata {
    format_version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table_uuid: Option<String>,
    location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated_ms: Option<i64>,
    #[serde(default)]
    properties: Properties,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl TableMetadata {
    /// Parses a metadata document read from `location`.
    pub fn from_json_bytes(location: &str, bytes: &[u8]) -> CatalogResult<Self> {
        serde_json::from_slice(bytes).context(ParseMetadataSnafu { location })
    }

    pub fn format_version(&self) -> u8 {
        self.format_version
    }

    pub fn table_uuid(&self) -> Option<&str> {
        self.table_uuid.as_deref()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn last_updated_ms(&self) -> Option<i64> {
        self.last_updated_ms
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Looks up any other top-level field of the document, e.g. `current-snapshot-id`.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }
}

/// A loaded table: where its metadata lives, the metadata itself, and the io to read its files.
#[derive(Debug, Clone)]
pub struct Table {
    identifier: Identifier,
    metadata: TableMetadataRef,
    metadata_location: String,
    io: Arc<IOClient>,
}

impl Table {
    pub fn new(
        identifier: Identifier,
        metadata: TableMetadataRef,
        metadata_location: String,
        io: Arc<IOClient>,
    ) -> Self {
        Self {
            identifier,
            metadata,
            metadata_location,
            io,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn metadata(&self) -> &TableMetadataRef {
        &self.metadata
    }

    pub fn metadata_location(&self) -> &str {
        &self.metadata_location
    }

    pub fn io(&self) -> &Arc<IOClient> {
        &self.io
    }

    pub fn location(&self) -> &str {
        self.metadata.location()
    }

    pub fn format_version(&self) -> u8 {
        self.metadata.format_version()
    }

    pub fn properties(&self) -> &Properties {
        self.metadata.properties()
    }
}

/// Arguments for creating a table. Schema, partitioning and sort order are opaque documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCreation {
    pub schema: serde_json::Value,
    pub location: Option<String>,
    pub partition_spec: Option<serde_json::Value>,
    pub sort_order: Option<serde_json::Value>,
    pub properties: Properties,
}

impl TableCreation {
    pub fn new(schema: serde_json::Value) -> Self {
        Self {
            schema,
            ..Default::default()
        }
    }
}

/// Outcome of a namespace properties update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertiesUpdateSummary {
    pub removed: Vec<String>,
    pub updated: Vec<String>,
    pub missing: Vec<String>,
}

#[cfg(test)]
mod tests {
    use lakecat_io::IOConfig;

    use super::*;
    use crate::CatalogError;

    const METADATA: &str = r#"{
        "format-version": 2,
        "table-uuid": "9c12d441-03fe-4693-9a96-a0705ddf69c1",
        "location": "s3://bucket/warehouse/foo/bar",
        "last-updated-ms": 1602638573590,
        "last-column-id": 3,
        "current-snapshot-id": 3055729675574597004,
        "properties": {"write.format.default": "parquet", "owner": "root"}
    }"#;

    #[test]
    fn test_parse_metadata() {
        let metadata = TableMetadata::from_json_bytes("mem", METADATA.as_bytes()).unwrap();
        assert_eq!(metadata.format_version(), 2);
        assert_eq!(
            metadata.table_uuid(),
            Some("9c12d441-03fe-4693-9a96-a0705ddf69c1")
        );
        assert_eq!(metadata.location(), "s3://bucket/warehouse/foo/bar");
        assert_eq!(metadata.last_updated_ms(), Some(1602638573590));
        assert_eq!(
            metadata.properties().get("owner").map(String::as_str),
            Some("root")
        );
        assert_eq!(
            metadata.field("last-column-id"),
            Some(&serde_json::json!(3))
        );
        assert_eq!(metadata.field("properties"), None);
    }

    #[test]
    fn test_parse_metadata_without_properties() {
        let json = r#"{"format-version": 1, "location": "/tmp/t"}"#;
        let metadata = TableMetadata::from_json_bytes("mem", json.as_bytes()).unwrap();
        assert!(metadata.properties().is_empty());
        assert_eq!(metadata.table_uuid(), None);
    }

    #[test]
    fn test_parse_metadata_invalid() {
        let err = TableMetadata::from_json_bytes("/tmp/t/v1.metadata.json", b"not json").unwrap_err();
        assert!(
            matches!(err, CatalogError::ParseMetadata { location, .. } if location == "/tmp/t/v1.metadata.json")
        );

        // missing the required location
        let err = TableMetadata::from_json_bytes("mem", br#"{"format-version": 2}"#).unwrap_err();
        assert!(matches!(err, CatalogError::ParseMetadata { .. }));
    }

    #[test]
    fn test_table_accessors() {
        let metadata = TableMetadata::from_json_bytes("mem", METADATA.as_bytes()).unwrap();
        let io = Arc::new(IOClient::new(Arc::new(IOConfig::default())));
        let table = Table::new(
            Identifier::parse("foo.bar").unwrap(),
            Arc::new(metadata),
            "s3://bucket/warehouse/foo/bar/metadata/v3.metadata.json".to_string(),
            io,
        );
        assert_eq!(table.identifier().to_string(), "foo.bar");
        assert_eq!(table.location(), "s3://bucket/warehouse/foo/bar");
        assert_eq!(table.format_version(), 2);
        assert_eq!(table.properties().len(), 2);
        assert!(table.metadata_location().ends_with("v3.metadata.json"));
    }
}
