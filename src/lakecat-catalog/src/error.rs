use common_error::LakecatError;
use lakecat_io::sql::SqlError;
use snafu::Snafu;

use crate::{Identifier, Namespace};

/// Catalog Result
pub type CatalogResult<T, E = CatalogError> = std::result::Result<T, E>;

/// Catalog Error
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CatalogError {
    #[snafu(display("Invalid identifier {input}!"))]
    InvalidIdentifier { input: String },

    #[snafu(display("Namespace {namespace} not found in catalog {catalog}!"))]
    NamespaceNotFound { catalog: String, namespace: String },

    #[snafu(display("Table {ident} not found in catalog {catalog}!"))]
    TableNotFound { catalog: String, ident: String },

    #[snafu(display("{message}"))]
    Unsupported { message: String },

    #[snafu(display("Invalid catalog configuration: {message}"))]
    InvalidConfig { message: String },

    #[snafu(display("Catalog store error: {source}"), context(false))]
    Store { source: SqlError },

    #[snafu(display("Unable to read table metadata at {location}: {source}"))]
    ReadMetadata {
        #[snafu(implicit(false))]
        location: String,
        source: lakecat_io::Error,
    },

    #[snafu(display("Unable to parse table metadata at {location}: {source}"))]
    ParseMetadata {
        #[snafu(implicit(false))]
        location: String,
        source: serde_json::Error,
    },
}

impl CatalogError {
    #[inline]
    pub fn unsupported<S: Into<String>>(message: S) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    #[inline]
    pub fn invalid_identifier<S: Into<String>>(input: S) -> Self {
        Self::InvalidIdentifier {
            input: input.into(),
        }
    }

    #[inline]
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    #[inline]
    pub fn namespace_not_found<S: Into<String>>(catalog: S, namespace: &Namespace) -> Self {
        Self::NamespaceNotFound {
            catalog: catalog.into(),
            namespace: namespace.to_string(),
        }
    }

    #[inline]
    pub fn table_not_found<S: Into<String>>(catalog: S, ident: &Identifier) -> Self {
        Self::TableNotFound {
            catalog: catalog.into(),
            ident: ident.to_string(),
        }
    }

    /// Returns true for the errors a caller can treat as "object does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NamespaceNotFound { .. } | Self::TableNotFound { .. }
        )
    }
}

impl From<CatalogError> for LakecatError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ReadMetadata {
                source: lakecat_io::Error::NotFound { path, source },
                ..
            } => Self::FileNotFound {
                path,
                source: source.into(),
            },
            err => Self::CatalogError(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_not_found_display() {
        let ns = Namespace::parse("foo.bar").unwrap();
        let err = CatalogError::namespace_not_found("test", &ns);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Namespace foo.bar not found in catalog test!");

        let ident = Identifier::parse("foo.bar.tbl").unwrap();
        let err = CatalogError::table_not_found("test", &ident);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Table foo.bar.tbl not found in catalog test!");

        assert!(!CatalogError::unsupported("nope").is_not_found());
    }

    #[test]
    fn test_source_is_kept() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CatalogError::ParseMetadata {
            location: "/tmp/v1.metadata.json".to_string(),
            source,
        };
        assert!(err.source().is_some());
        assert!(err
            .to_string()
            .starts_with("Unable to parse table metadata at /tmp/v1.metadata.json"));
    }

    #[test]
    fn test_into_lakecat_error() {
        let err: LakecatError = CatalogError::unsupported("drop_table").into();
        assert_eq!(err.to_string(), "drop_table");

        let err: LakecatError = CatalogError::ReadMetadata {
            location: "/tmp/missing.json".to_string(),
            source: lakecat_io::Error::NotFound {
                path: "file:///tmp/missing.json".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            },
        }
        .into();
        assert!(err.is_not_found());
    }
}
