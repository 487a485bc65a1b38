use std::fmt::Display;

use crate::error::{CatalogError, CatalogResult};

/// Joins namespace segments in their serialized (stored) form.
pub const SEPARATOR: char = '.';

/// A namespace path; the empty path is the root namespace.
///
/// Segments are never empty and never contain [`SEPARATOR`], so
/// `Namespace::parse(ns.serialize()) == ns` holds for every constructed namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Namespace(Vec<String>);

impl Namespace {
    /// The implicit ancestor of every namespace (level 0).
    pub fn root() -> Self {
        Self(vec![])
    }

    /// Creates a namespace from pre-split segments.
    pub fn try_new<I, S>(segments: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments.into_iter().map(Into::into).collect::<Vec<_>>();
        validate_segments(&segments)?;
        Ok(Self(segments))
    }

    /// Parses a dot-delimited namespace, where the empty string is the root.
    pub fn parse(input: &str) -> CatalogResult<Self> {
        if input.is_empty() {
            return Ok(Self::root());
        }
        Self::try_new(input.split(SEPARATOR)).map_err(|_| CatalogError::invalid_identifier(input))
    }

    /// Splits a namespace string read back from the store.
    ///
    /// Stored values are not validated; an empty string is the root.
    pub(crate) fn deserialize(serialized: &str) -> Self {
        if serialized.is_empty() {
            Self::root()
        } else {
            Self(serialized.split(SEPARATOR).map(String::from).collect())
        }
    }

    /// Joins the segments with [`SEPARATOR`]; the root serializes to `""`.
    pub fn serialize(&self) -> String {
        self.0.join(".")
    }

    /// Number of segments, zero for the root.
    pub fn level(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// A reference (path) to some catalog object: a namespace and a final name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    namespace: Namespace,
    name: String,
}

impl Identifier {
    /// Creates an identifier from pre-split segments; the last segment is the name.
    pub fn try_new<I, S>(segments: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut segments = segments.into_iter().map(Into::into).collect::<Vec<_>>();
        validate_segments(&segments)?;
        let Some(name) = segments.pop() else {
            return Err(CatalogError::invalid_identifier("[]"));
        };
        Ok(Self {
            namespace: Namespace(segments),
            name,
        })
    }

    /// Parses a dot-delimited identifier such as `db.schema.table`.
    pub fn parse(input: &str) -> CatalogResult<Self> {
        if input.is_empty() {
            return Err(CatalogError::invalid_identifier(input));
        }
        Self::try_new(input.split(SEPARATOR)).map_err(|_| CatalogError::invalid_identifier(input))
    }

    /// Creates an identifier from a namespace and a name read back from the store.
    pub(crate) fn from_stored(namespace: Namespace, name: String) -> Self {
        Self { namespace, name }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this is a qualified identifier e.g. has a namespace.
    pub fn has_namespace(&self) -> bool {
        !self.namespace.is_root()
    }

    /// Splits a table identifier, which must have at least one namespace segment.
    pub fn table_parts(&self) -> CatalogResult<(&Namespace, &str)> {
        if !self.has_namespace() {
            return Err(CatalogError::invalid_identifier(self.to_string()));
        }
        Ok((&self.namespace, &self.name))
    }

    /// Total number of segments, name included.
    pub fn num_segments(&self) -> usize {
        self.namespace.level() + 1
    }
}

impl Display for Identifier {
    /// Joins the identifier to a dot-delimited path.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_root() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

// Segments containing the separator are rejected since they cannot round-trip through storage.
fn validate_segments(segments: &[String]) -> CatalogResult<()> {
    if segments
        .iter()
        .any(|segment| segment.is_empty() || segment.contains(SEPARATOR))
    {
        return Err(CatalogError::invalid_identifier(format!("{segments:?}")));
    }
    Ok(())
}
