use thiserror::Error;

pub type LakecatResult<T> = std::result::Result<T, LakecatError>;
pub type GenericError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error shared by the lakecat crates and binaries.
///
/// Crate-local errors keep their typed variants and convert into this one at
/// crate boundaries, keeping the original error as the source.
#[derive(Debug, Error)]
pub enum LakecatError {
    #[error("{0}")]
    CatalogError(GenericError),
    #[error("{0:?}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("{0:?}")]
    IoError(#[from] std::io::Error),
    #[error("LakecatError::FileNotFound {path}: {source}")]
    FileNotFound { path: String, source: GenericError },
    #[error("{0}")]
    ValueError(String),
    #[error("{0:?}")]
    External(GenericError),
}

impl LakecatError {
    /// Returns true if the error is a missing file or object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_file_not_found() {
        let err = LakecatError::FileNotFound {
            path: "/tmp/missing.json".to_string(),
            source: "no such file".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "LakecatError::FileNotFound /tmp/missing.json: no such file"
        );
    }

    #[test]
    fn test_from_io_error() {
        let err: LakecatError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, LakecatError::IoError(_)));
        assert!(!err.is_not_found());
    }
}
