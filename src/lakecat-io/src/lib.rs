mod config;
mod local;
mod object_io;
pub mod sql;

use std::{borrow::Cow, collections::HashMap, fmt, path::Path, sync::Arc};

use bytes::Bytes;
use common_error::LakecatError;
pub use config::{IOConfig, Properties};
pub use local::{LocalFile, LocalSource};
pub use object_io::{GetResult, ObjectSource};
use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Object at location {} not found\nDetails:\n{}", path, source))]
    NotFound {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("Unable to open file {}: {:?}", path, source))]
    UnableToOpenFile {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("Unable to read data from file {}: {}", path, source))]
    UnableToReadBytes {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("Unable to convert URL \"{}\" to path", path))]
    InvalidUrl {
        path: String,
        source: url::ParseError,
    },

    #[snafu(display("Unable to convert \"{}\" to a local file path", path))]
    InvalidFilePath { path: String },

    #[snafu(display("Not a File: \"{}\"", path))]
    NotAFile { path: String },

    #[snafu(display("Source not yet implemented: {}", store))]
    NotImplementedSource { store: String },
}

impl From<Error> for LakecatError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound { path, source } => Self::FileNotFound {
                path,
                source: source.into(),
            },
            _ => Self::External(err.into()),
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        Self::new(std::io::ErrorKind::Other, err)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum SourceType {
    File,
    Http,
    S3,
    AzureBlob,
    GCS,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Http => write!(f, "http"),
            Self::S3 => write!(f, "s3"),
            Self::AzureBlob => write!(f, "AzureBlob"),
            Self::GCS => write!(f, "gcs"),
        }
    }
}

/// Resolves the source type of a location and normalizes bare paths to `file://` urls.
pub fn parse_url(input: &str) -> Result<(SourceType, Cow<'_, str>)> {
    let path = Path::new(input);
    if path.is_absolute() {
        return Ok((SourceType::File, Cow::Owned(path_to_file_url(input, path)?)));
    }

    match url::Url::parse(input) {
        Ok(url) => {
            let source_type = match url.scheme().to_lowercase().as_str() {
                "file" => SourceType::File,
                "http" | "https" => SourceType::Http,
                "s3" | "s3a" | "s3n" => SourceType::S3,
                "az" | "abfs" | "abfss" => SourceType::AzureBlob,
                "gcs" | "gs" => SourceType::GCS,
                scheme => {
                    return Err(Error::NotImplementedSource {
                        store: scheme.to_string(),
                    })
                }
            };
            Ok((source_type, Cow::Borrowed(input)))
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let cwd = std::env::current_dir().context(UnableToOpenFileSnafu { path: input })?;
            let absolute = cwd.join(input);
            Ok((
                SourceType::File,
                Cow::Owned(path_to_file_url(input, &absolute)?),
            ))
        }
        Err(source) => Err(Error::InvalidUrl {
            path: input.to_string(),
            source,
        }),
    }
}

fn path_to_file_url(input: &str, path: &Path) -> Result<String> {
    url::Url::from_file_path(path)
        .map(|url| url.to_string())
        .map_err(|()| Error::InvalidFilePath {
            path: input.to_string(),
        })
}

/// Entry point for reading objects from the file store.
///
/// Sources are created lazily per [`SourceType`] and shared for the lifetime of the client.
pub struct IOClient {
    source_type_to_store: tokio::sync::RwLock<HashMap<SourceType, Arc<dyn ObjectSource>>>,
    config: Arc<IOConfig>,
}

impl IOClient {
    pub fn new(config: Arc<IOConfig>) -> Self {
        Self {
            source_type_to_store: tokio::sync::RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &IOConfig {
        &self.config
    }

    async fn get_source(&self, source_type: &SourceType) -> Result<Arc<dyn ObjectSource>> {
        {
            if let Some(client) = self.source_type_to_store.read().await.get(source_type) {
                return Ok(client.clone());
            }
        }

        let new_source = match source_type {
            SourceType::File => LocalSource::get_client().await? as Arc<dyn ObjectSource>,
            other => {
                return Err(Error::NotImplementedSource {
                    store: other.to_string(),
                })
            }
        };

        let mut w_handle = self.source_type_to_store.write().await;
        Ok(w_handle
            .entry(*source_type)
            .or_insert(new_source)
            .clone())
    }

    pub async fn single_url_get(&self, input: &str) -> Result<GetResult> {
        let (source_type, path) = parse_url(input)?;
        log::debug!("IOClient get at {input} resolved to {source_type} source: {path}");
        let source = self.get_source(&source_type).await?;
        source.get(path.as_ref()).await
    }

    /// Reads the whole object at `input` into memory.
    pub async fn read_bytes(&self, input: &str) -> Result<Bytes> {
        self.single_url_get(input).await?.bytes().await
    }
}

impl fmt::Debug for IOClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IOClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
