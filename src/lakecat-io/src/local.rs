use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use snafu::ResultExt;

use crate::{
    object_io::{GetResult, ObjectSource},
    Error, InvalidUrlSnafu, Result, UnableToReadBytesSnafu,
};

/// Reads objects addressed by `file://` urls from the local filesystem.
pub struct LocalSource {}

/// A local file that has been located but not yet read.
#[derive(Debug)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl LocalSource {
    pub async fn get_client() -> Result<Arc<Self>> {
        Ok(Arc::new(Self {}))
    }
}

fn to_local_path(uri: &str) -> Result<PathBuf> {
    let url = url::Url::parse(uri).context(InvalidUrlSnafu { path: uri })?;
    url.to_file_path().map_err(|()| Error::InvalidFilePath {
        path: uri.to_string(),
    })
}

fn map_open_error(uri: &str, source: std::io::Error) -> Error {
    if source.kind() == std::io::ErrorKind::NotFound {
        Error::NotFound {
            path: uri.to_string(),
            source,
        }
    } else {
        Error::UnableToOpenFile {
            path: uri.to_string(),
            source,
        }
    }
}

async fn local_path(uri: &str) -> Result<PathBuf> {
    let path = to_local_path(uri)?;
    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|err| map_open_error(uri, err))?;
    if !metadata.is_file() {
        return Err(Error::NotAFile {
            path: uri.to_string(),
        });
    }
    Ok(path)
}

#[async_trait]
impl ObjectSource for LocalSource {
    async fn get(&self, uri: &str) -> Result<GetResult> {
        log::debug!("Local get at {uri}");
        let path = local_path(uri).await?;
        Ok(GetResult::File(LocalFile { path }))
    }
}

pub(crate) async fn collect_file(local_file: LocalFile) -> Result<Bytes> {
    let path = local_file.path;
    let buf = tokio::fs::read(&path)
        .await
        .with_context(|_| UnableToReadBytesSnafu {
            path: path.to_string_lossy(),
        })?;
    Ok(Bytes::from(buf))
}
