use async_trait::async_trait;
use bytes::Bytes;

use crate::local::{collect_file, LocalFile};

/// A located object whose bytes have not been read yet.
#[derive(Debug)]
pub enum GetResult {
    File(LocalFile),
}

impl GetResult {
    pub async fn bytes(self) -> super::Result<Bytes> {
        match self {
            Self::File(f) => collect_file(f).await,
        }
    }
}

/// A store that can hand out the bytes behind a location string.
#[async_trait]
pub trait ObjectSource: Sync + Send {
    async fn get(&self, uri: &str) -> super::Result<GetResult>;
}
