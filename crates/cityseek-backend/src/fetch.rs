//! HTTP dataset fetcher.

use crate::error::BackendError;
use crate::traits::DatasetFetcher;
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Downloads the dataset with reqwest, streaming the body chunk by chunk
/// rather than buffering it in memory.
///
/// Bytes land in a `.part` sibling first and are renamed to the
/// destination only once the stream completes, so a dropped connection
/// never leaves a truncated file where the pipeline expects a finished
/// download.
pub struct HttpDatasetFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpDatasetFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// The endpoint this fetcher downloads from.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn stream_body(
        response: reqwest::Response,
        file: &mut tokio::fs::File,
    ) -> Result<u64, BackendError> {
        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}

/// In-flight download path: the destination's file name plus `.part`.
fn partial_download_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

#[async_trait]
impl DatasetFetcher for HttpDatasetFetcher {
    async fn fetch_dataset(&self, dest: &Path) -> Result<u64, BackendError> {
        debug!(url = %self.url, "fetching city dataset");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::FetchStatus {
                status: status.as_u16(),
            });
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let partial = partial_download_path(dest);
        let mut file = tokio::fs::File::create(&partial).await?;

        match Self::stream_body(response, &mut file).await {
            Ok(written) => {
                drop(file);
                tokio::fs::rename(&partial, dest).await?;
                info!(bytes = written, path = %dest.display(), "dataset downloaded");
                Ok(written)
            }
            Err(err) => {
                drop(file);
                let _ = tokio::fs::remove_file(&partial).await;
                Err(err)
            }
        }
    }
}
