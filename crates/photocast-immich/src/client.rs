use async_trait::async_trait;
use futures::future::try_join_all;
use photocast_core::{remove_files, AssetSource, PhotoRecord, PhotocastError};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::dto::AssetResponse;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Error)]
pub enum ImmichError {
    #[error("invalid API key header value")]
    InvalidApiKey,
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ImmichError> for PhotocastError {
    fn from(err: ImmichError) -> Self {
        PhotocastError::AssetFetchFailed(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ImmichConfig {
    /// API root, e.g. `https://photos.example.org/api`
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Long-lived handle on one Immich server
#[derive(Debug, Clone)]
pub struct ImmichClient {
    http: Client,
    base: String,
}

impl ImmichClient {
    pub fn new(config: &ImmichConfig) -> Result<Self, ImmichError> {
        let mut key = HeaderValue::from_str(&config.api_key).map_err(|_| ImmichError::InvalidApiKey)?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(concat!("photocast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ImmichError::Http {
                url: config.api_url.clone(),
                source,
            })?;

        let base = config.api_url.trim_end_matches('/').to_string();
        info!(url = %base, "Immich client initialized");
        Ok(Self { http, base })
    }

    pub async fn random_assets(&self, count: usize) -> Result<Vec<AssetResponse>, ImmichError> {
        let url = format!("{}/assets/random?count={}", self.base, count);
        self.get_json(url).await
    }

    pub async fn asset_info(&self, id: &str) -> Result<AssetResponse, ImmichError> {
        let url = format!("{}/assets/{}", self.base, id);
        self.get_json(url).await
    }

    /// Full-size rendition, already converted to a web format by the server
    pub async fn asset_binary(&self, id: &str) -> Result<Vec<u8>, ImmichError> {
        let url = format!("{}/assets/{}/thumbnail?size=fullsize", self.base, id);
        let response = self.get(&url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ImmichError::Http { url, source })?;
        Ok(bytes.to_vec())
    }

    /// Picks `count` random assets and stores each as `{dir}/{id}.jpg`.
    ///
    /// Repeated ids in the server's pick are dropped, so a run may get
    /// fewer records than asked for.
    ///
    /// Metadata and binaries are fetched concurrently; nothing is written
    /// to disk until every request has succeeded.
    pub async fn download_random_photos(
        &self,
        count: usize,
        dir: &Path,
    ) -> Result<Vec<PhotoRecord>, ImmichError> {
        let mut assets = self.random_assets(count).await?;
        let mut seen = HashSet::new();
        assets.retain(|a| seen.insert(file_name_for(&a.id)));
        assets.truncate(count);
        debug!(count = assets.len(), "random assets picked");

        let (infos, blobs) = futures::try_join!(
            try_join_all(assets.iter().map(|a| self.asset_info(&a.id))),
            try_join_all(assets.iter().map(|a| self.asset_binary(&a.id))),
        )?;

        let mut records: Vec<PhotoRecord> = Vec::with_capacity(assets.len());
        for ((asset, info), bytes) in assets.iter().zip(infos).zip(blobs) {
            let path = dir.join(file_name_for(&asset.id));
            if let Err(source) = tokio::fs::write(&path, &bytes).await {
                let written: Vec<PathBuf> =
                    records.iter().map(|r| r.local_file_path.clone()).collect();
                remove_files(&written).await.log();
                return Err(ImmichError::Io { path, source });
            }
            debug!(id = %asset.id, bytes = bytes.len(), "asset stored");
            records.push(PhotoRecord {
                id: asset.id.clone(),
                local_file_path: path,
                metadata: info.metadata(),
            });
        }

        info!(count = records.len(), "random photos downloaded");
        Ok(records)
    }

    async fn get(&self, url: &str) -> Result<Response, ImmichError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ImmichError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ImmichError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ImmichError> {
        let response = self.get(&url).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| ImmichError::Http { url, source })
    }
}

#[async_trait]
impl AssetSource for ImmichClient {
    fn id(&self) -> &'static str {
        "immich"
    }

    async fn fetch_random(
        &self,
        count: usize,
        temp_dir: &Path,
    ) -> Result<Vec<PhotoRecord>, PhotocastError> {
        Ok(self.download_random_photos(count, temp_dir).await?)
    }
}

/// Asset ids are UUIDs; anything else is stripped so the name stays inside the temp dir
fn file_name_for(id: &str) -> String {
    let safe: String = id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    format!("{}.jpg", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_keeps_uuid() {
        assert_eq!(
            file_name_for("0d5b0a4e-7a41-4c2c-9d45-2f1b6f0c1a11"),
            "0d5b0a4e-7a41-4c2c-9d45-2f1b6f0c1a11.jpg"
        );
    }

    #[test]
    fn test_file_name_strips_separators() {
        assert_eq!(file_name_for("../../etc/passwd"), "etcpasswd.jpg");
    }

    #[test]
    fn test_rejects_unprintable_key() {
        let config = ImmichConfig {
            api_url: "http://localhost:2283/api".into(),
            api_key: "bad\nkey".into(),
            timeout: Duration::from_secs(5),
        };
        assert!(matches!(ImmichClient::new(&config), Err(ImmichError::InvalidApiKey)));
    }
}
