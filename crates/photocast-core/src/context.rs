//! Execution Context: per-run settings shared by every phase
use std::path::PathBuf;

use crate::data_model::CompressionSpec;

#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub trace_id: String,
    /// Directory the Asset Source writes binaries into
    pub temp_dir: PathBuf,
    /// Base URL used for the per-photo links, without trailing slash
    pub public_url: String,
    /// Bounds applied to every photo; orientation is filled per record
    pub compression: CompressionSpec,
    pub transform_concurrency: usize,
}

impl ExecutionContext {
    pub fn new(temp_dir: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            trace_id: uuid::Uuid::new_v4().to_string(),
            temp_dir: temp_dir.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
            compression: CompressionSpec::default(),
            transform_concurrency: 4,
        }
    }

    pub fn with_compression(mut self, compression: CompressionSpec) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_transform_concurrency(mut self, concurrency: usize) -> Self {
        self.transform_concurrency = concurrency.max(1);
        self
    }

    /// Library page of one asset
    pub fn asset_url(&self, id: &str) -> String {
        format!("{}/photos/{}", self.public_url, id)
    }
}
