//! Unified Error Model
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotocastError {
    #[error("CONFIG/missing: {0} must be configured")]
    ConfigurationMissing(String),

    #[error("CONFIG/invalid: {key}: {reason}")]
    InvalidConfiguration { key: String, reason: String },

    #[error("FETCH/{0}")]
    AssetFetchFailed(String),

    #[error("FILE/not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("IMAGE/{0}")]
    ImageProcessingFailed(String),

    #[error("BATCH/empty: no photos provided")]
    EmptyBatch,

    #[error("BATCH/limit: {requested} photos requested, maximum {max} allowed per batch")]
    BatchTooLarge { requested: usize, max: usize },

    #[error("DELIVERY/{0}")]
    DeliveryFailed(String),

    #[error("CLEANUP/{}: {reason}", path.display())]
    FileCleanupFailed { path: PathBuf, reason: String },
}

impl PhotocastError {
    /// Short machine-readable code, the prefix of the display form
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing(_) | Self::InvalidConfiguration { .. } => "CONFIG",
            Self::AssetFetchFailed(_) => "FETCH",
            Self::FileNotFound(_) => "FILE",
            Self::ImageProcessingFailed(_) => "IMAGE",
            Self::EmptyBatch | Self::BatchTooLarge { .. } => "BATCH",
            Self::DeliveryFailed(_) => "DELIVERY",
            Self::FileCleanupFailed { .. } => "CLEANUP",
        }
    }

    pub fn is_batch_limit(&self) -> bool {
        matches!(self, Self::EmptyBatch | Self::BatchTooLarge { .. })
    }
}
