//! Collaborator contracts for each step of a run
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::data_model::{
    BotIdentity, CompressionSpec, DeliveryReceipt, LinkEntry, PhotoMetadata, PhotoRecord,
    RenderMode,
};
use crate::error::PhotocastError;

/// Remote photo library
#[async_trait]
pub trait AssetSource: Send + Sync {
    fn id(&self) -> &'static str;

    /// Picks `count` random assets and writes their binaries into `temp_dir`.
    ///
    /// On error no file written by this call may be left behind.
    async fn fetch_random(
        &self,
        count: usize,
        temp_dir: &Path,
    ) -> Result<Vec<PhotoRecord>, PhotocastError>;
}

/// In-place image re-encoder. Runs on a blocking thread.
pub trait ImageTransformer: Send + Sync {
    fn id(&self) -> &'static str;

    fn compress(&self, path: &Path, spec: &CompressionSpec) -> Result<PathBuf, PhotocastError>;
}

pub trait Captioner: Send + Sync {
    fn caption(&self, metadata: &PhotoMetadata) -> String;

    /// Text sent after the album, one entry per photo in album order
    fn links_message(&self, entries: &[LinkEntry]) -> Result<String, PhotocastError>;
}

/// Messaging destination
#[async_trait]
pub trait DeliverySink: Send + Sync {
    fn id(&self) -> &'static str;

    async fn send_batch(
        &self,
        files: &[PathBuf],
        caption: Option<&str>,
    ) -> Result<DeliveryReceipt, PhotocastError>;

    async fn send_message(
        &self,
        text: &str,
        mode: RenderMode,
    ) -> Result<DeliveryReceipt, PhotocastError>;

    async fn check_connection(&self) -> bool;

    async fn identity(&self) -> Result<BotIdentity, PhotocastError>;
}
