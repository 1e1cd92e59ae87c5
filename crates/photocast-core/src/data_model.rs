//! Data Model: PhotoRecord, CompressionSpec, RunSummary
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cleanup::CleanupReport;
use crate::error::PhotocastError;

/// Delivery batch limit of the messaging API
pub const MAX_BATCH_SIZE: usize = 10;

/// EXIF orientation meaning "already upright"
pub const IDENTITY_ORIENTATION: u16 = 1;

pub const DEFAULT_MAX_DIMENSION: u32 = 1920;
pub const DEFAULT_QUALITY: u8 = 90;

/// Fails with `EmptyBatch` for 0 and `BatchTooLarge` above [`MAX_BATCH_SIZE`].
pub fn ensure_batch_size(count: usize) -> Result<(), PhotocastError> {
    match count {
        0 => Err(PhotocastError::EmptyBatch),
        n if n > MAX_BATCH_SIZE => Err(PhotocastError::BatchTooLarge {
            requested: n,
            max: MAX_BATCH_SIZE,
        }),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub country: Option<String>,
    pub city: Option<String>,
    /// Original capture time, kept in the camera's own offset
    pub capture_timestamp: Option<DateTime<FixedOffset>>,
    /// EXIF orientation code (1-8)
    pub orientation_code: Option<u16>,
}

/// A fetched asset whose binary sits in the temp directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub local_file_path: PathBuf,
    pub metadata: PhotoMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionSpec {
    /// Bound for the larger side, in pixels
    pub max_dimension_px: u32,
    /// JPEG quality, 0-100
    pub quality: u8,
    pub orientation_code: Option<u16>,
}

impl Default for CompressionSpec {
    fn default() -> Self {
        Self {
            max_dimension_px: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_QUALITY,
            orientation_code: None,
        }
    }
}

impl CompressionSpec {
    pub fn new(max_dimension_px: u32, quality: u8) -> Self {
        Self {
            max_dimension_px,
            quality: quality.min(100),
            orientation_code: None,
        }
    }

    pub fn with_orientation(self, orientation_code: Option<u16>) -> Self {
        Self {
            orientation_code,
            ..self
        }
    }

    /// Whether an orientation correction has to run before resizing
    pub fn needs_reorientation(&self) -> bool {
        matches!(self.orientation_code, Some(code) if code != IDENTITY_ORIENTATION)
    }
}

/// Formatting applied by the messaging API to a text message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Html,
    Markdown,
}

/// One line of the links message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub id: String,
    pub url: String,
    pub caption: String,
}

/// Raw outcome of a Delivery Sink call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub chat: String,
    pub message_ids: Vec<i32>,
    pub delivered: usize,
    /// Paths dropped before sending because they did not exist
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotIdentity {
    pub id: u64,
    pub username: String,
    pub first_name: String,
    pub can_join_groups: bool,
    pub can_read_all_group_messages: bool,
    pub supports_inline_queries: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Fetching,
    Transforming,
    Delivering,
    CleaningUp,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub phase: RunPhase,
    pub latency_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentPhoto {
    pub id: String,
    pub path: PathBuf,
    pub caption: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub trace_id: String,
    pub success: bool,
    pub message: String,
    pub sent_count: usize,
    pub photos: Vec<SentPhoto>,
    pub delivery: DeliveryReceipt,
    pub links_message: DeliveryReceipt,
    pub phases: Vec<PhaseTiming>,
    pub cleanup: CleanupReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_bounds() {
        assert!(matches!(ensure_batch_size(0), Err(PhotocastError::EmptyBatch)));
        assert!(matches!(
            ensure_batch_size(11),
            Err(PhotocastError::BatchTooLarge { requested: 11, max: 10 })
        ));
        assert!(ensure_batch_size(1).is_ok());
        assert!(ensure_batch_size(10).is_ok());
    }

    #[test]
    fn test_compression_defaults() {
        let spec = CompressionSpec::default();
        assert_eq!(spec.max_dimension_px, 1920);
        assert_eq!(spec.quality, 90);
        assert!(!spec.needs_reorientation());
    }

    #[test]
    fn test_identity_orientation_is_not_applied() {
        let spec = CompressionSpec::default().with_orientation(Some(1));
        assert!(!spec.needs_reorientation());

        let spec = spec.with_orientation(Some(6));
        assert!(spec.needs_reorientation());
    }

    #[test]
    fn test_quality_is_capped() {
        assert_eq!(CompressionSpec::new(800, 250).quality, 100);
    }
}
