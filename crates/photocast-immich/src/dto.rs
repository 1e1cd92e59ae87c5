//! Wire shapes of the Immich asset endpoints (only the fields we read)
use chrono::{DateTime, FixedOffset};
use photocast_core::PhotoMetadata;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    pub id: String,
    #[serde(default)]
    pub exif_info: Option<ExifInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExifInfo {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub date_time_original: Option<String>,
    /// Sent as a string ("6") by current servers, as a number by some older ones
    #[serde(default)]
    pub orientation: Option<Value>,
}

impl ExifInfo {
    pub fn orientation_code(&self) -> Option<u16> {
        match self.orientation.as_ref()? {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            _ => None,
        }
    }

    pub fn capture_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.date_time_original.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Some(ts),
            Err(e) => {
                debug!(raw, error = %e, "unparseable dateTimeOriginal");
                None
            }
        }
    }
}

impl AssetResponse {
    pub fn metadata(&self) -> PhotoMetadata {
        let exif = self.exif_info.clone().unwrap_or_default();
        PhotoMetadata {
            country: exif.country.clone(),
            city: exif.city.clone(),
            capture_timestamp: exif.capture_timestamp(),
            orientation_code: exif.orientation_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_exif() {
        let asset: AssetResponse = serde_json::from_value(json!({
            "id": "0d5b0a4e-7a41-4c2c-9d45-2f1b6f0c1a11",
            "originalFileName": "IMG_0001.HEIC",
            "exifInfo": {
                "country": "Russian Federation",
                "city": "Saint Petersburg",
                "dateTimeOriginal": "2023-05-14T15:30:00.000Z",
                "orientation": "6",
                "make": "Apple"
            }
        }))
        .unwrap();

        let meta = asset.metadata();
        assert_eq!(meta.country.as_deref(), Some("Russian Federation"));
        assert_eq!(meta.city.as_deref(), Some("Saint Petersburg"));
        assert_eq!(meta.orientation_code, Some(6));
        assert_eq!(
            meta.capture_timestamp.unwrap().to_rfc3339(),
            "2023-05-14T15:30:00+00:00"
        );
    }

    #[test]
    fn test_numeric_orientation() {
        let exif: ExifInfo = serde_json::from_value(json!({ "orientation": 8 })).unwrap();
        assert_eq!(exif.orientation_code(), Some(8));
    }

    #[test]
    fn test_nulls_and_garbage() {
        let exif: ExifInfo = serde_json::from_value(json!({
            "country": null,
            "orientation": "sideways",
            "dateTimeOriginal": "last summer"
        }))
        .unwrap();
        assert_eq!(exif.orientation_code(), None);
        assert_eq!(exif.capture_timestamp(), None);
    }

    #[test]
    fn test_missing_exif_block() {
        let asset: AssetResponse = serde_json::from_value(json!({ "id": "x" })).unwrap();
        assert_eq!(asset.metadata(), PhotoMetadata::default());
    }
}
