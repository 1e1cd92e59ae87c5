use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::io::Reader as ImageReader;
use image::{DynamicImage, GenericImageView};
use photocast_core::{CompressionSpec, ImageTransformer, PhotocastError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::dimensions::calculate_dimensions;
use crate::orientation;

#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cannot encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl From<ImagingError> for PhotocastError {
    fn from(err: ImagingError) -> Self {
        match err {
            ImagingError::NotFound(path) => PhotocastError::FileNotFound(path),
            other => PhotocastError::ImageProcessingFailed(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Detected from content, not from the file extension
    pub format: Option<String>,
}

/// Reads dimensions and format without decoding pixel data.
pub fn image_info(path: &Path) -> Result<ImageInfo, ImagingError> {
    ensure_file(path)?;
    let reader = open_reader(path)?;
    let format = reader.format().map(|f| format!("{:?}", f).to_lowercase());
    let (width, height) = reader.into_dimensions().map_err(|source| ImagingError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ImageInfo {
        width,
        height,
        format,
    })
}

/// Fit-inside resize followed by a JPEG re-encode over the source file
#[derive(Debug, Clone, Copy)]
pub struct JpegCompressor {
    filter: FilterType,
}

impl Default for JpegCompressor {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl JpegCompressor {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    /// Compresses `path` in place and returns it.
    pub fn compress_file(
        &self,
        path: &Path,
        spec: &CompressionSpec,
    ) -> Result<PathBuf, ImagingError> {
        ensure_file(path)?;
        info!(path = %path.display(), "starting compression");

        let reader = open_reader(path)?;
        let source_format = reader.format();
        let img = reader.decode().map_err(|source| ImagingError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let (orig_w, orig_h) = img.dimensions();
        debug!(
            width = orig_w,
            height = orig_h,
            format = ?source_format,
            orientation = ?spec.orientation_code,
            "original image"
        );

        let img = match spec.orientation_code {
            Some(code) if spec.needs_reorientation() => {
                debug!(code, "applying orientation correction");
                orientation::apply(img, code)
            }
            _ => img,
        };

        let (w, h) = img.dimensions();
        let (target_w, target_h) = calculate_dimensions(w, h, spec.max_dimension_px);
        let img = if (target_w, target_h) == (w, h) {
            img
        } else {
            img.resize_exact(target_w, target_h, self.filter)
        };

        let bytes = encode_jpeg(&img, spec.quality).map_err(|source| ImagingError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, &bytes).map_err(|source| ImagingError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            width = target_w,
            height = target_h,
            bytes = bytes.len(),
            "image compressed"
        );
        Ok(path.to_path_buf())
    }
}

impl ImageTransformer for JpegCompressor {
    fn id(&self) -> &'static str {
        "jpeg"
    }

    fn compress(&self, path: &Path, spec: &CompressionSpec) -> Result<PathBuf, PhotocastError> {
        Ok(self.compress_file(path, spec)?)
    }
}

fn ensure_file(path: &Path) -> Result<(), ImagingError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ImagingError::NotFound(path.to_path_buf()))
    }
}

fn open_reader(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, ImagingError> {
    let io_err = |source: std::io::Error| ImagingError::Io {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> image::ImageResult<Vec<u8>> {
    // JPEG carries no alpha channel
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode_image(&rgb)?;
    Ok(buf)
}
