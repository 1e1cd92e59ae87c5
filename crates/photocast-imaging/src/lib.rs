//! Photocast Imaging: fit-inside resize and in-place JPEG re-encoding
//!
//! ```text
//! decode → orient (EXIF 2-8) → resize (never up) → JPEG @ quality → overwrite
//! ```

mod compressor;
pub mod dimensions;
pub mod orientation;

pub use compressor::{image_info, ImageInfo, ImagingError, JpegCompressor};
pub use dimensions::calculate_dimensions;
