//! Photocast Immich: random asset picker backed by the Immich REST API
//!
//! Endpoints used, relative to the configured API root:
//!
//! ```text
//! GET /assets/random?count=N            pick N assets
//! GET /assets/{id}                      metadata (exifInfo)
//! GET /assets/{id}/thumbnail?size=fullsize   image bytes
//! ```

mod client;
pub mod dto;

pub use client::{ImmichClient, ImmichConfig, ImmichError};
pub use dto::{AssetResponse, ExifInfo};
