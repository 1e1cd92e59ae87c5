//! Photocast Caption: human-readable labels and the album links message
//!
//! # Example
//!
//! ```ignore
//! use photocast_caption::CaptionBuilder;
//! use photocast_core::{Captioner, PhotoMetadata};
//!
//! let builder = CaptionBuilder::default();
//! let caption = builder.caption(&PhotoMetadata {
//!     country: Some("France".into()),
//!     ..Default::default()
//! });
//! assert_eq!(caption, "France, Unknown");
//! ```

pub mod caption;
pub mod links;

use photocast_core::{Captioner, LinkEntry, PhotoMetadata, PhotocastError};

pub use caption::{build_caption, format_date};
pub use links::{LinksError, LinksRenderer, DEFAULT_LINKS_TEMPLATE};

pub struct CaptionBuilder {
    links: LinksRenderer,
}

impl CaptionBuilder {
    /// Builder with a custom links template
    pub fn with_template(template: &str) -> Result<Self, LinksError> {
        Ok(Self {
            links: LinksRenderer::new(template)?,
        })
    }
}

impl Default for CaptionBuilder {
    fn default() -> Self {
        match Self::with_template(DEFAULT_LINKS_TEMPLATE) {
            Ok(builder) => builder,
            Err(e) => unreachable!("built-in links template is valid: {}", e),
        }
    }
}

impl Captioner for CaptionBuilder {
    fn caption(&self, metadata: &PhotoMetadata) -> String {
        build_caption(metadata)
    }

    fn links_message(&self, entries: &[LinkEntry]) -> Result<String, PhotocastError> {
        self.links
            .render(entries)
            .map_err(|e| PhotocastError::DeliveryFailed(e.to_string()))
    }
}
