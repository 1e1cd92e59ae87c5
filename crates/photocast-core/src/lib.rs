//! Photocast Core: data model, collaborator traits and the batch runner
//!
//! One run moves through a fixed sequence of phases:
//!
//! ```text
//! Fetching → Transforming → Delivering → CleaningUp → Done
//!    ↓            ↓              ↓             ↓
//!  Source    Transformer      Sink        temp files
//!            + Captioner                  removed
//! ```

pub mod cleanup;
pub mod context;
pub mod data_model;
pub mod error;
pub mod runner;
pub mod stage;

pub use cleanup::{remove_files, CleanupOutcome, CleanupReport, CleanupStatus};
pub use context::ExecutionContext;
pub use data_model::{
    ensure_batch_size, BotIdentity, CompressionSpec, DeliveryReceipt, LinkEntry, PhaseTiming,
    PhotoMetadata, PhotoRecord, RenderMode, RunPhase, RunSummary, SentPhoto, MAX_BATCH_SIZE,
};
pub use error::PhotocastError;
pub use runner::PipelineRunner;
pub use stage::{AssetSource, Captioner, DeliverySink, ImageTransformer};

/// Photocast engine version
pub const PHOTOCAST_VERSION: &str = env!("CARGO_PKG_VERSION");
