//! Pipeline Runner: fetch → transform → caption → deliver → cleanup
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, Instrument};

use crate::cleanup::remove_files;
use crate::context::ExecutionContext;
use crate::data_model::{
    ensure_batch_size, CompressionSpec, DeliveryReceipt, LinkEntry, PhaseTiming, PhotoRecord, RenderMode,
    RunPhase, RunSummary, SentPhoto,
};
use crate::error::PhotocastError;
use crate::stage::{AssetSource, Captioner, DeliverySink, ImageTransformer};

pub struct PipelineRunner {
    source: Arc<dyn AssetSource>,
    transformer: Arc<dyn ImageTransformer>,
    captioner: Arc<dyn Captioner>,
    sink: Arc<dyn DeliverySink>,
    pipeline_id: String,
}

struct Delivered {
    photos: Vec<SentPhoto>,
    delivery: DeliveryReceipt,
    links_message: DeliveryReceipt,
}

impl PipelineRunner {
    pub fn new(
        source: Arc<dyn AssetSource>,
        transformer: Arc<dyn ImageTransformer>,
        captioner: Arc<dyn Captioner>,
        sink: Arc<dyn DeliverySink>,
    ) -> Self {
        let pipeline_id = [source.id(), transformer.id(), sink.id()].join("→");
        Self {
            source,
            transformer,
            captioner,
            sink,
            pipeline_id,
        }
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn sink(&self) -> &Arc<dyn DeliverySink> {
        &self.sink
    }

    /// Runs one batch of `count` random photos end to end.
    ///
    /// Temp files are removed whenever the run gets past fetching, whether
    /// or not delivery succeeds.
    pub async fn run_batch(
        &self,
        count: usize,
        ctx: &ExecutionContext,
    ) -> Result<RunSummary, PhotocastError> {
        ensure_batch_size(count)?;

        let span = info_span!(
            "run_batch",
            trace_id = %ctx.trace_id,
            pipeline = %self.pipeline_id,
            count
        );
        self.run_phases(count, ctx).instrument(span).await
    }

    async fn run_phases(
        &self,
        count: usize,
        ctx: &ExecutionContext,
    ) -> Result<RunSummary, PhotocastError> {
        let mut clock = PhaseClock::start();

        let records = self.source.fetch_random(count, &ctx.temp_dir).await?;
        info!(fetched = records.len(), "assets fetched");

        let paths: Vec<PathBuf> = records
            .iter()
            .map(|r| r.local_file_path.clone())
            .collect();

        let outcome = match ensure_batch_size(records.len()) {
            Ok(()) => self.transform_and_deliver(&records, ctx, &mut clock).await,
            Err(e) => Err(e),
        };

        clock.advance(RunPhase::CleaningUp);
        let cleanup = remove_files(&paths).await;
        cleanup.log();

        let delivered = match outcome {
            Ok(delivered) => delivered,
            Err(e) => {
                error!(error = %e, "batch run failed");
                return Err(e);
            }
        };
        let phases = clock.finish();
        let sent_count = delivered.photos.len();

        info!(sent_count, "batch run complete");
        Ok(RunSummary {
            trace_id: ctx.trace_id.clone(),
            success: true,
            message: format!("Successfully sent {} random photos", sent_count),
            sent_count,
            photos: delivered.photos,
            delivery: delivered.delivery,
            links_message: delivered.links_message,
            phases,
            cleanup,
        })
    }

    async fn transform_and_deliver(
        &self,
        records: &[PhotoRecord],
        ctx: &ExecutionContext,
        clock: &mut PhaseClock,
    ) -> Result<Delivered, PhotocastError> {
        clock.advance(RunPhase::Transforming);
        self.transform_all(records, ctx).await?;

        let photos: Vec<SentPhoto> = records
            .iter()
            .map(|r| SentPhoto {
                id: r.id.clone(),
                path: r.local_file_path.clone(),
                caption: self.captioner.caption(&r.metadata),
            })
            .collect();

        clock.advance(RunPhase::Delivering);
        let files: Vec<PathBuf> = photos.iter().map(|p| p.path.clone()).collect();
        let delivery = self.sink.send_batch(&files, None).await?;

        let entries: Vec<LinkEntry> = photos
            .iter()
            .map(|p| LinkEntry {
                id: p.id.clone(),
                url: ctx.asset_url(&p.id),
                caption: p.caption.clone(),
            })
            .collect();
        let text = self.captioner.links_message(&entries)?;
        let links_message = self.sink.send_message(&text, RenderMode::Html).await?;

        Ok(Delivered {
            photos,
            delivery,
            links_message,
        })
    }

    /// Compresses every record with bounded concurrency.
    ///
    /// Every transform is awaited before the first error is returned, so no
    /// blocking task can still be writing once cleanup starts.
    async fn transform_all(
        &self,
        records: &[PhotoRecord],
        ctx: &ExecutionContext,
    ) -> Result<Vec<PathBuf>, PhotocastError> {
        let jobs: Vec<(PathBuf, CompressionSpec)> = records
            .iter()
            .map(|record| {
                let spec = ctx
                    .compression
                    .with_orientation(record.metadata.orientation_code);
                (record.local_file_path.clone(), spec)
            })
            .collect();

        let results: Vec<Result<PathBuf, PhotocastError>> = stream::iter(jobs)
            .map(|(path, spec)| {
                let transformer = Arc::clone(&self.transformer);
                async move {
                    tokio::task::spawn_blocking(move || transformer.compress(&path, &spec))
                        .await
                        .map_err(|e| {
                            PhotocastError::ImageProcessingFailed(format!(
                                "transform task failed: {}",
                                e
                            ))
                        })?
                }
            })
            .buffered(ctx.transform_concurrency.max(1))
            .collect()
            .await;

        results.into_iter().collect()
    }
}

struct PhaseClock {
    current: RunPhase,
    started: Instant,
    timings: Vec<PhaseTiming>,
}

impl PhaseClock {
    fn start() -> Self {
        info!(phase = ?RunPhase::Fetching, "phase started");
        Self {
            current: RunPhase::Fetching,
            started: Instant::now(),
            timings: Vec::new(),
        }
    }

    fn advance(&mut self, next: RunPhase) {
        self.timings.push(PhaseTiming {
            phase: self.current,
            latency_ms: self.started.elapsed().as_millis() as u64,
        });
        info!(phase = ?next, "phase started");
        self.current = next;
        self.started = Instant::now();
    }

    fn finish(mut self) -> Vec<PhaseTiming> {
        self.advance(RunPhase::Done);
        self.timings
    }
}

impl std::fmt::Debug for PipelineRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRunner")
            .field("pipeline_id", &self.pipeline_id)
            .finish()
    }
}
