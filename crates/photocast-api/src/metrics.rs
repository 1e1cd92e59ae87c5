//! Prometheus counters for batch runs, exposed at `/metrics`.
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub runs_total: IntCounter,
    pub runs_failed_total: IntCounter,
    pub photos_sent_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let runs_total = IntCounter::new("photocast_runs_total", "Batch runs started")?;
        let runs_failed_total =
            IntCounter::new("photocast_runs_failed_total", "Batch runs that failed")?;
        let photos_sent_total =
            IntCounter::new("photocast_photos_sent_total", "Photos delivered by batch runs")?;

        registry.register(Box::new(runs_total.clone()))?;
        registry.register(Box::new(runs_failed_total.clone()))?;
        registry.register(Box::new(photos_sent_total.clone()))?;

        Ok(Self {
            registry,
            runs_total,
            runs_failed_total,
            photos_sent_total,
        })
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
