//! Metric sink interface
//!
//! The pipeline hands over one point per event and moves on; delivery,
//! batching and retry are the sink's responsibility.

use anyhow::Result;
use async_trait::async_trait;

use crate::enrich::models::MetricPoint;

/// Destination for enriched metric points.
#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn write(&self, point: MetricPoint) -> Result<()>;
}

/// Sink used when no time-series backend is configured: points are
/// emitted to the log at debug level and dropped.
pub struct TracingSink;

#[async_trait]
impl MetricSink for TracingSink {
    async fn write(&self, point: MetricPoint) -> Result<()> {
        tracing::debug!(
            metric = %point.name,
            hits = point.fields.hits,
            timestamp = %point.timestamp,
            "metric point"
        );
        Ok(())
    }
}
