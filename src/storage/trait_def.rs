use anyhow::Result;
use async_trait::async_trait;

use crate::storage::models::{AccessLogRow, TrafficRow};

/// The columnar analytics store at its seam: enriched rows go in,
/// compiled aggregations come back out as typed rows.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Initialize the store (create the access-log table if needed)
    async fn init(&self) -> Result<()>;

    /// Insert one enriched access-log row
    async fn insert(&self, row: AccessLogRow) -> Result<()>;

    /// Execute a compiled traffic aggregation and return its rows in
    /// store order
    async fn traffic(&self, sql: &str) -> Result<Vec<TrafficRow>>;
}
