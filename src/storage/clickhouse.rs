//! ClickHouse-backed log store

use anyhow::{Context, Result};
use async_trait::async_trait;
use clickhouse::Client;

use crate::config::StoreConfig;
use crate::storage::models::{AccessLogRow, TrafficRow};
use crate::storage::trait_def::LogStore;

/// First-run DDL. LowCardinality on the tag columns keeps dictionaries
/// small; ordering by (Host, Timestamp) matches the query filter shape.
const CREATE_ACCESSLOG: &str = "\
CREATE TABLE IF NOT EXISTS accesslog (
    Host LowCardinality(String),
    Timestamp DateTime,
    Device LowCardinality(String),
    Browser LowCardinality(String),
    Os LowCardinality(String),
    Country LowCardinality(String),
    StatusCode LowCardinality(String),
    StatusCategory LowCardinality(String),
    Path String,
    FileType LowCardinality(String),
    IsProbablyBot LowCardinality(String),
    BytesSent UInt64
)
ENGINE = MergeTree()
PARTITION BY toYYYYMM(Timestamp)
ORDER BY (Host, Timestamp)";

pub struct ClickHouseStore {
    client: Client,
}

impl ClickHouseStore {
    pub fn new(config: &StoreConfig) -> Self {
        let mut client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database);

        if let Some(user) = &config.user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.password {
            client = client.with_password(password);
        }

        Self { client }
    }
}

#[async_trait]
impl LogStore for ClickHouseStore {
    async fn init(&self) -> Result<()> {
        self.client
            .query(CREATE_ACCESSLOG)
            .execute()
            .await
            .context("creating accesslog table")
    }

    async fn insert(&self, row: AccessLogRow) -> Result<()> {
        let mut insert = self
            .client
            .insert("accesslog")
            .context("opening accesslog insert")?;
        insert
            .write(&row)
            .await
            .context("writing accesslog row")?;
        insert.end().await.context("flushing accesslog insert")
    }

    async fn traffic(&self, sql: &str) -> Result<Vec<TrafficRow>> {
        self.client
            .query(sql)
            .fetch_all::<TrafficRow>()
            .await
            .context("executing traffic query")
    }
}
