//! Data models for log enrichment

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

/// One parsed CDN access-log line.
///
/// Immutable; the pipeline borrows it for the duration of one enrichment
/// call and never keeps it around afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessEvent {
    /// Event time in epoch milliseconds
    pub timestamp: i64,

    /// Client IP address
    pub remote_ip: IpAddr,

    /// Raw user-agent header (`-` when the client sent none)
    pub user_agent: String,

    /// Three-digit HTTP status, kept as the raw string
    pub status_code: String,

    /// Request host
    pub host: String,

    /// Request path
    pub path: String,

    /// Response bytes transferred
    pub bytes_sent: u64,
}

impl AccessEvent {
    /// Event time as a UTC instant. An out-of-range timestamp degrades to
    /// the epoch rather than failing the event.
    pub fn time(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Classification of one event over the fixed 9-tag vocabulary
/// (`device`, `browser`, `os`, `country`, `statuscode`, `statuscategory`,
/// `path`, `filetype`, `isprobablybot`).
///
/// Every tag name is always present; a rule that cannot produce a
/// confident value resolves to the literal `Unknown`, never absence.
pub type TagSet = BTreeMap<String, String>;

/// A timestamped, tagged, field-bearing unit handed to a time-series sink.
#[derive(Debug, Clone, Serialize)]
pub struct MetricPoint {
    /// Metric name, the request host
    pub name: String,

    /// The event's classification
    pub tags: TagSet,

    /// Numeric fields
    pub fields: PointFields,

    /// Event time
    pub timestamp: DateTime<Utc>,
}

/// Field set of a metric point. A single numeric field today: every
/// event counts as one hit.
#[derive(Debug, Clone, Serialize)]
pub struct PointFields {
    pub hits: u64,
}
