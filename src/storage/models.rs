//! Row types for the access-log table
//!
//! ```sql
//! CREATE TABLE accesslog (
//!     Host LowCardinality(String),
//!     Timestamp DateTime,
//!     Device LowCardinality(String),
//!     Browser LowCardinality(String),
//!     Os LowCardinality(String),
//!     Country LowCardinality(String),
//!     StatusCode LowCardinality(String),
//!     StatusCategory LowCardinality(String),
//!     Path String,
//!     FileType LowCardinality(String),
//!     IsProbablyBot LowCardinality(String),
//!     BytesSent UInt64
//! ) ENGINE = MergeTree()
//! PARTITION BY toYYYYMM(Timestamp)
//! ORDER BY (Host, Timestamp);
//! ```

use chrono::{DateTime, Utc};
use clickhouse::Row;
use serde::{Deserialize, Serialize};

use crate::enrich::{AccessEvent, TagSet, UNKNOWN};

/// One enriched access-log row, in table column order.
#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct AccessLogRow {
    #[serde(rename = "Host")]
    pub host: String,

    #[serde(rename = "Timestamp", with = "clickhouse::serde::chrono::datetime")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "Device")]
    pub device: String,

    #[serde(rename = "Browser")]
    pub browser: String,

    #[serde(rename = "Os")]
    pub os: String,

    #[serde(rename = "Country")]
    pub country: String,

    #[serde(rename = "StatusCode")]
    pub status_code: String,

    #[serde(rename = "StatusCategory")]
    pub status_category: String,

    #[serde(rename = "Path")]
    pub path: String,

    #[serde(rename = "FileType")]
    pub file_type: String,

    #[serde(rename = "IsProbablyBot")]
    pub is_probably_bot: String,

    #[serde(rename = "BytesSent")]
    pub bytes_sent: u64,
}

impl AccessLogRow {
    /// Build the row an enriched event becomes. The tag set invariant
    /// guarantees every name is present; a missing one still degrades to
    /// the sentinel rather than panicking.
    pub fn from_event(event: &AccessEvent, tags: &TagSet) -> Self {
        let tag = |name: &str| {
            tags.get(name)
                .cloned()
                .unwrap_or_else(|| UNKNOWN.to_string())
        };

        Self {
            host: event.host.clone(),
            timestamp: event.time(),
            device: tag("device"),
            browser: tag("browser"),
            os: tag("os"),
            country: tag("country"),
            status_code: tag("statuscode"),
            status_category: tag("statuscategory"),
            path: tag("path"),
            file_type: tag("filetype"),
            is_probably_bot: tag("isprobablybot"),
            bytes_sent: event.bytes_sent,
        }
    }
}

/// Result row of a traffic aggregation, in SELECT order.
///
/// Hits count only rows classified as page loads; bytes sum every row in
/// the window and group.
#[derive(Debug, Clone, PartialEq, Row, Serialize, Deserialize)]
pub struct TrafficRow {
    #[serde(rename = "WindowStart", with = "clickhouse::serde::chrono::datetime")]
    pub window_start: DateTime<Utc>,

    #[serde(rename = "GroupKey")]
    pub group_key: String,

    #[serde(rename = "Hits")]
    pub hits: u64,

    #[serde(rename = "Bytes")]
    pub bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_row_from_event_and_tags() {
        let event = AccessEvent {
            timestamp: 1_700_000_000_000,
            remote_ip: "203.0.113.9".parse().unwrap(),
            user_agent: "Mozilla/5.0".to_string(),
            status_code: "200".to_string(),
            host: "example.com".to_string(),
            path: "/index.html".to_string(),
            bytes_sent: 2048,
        };

        let mut tags: TagSet = BTreeMap::new();
        for (name, value) in [
            ("device", "Desktop"),
            ("browser", "Firefox"),
            ("os", "Linux"),
            ("country", "Netherlands"),
            ("statuscode", "200"),
            ("statuscategory", "2xx"),
            ("path", "/index.html"),
            ("filetype", "Page"),
            ("isprobablybot", "false"),
        ] {
            tags.insert(name.to_string(), value.to_string());
        }

        let row = AccessLogRow::from_event(&event, &tags);
        assert_eq!(row.host, "example.com");
        assert_eq!(row.timestamp.timestamp(), 1_700_000_000);
        assert_eq!(row.device, "Desktop");
        assert_eq!(row.file_type, "Page");
        assert_eq!(row.is_probably_bot, "false");
        assert_eq!(row.bytes_sent, 2048);
    }

    #[test]
    fn test_missing_tag_degrades_to_unknown() {
        let event = AccessEvent {
            timestamp: 0,
            remote_ip: "203.0.113.9".parse().unwrap(),
            user_agent: "-".to_string(),
            status_code: "200".to_string(),
            host: "example.com".to_string(),
            path: "/".to_string(),
            bytes_sent: 0,
        };

        let row = AccessLogRow::from_event(&event, &BTreeMap::new());
        assert_eq!(row.device, UNKNOWN);
        assert_eq!(row.country, UNKNOWN);
    }
}
