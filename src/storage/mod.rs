pub mod clickhouse;
pub mod models;
pub mod trait_def;

pub use clickhouse::ClickHouseStore;
pub use models::{AccessLogRow, TrafficRow};
pub use trait_def::LogStore;
