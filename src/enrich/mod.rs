//! CDN access-log enrichment
//!
//! Classifies each raw access event into a fixed set of dimensional tags
//! and emits a timestamped metric point. The geo, user-agent and bot
//! capabilities are injected behind small traits; everything else is pure
//! and stateless per call.

pub mod bot;
pub mod geoip;
pub mod models;
pub mod sink;
pub mod tagger;
pub mod user_agent;

pub use bot::{BotHeuristics, BotSignal, HeuristicBotDetector};
pub use geoip::{GeoIpService, GeoLookup};
pub use models::{AccessEvent, MetricPoint, PointFields, TagSet};
pub use sink::{MetricSink, TracingSink};
pub use tagger::{Tagger, UNKNOWN};
pub use user_agent::{UaProfile, UserAgentInspector, WootheeInspector};
