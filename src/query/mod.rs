//! Query translation: parameter validation and ClickHouse SQL compilation

pub mod compiler;
pub mod params;

pub use compiler::compile;
pub use params::{
    BucketBy, GroupBy, ParamError, QueryDescriptor, TrafficParams, VALID_BOTS, VALID_BUCKET_BYS,
    VALID_GROUP_BYS,
};
