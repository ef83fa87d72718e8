//! Query descriptor and parameter validation
//!
//! Raw query-string parameters are validated one by one against their
//! enumerated domains; the first failure is returned with enough detail
//! for a 400 response naming the parameter and the allowed values.

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

pub const VALID_GROUP_BYS: [&str; 6] = [
    "Browser",
    "Os",
    "Device",
    "Country",
    "Path",
    "StatusCategory",
];
pub const VALID_BUCKET_BYS: [&str; 4] = ["hour", "day", "week", "month"];
pub const VALID_BOTS: [&str; 2] = ["true", "false"];

/// Raw query-string parameters as they arrive at the HTTP boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrafficParams {
    pub hostname: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub bots: Option<String>,
    pub groupby: Option<String>,
    pub bucketby: Option<String>,
    pub tz: Option<String>,
}

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("Query param '{0}' not provided")]
    Missing(&'static str),

    #[error("Query param '{name}' is not a valid integer: {value}")]
    NotAnInteger { name: &'static str, value: String },

    #[error("Invalid {name} '{value}' (try one of {allowed:?})")]
    NotAllowed {
        name: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("Invalid timezone '{0}' (expected an IANA zone name such as 'UTC' or 'Europe/Amsterdam')")]
    BadTimezone(String),
}

/// Dimension the caller may group by. Variants name the store's columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Browser,
    Os,
    Device,
    Country,
    Path,
    StatusCategory,
}

impl GroupBy {
    pub fn column(self) -> &'static str {
        match self {
            GroupBy::Browser => "Browser",
            GroupBy::Os => "Os",
            GroupBy::Device => "Device",
            GroupBy::Country => "Country",
            GroupBy::Path => "Path",
            GroupBy::StatusCategory => "StatusCategory",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "Browser" => Some(GroupBy::Browser),
            "Os" => Some(GroupBy::Os),
            "Device" => Some(GroupBy::Device),
            "Country" => Some(GroupBy::Country),
            "Path" => Some(GroupBy::Path),
            "StatusCategory" => Some(GroupBy::StatusCategory),
            _ => None,
        }
    }
}

/// Time bucket granularity for the aggregation windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketBy {
    Hour,
    Day,
    Week,
    Month,
}

impl BucketBy {
    /// ClickHouse window-start function for this granularity.
    pub fn start_function(self) -> &'static str {
        match self {
            BucketBy::Hour => "toStartOfHour",
            BucketBy::Day => "toStartOfDay",
            BucketBy::Week => "toStartOfWeek",
            BucketBy::Month => "toStartOfMonth",
        }
    }

    /// ClickHouse interval constructor used for gap-filling.
    pub fn interval_function(self) -> &'static str {
        match self {
            BucketBy::Hour => "toIntervalHour",
            BucketBy::Day => "toIntervalDay",
            BucketBy::Week => "toIntervalWeek",
            BucketBy::Month => "toIntervalMonth",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "hour" => Some(BucketBy::Hour),
            "day" => Some(BucketBy::Day),
            "week" => Some(BucketBy::Week),
            "month" => Some(BucketBy::Month),
            _ => None,
        }
    }
}

/// One validated analytical request. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct QueryDescriptor {
    pub hostname: String,

    /// Window bounds in epoch seconds. `start < end` is caller semantics
    /// and deliberately not enforced here.
    pub start: i64,
    pub end: i64,

    /// Accepted and carried, but not yet applied by the compiler.
    pub include_bots: bool,

    pub group_by: GroupBy,
    pub bucket_by: BucketBy,

    /// Validated IANA timezone the window bounds and bucket boundaries
    /// are localized to.
    pub timezone: Tz,
}

impl QueryDescriptor {
    /// Validate raw request parameters into a descriptor.
    pub fn from_params(params: &TrafficParams) -> Result<Self, ParamError> {
        let hostname = match params.hostname.as_deref() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => return Err(ParamError::Missing("hostname")),
        };

        let start = parse_epoch("start", params.start.as_deref())?;
        let end = parse_epoch("end", params.end.as_deref())?;

        let include_bots = match params.bots.as_deref() {
            Some("true") => true,
            Some("false") => false,
            Some(value) => {
                return Err(ParamError::NotAllowed {
                    name: "bots",
                    value: value.to_string(),
                    allowed: &VALID_BOTS,
                })
            }
            None => return Err(ParamError::Missing("bots")),
        };

        let group_by = match params.groupby.as_deref() {
            Some(value) => GroupBy::parse(value).ok_or_else(|| ParamError::NotAllowed {
                name: "groupby",
                value: value.to_string(),
                allowed: &VALID_GROUP_BYS,
            })?,
            None => return Err(ParamError::Missing("groupby")),
        };

        let bucket_by = match params.bucketby.as_deref() {
            Some(value) => BucketBy::parse(value).ok_or_else(|| ParamError::NotAllowed {
                name: "bucketby",
                value: value.to_string(),
                allowed: &VALID_BUCKET_BYS,
            })?,
            None => return Err(ParamError::Missing("bucketby")),
        };

        // strict IANA validation; the zone name is later interpolated
        // into SQL, so nothing unvalidated may pass this point
        let timezone = match params.tz.as_deref() {
            Some(value) if !value.is_empty() => value
                .parse::<Tz>()
                .map_err(|_| ParamError::BadTimezone(value.to_string()))?,
            _ => return Err(ParamError::Missing("tz")),
        };

        Ok(Self {
            hostname,
            start,
            end,
            include_bots,
            group_by,
            bucket_by,
            timezone,
        })
    }
}

fn parse_epoch(name: &'static str, value: Option<&str>) -> Result<i64, ParamError> {
    match value {
        None | Some("") => Err(ParamError::Missing(name)),
        Some(value) => value.parse::<i64>().map_err(|_| ParamError::NotAnInteger {
            name,
            value: value.to_string(),
        }),
    }
}
