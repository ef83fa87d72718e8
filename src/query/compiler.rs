//! Compiles a validated descriptor into one ClickHouse aggregation query
//!
//! The rendered statement has a fixed shape: a tz-localized window-start
//! projection, the group-by column, a page-load hit count, a byte sum
//! over all rows, a host filter with a half-open timestamp range, and an
//! ascending window ordering with gap-fill at the bucket interval so
//! empty windows still appear.

use crate::query::params::QueryDescriptor;

/// Render the aggregation statement for one descriptor.
///
/// Deterministic: identical descriptors render identical SQL. The
/// timezone name comes out of a validated [`chrono_tz::Tz`] and the
/// hostname is escaped before interpolation, so no caller-controlled
/// text reaches the statement unchecked.
///
/// `include_bots` is carried on the descriptor but not rendered: the bot
/// filter has no product-confirmed semantics yet and stays a documented
/// dead path.
pub fn compile(query: &QueryDescriptor) -> String {
    let tz = query.timezone.name();

    format!(
        "SELECT {start_fn}(toDateTime(Timestamp, '{tz}')) AS WindowStart, \
         {group} AS GroupKey, \
         countIf(FileType = 'Page') AS Hits, \
         sum(BytesSent) AS Bytes \
         FROM accesslog \
         WHERE Host = '{host}' \
         AND Timestamp >= toDateTime({start}, '{tz}') \
         AND Timestamp < toDateTime({end}, '{tz}') \
         GROUP BY WindowStart, GroupKey \
         ORDER BY WindowStart ASC WITH FILL STEP {interval}(1)",
        start_fn = query.bucket_by.start_function(),
        group = query.group_by.column(),
        host = escape(&query.hostname),
        start = query.start,
        end = query.end,
        interval = query.bucket_by.interval_function(),
        tz = tz,
    )
}

/// Escape a value for use inside a single-quoted ClickHouse literal.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
