// src/data/bucket.rs

//! Fold a [`DateTimeL`] down onto a bucket boundary and render the
//! canonical bucket key.
//!
//! The bucket width is selected by a user-passed interval code
//! (CLI option `-t`), validated once at program start by
//! [`GroupInterval::try_from_code`]. The key rendering varies with the
//! width: sub-day buckets keep date and `H:M` time, daily buckets the date
//! only, and so on. See [`bucket_key`].
//!
//! [`DateTimeL`]: crate::data::datetime::DateTimeL
//! [`GroupInterval::try_from_code`]: self::GroupInterval::try_from_code
//! [`bucket_key`]: self::bucket_key

use crate::data::datetime::{
    DateTimeL,
    Datelike,
    TimeZone,
    Timelike,
    Utc,
};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Canonical string rendering of a truncated instant; the Aggregator key in
/// timestamp mode.
pub type BucketKey = String;

/// default interval code: daily buckets
pub const INTERVAL_CODE_DEFAULT: i64 = 24;

/// the interval codes accepted by [`GroupInterval::try_from_code`],
/// rendered for `--help`
pub const INTERVAL_CODES_HELP: &str =
    "5, 10, 15, 20, 30 = minutes; 1, 2, 3, 6, 12, 24 = hours; 31 = month; 365 = year";

/// strftime pattern for sub-day buckets
const DTF_MINUTE: &str = "%Y-%m-%d %H:%M";
/// strftime pattern for daily buckets
const DTF_DAY: &str = "%Y-%m-%d";
/// strftime pattern for monthly buckets
const DTF_MONTH: &str = "%Y-%m";
/// strftime pattern for yearly buckets
const DTF_YEAR: &str = "%Y";

/// A validated bucket width.
///
/// The wire form is the integer interval code; codes that do not name a
/// width are a user misconfiguration caught before any file is processed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GroupInterval {
    /// codes 5, 10, 15, 20, 30; minute rounded down to a multiple
    Minutes(u32),
    /// codes 1, 2, 3, 6, 12; hour rounded down to a multiple, minute zeroed
    Hours(u32),
    /// code 24; calendar day
    Day,
    /// code 31; calendar month
    Month,
    /// code 365; calendar year
    Year,
}

impl GroupInterval {
    /// Map a user-passed interval code to a `GroupInterval`.
    ///
    /// The `Err` message is printed verbatim and the caller is expected to
    /// abort the run; an unrecognized code means the whole run is
    /// misconfigured, not that one line is bad.
    pub fn try_from_code(code: i64) -> Result<GroupInterval, String> {
        defñ!("({})", code);
        match code {
            5 | 10 | 15 | 20 | 30 => Ok(GroupInterval::Minutes(code as u32)),
            1 | 2 | 3 | 6 | 12 => Ok(GroupInterval::Hours(code as u32)),
            24 => Ok(GroupInterval::Day),
            31 => Ok(GroupInterval::Month),
            365 => Ok(GroupInterval::Year),
            _ => Err(format!("Invalid value interval {}", code)),
        }
    }
}

/// Truncate `dt` down to the boundary of its bucket and render the bucket
/// key.
///
/// The truncated instant is re-built via the chrono calendar constructor,
/// not by masking the rendered string, so field combinations the
/// constructor would reject cannot leak into a key. Bucketing is
/// idempotent: feeding a bucket boundary back in yields the same key.
pub fn bucket_key(
    dt: &DateTimeL,
    interval: GroupInterval,
) -> BucketKey {
    let mut minute: u32 = 0;
    let mut hour: u32 = dt.hour();
    let mut day: u32 = dt.day();
    let mut month: u32 = dt.month();
    let format: &str = match interval {
        GroupInterval::Minutes(width) => {
            minute = width * (dt.minute() / width);
            DTF_MINUTE
        }
        GroupInterval::Hours(1) => DTF_MINUTE,
        GroupInterval::Hours(width) => {
            hour = width * (dt.hour() / width);
            DTF_MINUTE
        }
        GroupInterval::Day => {
            hour = 0;
            DTF_DAY
        }
        GroupInterval::Month => {
            day = 1;
            hour = 0;
            DTF_MONTH
        }
        GroupInterval::Year => {
            month = 1;
            day = 1;
            hour = 0;
            DTF_YEAR
        }
    };
    let truncated: DateTimeL = match Utc
        .with_ymd_and_hms(dt.year(), month, day, hour, minute, 0)
        .single()
    {
        Some(truncated) => truncated,
        // inputs are already valid calendar fields so this should not occur;
        // guard against drift
        None => *dt,
    };

    truncated.format(format).to_string()
}
