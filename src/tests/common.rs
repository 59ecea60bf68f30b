// src/tests/common.rs

//! Common helpers for tests.

#![allow(non_upper_case_globals)]

use crate::data::bucket::GroupInterval;
use crate::data::datetime::{
    Duration,
    FieldOrder,
    CUTOFF_DEFAULT,
};
use crate::readers::linecounter::{CountMode, LineCounter};

use ::regex::Regex;

/// field order used by most tests
pub const ORDER_ymdhi: &str = "ymdhi";

/// Build a timestamp-mode `LineCounter` for `order`, `interval_code`, and
/// count pattern, with no split mask and no offset.
pub fn linecounter_ts(
    order: &str,
    interval_code: i64,
    pattern: &str,
) -> LineCounter {
    let interval = GroupInterval::try_from_code(interval_code).unwrap();
    LineCounter::new(
        CountMode::Timestamp(interval),
        Regex::new(pattern).unwrap(),
        FieldOrder::from_order(order).unwrap(),
        None,
        Duration::zero(),
        CUTOFF_DEFAULT,
    )
}

/// Build a key-mode `LineCounter` for `key_pattern` and count pattern.
pub fn linecounter_key(
    key_pattern: &str,
    pattern: &str,
) -> LineCounter {
    LineCounter::new(
        CountMode::Key(Regex::new(key_pattern).unwrap()),
        Regex::new(pattern).unwrap(),
        FieldOrder::from_order(ORDER_ymdhi).unwrap(),
        None,
        Duration::zero(),
        CUTOFF_DEFAULT,
    )
}
