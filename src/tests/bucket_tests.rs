// src/tests/bucket_tests.rs

//! tests for `bucket.rs` functions

#![allow(non_snake_case)]

use crate::data::bucket::{
    bucket_key,
    GroupInterval,
    INTERVAL_CODE_DEFAULT,
};
use crate::data::datetime::ymdhms;

use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test_case(5, GroupInterval::Minutes(5))]
#[test_case(10, GroupInterval::Minutes(10))]
#[test_case(15, GroupInterval::Minutes(15))]
#[test_case(20, GroupInterval::Minutes(20))]
#[test_case(30, GroupInterval::Minutes(30))]
#[test_case(1, GroupInterval::Hours(1))]
#[test_case(2, GroupInterval::Hours(2))]
#[test_case(3, GroupInterval::Hours(3))]
#[test_case(6, GroupInterval::Hours(6))]
#[test_case(12, GroupInterval::Hours(12))]
#[test_case(24, GroupInterval::Day)]
#[test_case(31, GroupInterval::Month)]
#[test_case(365, GroupInterval::Year)]
fn test_GroupInterval_try_from_code(
    code: i64,
    expect: GroupInterval,
) {
    assert_eq!(GroupInterval::try_from_code(code).unwrap(), expect);
}

#[test_case(0)]
#[test_case(7)]
#[test_case(25)]
#[test_case(60)]
#[test_case(-1)]
#[test_case(366)]
fn test_GroupInterval_try_from_code_invalid(code: i64) {
    let result = GroupInterval::try_from_code(code);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Invalid value interval"));
}

#[test]
fn test_GroupInterval_default_code_is_daily() {
    assert_eq!(
        GroupInterval::try_from_code(INTERVAL_CODE_DEFAULT).unwrap(),
        GroupInterval::Day,
    );
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test_case(GroupInterval::Minutes(5), 10, 9, "2023-01-01 10:05"; "minutes5")]
#[test_case(GroupInterval::Minutes(10), 10, 5, "2023-01-01 10:00"; "minutes10")]
#[test_case(GroupInterval::Minutes(15), 10, 44, "2023-01-01 10:30"; "minutes15")]
#[test_case(GroupInterval::Minutes(20), 10, 59, "2023-01-01 10:40"; "minutes20")]
#[test_case(GroupInterval::Minutes(30), 10, 29, "2023-01-01 10:00"; "minutes30")]
#[test_case(GroupInterval::Hours(1), 10, 42, "2023-01-01 10:00"; "hours1_zeroes_minute")]
#[test_case(GroupInterval::Hours(2), 11, 42, "2023-01-01 10:00"; "hours2")]
#[test_case(GroupInterval::Hours(3), 11, 42, "2023-01-01 09:00"; "hours3")]
#[test_case(GroupInterval::Hours(6), 11, 42, "2023-01-01 06:00"; "hours6")]
#[test_case(GroupInterval::Hours(12), 13, 42, "2023-01-01 12:00"; "hours12")]
fn test_bucket_key_subday(
    interval: GroupInterval,
    hour: u32,
    minute: u32,
    expect: &str,
) {
    let dt = ymdhms(2023, 1, 1, hour, minute, 0);
    assert_eq!(bucket_key(&dt, interval), expect);
}

#[test]
fn test_bucket_key_day() {
    let dt = ymdhms(2023, 1, 1, 23, 59, 59);
    assert_eq!(bucket_key(&dt, GroupInterval::Day), "2023-01-01");
}

#[test]
fn test_bucket_key_month() {
    let dt = ymdhms(2023, 1, 31, 23, 59, 59);
    assert_eq!(bucket_key(&dt, GroupInterval::Month), "2023-01");
}

#[test]
fn test_bucket_key_year() {
    let dt = ymdhms(2023, 12, 31, 23, 59, 59);
    assert_eq!(bucket_key(&dt, GroupInterval::Year), "2023");
}

/// instants on the same calendar day always map to the same daily key,
/// regardless of time-of-day
#[test_case(0, 0, 0)]
#[test_case(8, 30, 15)]
#[test_case(12, 0, 0)]
#[test_case(23, 59, 59)]
fn test_bucket_key_day_is_timeofday_independent(
    hour: u32,
    minute: u32,
    second: u32,
) {
    let dt = ymdhms(2023, 6, 15, hour, minute, second);
    assert_eq!(bucket_key(&dt, GroupInterval::Day), "2023-06-15");
}

/// bucketing an already-bucketed instant at the same granularity yields the
/// same key
#[test_case(GroupInterval::Minutes(5))]
#[test_case(GroupInterval::Minutes(30))]
#[test_case(GroupInterval::Hours(1))]
#[test_case(GroupInterval::Hours(6))]
#[test_case(GroupInterval::Day)]
#[test_case(GroupInterval::Month)]
#[test_case(GroupInterval::Year)]
fn test_bucket_key_idempotent(interval: GroupInterval) {
    let dt = ymdhms(2023, 7, 15, 13, 47, 21);
    let key1 = bucket_key(&dt, interval);
    // re-derive the truncated instant from the first pass
    let truncated = ymdhms(
        2023,
        if matches!(interval, GroupInterval::Year) { 1 } else { 7 },
        match interval {
            GroupInterval::Month | GroupInterval::Year => 1,
            _ => 15,
        },
        match interval {
            GroupInterval::Minutes(_) => 13,
            GroupInterval::Hours(w) => w * (13 / w),
            _ => 0,
        },
        match interval {
            GroupInterval::Minutes(w) => w * (47 / w),
            _ => 0,
        },
        0,
    );
    let key2 = bucket_key(&truncated, interval);
    assert_eq!(key1, key2);
}
