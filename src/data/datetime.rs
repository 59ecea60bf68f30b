// src/data/datetime.rs

//! Reconstruct chrono [`DateTime`] instances from the leading characters of
//! a log line.
//!
//! Unlike a `strftime`-style parser, nothing here hardcodes a timestamp
//! layout. The user describes the layout once with a [`FieldOrder`] string
//! like `"ymdhi"`, and then for each line:
//! 1. the line prefix (bounded by a cutoff, see [`char_prefix`]) is
//!    optionally resegmented by [`split_at_mask`] so that a compact digit
//!    blob like `20160304` becomes `2016 03 04`
//! 2. the maximal digit runs are extracted left to right
//! 3. each run is assigned to the calendar field at the same position of
//!    the `FieldOrder`
//!
//! The most relevant function is [`datetime_from_prefix`].
//!
//! [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
//! [`FieldOrder`]: self::FieldOrder
//! [`char_prefix`]: self::char_prefix
//! [`split_at_mask`]: self::split_at_mask
//! [`datetime_from_prefix`]: self::datetime_from_prefix

use std::fmt;

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    Datelike, // adds method `.year()` onto `DateTime`
    Duration,
    TimeZone,
    Timelike,
    Utc,
};
use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// The chrono [`DateTime`] type used in _lgslib_.
///
/// All instants are UTC; a fixed [`Duration`] offset passed to
/// [`datetime_from_prefix`] stands in for timezone handling.
///
/// [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
pub type DateTimeL = DateTime<Utc>;
pub type DateTimeLOpt = Option<DateTimeL>;

/// The default bound on the timestamp search window; characters of a line
/// past this are never searched for digit runs
/// (CLI option `--cutoff`).
pub const CUTOFF_DEFAULT: usize = 25;

/// Character in a splitter mask marking an injected separator.
/// See [`split_at_mask`].
pub const SPLIT_MARK: char = 'x';

lazy_static! {
    /// maximal ASCII digit runs within the candidate prefix are the
    /// timestamp tokens
    static ref REGEX_DIGITS: Regex = Regex::new(r"[0-9]+").unwrap();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FieldOrder
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One calendar field of a timestamp, named by a single character in the
/// user-passed field-order string (CLI option `-o`).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DTField {
    /// `y`; values under 100 are offset into the 2000s
    Year,
    /// `m`
    Month,
    /// `d`
    Day,
    /// `h`
    Hour,
    /// `i`
    Minute,
    /// `s`
    Second,
    /// `f`; digits are left-aligned to nanosecond precision
    Fractional,
    /// `-`; the digit run at this position is discarded
    Skip,
}

impl DTField {
    pub const fn from_code(code: char) -> Option<DTField> {
        match code {
            'y' => Some(DTField::Year),
            'm' => Some(DTField::Month),
            'd' => Some(DTField::Day),
            'h' => Some(DTField::Hour),
            'i' => Some(DTField::Minute),
            's' => Some(DTField::Second),
            'f' => Some(DTField::Fractional),
            '-' => Some(DTField::Skip),
            _ => None,
        }
    }
}

/// Ordered mapping of digit runs to calendar fields, parsed once at program
/// start from a string like `"ymdhi"`. The length bounds how many digit
/// runs [`datetime_from_prefix`] will consume.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldOrder(Vec<DTField>);

impl FieldOrder {
    /// Parse a field-order string, e.g. `"ymdhisf"` or `"-dmy"`.
    ///
    /// An unrecognized character is a user misconfiguration; the returned
    /// `Err` message is printed verbatim and the caller is expected to
    /// abort the run.
    pub fn from_order(order: &str) -> Result<FieldOrder, String> {
        defñ!("({:?})", order);
        let mut fields: Vec<DTField> = Vec::with_capacity(order.len());
        for code in order.chars() {
            match DTField::from_code(code) {
                Some(field) => fields.push(field),
                None => {
                    return Err(format!(
                        "Invalid timestamp character in layout: [{}] use [-ymdhisf]",
                        code,
                    ));
                }
            }
        }

        Ok(FieldOrder(fields))
    }

    /// number of digit runs this order consumes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &DTField> {
        self.0.iter()
    }
}

impl fmt::Display for FieldOrder {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        for field in self.0.iter() {
            let code: char = match field {
                DTField::Year => 'y',
                DTField::Month => 'm',
                DTField::Day => 'd',
                DTField::Hour => 'h',
                DTField::Minute => 'i',
                DTField::Second => 's',
                DTField::Fractional => 'f',
                DTField::Skip => '-',
            };
            write!(f, "{}", code)?;
        }

        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Splitter
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Insert a space into `s` wherever an `'x'` occurs in `mask`, e.g.
/// `split_at_mask("  20160406T225401|error", "......x..x.....x..x")` returns
/// `"  2016 04 06T22 54 01|error"`. Any other mask character means: copy
/// the next character of `s`. Input past the end of the mask is appended
/// verbatim.
///
/// Returns `None` when the mask is longer than the input; the caller treats
/// that as the "no timestamp" condition.
pub fn split_at_mask(
    s: &str,
    mask: &str,
) -> Option<String> {
    defñ!("({:?}, {:?})", s, mask);
    if mask.chars().count() > s.chars().count() {
        return None;
    }
    let mut buf = String::with_capacity(s.len() + mask.len());
    let mut input = s.chars();
    for mark in mask.chars() {
        if mark == SPLIT_MARK {
            buf.push(' ');
        } else {
            match input.next() {
                Some(c) => buf.push(c),
                None => break,
            }
        }
    }
    buf.extend(input);

    Some(buf)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Timestamp Extractor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The first `cutoff` characters of `line`; the bounded search window for
/// timestamp tokens. Bounding the search avoids matching numbers that
/// appear later within free-form log message text.
pub fn char_prefix(
    line: &str,
    cutoff: usize,
) -> &str {
    match line.char_indices().nth(cutoff) {
        Some((index, _)) => &line[..index],
        None => line,
    }
}

/// Left-align fractional-second digits to nanosecond precision: `"5"` and
/// `"50"` and `"500000000"` all mean 500,000,000 ns. Digits past the ninth
/// are dropped.
fn fractional_to_nanoseconds(digits: &str) -> u32 {
    let digits9: &str = &digits[..digits.len().min(9)];
    let value: u32 = match digits9.parse() {
        Ok(value) => value,
        Err(_) => return 0,
    };

    value * 10_u32.pow((9 - digits9.len()) as u32)
}

/// Reconstruct a [`DateTimeL`] from the digit runs within `prefix`,
/// assigning runs to calendar fields per `field_order`.
///
/// When `split_mask` is set, [`split_at_mask`] resegments the prefix first.
/// Fewer digit runs than `field_order` entries, a failed split, or calendar
/// fields the chrono constructor rejects, all yield `None` — the non-fatal
/// "no timestamp" condition. A year under 100 is offset into the 2000s.
/// The fixed `offset` duration (may be negative) is added last.
pub fn datetime_from_prefix(
    prefix: &str,
    field_order: &FieldOrder,
    split_mask: Option<&str>,
    offset: Duration,
) -> DateTimeLOpt {
    defn!("({:?}, {:?}, {:?})", prefix, field_order, split_mask);
    let split_buf: String;
    let haystack: &str = match split_mask {
        Some(mask) => {
            split_buf = match split_at_mask(prefix, mask) {
                Some(s) => s,
                None => {
                    defx!("split_at_mask returned None; return None");
                    return None;
                }
            };
            split_buf.as_str()
        }
        None => prefix,
    };

    let runs: Vec<&str> = REGEX_DIGITS
        .find_iter(haystack)
        .take(field_order.len())
        .map(|m| m.as_str())
        .collect();
    if runs.len() < field_order.len() {
        defx!("found {} digit runs, need {}; return None", runs.len(), field_order.len());
        return None;
    }

    let mut year: i32 = 0;
    let mut month: u32 = 1;
    let mut day: u32 = 1;
    let mut hour: u32 = 0;
    let mut minute: u32 = 0;
    let mut second: u32 = 0;
    let mut nanosecond: u32 = 0;
    for (run, field) in runs.iter().zip(field_order.fields()) {
        if matches!(field, DTField::Skip) {
            // the digit run is consumed but not assigned
            continue;
        }
        if matches!(field, DTField::Fractional) {
            nanosecond = fractional_to_nanoseconds(run);
            continue;
        }
        let number: u32 = match run.parse() {
            Ok(number) => number,
            Err(_err) => {
                defx!("parse {:?} error {}; return None", run, _err);
                return None;
            }
        };
        match field {
            DTField::Year => year = number as i32,
            DTField::Month => month = number,
            DTField::Day => day = number,
            DTField::Hour => hour = number,
            DTField::Minute => minute = number,
            DTField::Second => second = number,
            DTField::Fractional | DTField::Skip => {}
        }
    }
    if year < 100 {
        // two-digit years are "2000s" years
        year += 2000;
    }

    let dt: DateTimeL = match Utc
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
    {
        Some(dt) => dt,
        None => {
            defx!("with_ymd_and_hms rejected fields; return None");
            return None;
        }
    };
    let dt: DateTimeL = match dt.with_nanosecond(nanosecond) {
        Some(dt) => dt,
        None => {
            defx!("with_nanosecond({}) rejected; return None", nanosecond);
            return None;
        }
    };
    let dt: DateTimeLOpt = dt.checked_add_signed(offset);
    defx!("return {:?}", dt);

    dt
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// test and doc helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Build a [`DateTimeL`] from explicit parts. Panics on out-of-range
/// values; meant for tests and doc examples.
pub fn ymdhms(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> DateTimeL {
    ymdhmsn(year, month, day, hour, minute, second, 0)
}

/// Build a [`DateTimeL`] with nanoseconds from explicit parts. Panics on
/// out-of-range values; meant for tests and doc examples.
pub fn ymdhmsn(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    nanosecond: u32,
) -> DateTimeL {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .unwrap()
        .with_nanosecond(nanosecond)
        .unwrap()
}
