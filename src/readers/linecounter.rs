// src/readers/linecounter.rs

//! Per-line classify-and-count: the [`LineCounter`] owns the run
//! configuration and the Aggregator [`CountMap`], and decides for every
//! line of every file whether it increments a bucket.
//!
//! Two mutually exclusive modes, fixed at construction:
//! - _key mode_: a key regular expression is matched first; its match
//!   becomes the Aggregator key
//! - _timestamp mode_: the timestamp is extracted from the line prefix and
//!   folded onto a bucket boundary; the bucket key becomes the Aggregator
//!   key
//!
//! In timestamp mode a line without its own timestamp inherits the
//! previous timestamp and bucket key (continuation lines of a multi-line
//! log message, e.g. a stack trace) but is itself never counted; see
//! [`ContinuationState`].
//!
//! [`LineCounter`]: self::LineCounter
//! [`CountMap`]: crate::common::CountMap
//! [`ContinuationState`]: self::ContinuationState

use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::common::{Count, CountMap, FPath};
use crate::data::bucket::{bucket_key, BucketKey, GroupInterval};
use crate::data::datetime::{
    char_prefix,
    datetime_from_prefix,
    DateTimeLOpt,
    Duration,
    FieldOrder,
};

use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Which of the two mutually exclusive aggregation strategies is in play.
#[derive(Debug)]
pub enum CountMode {
    /// group lines by the match of this regular expression
    Key(Regex),
    /// group lines by truncated-timestamp bucket
    Timestamp(GroupInterval),
}

/// Continuation state across the lines of one file.
///
/// A line whose prefix yields no timestamp inherits `last_dt` and
/// `last_key` from the most recent line that had one. Only a `fresh` line,
/// a line whose own prefix parsed, is eligible for counting. This depends
/// on strict in-order single-pass traversal of a file's lines.
#[derive(Debug, Default)]
pub struct ContinuationState {
    /// timestamp of the most recent line whose prefix parsed
    pub last_dt: DateTimeLOpt,
    /// bucket key computed for the most recent counted line
    pub last_key: BucketKey,
    /// did _this_ line yield a newly parsed timestamp?
    pub fresh: bool,
}

/// The Line Classifier and Aggregator.
///
/// Single-threaded by design: one `LineCounter` is driven over all files of
/// a run, strictly one file at a time, and is the only mutator of the
/// `CountMap`. If files were ever processed in parallel this should become
/// one `CountMap` per worker, merged at the end, not a shared locked map.
pub struct LineCounter {
    mode: CountMode,
    /// lines must match this to be counted (in either mode)
    rx_count: Regex,
    field_order: FieldOrder,
    split_mask: Option<String>,
    offset: Duration,
    cutoff: usize,
    counts: CountMap,
}

impl LineCounter {
    pub fn new(
        mode: CountMode,
        rx_count: Regex,
        field_order: FieldOrder,
        split_mask: Option<String>,
        offset: Duration,
        cutoff: usize,
    ) -> LineCounter {
        defñ!("(mode {:?}, rx_count {:?}, cutoff {})", mode, rx_count, cutoff);
        LineCounter {
            mode,
            rx_count,
            field_order,
            split_mask,
            offset,
            cutoff,
            counts: CountMap::new(),
        }
    }

    /// The accumulated Aggregator map.
    pub fn counts(&self) -> &CountMap {
        &self.counts
    }

    /// Open the file at `path` and [`count_reader`] it. The file handle is
    /// dropped before returning, error or not.
    ///
    /// [`count_reader`]: Self::count_reader
    pub fn count_file(
        &mut self,
        path: &FPath,
    ) -> std::io::Result<Count> {
        defn!("({:?})", path);
        let file: File = File::open(path)?;
        let count = self.count_reader(BufReader::new(file));
        defx!("return {:?}", count);

        count
    }

    /// Drain `reader` line by line, in order, classifying and counting each
    /// line. Returns how many lines incremented the Aggregator, for
    /// per-file progress reporting.
    pub fn count_reader<R: BufRead>(
        &mut self,
        reader: R,
    ) -> std::io::Result<Count> {
        let mut state = ContinuationState::default();
        let mut nmatch: Count = 0;
        for line in reader.lines() {
            let line: String = line?;
            if self.count_line(&line, &mut state) {
                nmatch += 1;
            }
        }

        Ok(nmatch)
    }

    /// One line, one decision. Returns whether the line was counted.
    ///
    /// Key mode: a line failing the key pattern is skipped entirely, even
    /// when it matches the count pattern.
    /// Timestamp mode: a line is counted only when it is fresh (its own
    /// prefix parsed) _and_ matches the count pattern.
    pub fn count_line(
        &mut self,
        line: &str,
        state: &mut ContinuationState,
    ) -> bool {
        match &self.mode {
            CountMode::Key(rx_key) => {
                let key: &str = match rx_key.find(line) {
                    Some(found) => found.as_str(),
                    None => return false,
                };
                if !self.rx_count.is_match(line) {
                    return false;
                }
                *self.counts.entry(key.to_string()).or_insert(0) += 1;

                true
            }
            CountMode::Timestamp(interval) => {
                let interval: GroupInterval = *interval;
                let prefix: &str = char_prefix(line, self.cutoff);
                match datetime_from_prefix(
                    prefix,
                    &self.field_order,
                    self.split_mask.as_deref(),
                    self.offset,
                ) {
                    Some(dt) => {
                        state.last_dt = Some(dt);
                        state.fresh = true;
                    }
                    None => {
                        // continuation line; `last_dt` and `last_key` carry
                        // over, the line is not eligible for counting
                        state.fresh = false;
                    }
                }
                if !state.fresh || !self.rx_count.is_match(line) {
                    return false;
                }
                let dt = match state.last_dt {
                    Some(dt) => dt,
                    // `fresh` implies `last_dt` was just set
                    None => return false,
                };
                let key: BucketKey = bucket_key(&dt, interval);
                *self.counts.entry(key.clone()).or_insert(0) += 1;
                state.last_key = key;

                true
            }
        }
    }
}
