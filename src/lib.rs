// src/lib.rs

//! Library for the `lgs` program. Scans text log files for lines matching a
//! regular expression and accumulates per-bucket counts, where a bucket is
//! either a truncated timestamp (5 minutes up to a calendar year) or the
//! match of a second user-passed regular expression.
//!
//! The interesting work happens in [`data::datetime`] (reconstructing a
//! [`DateTimeL`] from the digit runs at the front of a line),
//! [`data::bucket`] (folding that instant onto a bucket boundary), and
//! [`readers::linecounter`] (the per-line classify-and-count decision).
//!
//! [`DateTimeL`]: crate::data::datetime::DateTimeL
//! [`data::datetime`]: crate::data::datetime
//! [`data::bucket`]: crate::data::bucket
//! [`readers::linecounter`]: crate::readers::linecounter

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
