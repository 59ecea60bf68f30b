// src/data/mod.rs

//! The `data` module is the timestamp machinery:
//! reconstructing a [`DateTimeL`] from the digit runs within a line prefix
//! (module [`datetime`]) and folding that instant onto a bucket boundary
//! with a canonical string rendering (module [`bucket`]).
//!
//! [`DateTimeL`]: crate::data::datetime::DateTimeL
//! [`datetime`]: crate::data::datetime
//! [`bucket`]: crate::data::bucket

pub mod bucket;
pub mod datetime;
