// src/readers/mod.rs

//! The `readers` module holds the [`LineCounter`], which drains a file (or
//! any [`BufRead`]) line by line, classifies each line, and accumulates the
//! per-bucket counts.
//!
//! [`LineCounter`]: crate::readers::linecounter::LineCounter
//! [`BufRead`]: std::io::BufRead

pub mod linecounter;
