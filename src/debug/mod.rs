// src/debug/mod.rs

//! The `debug` module holds macros to print error and warning messages on
//! stderr.

pub mod printers;
