// src/printer/mod.rs

//! The `printer` module renders the final Aggregator map as sorted
//! `key,count` lines, and holds the locked stdout write helper.

pub mod printers;
