// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

use std::collections::BTreeMap;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// TODO: use `std::path::Path` for `FPath`
/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// aggregation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// a count of counted lines
pub type Count = u64;

/// The Aggregator: bucket key (or extracted key) to running count of
/// matched lines. A `BTreeMap` so the final report iterates in key-sorted
/// order without a separate sorting pass.
pub type CountMap = BTreeMap<String, Count>;
