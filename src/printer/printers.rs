// src/printer/printers.rs

//! Render the Aggregator map and write it to stdout.
//!
//! The reference rendering: each key left-padded to the widest key
//! observed, a comma, the count right-aligned in nine columns, one entry
//! per line, entries in lexicographic key order.

use std::io::Write;

use crate::common::CountMap;
use crate::debug::printers::de_err;

/// Render `counts` to one `String`, one `key,count` line per entry.
///
/// `CountMap` is a `BTreeMap` so iteration is already key-sorted; no
/// separate sorting pass is needed.
pub fn render_counts(counts: &CountMap) -> String {
    let width: usize = counts
        .keys()
        .map(|key| key.len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (key, count) in counts.iter() {
        out.push_str(&format!("{:<kw$},{:>9}\n", key, count, kw = width));
    }

    out
}

/// Render `counts` and write it to stdout.
pub fn print_counts(counts: &CountMap) {
    write_stdout(render_counts(counts).as_bytes());
}

/// Safely write the `buffer` to stdout with help of [`StdoutLock`].
///
/// [`StdoutLock`]: std::io::StdoutLock
pub fn write_stdout(buffer: &[u8]) {
    let stdout = std::io::stdout();
    let mut stdout_lock = stdout.lock();
    match stdout_lock.write_all(buffer) {
        Ok(_) => {}
        Err(_err) => {
            // XXX: this will print when this program stdout is truncated,
            //      like due to `head`
            //          Broken pipe (os error 32)
            //      Not sure if anything should be done about it
            de_err!("stdout_lock.write_all(buffer len {}) error {}", buffer.len(), _err);
        }
    }
    match stdout_lock.flush() {
        Ok(_) => {}
        Err(_err) => {
            de_err!("stdout_lock.flush() error {}", _err);
        }
    }
}
