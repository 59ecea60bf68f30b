// src/debug/printers.rs

//! `eprintln!` macros for errors and warnings, prefixed uniformly.

/// `e`println! an `err`or, only in debug builds and tests
#[macro_export]
macro_rules! de_err {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions, test))]
            eprint!("ERROR: ");
            #[cfg(any(debug_assertions, test))]
            eprintln!($($args)*)
        }
    }
}
pub use de_err;

/// `e`println! an `err`or
#[macro_export]
macro_rules! e_err {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("ERROR: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_err;

/// `e`println! a `warn`ing
#[macro_export]
macro_rules! e_wrn {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("WARNING: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_wrn;
