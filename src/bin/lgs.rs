// src/bin/lgs.rs

//! Driver program _lgs_: command-line parsing, file glob expansion, the
//! file processing loop, and the final report.
//!
//! Counts lines matching the user-passed regular expression across all
//! files matching the user-passed glob, grouped either by truncated
//! timestamp (option `-t`) or by the match of a second regular expression
//! (option `-k`), and prints the sorted `key,count` table.

#![allow(non_camel_case_types)]

use std::process::ExitCode;
use std::time::Instant;

use ::anyhow::Context;
use ::clap::Parser;
use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::regex::Regex;

use ::lgslib::common::{Count, FPath};
use ::lgslib::data::bucket::{
    GroupInterval,
    INTERVAL_CODES_HELP,
    INTERVAL_CODE_DEFAULT,
};
use ::lgslib::data::datetime::{
    Duration,
    FieldOrder,
    CUTOFF_DEFAULT,
};
use ::lgslib::debug::printers::{e_err, e_wrn};
use ::lgslib::printer::printers::{print_counts, write_stdout};
use ::lgslib::readers::linecounter::{CountMode, LineCounter};
use ::si_trace_print::stack::stack_offset_set;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// --------------------
// command-line parsing

/// general error exit value
const EXIT_ERR: u8 = 1;

/// default field order (seconds and fractions are rarely wanted in a
/// histogram; pass `-o ymdhis` or `-o ymdhisf` to consume them)
const CLI_ORDER_DEFAULT: &str = "ymdhi";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
Counts, per bucket, the lines that match PATTERN across all files matching
GLOB. Buckets are truncated timestamps selected with --interval, or, with
--key, the matches of a second regular expression.

The timestamp is rebuilt from the digit runs at the front of each line
(bounded by --cutoff characters). Option --order assigns the runs to
calendar fields in order, e.g. \"ymdhi\" reads the first five digit runs as
year, month, day, hour, minute. A \"-\" discards a run. Two-digit years are
read as 2000s years.

A line without a parsable timestamp is treated as a continuation of the
previous line (e.g. a stack trace) and is never counted itself.

A compact digit blob can be resegmented first with --split: each \"x\" in
the mask inserts a space, any other character copies one input character,
input past the mask is kept as-is.
For example --split \"....x..x\" turns \"20160304\" into \"2016 03 04\".

Valid interval codes: ",
    INTERVAL_CODES_HELP,
    "

The offset value uses h, m, s suffixes with optional fractions and sign,
e.g. \"-10h30.5m\" or \"+45s\". It is added to every parsed timestamp.

Output lines are \"key,count\", keys padded to a common width, counts
right-aligned in nine columns, sorted by key.

Version: ",
    env!("CARGO_PKG_VERSION"),
    "
License: ",
    env!("CARGO_PKG_LICENSE"),
);

/// clap command-line arguments build-time definitions.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    name = "lgs",
    version,
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Count lines matching this regular expression.
    #[clap(required = true)]
    pattern: String,

    /// Shell glob of the files to process, e.g. "logs/app*.log".
    /// Quote it to keep the shell from expanding it.
    #[clap(required = true, verbatim_doc_comment)]
    glob: String,

    /// Order of the timestamp fields: y=year, m=month, d=day, h=hour,
    /// i=min, s=sec, f=fraction, -=skip.
    #[clap(
        short = 'o',
        long,
        verbatim_doc_comment,
        default_value_t = String::from(CLI_ORDER_DEFAULT),
    )]
    order: String,

    /// Time interval for grouping, as an interval code.
    #[clap(
        short = 't',
        long,
        verbatim_doc_comment,
        help = concatcp!("Time interval for grouping; valid intervals: ", INTERVAL_CODES_HELP),
        default_value_t = INTERVAL_CODE_DEFAULT,
    )]
    interval: i64,

    /// Regular expression that defines the key to group by;
    /// cannot be used with --order and --interval.
    #[clap(
        short = 'k',
        long,
        verbatim_doc_comment,
        conflicts_with_all = &["order", "interval"],
    )]
    key: Option<String>,

    /// Print the number of matches per file name.
    #[clap(short = 'p', long)]
    progress: bool,

    /// Print the elapsed time and the number of files processed.
    #[clap(short = 'd', long)]
    duration: bool,

    /// Timestamp offset added to every parsed timestamp,
    /// e.g. "-1.5h", "+13h45.5m", "10s".
    /// To pass a value with leading "-" use "=" notation,
    /// e.g. "--offset=-1.5h".
    #[clap(long, verbatim_doc_comment)]
    offset: Option<String>,

    /// Split the timestamp at positions indicated by "x",
    /// e.g. "....x..x" to split a continuous date "20160304" for parsing.
    #[clap(short = 's', long, verbatim_doc_comment)]
    split: Option<String>,

    /// Only look for the timestamp in the beginning of each line,
    /// up to this number of characters.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value_t = CUTOFF_DEFAULT,
    )]
    cutoff: usize,
}

// --------------------
// user-passed offset parsing

const CGN_OFFSET_ADDSUB: &str = "offset_addsub";
const CGN_OFFSET_HOURS: &str = "hours";
const CGN_OFFSET_MINUTES: &str = "minutes";
const CGN_OFFSET_SECONDS: &str = "seconds";

const CGP_OFFSET_ADDSUB: &str = concatcp!(r"(?P<", CGN_OFFSET_ADDSUB, r">[+\-]?)");
const CGP_OFFSET_HOURS: &str = concatcp!(r"(?P<", CGN_OFFSET_HOURS, r">[\d]+(?:\.[\d]+)?h)");
const CGP_OFFSET_MINUTES: &str = concatcp!(r"(?P<", CGN_OFFSET_MINUTES, r">[\d]+(?:\.[\d]+)?m)");
const CGP_OFFSET_SECONDS: &str = concatcp!(r"(?P<", CGN_OFFSET_SECONDS, r">[\d]+(?:\.[\d]+)?s)");

lazy_static! {
    /// user-passed strings of a fixed timestamp offset duration
    static ref REGEX_DUR_OFFSET: Regex = Regex::new(
        concatcp!(
            "^",
            CGP_OFFSET_ADDSUB, "(",
            CGP_OFFSET_HOURS, "|",
            CGP_OFFSET_MINUTES, "|",
            CGP_OFFSET_SECONDS,
            ")+$"
        )
    ).unwrap();
}

// maps a named capture group match of `CGP_OFFSET_ADDSUB` to a sign
// helper to `string_hms_to_duration`
fn offset_match_to_sign(offset_str: &str) -> f64 {
    match offset_str.chars().next() {
        Some('-') => -1.0,
        _ => 1.0,
    }
}

/// Regular expression processing of a user-passed offset string like
/// `"-10h30.5m"`, becoming a negative duration of 10 hours + 30.5 minutes.
/// Fractional values are allowed on any component.
fn string_hms_to_duration(val: &str) -> Option<Duration> {
    defn!("({:?})", val);

    let captures: regex::Captures = match REGEX_DUR_OFFSET.captures(val) {
        Some(captures) => captures,
        None => {
            defx!("REGEX_DUR_OFFSET.captures(…) None");
            return None;
        }
    };

    let mut sign: f64 = 1.0;
    if let Some(match_) = captures.name(CGN_OFFSET_ADDSUB) {
        defo!("matched named group {:?}, match {:?}", CGN_OFFSET_ADDSUB, match_.as_str());
        sign = offset_match_to_sign(match_.as_str());
    }

    let mut seconds_total: f64 = 0.0;
    for (group, factor) in [
        (CGN_OFFSET_HOURS, 3600.0),
        (CGN_OFFSET_MINUTES, 60.0),
        (CGN_OFFSET_SECONDS, 1.0),
    ] {
        if let Some(match_) = captures.name(group) {
            defo!("matched named group {:?}, match {:?}", group, match_.as_str());
            // strip the trailing unit character
            let value_str: &str = &match_.as_str()[..match_.as_str().len() - 1];
            let value: f64 = match value_str.parse() {
                Ok(value) => value,
                Err(_err) => {
                    defx!("parse {:?} error {}; return None", value_str, _err);
                    return None;
                }
            };
            seconds_total += value * factor;
        }
    }

    let milliseconds: i64 = (sign * seconds_total * 1000.0).round() as i64;
    let duration = Duration::try_milliseconds(milliseconds);
    defx!("return {:?}", duration);

    duration
}

// --------------------
// processing

/// Expand `pattern` as a shell glob and process each matched file in turn.
/// A file that fails to open is reported and skipped; only successfully
/// opened files count towards the returned total.
fn process_files(
    pattern: &str,
    counter: &mut LineCounter,
    progress: bool,
) -> anyhow::Result<Count> {
    defn!("({:?})", pattern);
    let paths = ::glob::glob(pattern)
        .with_context(|| format!("Invalid file glob {:?}", pattern))?;

    let mut nfiles: Count = 0;
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                e_err!("{}", err);
                continue;
            }
        };
        let fpath: FPath = path.to_string_lossy().into_owned();
        match counter.count_file(&fpath) {
            Ok(nmatch) => {
                nfiles += 1;
                if progress {
                    write_stdout(format!("{:>9} in {}\n", nmatch, fpath).as_bytes());
                }
            }
            Err(err) => {
                e_err!("{}: {}", fpath, err);
            }
        }
    }
    if nfiles == 0 {
        e_wrn!("no files matched glob {:?}", pattern);
    }
    defx!("return {}", nfiles);

    Ok(nfiles)
}

/// Process the user-passed command-line arguments into the run
/// configuration, exiting on a misconfiguration. Fatal configuration
/// errors are caught here, before any file is opened.
fn cli_process_args(args: &CLI_Args) -> Result<LineCounter, String> {
    defn!();

    let rx_count: Regex = match Regex::new(&args.pattern) {
        Ok(rx) => rx,
        Err(err) => return Err(format!("Invalid count pattern: {}", err)),
    };

    let mode: CountMode = match &args.key {
        Some(key) => match Regex::new(key) {
            Ok(rx) => CountMode::Key(rx),
            Err(err) => return Err(format!("Invalid key pattern: {}", err)),
        },
        None => CountMode::Timestamp(GroupInterval::try_from_code(args.interval)?),
    };

    let field_order: FieldOrder = FieldOrder::from_order(&args.order)?;

    let offset: Duration = match &args.offset {
        Some(val) => match string_hms_to_duration(val) {
            Some(duration) => duration,
            None => {
                return Err(String::from(
                    "Invalid offset format, use h, m, s, e.g. -10h30.5m",
                ));
            }
        },
        None => Duration::zero(),
    };

    defx!();

    Ok(LineCounter::new(
        mode,
        rx_count,
        field_order,
        args.split.clone(),
        offset,
        args.cutoff,
    ))
}

/// Process the user-passed command-line arguments.
/// Start function `process_files`.
/// Determine a process return code.
pub fn main() -> ExitCode {
    let start_time = Instant::now();
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();

    let args = CLI_Args::parse();
    defo!("args {:?}", args);

    let mut counter: LineCounter = match cli_process_args(&args) {
        Ok(counter) => counter,
        Err(err) => {
            e_err!("{}", err);
            defx!("return ExitCode({})", EXIT_ERR);
            return ExitCode::from(EXIT_ERR);
        }
    };

    let nfiles: Count = match process_files(&args.glob, &mut counter, args.progress) {
        Ok(nfiles) => nfiles,
        Err(err) => {
            e_err!("{}", err);
            defx!("return ExitCode({})", EXIT_ERR);
            return ExitCode::from(EXIT_ERR);
        }
    };
    if args.progress {
        write_stdout(b"\n");
    }
    if args.duration {
        let elapsed = start_time.elapsed();
        write_stdout(format!("{:?} for {} files\n\n", elapsed, nfiles).as_bytes());
    }

    print_counts(counter.counts());
    defx!("return ExitCode(0)");

    ExitCode::SUCCESS
}
