//! Output redirection for the trace and report.
//!
//! `--output FILE` sends the whole run to a file. An unopenable path is a
//! warning, not an error: the run falls back to standard output.

use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Open the requested sink, or stdout when none is requested or the file
/// cannot be created.
pub fn open_sink(path: Option<&str>) -> Box<dyn Write> {
    match path {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(err) => {
                log::warn!("could not open {path}: {err}");
                eprintln!(
                    "Warning: could not open {path} for writing ({err}); using standard output"
                );
                Box::new(io::stdout())
            }
        },
        None => Box::new(io::stdout()),
    }
}
