//! Time-stamped textual trace of the simulation.
//!
//! Every line is prefixed with the virtual clock: `Time: <t> ms | ...`.
//! The sink writes to any boxed writer so the CLI can redirect the whole
//! run to a file; tests capture it in memory. Verbose-tier lines are
//! dropped unless verbose mode is on.
//!
//! This is product output, not diagnostics: warnings and invariant
//! violations go through the `log` facade instead.

use std::fmt;
use std::io::{self, Write};

/// Line sink with the simulation clock and a verbose tier.
pub struct Trace {
    out: Box<dyn Write>,
    verbose: bool,
    now: f64,
}

impl Trace {
    pub fn new(out: Box<dyn Write>, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            now: 0.0,
        }
    }

    /// Trace to standard output.
    pub fn stdout(verbose: bool) -> Self {
        Self::new(Box::new(io::stdout()), verbose)
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Move the trace clock; the engine calls this once per dispatched
    /// event.
    pub fn set_now(&mut self, time: f64) {
        self.now = time;
    }

    /// Emit one time-stamped line.
    pub fn line(&mut self, msg: impl fmt::Display) {
        let _ = writeln!(self.out, "Time: {:8.3} ms | {}", self.now, msg);
    }

    /// Emit a time-stamped line only in verbose mode.
    pub fn debug(&mut self, msg: impl fmt::Display) {
        if self.verbose {
            self.line(msg);
        }
    }

    /// Emit a line without the time prefix (configuration banner, final
    /// report).
    pub fn raw(&mut self, msg: impl fmt::Display) {
        let _ = writeln!(self.out, "{msg}");
    }

    pub fn flush(&mut self) {
        let _ = self.out.flush();
    }
}

impl fmt::Debug for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trace")
            .field("verbose", &self.verbose)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured(verbose: bool) -> (Trace, SharedBuf) {
        let buf = SharedBuf::default();
        (Trace::new(Box::new(buf.clone()), verbose), buf)
    }

    #[test]
    fn test_line_carries_time_prefix() {
        let (mut trace, buf) = captured(false);
        trace.set_now(12.5);
        trace.line("Disk: seeking");
        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text, "Time:   12.500 ms | Disk: seeking\n");
    }

    #[test]
    fn test_debug_respects_verbose_flag() {
        let (mut trace, buf) = captured(false);
        trace.debug("hidden");
        assert!(buf.0.lock().unwrap().is_empty());

        let (mut trace, buf) = captured(true);
        trace.debug("shown");
        assert!(!buf.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_raw_has_no_prefix() {
        let (mut trace, buf) = captured(false);
        trace.raw("SIMULATION STATISTICS:");
        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text, "SIMULATION STATISTICS:\n");
    }
}
