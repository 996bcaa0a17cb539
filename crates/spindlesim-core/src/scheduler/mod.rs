//! Pluggable disk I/O request schedulers.
//!
//! Every policy implements the [`IoScheduler`] trait: `submit` queues a
//! request without selecting, `pick_next` removes and returns the request
//! the disk should serve next. Selection must be deterministic given the
//! internal queue state and the current head position. The engine holds the
//! active policy as a `Box<dyn IoScheduler>` chosen at configuration time.
//!
//! Policies log their decisions through the shared [`Trace`] sink so queue
//! mutations show up in the run trace next to the disk events they cause.

mod fifo;
mod look;
mod nlook;

pub use fifo::FifoScheduler;
pub use look::LookScheduler;
pub use nlook::NlookScheduler;

use crate::disk::Disk;
use crate::event::IoRequest;
use crate::trace::Trace;

/// Disk request scheduling policy.
pub trait IoScheduler {
    /// Policy name for trace lines.
    fn name(&self) -> &'static str;

    /// Queue a request. Never selects.
    fn submit(&mut self, request: IoRequest, trace: &mut Trace);

    /// Remove and return the next request to serve, or `None` when no work
    /// is pending.
    fn pick_next(&mut self, disk: &Disk, trace: &mut Trace) -> Option<IoRequest>;

    /// No requests pending.
    fn is_empty(&self) -> bool;
}

/// Instantiate a scheduler by name (`fifo`, `look`, `nlook`).
pub fn create_scheduler(name: &str) -> Option<Box<dyn IoScheduler>> {
    match name.to_ascii_lowercase().as_str() {
        "fifo" => Some(Box::new(FifoScheduler::new())),
        "look" => Some(Box::new(LookScheduler::new())),
        "nlook" => Some(Box::new(NlookScheduler::new())),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_knows_all_policies() {
        for (name, expected) in [("fifo", "FIFO"), ("look", "LOOK"), ("nlook", "NLOOK")] {
            let sched = create_scheduler(name).unwrap();
            assert_eq!(sched.name(), expected);
            assert!(sched.is_empty());
        }
    }

    #[test]
    fn test_factory_is_case_insensitive() {
        assert!(create_scheduler("LOOK").is_some());
        assert!(create_scheduler("Fifo").is_some());
    }

    #[test]
    fn test_factory_rejects_unknown() {
        assert!(create_scheduler("flook").is_none());
        assert!(create_scheduler("").is_none());
    }
}
