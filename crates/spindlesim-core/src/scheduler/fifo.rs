//! First-in-first-out scheduling: requests are served strictly in
//! submission order, ignoring the head position. Fair and predictable, and
//! the baseline the seek-aware policies are measured against.

use std::collections::VecDeque;

use crate::disk::Disk;
use crate::event::IoRequest;
use crate::trace::Trace;

use super::IoScheduler;

#[derive(Debug, Default)]
pub struct FifoScheduler {
    queue: VecDeque<IoRequest>,
}

impl FifoScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IoScheduler for FifoScheduler {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn submit(&mut self, request: IoRequest, trace: &mut Trace) {
        trace.line(format!(
            "IO Scheduler ({}): added request {} sector {} from process {}",
            self.name(),
            request.op,
            request.sector,
            request.pid
        ));
        self.queue.push_back(request);
    }

    fn pick_next(&mut self, _disk: &Disk, trace: &mut Trace) -> Option<IoRequest> {
        let request = self.queue.pop_front()?;
        trace.debug(format!(
            "IO Scheduler (FIFO): selected request sector {}",
            request.sector
        ));
        Some(request)
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{quiet_trace, request};
    use super::*;

    #[test]
    fn test_serves_in_submission_order() {
        let mut sched = FifoScheduler::new();
        let mut trace = quiet_trace();
        let disk = Disk::new(100, 1, 1.0, 10.0, 7_500.0);

        for sector in [5, 20, 2, 15] {
            sched.submit(request(sector), &mut trace);
        }

        let mut served = Vec::new();
        while let Some(req) = sched.pick_next(&disk, &mut trace) {
            served.push(req.sector);
        }
        assert_eq!(served, vec![5, 20, 2, 15]);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_empty_queue_yields_none() {
        let mut sched = FifoScheduler::new();
        let mut trace = quiet_trace();
        let disk = Disk::new(100, 1, 1.0, 10.0, 7_500.0);
        assert!(sched.pick_next(&disk, &mut trace).is_none());
    }
}
