//! N-LOOK scheduling: pending requests are partitioned into FIFO epochs.
//!
//! Submissions fill a tail sub-queue capped at `MAX_QUEUE_LENGTH`; once it
//! fills, a fresh tail is opened. Service always drains the head sub-queue
//! in ascending track order (wrapping to its smallest track when nothing
//! lies ahead of the head) before the next epoch begins, so no request can
//! be overtaken by arbitrarily many later arrivals.

use std::collections::VecDeque;

use crate::disk::Disk;
use crate::event::IoRequest;
use crate::trace::Trace;

use super::IoScheduler;

/// Requests per sub-queue before a new epoch is opened.
const MAX_QUEUE_LENGTH: usize = 5;

#[derive(Debug)]
pub struct NlookScheduler {
    queues: VecDeque<VecDeque<IoRequest>>,
    max_queue_length: usize,
}

impl NlookScheduler {
    pub fn new() -> Self {
        Self::with_max_queue_length(MAX_QUEUE_LENGTH)
    }

    pub fn with_max_queue_length(max_queue_length: usize) -> Self {
        Self {
            queues: VecDeque::new(),
            max_queue_length,
        }
    }

    /// Number of open sub-queues.
    pub fn epoch_count(&self) -> usize {
        self.queues.len()
    }

    /// Drop drained sub-queues off the head.
    fn discard_empty_heads(&mut self) {
        while self.queues.front().is_some_and(|q| q.is_empty()) {
            self.queues.pop_front();
        }
    }
}

impl Default for NlookScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl IoScheduler for NlookScheduler {
    fn name(&self) -> &'static str {
        "NLOOK"
    }

    fn submit(&mut self, request: IoRequest, trace: &mut Trace) {
        if self
            .queues
            .back()
            .is_none_or(|q| q.len() >= self.max_queue_length)
        {
            self.queues.push_back(VecDeque::new());
            trace.debug(format!(
                "IO Scheduler (NLOOK): created new queue (total: {})",
                self.queues.len()
            ));
        }
        trace.debug(format!(
            "IO Scheduler (NLOOK): added request {} sector {} to queue {}",
            request.op,
            request.sector,
            self.queues.len() - 1
        ));
        if let Some(tail) = self.queues.back_mut() {
            tail.push_back(request);
        }
    }

    fn pick_next(&mut self, disk: &Disk, trace: &mut Trace) -> Option<IoRequest> {
        self.discard_empty_heads();
        let current_track = disk.current_track();
        let head = self.queues.front_mut()?;

        // Track-sorted view of the head epoch; stable, so equal tracks keep
        // submission order.
        let mut order: Vec<usize> = (0..head.len()).collect();
        order.sort_by_key(|&i| disk.track_of(head[i].sector));

        let index = order
            .iter()
            .copied()
            .find(|&i| disk.track_of(head[i].sector) >= current_track)
            .unwrap_or_else(|| {
                trace.debug("IO Scheduler (NLOOK): no suitable request, taking from start");
                order[0]
            });

        let request = head.remove(index)?;
        trace.debug(format!(
            "IO Scheduler (NLOOK): selected sector {} from queue 0",
            request.sector
        ));

        if head.is_empty() {
            self.queues.pop_front();
            if !self.queues.is_empty() {
                trace.debug("IO Scheduler (NLOOK): queue 0 processed, switching to next queue");
            }
        }
        Some(request)
    }

    fn is_empty(&self) -> bool {
        self.queues.iter().all(|q| q.is_empty())
    }
}
