//! LOOK scheduling: serve requests in track order along the current head
//! direction, reversing at the last pending request instead of the disk
//! edge.
//!
//! An anti-starvation counter bounds how long a dense cluster of requests
//! on one track can pin the head: after `MAX_TRACK_ACCESSES` consecutive
//! selections at the same head position the direction flips regardless of
//! remaining candidates.

use crate::disk::Disk;
use crate::event::IoRequest;
use crate::trace::Trace;

use super::IoScheduler;

/// Consecutive same-track selections before a forced direction flip.
const MAX_TRACK_ACCESSES: u32 = 10;

#[derive(Debug)]
pub struct LookScheduler {
    queue: Vec<IoRequest>,
    direction_increasing: bool,
    same_track_hits: u32,
    last_track: Option<u64>,
    max_track_accesses: u32,
}

impl LookScheduler {
    pub fn new() -> Self {
        Self::with_max_track_accesses(MAX_TRACK_ACCESSES)
    }

    pub fn with_max_track_accesses(max_track_accesses: u32) -> Self {
        Self {
            queue: Vec::new(),
            direction_increasing: true,
            same_track_hits: 0,
            last_track: None,
            max_track_accesses,
        }
    }

    pub fn direction_increasing(&self) -> bool {
        self.direction_increasing
    }

    fn direction_name(&self) -> &'static str {
        if self.direction_increasing {
            "increasing"
        } else {
            "decreasing"
        }
    }

    /// Bump the same-track counter and flip direction when the head has
    /// been pinned to one track for too many selections.
    fn apply_anti_starvation(&mut self, current_track: u64, trace: &mut Trace) {
        if self.last_track == Some(current_track) {
            self.same_track_hits += 1;
            if self.same_track_hits >= self.max_track_accesses {
                self.direction_increasing = !self.direction_increasing;
                self.same_track_hits = 0;
                trace.line(format!(
                    "IO Scheduler (LOOK): changed direction to {}",
                    self.direction_name()
                ));
            }
        } else {
            self.same_track_hits = 0;
        }
        self.last_track = Some(current_track);
    }
}

impl Default for LookScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl IoScheduler for LookScheduler {
    fn name(&self) -> &'static str {
        "LOOK"
    }

    fn submit(&mut self, request: IoRequest, trace: &mut Trace) {
        trace.line(format!(
            "IO Scheduler ({}): added request {} sector {} from process {}",
            self.name(),
            request.op,
            request.sector,
            request.pid
        ));
        self.queue.push(request);
    }

    fn pick_next(&mut self, disk: &Disk, trace: &mut Trace) -> Option<IoRequest> {
        if self.queue.is_empty() {
            return None;
        }

        let current_track = disk.current_track();
        self.apply_anti_starvation(current_track, trace);

        // Sector-sorted view of the queue; stable, so equal sectors keep
        // submission order.
        let mut order: Vec<usize> = (0..self.queue.len()).collect();
        order.sort_by_key(|&i| self.queue[i].sector);

        let candidate = if self.direction_increasing {
            order
                .iter()
                .copied()
                .find(|&i| disk.track_of(self.queue[i].sector) >= current_track)
        } else {
            order
                .iter()
                .rev()
                .copied()
                .find(|&i| disk.track_of(self.queue[i].sector) <= current_track)
        };

        let index = match candidate {
            Some(i) => i,
            None => {
                // Nothing left along the sweep: reverse and restart from
                // whichever endpoint of the queue is cheaper to reach.
                self.direction_increasing = !self.direction_increasing;
                self.same_track_hits = 0;
                trace.line(format!(
                    "IO Scheduler (LOOK): no requests in current direction, changed to {}",
                    self.direction_name()
                ));

                let first = order[0];
                let last = order[order.len() - 1];
                let (to_first, _) = disk.seek_cost(disk.track_of(self.queue[first].sector));
                let (to_last, _) = disk.seek_cost(disk.track_of(self.queue[last].sector));
                if to_first <= to_last { first } else { last }
            }
        };

        let request = self.queue.remove(index);
        trace.line(format!(
            "IO Scheduler (LOOK): selected request sector {} (direction: {})",
            request.sector,
            self.direction_name()
        ));
        Some(request)
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
