//! The discrete-event engine.
//!
//! Owns every singleton of the modeled system (disk, buffer cache, I/O
//! scheduler, process table, trace sink, statistics) plus the event queue
//! and the virtual clock. The run loop pops the earliest event, advances
//! the clock, and dispatches on the event kind; each handler runs to
//! completion and schedules at most a constant number of future events.
//!
//! Exactly one I/O request is in flight at a time (the disk is
//! single-spindle) and at most one process is RUNNING; both live in single
//! `Option` slots. Cross-references go through pids, never through shared
//! ownership.

use thiserror::Error;

use crate::cache::{BufferCache, CacheAccess};
use crate::disk::Disk;
use crate::event::{Event, EventQueue, IoRequest, OpKind};
use crate::process::{ProcState, Process};
use crate::scheduler::IoScheduler;
use crate::stats::{CacheReport, DiskReport, ProcessReport, RunReport, Statistics};
use crate::trace::Trace;

/// Fixed CPU-side costs of the modeled system, in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// CPU budget granted to a process before preemption.
    pub quantum: f64,
    /// Cost of entering a syscall.
    pub syscall_time: f64,
    /// Cost of handling a disk-completion interrupt.
    pub interrupt_time: f64,
    /// Cost of processing one request's data.
    pub compute_time: f64,
}

/// Fatal inconsistencies. The engine raises no recoverable errors during
/// dispatch; anything that surfaces here is a core bug.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("in-flight request for sector {sector} names unknown process {pid}")]
    LostOwner { pid: u32, sector: u64 },
    #[error("event queue drained with {unfinished} unfinished process(es): simulation deadlocked")]
    Deadlock { unfinished: usize },
}

/// Discrete-event simulator over one disk, one cache, one scheduler and a
/// process list.
pub struct Engine {
    disk: Disk,
    cache: BufferCache,
    scheduler: Box<dyn IoScheduler>,
    processes: Vec<Process>,
    timing: Timing,
    queue: EventQueue,
    clock: f64,
    current_process: Option<u32>,
    current_io: Option<IoRequest>,
    stats: Statistics,
    trace: Trace,
}

impl Engine {
    pub fn new(
        disk: Disk,
        cache: BufferCache,
        scheduler: Box<dyn IoScheduler>,
        processes: Vec<Process>,
        timing: Timing,
        trace: Trace,
    ) -> Self {
        Self {
            disk,
            cache,
            scheduler,
            processes,
            timing,
            queue: EventQueue::new(),
            clock: 0.0,
            current_process: None,
            current_io: None,
            stats: Statistics::new(),
            trace,
        }
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn cache(&self) -> &BufferCache {
        &self.cache
    }

    pub fn disk(&self) -> &Disk {
        &self.disk
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Run to completion: seed the first process start, then pop events
    /// until every process is FINISHED or the queue drains.
    pub fn run(&mut self) -> Result<(), EngineError> {
        if let Some(first) = self.processes.first() {
            let pid = first.pid();
            self.queue.push(0.0, Event::ProcessStart { pid });
        }

        while let Some((time, event)) = self.queue.pop() {
            debug_assert!(time >= self.clock, "virtual clock went backwards");
            self.clock = time;
            self.trace.set_now(time);

            match event {
                Event::ProcessStart { pid } => self.handle_process_start(pid),
                Event::SyscallStart { pid, op, sector } => {
                    self.handle_syscall_start(pid, op, sector)
                }
                Event::SyscallEnd {
                    pid,
                    op,
                    sector,
                    miss,
                } => self.handle_syscall_end(pid, op, sector, miss),
                Event::DiskSeekEnd => self.handle_disk_seek_end(),
                Event::DiskRotationEnd => self.handle_disk_rotation_end(),
                Event::DiskTransferEnd => self.handle_disk_transfer_end(),
                Event::InterruptStart => self.handle_interrupt_start()?,
                Event::InterruptEnd { pid } => self.handle_interrupt_end(pid),
                Event::ProcessCompute { pid } => self.handle_process_compute(pid),
            }

            if self.stats.finished_count() == self.processes.len() {
                self.trace.line("All processes finished");
                self.trace.flush();
                return Ok(());
            }
        }

        self.trace.flush();
        let unfinished = self.processes.len() - self.stats.finished_count();
        if unfinished > 0 {
            log::error!("event queue drained with {unfinished} unfinished process(es)");
            return Err(EngineError::Deadlock { unfinished });
        }
        Ok(())
    }

    /// Snapshot of the finished run for printing or serialization.
    pub fn report(&self) -> RunReport {
        let seeks = self.stats.total_disk_seeks();
        RunReport {
            total_time_ms: self.clock,
            disk: DiskReport {
                seeks,
                total_seek_time_ms: self.stats.total_seek_time(),
                avg_seek_time_ms: if seeks > 0 {
                    self.stats.total_seek_time() / seeks as f64
                } else {
                    0.0
                },
            },
            cache: CacheReport {
                hits: self.stats.cache_hits(),
                misses: self.stats.cache_misses(),
                hit_rate_percent: self.stats.cache_hit_rate(),
                left_resident: self.cache.left_len(),
                right_resident: self.cache.right_len(),
            },
            finished_processes: self.stats.finished_count(),
            processes: self
                .processes
                .iter()
                .map(|p| ProcessReport {
                    pid: p.pid(),
                    completed: p.completed(),
                    total: p.total_ops(),
                    state: if p.is_finished() {
                        ProcState::Finished.to_string()
                    } else {
                        p.state.to_string()
                    },
                })
                .collect(),
        }
    }

    /// Render the final report through the trace sink.
    pub fn write_report(&mut self) {
        let report = self.report();
        self.trace.raw("");
        self.trace.raw(report);
        self.trace.flush();
    }

    // -----------------------------------------------------------------------
    // Event handlers
    // -----------------------------------------------------------------------

    fn schedule(&mut self, delay: f64, event: Event) {
        self.queue.push(self.clock + delay, event);
    }

    fn process_mut(&mut self, pid: u32) -> Option<&mut Process> {
        self.processes.iter_mut().find(|p| p.pid() == pid)
    }

    fn handle_process_start(&mut self, pid: u32) {
        let quantum = self.timing.quantum;
        self.trace
            .line(format!("Process {pid}: started (quantum: {quantum} ms)"));

        let next = {
            let Some(p) = self.process_mut(pid) else {
                return;
            };
            p.state = ProcState::Running;
            p.quantum_remaining = quantum;
            p.peek_next_request()
        };
        self.current_process = Some(pid);

        match next {
            Some((op, sector)) => {
                self.trace
                    .line(format!("Process {pid}: next operation {op} sector {sector}"));
                self.schedule(0.0, Event::SyscallStart { pid, op, sector });
            }
            None => self.finish_process(pid),
        }
    }

    fn handle_syscall_start(&mut self, pid: u32, op: OpKind, sector: u64) {
        self.trace
            .line(format!("Process {pid}: syscall {op}(sector={sector}) started"));

        let syscall_time = self.timing.syscall_time;
        if let Some(p) = self.process_mut(pid) {
            p.quantum_remaining -= syscall_time;
        }

        let outcome = self.cache.access(sector, op);
        self.trace_cache(sector, &outcome);
        if outcome.hit {
            self.stats.record_cache_hit();
        } else {
            self.stats.record_cache_miss();
        }

        self.schedule(
            syscall_time,
            Event::SyscallEnd {
                pid,
                op,
                sector,
                miss: !outcome.hit,
            },
        );
    }

    fn handle_syscall_end(&mut self, pid: u32, op: OpKind, sector: u64, miss: bool) {
        if miss {
            self.trace
                .line(format!("Process {pid}: syscall ended, need disk I/O"));
            if let Some(p) = self.process_mut(pid) {
                p.state = ProcState::Blocked;
            }

            let request = IoRequest {
                sector,
                op,
                pid,
                submitted_at: self.clock,
            };
            self.scheduler.submit(request, &mut self.trace);
            if self.current_io.is_none() {
                self.start_disk_operation();
            }
            self.schedule_next_process();
        } else {
            self.trace
                .line(format!("Process {pid}: syscall ended, data in cache"));
            if let Some(p) = self.process_mut(pid) {
                p.advance();
            }
            self.schedule(self.timing.compute_time, Event::ProcessCompute { pid });
        }
    }

    /// Begin serving the next pending request, if the disk is idle and the
    /// scheduler has one.
    fn start_disk_operation(&mut self) {
        if self.current_io.is_some() {
            return;
        }
        let Some(request) = self.scheduler.pick_next(&self.disk, &mut self.trace) else {
            return;
        };

        let target = self.disk.track_of(request.sector);
        let (seek_time, path) = self.disk.seek_cost(target);
        self.stats.record_disk_seek(seek_time);
        self.current_io = Some(request);

        if seek_time > 0.0 {
            self.trace.line(format!(
                "Disk: seeking to track {target} ({path}, {seek_time:.2} ms)"
            ));
        } else {
            self.trace.line(format!("Disk: already at track {target}"));
        }
        self.schedule(seek_time, Event::DiskSeekEnd);
    }

    fn handle_disk_seek_end(&mut self) {
        let Some(request) = self.current_io.as_ref() else {
            return;
        };
        let target = self.disk.track_of(request.sector);
        self.disk.move_head(target);

        let latency = self.disk.avg_rotational_latency();
        self.trace
            .line(format!("Disk: rotational latency {latency:.2} ms"));
        self.schedule(latency, Event::DiskRotationEnd);
    }

    fn handle_disk_rotation_end(&mut self) {
        let Some(request) = self.current_io.as_ref() else {
            return;
        };
        let sector = request.sector;
        let transfer = self.disk.sector_transfer_time();
        self.trace
            .line(format!("Disk: transferring sector {sector} ({transfer:.2} ms)"));
        self.schedule(transfer, Event::DiskTransferEnd);
    }

    fn handle_disk_transfer_end(&mut self) {
        let Some(request) = self.current_io.as_ref() else {
            return;
        };
        let sector = request.sector;
        self.trace
            .line(format!("Disk: sector {sector} transfer complete"));
        self.schedule(0.0, Event::InterruptStart);
    }

    fn handle_interrupt_start(&mut self) -> Result<(), EngineError> {
        let Some(request) = self.current_io.as_ref() else {
            return Ok(());
        };
        let sector = request.sector;
        let owner = request.pid;
        self.trace
            .line(format!("Interrupt: disk I/O complete for sector {sector}"));

        // The interrupt steals CPU time from whoever is running.
        let interrupt_time = self.timing.interrupt_time;
        if let Some(pid) = self.current_process {
            if let Some(p) = self.process_mut(pid) {
                p.quantum_remaining -= interrupt_time;
            }
        }

        if self.process_mut(owner).is_none() {
            self.trace
                .line(format!("ERROR: process {owner} not found"));
            log::error!("in-flight request for sector {sector} names unknown process {owner}");
            return Err(EngineError::LostOwner { pid: owner, sector });
        }

        self.schedule(interrupt_time, Event::InterruptEnd { pid: owner });
        Ok(())
    }

    fn handle_interrupt_end(&mut self, pid: u32) {
        self.trace
            .line(format!("Interrupt: handled, unblocking process {pid}"));
        if let Some(p) = self.process_mut(pid) {
            p.state = ProcState::Ready;
            p.advance();
        }

        self.current_io = None;
        self.start_disk_operation();

        // An idle CPU picks the unblocked process up immediately; a running
        // process keeps the CPU until it blocks, finishes or is preempted.
        if self.current_process.is_none() {
            self.schedule_next_process();
        }
    }

    fn handle_process_compute(&mut self, pid: u32) {
        let compute_time = self.timing.compute_time;
        self.trace
            .line(format!("Process {pid}: computing data ({compute_time} ms)"));

        let (expired, next) = {
            let Some(p) = self.process_mut(pid) else {
                return;
            };
            p.quantum_remaining -= compute_time;
            (p.quantum_remaining <= 0.0, p.peek_next_request())
        };

        if expired {
            self.trace.line(format!("Process {pid}: quantum expired"));
            self.preempt(pid);
        } else if let Some((op, sector)) = next {
            self.schedule(0.0, Event::SyscallStart { pid, op, sector });
        } else {
            self.finish_process(pid);
        }
    }

    // -----------------------------------------------------------------------
    // CPU scheduling
    // -----------------------------------------------------------------------

    /// Mark `pid` FINISHED and hand the CPU to the next READY process.
    fn finish_process(&mut self, pid: u32) {
        if let Some(p) = self.process_mut(pid) {
            p.state = ProcState::Finished;
        }
        self.trace.line(format!("Process {pid}: FINISHED"));
        self.stats.process_finished(pid);
        self.schedule_next_process();
    }

    /// Hand the CPU to the lowest-pid READY process, or idle the CPU when
    /// none is runnable.
    fn schedule_next_process(&mut self) {
        let next = self
            .processes
            .iter()
            .find(|p| p.state == ProcState::Ready)
            .map(|p| p.pid());
        match next {
            Some(pid) => self.schedule(0.0, Event::ProcessStart { pid }),
            None => {
                self.trace.line("Scheduler: no ready processes");
                self.current_process = None;
            }
        }
    }

    /// Quantum expiry: requeue `pid` as READY and hand the CPU to the first
    /// READY process other than it, falling back to `pid` itself when it is
    /// the only runnable one.
    fn preempt(&mut self, pid: u32) {
        if let Some(p) = self.process_mut(pid) {
            p.state = ProcState::Ready;
        }
        let next = self
            .processes
            .iter()
            .find(|p| p.state == ProcState::Ready && p.pid() != pid)
            .map_or(pid, |p| p.pid());
        self.schedule(0.0, Event::ProcessStart { pid: next });
    }

    // -----------------------------------------------------------------------
    // Trace helpers
    // -----------------------------------------------------------------------

    fn trace_cache(&mut self, sector: u64, outcome: &CacheAccess) {
        if outcome.hit {
            self.trace.line(format!("Buffer cache: HIT sector {sector}"));
            if let Some(demoted) = outcome.demoted {
                self.trace.line(format!(
                    "Buffer cache: moved sector {demoted} from right to left segment"
                ));
            }
            self.trace.line(format!(
                "Buffer cache: moved sector {sector} to right segment start"
            ));
        } else {
            self.trace
                .line(format!("Buffer cache: MISS sector {sector}"));
            if outcome.allocated {
                self.trace.line("Buffer cache: allocated new buffer");
            } else if let Some((evicted, segment)) = outcome.evicted {
                self.trace.line(format!(
                    "Buffer cache: evicted sector {evicted} from {segment} segment"
                ));
            }
            self.trace.line(format!(
                "Buffer cache: added sector {sector} to left segment start"
            ));
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("clock", &self.clock)
            .field("scheduler", &self.scheduler.name())
            .field("processes", &self.processes.len())
            .field("pending_events", &self.queue.len())
            .finish_non_exhaustive()
    }
}
