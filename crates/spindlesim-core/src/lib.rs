//! # spindlesim-core
//!
//! **Discrete-event core of a single-spindle hard-disk I/O simulation.**
//!
//! The crate models, in millisecond-resolution virtual time, user processes
//! time-sliced by a CPU scheduler, a two-segment LRU buffer cache deciding
//! which syscalls escalate to the disk, a pluggable disk request scheduler,
//! and a disk whose access cost is seek + rotation + transfer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use spindlesim_core::{
//!     BufferCache, Disk, Engine, OpKind, Process, Timing, Trace, create_scheduler,
//! };
//!
//! let disk = Disk::new(10_000, 500, 0.5, 10.0, 7_500.0);
//! let cache = BufferCache::new(10, 5);
//! let scheduler = create_scheduler("look").unwrap();
//! let processes = vec![Process::new(1, vec![(OpKind::Read, 1250), (OpKind::Read, 1250)])];
//!
//! let timing = Timing {
//!     quantum: 20.0,
//!     syscall_time: 0.15,
//!     interrupt_time: 0.05,
//!     compute_time: 7.0,
//! };
//! let mut engine = Engine::new(disk, cache, scheduler, processes, timing, Trace::stdout(false));
//! engine.run().unwrap();
//! println!("{}", engine.report());
//! ```
//!
//! ## Architecture
//!
//! Workload → process list → event engine. The engine seeds the first
//! `ProcessStart`, then repeatedly pops the earliest event off a priority
//! queue ordered by `(time, insertion-seq)` and dispatches it. Handlers
//! consult the cache, queue requests on the I/O scheduler, walk the disk
//! through seek → rotation → transfer → interrupt, and hand the CPU
//! between processes. The whole system is single-threaded: all modeled
//! parallelism is interleaved events on one queue.

pub mod cache;
pub mod disk;
pub mod engine;
pub mod event;
pub mod process;
pub mod scheduler;
pub mod stats;
pub mod trace;

pub use cache::{Buffer, BufferCache, CacheAccess, Segment};
pub use disk::{Disk, SeekPath};
pub use engine::{Engine, EngineError, Timing};
pub use event::{Event, EventQueue, IoRequest, OpKind};
pub use process::{ProcState, Process};
pub use scheduler::{
    FifoScheduler, IoScheduler, LookScheduler, NlookScheduler, create_scheduler,
};
pub use stats::{CacheReport, DiskReport, ProcessReport, RunReport, Statistics};
pub use trace::Trace;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
