//! Run counters and the end-of-run report.
//!
//! [`Statistics`] accumulates during dispatch; [`RunReport`] is the
//! snapshot the engine assembles afterwards, printable for the terminal
//! and serializable for machine consumption.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// Counters accumulated while the engine runs.
#[derive(Debug, Default)]
pub struct Statistics {
    total_disk_seeks: u64,
    total_seek_time: f64,
    cache_hits: u64,
    cache_misses: u64,
    finished: HashSet<u32>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// One head seek, counted even when the head is already on the target
    /// track.
    pub fn record_disk_seek(&mut self, seek_time: f64) {
        self.total_disk_seeks += 1;
        self.total_seek_time += seek_time;
    }

    pub fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    pub fn record_cache_miss(&mut self) {
        self.cache_misses += 1;
    }

    pub fn process_finished(&mut self, pid: u32) {
        self.finished.insert(pid);
    }

    pub fn total_disk_seeks(&self) -> u64 {
        self.total_disk_seeks
    }

    pub fn total_seek_time(&self) -> f64 {
        self.total_seek_time
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses
    }

    pub fn finished_count(&self) -> usize {
        self.finished.len()
    }

    pub fn is_finished(&self, pid: u32) -> bool {
        self.finished.contains(&pid)
    }

    /// Cache hit rate in percent; 0 when nothing was accessed.
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64 * 100.0
        }
    }
}

/// Disk section of the final report.
#[derive(Debug, Clone, Serialize)]
pub struct DiskReport {
    pub seeks: u64,
    pub total_seek_time_ms: f64,
    pub avg_seek_time_ms: f64,
}

/// Cache section of the final report.
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate_percent: f64,
    pub left_resident: usize,
    pub right_resident: usize,
}

/// Per-process row of the final report.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub pid: u32,
    pub completed: usize,
    pub total: usize,
    pub state: String,
}

/// Snapshot of a finished (or aborted) run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub total_time_ms: f64,
    pub disk: DiskReport,
    pub cache: CacheReport,
    pub finished_processes: usize,
    pub processes: Vec<ProcessReport>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SIMULATION STATISTICS:")?;
        writeln!(f, "  Total simulated time: {:.2} ms", self.total_time_ms)?;
        writeln!(f, "  Disk head seeks: {}", self.disk.seeks)?;
        writeln!(
            f,
            "  Total seek time: {:.2} ms",
            self.disk.total_seek_time_ms
        )?;
        if self.disk.seeks > 0 {
            writeln!(
                f,
                "  Average seek time: {:.2} ms",
                self.disk.avg_seek_time_ms
            )?;
        }
        writeln!(f)?;
        writeln!(f, "BUFFER CACHE STATISTICS:")?;
        writeln!(f, "  Hits: {}", self.cache.hits)?;
        writeln!(f, "  Misses: {}", self.cache.misses)?;
        writeln!(f, "  Hit rate: {:.2}%", self.cache.hit_rate_percent)?;
        writeln!(
            f,
            "  Left segment: {} buffers, right segment: {} buffers",
            self.cache.left_resident, self.cache.right_resident
        )?;
        writeln!(f)?;
        writeln!(f, "PROCESS STATISTICS:")?;
        writeln!(f, "  Total processes: {}", self.processes.len())?;
        writeln!(f, "  Finished processes: {}", self.finished_processes)?;
        for p in &self.processes {
            writeln!(
                f,
                "  Process {}: {}/{} operations, state: {}",
                p.pid, p.completed, p.total, p.state
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_empty_is_zero() {
        let stats = Statistics::new();
        assert_eq!(stats.cache_hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_percentage() {
        let mut stats = Statistics::new();
        stats.record_cache_hit();
        stats.record_cache_hit();
        stats.record_cache_hit();
        stats.record_cache_miss();
        assert_eq!(stats.cache_hit_rate(), 75.0);
    }

    #[test]
    fn test_seek_accumulation() {
        let mut stats = Statistics::new();
        stats.record_disk_seek(2.5);
        stats.record_disk_seek(0.0);
        stats.record_disk_seek(4.0);
        assert_eq!(stats.total_disk_seeks(), 3);
        assert_eq!(stats.total_seek_time(), 6.5);
    }

    #[test]
    fn test_finished_set_deduplicates() {
        let mut stats = Statistics::new();
        stats.process_finished(1);
        stats.process_finished(1);
        stats.process_finished(2);
        assert_eq!(stats.finished_count(), 2);
        assert!(stats.is_finished(1));
        assert!(!stats.is_finished(3));
    }

    #[test]
    fn test_report_renders_sections() {
        let report = RunReport {
            total_time_ms: 123.456,
            disk: DiskReport {
                seeks: 4,
                total_seek_time_ms: 10.0,
                avg_seek_time_ms: 2.5,
            },
            cache: CacheReport {
                hits: 3,
                misses: 1,
                hit_rate_percent: 75.0,
                left_resident: 1,
                right_resident: 2,
            },
            finished_processes: 1,
            processes: vec![ProcessReport {
                pid: 1,
                completed: 4,
                total: 4,
                state: "FINISHED".into(),
            }],
        };
        let text = report.to_string();
        assert!(text.contains("SIMULATION STATISTICS:"));
        assert!(text.contains("Total simulated time: 123.46 ms"));
        assert!(text.contains("Hit rate: 75.00%"));
        assert!(text.contains("Process 1: 4/4 operations, state: FINISHED"));
    }
}
