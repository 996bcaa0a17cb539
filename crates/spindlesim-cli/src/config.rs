//! Run configuration: defaults, validation, and the banner printed before
//! the trace.
//!
//! Only the knobs a user actually turns are on the command line; the
//! remaining timings carry the stock values below. Validation runs before
//! any component is built so a bad combination never reaches the engine.

use std::io::Write;

use anyhow::{Result, bail};

use crate::Cli;

/// Stock seek time per track crossed, in milliseconds.
const SEEK_TIME_PER_TRACK: f64 = 0.5;
/// Stock edge-recalibration cost, in milliseconds.
const SEEK_TIME_TO_EDGE: f64 = 10.0;
/// Stock syscall entry cost, in milliseconds.
const SYSCALL_TIME: f64 = 0.15;
/// Stock interrupt handling cost, in milliseconds.
const INTERRUPT_TIME: f64 = 0.05;
/// Stock per-request compute cost, in milliseconds.
const COMPUTE_TIME: f64 = 7.0;

/// Everything a run needs, resolved from flags and defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub num_tracks: u64,
    pub sectors_per_track: u64,
    pub seek_time_per_track: f64,
    pub seek_time_to_edge: f64,
    pub rpm: u32,

    pub total_buffers: usize,
    pub max_right_segment: usize,

    pub quantum: f64,
    pub syscall_time: f64,
    pub interrupt_time: f64,
    pub compute_time: f64,

    pub scheduler_name: String,
    pub num_processes: u32,
    pub scenario_name: String,
    pub output_file: Option<String>,
    pub json_file: Option<String>,
    pub verbose: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            num_tracks: cli.tracks,
            sectors_per_track: cli.sectors_per_track,
            seek_time_per_track: SEEK_TIME_PER_TRACK,
            seek_time_to_edge: SEEK_TIME_TO_EDGE,
            rpm: cli.rpm,
            total_buffers: cli.buffers,
            // Half the pool, and always at least one buffer, may be
            // protected.
            max_right_segment: (cli.buffers / 2).max(1),
            quantum: cli.quantum,
            syscall_time: SYSCALL_TIME,
            interrupt_time: INTERRUPT_TIME,
            compute_time: COMPUTE_TIME,
            scheduler_name: cli.scheduler.clone(),
            num_processes: cli.processes,
            scenario_name: cli.scenario.clone(),
            output_file: cli.output.clone(),
            json_file: cli.json.clone(),
            verbose: cli.verbose,
        }
    }

    /// Reject any out-of-contract value with a user-visible message.
    pub fn validate(&self) -> Result<()> {
        if self.num_tracks == 0 {
            bail!("the number of tracks must be positive");
        }
        if self.sectors_per_track == 0 {
            bail!("the number of sectors per track must be positive");
        }
        if self.seek_time_per_track < 0.0 {
            bail!("the per-track seek time cannot be negative");
        }
        if self.seek_time_to_edge < 0.0 {
            bail!("the edge seek time cannot be negative");
        }
        if self.rpm == 0 {
            bail!("the rotation speed must be positive");
        }
        if self.total_buffers == 0 {
            bail!("the number of buffers must be positive");
        }
        if self.max_right_segment >= self.total_buffers {
            bail!(
                "the right segment cap ({}) must be smaller than the buffer count ({})",
                self.max_right_segment,
                self.total_buffers
            );
        }
        if self.quantum <= 0.0 {
            bail!("the quantum must be positive");
        }
        if self.syscall_time < 0.0 {
            bail!("the syscall time cannot be negative");
        }
        if self.interrupt_time < 0.0 {
            bail!("the interrupt time cannot be negative");
        }
        if self.compute_time < 0.0 {
            bail!("the compute time cannot be negative");
        }
        if self.num_processes == 0 {
            bail!("the number of processes must be positive");
        }

        const SCHEDULERS: &[&str] = &["fifo", "look", "nlook"];
        if !SCHEDULERS.contains(&self.scheduler_name.to_ascii_lowercase().as_str()) {
            bail!(
                "unknown scheduler: {}. Available: {}",
                self.scheduler_name,
                SCHEDULERS.join(", ")
            );
        }

        const SCENARIOS: &[&str] = &["default", "sequential", "random", "cache-test"];
        if !SCENARIOS.contains(&self.scenario_name.to_ascii_lowercase().as_str()) {
            bail!(
                "unknown scenario: {}. Available: {}",
                self.scenario_name,
                SCENARIOS.join(", ")
            );
        }
        Ok(())
    }

    /// Write the configuration banner ahead of the trace.
    pub fn write_banner(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "Configuration:")?;
        writeln!(
            out,
            "  I/O scheduler: {}",
            self.scheduler_name.to_ascii_uppercase()
        )?;
        writeln!(out, "  Processes: {}", self.num_processes)?;
        writeln!(out, "  Scenario: {}", self.scenario_name)?;
        writeln!(out, "  Quantum: {} ms", self.quantum)?;
        writeln!(out)?;
        writeln!(out, "Hard disk:")?;
        writeln!(out, "  Tracks: {}", self.num_tracks)?;
        writeln!(out, "  Sectors per track: {}", self.sectors_per_track)?;
        writeln!(out, "  Rotation speed: {} RPM", self.rpm)?;
        writeln!(out, "  Seek time per track: {} ms", self.seek_time_per_track)?;
        writeln!(out)?;
        writeln!(out, "Buffer cache:")?;
        writeln!(out, "  Buffers: {}", self.total_buffers)?;
        writeln!(out, "  Right segment cap: {}", self.max_right_segment)?;
        writeln!(out)?;
        writeln!(out, "{}", "-".repeat(80))?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> Config {
        let mut argv = vec!["spindlesim"];
        argv.extend_from_slice(args);
        Config::from_cli(&Cli::parse_from(argv))
    }

    #[test]
    fn test_defaults_are_valid() {
        let cfg = config(&[]);
        cfg.validate().unwrap();
        assert_eq!(cfg.num_tracks, 10_000);
        assert_eq!(cfg.sectors_per_track, 500);
        assert_eq!(cfg.rpm, 7_500);
        assert_eq!(cfg.total_buffers, 10);
        assert_eq!(cfg.max_right_segment, 5);
        assert_eq!(cfg.quantum, 20.0);
        assert_eq!(cfg.scheduler_name, "fifo");
        assert_eq!(cfg.scenario_name, "default");
    }

    #[test]
    fn test_right_segment_tracks_buffer_count() {
        assert_eq!(config(&["--buffers", "4"]).max_right_segment, 2);
        assert_eq!(config(&["--buffers", "3"]).max_right_segment, 1);
        // A single buffer cannot satisfy right < total.
        let cfg = config(&["--buffers", "1"]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_geometry() {
        assert!(config(&["--tracks", "0"]).validate().is_err());
        assert!(config(&["--sectors-per-track", "0"]).validate().is_err());
        assert!(config(&["--rpm", "0"]).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_quantum_and_processes() {
        assert!(config(&["--quantum", "0"]).validate().is_err());
        assert!(config(&["--processes", "0"]).validate().is_err());

        let mut cfg = config(&[]);
        cfg.quantum = -5.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_names() {
        let mut cfg = config(&[]);
        cfg.scheduler_name = "flook".into();
        assert!(cfg.validate().is_err());

        let mut cfg = config(&[]);
        cfg.scenario_name = "burst".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_clap_rejects_unknown_scheduler_value() {
        assert!(Cli::try_parse_from(["spindlesim", "--scheduler", "flook"]).is_err());
        assert!(Cli::try_parse_from(["spindlesim", "--scheduler", "look"]).is_ok());
    }

    #[test]
    fn test_banner_lists_key_settings() {
        let cfg = config(&["--scheduler", "nlook", "--processes", "3"]);
        let mut out = Vec::new();
        cfg.write_banner(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("I/O scheduler: NLOOK"));
        assert!(text.contains("Processes: 3"));
        assert!(text.contains("Tracks: 10000"));
    }
}
