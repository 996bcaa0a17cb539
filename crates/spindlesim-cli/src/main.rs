//! spindlesim: disk I/O scheduling under a simulated OS workload.

mod config;
mod output;
mod scenarios;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use spindlesim_core::{BufferCache, Disk, Engine, Timing, Trace, create_scheduler};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "spindlesim")]
#[command(about = "Discrete-event simulation of hard-disk I/O scheduling under an OS workload")]
#[command(version = spindlesim_core::VERSION)]
struct Cli {
    /// Disk I/O scheduling algorithm
    #[arg(long, default_value = "fifo", value_parser = ["fifo", "look", "nlook"])]
    scheduler: String,

    /// Number of user processes
    #[arg(long, default_value_t = 2)]
    processes: u32,

    /// CPU quantum in milliseconds
    #[arg(long, default_value_t = 20.0)]
    quantum: f64,

    /// Number of buffers in the cache
    #[arg(long, default_value_t = 10)]
    buffers: usize,

    /// Number of disk tracks
    #[arg(long, default_value_t = 10_000)]
    tracks: u64,

    /// Sectors per track
    #[arg(long, default_value_t = 500)]
    sectors_per_track: u64,

    /// Disk rotation speed in revolutions per minute
    #[arg(long, default_value_t = 7_500)]
    rpm: u32,

    /// Workload scenario
    #[arg(
        long,
        default_value = "default",
        value_parser = ["default", "sequential", "random", "cache-test"]
    )]
    scenario: String,

    /// Write the trace and report to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<String>,

    /// Write the final report as JSON to FILE
    #[arg(long, value_name = "FILE")]
    json: Option<String>,

    /// Also trace scheduler queue internals
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    if let Err(err) = ctrlc::set_handler(|| {
        eprintln!("\nSimulation interrupted.");
        std::process::exit(130);
    }) {
        log::warn!("could not install interrupt handler: {err}");
    }

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(&cli);
    config.validate()?;

    let mut sink = output::open_sink(config.output_file.as_deref());
    config
        .write_banner(&mut sink)
        .context("writing configuration banner")?;

    let disk = Disk::new(
        config.num_tracks,
        config.sectors_per_track,
        config.seek_time_per_track,
        config.seek_time_to_edge,
        f64::from(config.rpm),
    );
    let cache = BufferCache::new(config.total_buffers, config.max_right_segment);
    let scheduler = create_scheduler(&config.scheduler_name)
        .with_context(|| format!("unknown scheduler: {}", config.scheduler_name))?;
    let processes = scenarios::build(&config)?;

    let timing = Timing {
        quantum: config.quantum,
        syscall_time: config.syscall_time,
        interrupt_time: config.interrupt_time,
        compute_time: config.compute_time,
    };
    let trace = Trace::new(sink, config.verbose);
    let mut engine = Engine::new(disk, cache, scheduler, processes, timing, trace);

    engine.run().context("simulation failed")?;
    engine.write_report();

    if let Some(path) = &config.json_file {
        let json = serde_json::to_string_pretty(&engine.report())
            .context("serializing JSON report")?;
        std::fs::write(path, json).with_context(|| format!("writing JSON report to {path}"))?;
    }
    if let Some(path) = &config.output_file {
        println!("Results saved to {path}");
    }
    Ok(())
}
