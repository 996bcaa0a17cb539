//! Canned workloads.
//!
//! Each scenario produces an ordered process list with a fixed access
//! pattern: `default` mixes one-shot and repeated accesses, `sequential`
//! strides across neighboring sectors, `random` scatters requests over the
//! whole disk from a fixed seed, and `cache-test` hammers a handful of
//! sectors to show the two-segment cache working.

use anyhow::{Result, bail};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use spindlesim_core::{OpKind, Process};

use crate::config::Config;

/// Seed for the `random` scenario; fixed so runs are comparable.
const RANDOM_SEED: u64 = 42;

/// Build the process list for the configured scenario.
pub fn build(config: &Config) -> Result<Vec<Process>> {
    let processes = match config.scenario_name.to_ascii_lowercase().as_str() {
        "default" => default_scenario(config),
        "sequential" => sequential_scenario(config),
        "random" => random_scenario(config),
        "cache-test" => cache_test_scenario(config),
        other => bail!(
            "unknown scenario: {other}. Available: default, sequential, random, cache-test"
        ),
    };

    let total_sectors = config.num_tracks * config.sectors_per_track;
    for process in &processes {
        for &(_, sector) in process.requests() {
            if sector >= total_sectors {
                bail!(
                    "scenario '{}' addresses sector {} outside the disk (0..{})",
                    config.scenario_name,
                    sector,
                    total_sectors
                );
            }
        }
    }
    Ok(processes)
}

/// Mixed reads and writes across different disk areas, with re-accesses
/// that exercise the cache.
fn default_scenario(config: &Config) -> Vec<Process> {
    let mut processes = vec![Process::new(
        1,
        vec![
            (OpKind::Read, 1250),
            (OpKind::Write, 1700),
            (OpKind::Read, 1250),
            (OpKind::Read, 500),
        ],
    )];

    if config.num_processes >= 2 {
        processes.push(Process::new(
            2,
            vec![
                (OpKind::Read, 5000),
                (OpKind::Read, 5100),
                (OpKind::Write, 3000),
            ],
        ));
    }
    if config.num_processes >= 3 {
        processes.push(Process::new(
            3,
            vec![
                (OpKind::Read, 2500),
                (OpKind::Write, 2600),
                (OpKind::Read, 2500),
            ],
        ));
    }
    processes
}

/// Stride-100 runs per process; friendly to the sweeping schedulers.
fn sequential_scenario(config: &Config) -> Vec<Process> {
    let base_sector = 1000;
    (0..config.num_processes)
        .map(|i| {
            let start = base_sector + u64::from(i) * 2000;
            let operations = (0..10u64)
                .map(|j| {
                    let op = if j % 2 == 0 { OpKind::Read } else { OpKind::Write };
                    (op, start + j * 100)
                })
                .collect();
            Process::new(i + 1, operations)
        })
        .collect()
}

/// Uniform accesses over the whole disk; the hardest pattern for any
/// seek-aware policy.
fn random_scenario(config: &Config) -> Vec<Process> {
    let total_sectors = config.num_tracks * config.sectors_per_track;
    let mut rng = StdRng::seed_from_u64(RANDOM_SEED);

    (0..config.num_processes)
        .map(|i| {
            let operations = (0..15)
                .map(|_| {
                    let sector = rng.random_range(0..total_sectors);
                    let op = if rng.random_bool(0.5) {
                        OpKind::Read
                    } else {
                        OpKind::Write
                    };
                    (op, sector)
                })
                .collect();
            Process::new(i + 1, operations)
        })
        .collect()
}

/// Heavy re-access of a few sectors; most requests should hit after the
/// first faults.
fn cache_test_scenario(config: &Config) -> Vec<Process> {
    let mut processes = vec![Process::new(
        1,
        vec![
            (OpKind::Read, 100),
            (OpKind::Read, 200),
            (OpKind::Read, 100),
            (OpKind::Read, 200),
            (OpKind::Read, 300),
            (OpKind::Read, 100),
            (OpKind::Write, 200),
            (OpKind::Read, 100),
        ],
    )];

    if config.num_processes >= 2 {
        processes.push(Process::new(
            2,
            vec![
                (OpKind::Read, 500),
                (OpKind::Read, 600),
                (OpKind::Read, 500),
                (OpKind::Read, 600),
                (OpKind::Read, 500),
            ],
        ));
    }
    if config.num_processes >= 3 {
        processes.push(Process::new(
            3,
            vec![
                (OpKind::Read, 1000),
                (OpKind::Write, 1000),
                (OpKind::Read, 1100),
                (OpKind::Read, 1000),
                (OpKind::Read, 1100),
            ],
        ));
    }
    processes
}
