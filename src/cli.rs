//! Command-line interface parsing and run configuration.

use anyhow::{bail, Result};
use clap::Parser;

use crate::timer::TimingMode;

/// Maximum burst size accepted for `*_multi` operations.
pub const MAX_BURST: usize = 64;

/// Event runtime micro benchmarks
///
/// Measures the average per-call cost of event runtime primitives:
/// allocation and free (singly and in bursts), metadata accessors,
/// references and clones, vector containers, and unscheduled queue
/// enqueue/dequeue.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Burst size for *_multi operations
    #[clap(short = 'b', long, default_value_t = crate::defaults::BURST_SIZE)]
    pub burst_size: usize,

    /// Pool cache size (-1 = pool default)
    #[clap(short = 'c', long, default_value_t = -1, allow_hyphen_values = true)]
    pub cache_size: i32,

    /// Event payload size in bytes
    #[clap(short = 'e', long, default_value_t = crate::defaults::EVENT_SIZE)]
    pub event_size: u32,

    /// Measure CPU cycles or wall-clock time
    #[clap(short = 't', long = "time", value_enum, default_value_t = TimingMode::Cycles)]
    pub time: TimingMode,

    /// Benchmark index to run indefinitely (0 = run the full catalog)
    #[clap(short = 'i', long, default_value_t = 0)]
    pub index: usize,

    /// Rounds per test case
    #[clap(short = 'r', long, default_value_t = crate::defaults::ROUNDS)]
    pub rounds: u32,

    /// Vector size in events
    #[clap(short = 'v', long, default_value_t = crate::defaults::VECTOR_SIZE)]
    pub vector_size: usize,
}

/// Validated configuration for one run. Constructed once from the parsed
/// arguments and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    /// Measurement domain for the whole run.
    pub time: TimingMode,
    /// Requested rounds per catalog entry.
    pub rounds: u32,
    /// Zero-based entry to run indefinitely, `None` for a normal run.
    pub bench_idx: Option<usize>,
    /// Events per `*_multi` burst.
    pub burst_size: usize,
    /// Event payload size in bytes.
    pub event_size: u32,
    /// Vector container capacity in events.
    pub vector_size: usize,
    /// Pool cache size, `None` for the pool default.
    pub cache_size: Option<u32>,
}

impl Config {
    /// Validate the arguments against the catalog size. Any error here is a
    /// configuration error: it is reported and nothing gets benchmarked.
    pub fn from_args(args: &Args, num_bench: usize) -> Result<Self> {
        if args.burst_size < 1 || args.burst_size > MAX_BURST {
            bail!("invalid burst size {} (max {})", args.burst_size, MAX_BURST);
        }
        if args.rounds < 1 {
            bail!("invalid round count {}", args.rounds);
        }
        if args.index > num_bench {
            bail!(
                "benchmark index {} out of range (the catalog has {} entries)",
                args.index,
                num_bench
            );
        }
        if args.event_size < 1 {
            bail!("invalid event size {}", args.event_size);
        }
        if args.vector_size < 1 {
            bail!("invalid vector size {}", args.vector_size);
        }

        Ok(Self {
            time: args.time,
            rounds: args.rounds,
            bench_idx: args.index.checked_sub(1),
            burst_size: args.burst_size,
            event_size: args.event_size,
            vector_size: args.vector_size,
            cache_size: u32::try_from(args.cache_size).ok(),
        })
    }
}
