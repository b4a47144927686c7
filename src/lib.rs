//! # Event Runtime Micro Benchmarks
//!
//! A micro-benchmark suite measuring the per-call cost of event runtime
//! primitives: allocation and free of typed events (singly and in bursts),
//! metadata accessors, references and clones, vector containers, and
//! enqueue/dequeue against an unscheduled queue.
//!
//! ## Architecture Overview
//!
//! The crate is organized into a small set of modules:
//!
//! - `bench`: the benchmark engine — catalog entries, round scheduling,
//!   warm-up/measured passes, cancellation and the indefinite diagnostic mode
//! - `timer`: the timing source, CPU cycles or wall-clock nanoseconds
//! - `suite`: the fixture catalog and the scratch state it operates on
//! - `runtime`: the in-process event runtime (pools, handles, queues)
//! - `cli`: command-line parsing and run configuration
//! - `logging`: colorized tracing output for the terminal
//! - `utils`: system information and the startup banner
//!
//! ## Measurement Model
//!
//! Every measured operation performs [`bench::REPEAT_COUNT`] primitive calls
//! internally, so fixed instrumentation overhead amortizes away. The engine
//! runs each catalog entry over a number of rounds, brackets only the
//! measured call with the timing source, and reports the mean cost per
//! primitive call. The whole catalog runs twice: a discarded warm-up pass
//! followed by the reported pass, streamed one line per entry.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use event_bench::{
//!     bench::Runner,
//!     cli::{Args, Config},
//!     suite::{suite, BenchState},
//! };
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//!
//! fn main() -> anyhow::Result<()> {
//!     let suite = suite();
//!     let args = Args {
//!         burst_size: 8,
//!         cache_size: -1,
//!         event_size: 1024,
//!         time: event_bench::timer::TimingMode::Cycles,
//!         index: 0,
//!         rounds: 100,
//!         vector_size: 8,
//!     };
//!     let config = Config::from_args(&args, suite.len())?;
//!     let cancel = Arc::new(AtomicBool::new(false));
//!
//!     let mut state = BenchState::new(&config)?;
//!     let runner = Runner::new(&suite, config.time, config.rounds, cancel);
//!     runner.run(&mut state, &mut std::io::stdout().lock())?;
//!     Ok(())
//! }
//! ```

pub mod bench;
pub mod cli;
pub mod logging;
pub mod runtime;
pub mod suite;
pub mod timer;
pub mod utils;

// Re-export the types most library users interact with.
pub use bench::{BenchInfo, Runner, REPEAT_COUNT};
pub use cli::{Args, Config};
pub use suite::{suite, BenchState};
pub use timer::TimingMode;

/// The current version of the benchmark suite, from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values.
pub mod defaults {
    /// Default burst size for `*_multi` operations.
    pub const BURST_SIZE: usize = 8;

    /// Default event payload size in bytes.
    ///
    /// 1KB sits between tiny control events and full packet payloads and
    /// matches what the pools are tuned for out of the box.
    pub const EVENT_SIZE: u32 = 1024;

    /// Default number of rounds per test case.
    pub const ROUNDS: u32 = 1000;

    /// Default vector container capacity in events.
    pub const VECTOR_SIZE: usize = 8;
}
