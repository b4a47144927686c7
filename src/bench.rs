//! Benchmark execution engine.
//!
//! The engine turns a list of [`BenchInfo`] entries into per-call cost
//! figures. Each measured operation performs [`REPEAT_COUNT`] primitive
//! calls internally so fixed instrumentation overhead amortizes away; the
//! engine runs it across a number of rounds, accumulates the elapsed cost of
//! the measured call only (setup and teardown stay outside the timestamps)
//! and reports `total / (rounds * REPEAT_COUNT)`.
//!
//! The full catalog is traversed twice. The first traversal is a warm-up
//! that exercises exactly the same code path, including the accumulator and
//! mean computation, and only suppresses output; the second streams one
//! result line per entry as it completes. A failing measured operation
//! (returning 0) aborts the whole run. Entries always execute sequentially
//! in declaration order since interleaving would pollute the measurements
//! with scheduler noise.
//!
//! The engine is generic over the fixture state `S` so it can be driven by
//! synthetic fixtures in tests and by the real catalog in the binary.

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

use crate::timer::TimingMode;

/// Number of primitive calls every measured operation performs internally.
pub const REPEAT_COUNT: usize = 1000;

/// Measured operation: returns how many of its internal repeats completed.
/// Zero signals a fixture failure and aborts the run.
pub type RunFn<S> = fn(&mut S) -> u64;

/// Per-round setup. An error is treated as a fatal fixture failure.
pub type InitFn<S> = fn(&mut S) -> Result<()>;

/// Per-round teardown; must release everything setup and the measured
/// operation acquired so the next round starts from a clean slate.
pub type TermFn<S> = fn(&mut S);

/// One catalog entry: a measured operation with optional setup/teardown and
/// per-entry tuning.
pub struct BenchInfo<S> {
    name: &'static str,
    run: RunFn<S>,
    init: Option<InitFn<S>>,
    term: Option<TermFn<S>>,
    max_rounds: Option<u32>,
    label: &'static str,
}

impl<S> BenchInfo<S> {
    pub fn new(name: &'static str, run: RunFn<S>) -> Self {
        Self {
            name,
            run,
            init: None,
            term: None,
            max_rounds: None,
            label: name,
        }
    }

    pub fn init(mut self, init: InitFn<S>) -> Self {
        self.init = Some(init);
        self
    }

    pub fn term(mut self, term: TermFn<S>) -> Self {
        self.term = Some(term);
        self
    }

    /// Entry-specific round cap, applied when smaller than the configured
    /// round count. Protects slow fixtures from combinatorial blow-up.
    pub fn max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Override the reported name. Resolved here, once, not at print time.
    pub fn desc(mut self, desc: &'static str) -> Self {
        self.label = desc;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name used in reports: the override if one was given, else `name`.
    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Drives the catalog: a warm-up pass, a reported pass, and the indefinite
/// single-entry diagnostic mode.
pub struct Runner<'a, S> {
    suite: &'a [BenchInfo<S>],
    mode: TimingMode,
    rounds: u32,
    indef_idx: Option<usize>,
    cancel: Arc<AtomicBool>,
}

impl<'a, S> Runner<'a, S> {
    pub fn new(
        suite: &'a [BenchInfo<S>],
        mode: TimingMode,
        rounds: u32,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            suite,
            mode,
            rounds,
            indef_idx: None,
            cancel,
        }
    }

    /// Run only the entry at `index` (zero-based) in a setup/run/teardown
    /// cycle until cancellation, skipping all round and pass bookkeeping.
    pub fn indefinite(mut self, index: Option<usize>) -> Self {
        self.indef_idx = index;
        self
    }

    /// Execute the run, streaming result lines to `out`.
    ///
    /// Returns `Ok` on completion and on cooperative cancellation (lines
    /// already written stay valid); an error means a fixture failed and the
    /// process outcome must be a failure.
    pub fn run<W: Write>(&self, state: &mut S, out: &mut W) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "Average {} per function call", self.mode.unit())?;
        writeln!(out, "------------------------------------------------------")?;
        out.flush()?;

        if let Some(index) = self.indef_idx {
            return self.run_indefinite(index, state, out);
        }

        // Two traversals; the warm-up results are computed but never printed.
        for pass in 0..2 {
            for (index, bench) in self.suite.iter().enumerate() {
                match self.measure(bench, state)? {
                    Some(result) => {
                        if pass > 0 {
                            writeln!(
                                out,
                                "[{:02}] {:<35}: {:>12.2}",
                                index + 1,
                                bench.label(),
                                result
                            )?;
                            out.flush()?;
                        }
                    }
                    // Cancellation observed at a round boundary.
                    None => {
                        info!("benchmark run canceled");
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }

    /// Round scheduler: run one entry across its effective round count and
    /// reduce the accumulated cost to a per-call mean.
    ///
    /// `Ok(None)` means cancellation was observed before a round started.
    fn measure(&self, bench: &BenchInfo<S>, state: &mut S) -> Result<Option<f64>> {
        let rounds = match bench.max_rounds {
            Some(cap) => cap.min(self.rounds),
            None => self.rounds,
        }
        .max(1);
        let mut total: u64 = 0;

        for _ in 0..rounds {
            if self.cancel.load(Ordering::Relaxed) {
                return Ok(None);
            }

            if let Some(init) = bench.init {
                init(state).with_context(|| format!("setup failed for {}", bench.label()))?;
            }

            let start = self.mode.stamp();
            let outcome = (bench.run)(state);
            let stop = self.mode.stamp();

            if outcome == 0 {
                error!("benchmark {} failed", bench.label());
                bail!("benchmark {} failed", bench.label());
            }

            if let Some(term) = bench.term {
                term(state);
            }

            total += self.mode.elapsed(start, stop);
        }

        Ok(Some(total as f64 / (f64::from(rounds) * REPEAT_COUNT as f64)))
    }

    /// Diagnostic mode: cycle one entry until cancellation, failing fast on
    /// the first bad outcome. No timing, no rounds, no passes.
    fn run_indefinite<W: Write>(&self, index: usize, state: &mut S, out: &mut W) -> Result<()> {
        let bench = self
            .suite
            .get(index)
            .with_context(|| format!("benchmark index {} out of range", index + 1))?;

        writeln!(out, "Running {} test indefinitely", bench.label())?;
        out.flush()?;

        while !self.cancel.load(Ordering::Relaxed) {
            if let Some(init) = bench.init {
                init(state).with_context(|| format!("setup failed for {}", bench.label()))?;
            }

            let outcome = (bench.run)(state);

            if let Some(term) = bench.term {
                term(state);
            }

            if outcome == 0 {
                error!("benchmark {} failed", bench.label());
                bail!("benchmark {} failed", bench.label());
            }
        }
        Ok(())
    }
}
