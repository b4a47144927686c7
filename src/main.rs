//! Entry point for the event runtime micro-benchmark suite.
//!
//! The main task parses arguments, prints the startup banner, installs a
//! Ctrl-C listener that flips the cooperative cancellation flag, and hands
//! the whole catalog to a single blocking worker thread. The worker runs
//! the engine sequentially; the only state shared with the async shell is
//! the atomic cancellation flag. The process exits non-zero when a fixture
//! fails or setup cannot complete, and zero on success or a clean
//! operator-requested stop.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use event_bench::{
    bench::Runner,
    cli::{Args, Config},
    logging::ColorizedFormatter,
    suite::{suite, BenchState},
    utils::{Banner, SystemInfo},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Log level is controlled via RUST_LOG, e.g. RUST_LOG=debug event-bench.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .event_format(ColorizedFormatter)
        .init();

    let args = Args::parse();
    let suite = suite();

    // Configuration errors are reported before anything gets benchmarked.
    let config = Config::from_args(&args, suite.len())?;

    info!(
        "{}",
        Banner {
            config: &config,
            system: SystemInfo::collect(),
        }
    );

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, stopping after the current round");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    // The engine is strictly sequential; give it a dedicated worker thread
    // so the measured operations never share a core with the async shell.
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut state = BenchState::new(&config)?;
        let runner = Runner::new(&suite, config.time, config.rounds, cancel)
            .indefinite(config.bench_idx);

        let stdout = io::stdout();
        let mut out = stdout.lock();
        let outcome = runner.run(&mut state, &mut out);
        out.flush()?;

        if let Err(e) = state.release() {
            warn!("resource cleanup failed: {e}");
        }
        outcome
    })
    .await
    .context("benchmark worker panicked")??;

    info!("benchmark run finished");
    Ok(())
}
