//! End-to-end runs of the real benchmark catalog with small round counts.

use event_bench::{
    bench::Runner,
    cli::Config,
    suite::{suite, BenchState},
    timer::TimingMode,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn small_config() -> Config {
    Config {
        time: TimingMode::Cycles,
        rounds: 1,
        bench_idx: None,
        burst_size: 2,
        event_size: 64,
        vector_size: 4,
        cache_size: None,
    }
}

fn result_lines(output: &str) -> Vec<&str> {
    output.lines().filter(|l| l.starts_with('[')).collect()
}

#[test]
fn full_catalog_streams_one_line_per_entry() {
    let catalog = suite();
    let config = small_config();
    let mut state = BenchState::new(&config).expect("state setup");
    let cancel = Arc::new(AtomicBool::new(false));
    let runner = Runner::new(&catalog, config.time, config.rounds, cancel);

    let mut out = Vec::new();
    runner.run(&mut state, &mut out).expect("catalog run");
    let output = String::from_utf8(out).unwrap();

    // Exactly one header block and one line per entry; warm-up results are
    // never emitted.
    assert_eq!(
        output
            .lines()
            .filter(|l| l.contains("per function call"))
            .count(),
        1
    );
    assert!(output.contains("Average CPU cycles per function call"));

    let lines = result_lines(&output);
    assert_eq!(lines.len(), catalog.len());
    assert!(lines[0].starts_with("[01] event_alloc(sw)"));
    assert!(lines[catalog.len() - 1].starts_with(&format!("[{}]", catalog.len())));
    for line in &lines {
        let value: f64 = line
            .rsplit(':')
            .next()
            .unwrap()
            .trim()
            .parse()
            .expect("result line carries a numeric mean");
        assert!(value.is_finite() && value >= 0.0);
    }

    // Every fixture returned its events: the teardown must find nothing
    // left in the queue or the pools.
    state.release().expect("clean release after a full run");
}

#[test]
fn wallclock_mode_reports_nanoseconds() {
    let catalog = suite();
    let config = Config {
        time: TimingMode::Wallclock,
        ..small_config()
    };
    let mut state = BenchState::new(&config).expect("state setup");
    let cancel = Arc::new(AtomicBool::new(false));
    let runner = Runner::new(&catalog, config.time, config.rounds, cancel);

    let mut out = Vec::new();
    runner.run(&mut state, &mut out).expect("catalog run");
    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("Average time (nsec) per function call"));
    state.release().expect("clean release");
}

#[test]
fn indefinite_mode_cycles_one_entry_until_interrupted() {
    let catalog = suite();
    let config = small_config();
    // Entry 14 of the catalog is event_alloc_free(sw): no setup, no
    // teardown, so cancellation timing is the only thing ending the loop.
    let index = catalog
        .iter()
        .position(|b| b.label() == "event_alloc_free(sw)")
        .unwrap();

    let cancel = Arc::new(AtomicBool::new(false));
    let stopper = cancel.clone();
    let handle = std::thread::spawn(move || {
        let mut state = BenchState::new(&config).expect("state setup");
        let runner =
            Runner::new(&catalog, config.time, config.rounds, cancel).indefinite(Some(index));
        let mut out = Vec::new();
        let outcome = runner.run(&mut state, &mut out);
        (outcome, String::from_utf8(out).unwrap())
    });

    std::thread::sleep(Duration::from_millis(50));
    stopper.store(true, Ordering::Relaxed);

    let (outcome, output) = handle.join().expect("worker thread");
    outcome.expect("cancellation ends the run cleanly");
    assert!(output.contains("Running event_alloc_free(sw) test indefinitely"));
    // No round bookkeeping in this mode: no result lines at all.
    assert!(result_lines(&output).is_empty());
}
