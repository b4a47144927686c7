//! Timing source abstraction for the benchmark engine.
//!
//! A run measures in exactly one of two domains: raw CPU cycle counts or
//! monotonic wall-clock nanoseconds. The domain is selected once per run via
//! [`TimingMode`] and never mixed; [`Stamp`] values are opaque to callers and
//! only meaningful to the mode that produced them.

use clap::ValueEnum;
use std::fmt;
use std::time::Instant;

/// Measurement domain for one benchmark run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TimingMode {
    /// Raw CPU cycle counts (serialized `RDTSC` on x86_64).
    Cycles,
    /// Monotonic wall-clock time in nanoseconds.
    Wallclock,
}

impl fmt::Display for TimingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingMode::Cycles => write!(f, "cycles"),
            TimingMode::Wallclock => write!(f, "wallclock"),
        }
    }
}

/// Opaque timestamp produced by [`TimingMode::stamp`].
#[derive(Clone, Copy, Debug)]
pub enum Stamp {
    Cycles(u64),
    Wall(Instant),
}

impl TimingMode {
    /// Read the current timestamp in this mode's domain.
    #[inline]
    pub fn stamp(self) -> Stamp {
        match self {
            TimingMode::Cycles => Stamp::Cycles(cycle_count()),
            TimingMode::Wallclock => Stamp::Wall(Instant::now()),
        }
    }

    /// Non-negative elapsed cost between two stamps of this mode's domain.
    ///
    /// The unit is cycles in [`TimingMode::Cycles`] and nanoseconds in
    /// [`TimingMode::Wallclock`].
    #[inline]
    pub fn elapsed(self, start: Stamp, stop: Stamp) -> u64 {
        match (start, stop) {
            (Stamp::Cycles(a), Stamp::Cycles(b)) => b.saturating_sub(a),
            (Stamp::Wall(a), Stamp::Wall(b)) => {
                b.saturating_duration_since(a).as_nanos() as u64
            }
            // Stamps come from a single TimingMode held by the runner for
            // the whole run, so the domains cannot disagree.
            _ => unreachable!("timing domains mixed within a run"),
        }
    }

    /// Human-readable unit name for report headers.
    pub fn unit(self) -> &'static str {
        match self {
            TimingMode::Cycles => "CPU cycles",
            TimingMode::Wallclock => "time (nsec)",
        }
    }
}

/// Read the CPU cycle counter.
///
/// `LFENCE` before the read keeps prior instructions from drifting past it,
/// `LFENCE` after keeps the read from drifting past subsequent instructions.
#[cfg(target_arch = "x86_64")]
#[inline]
fn cycle_count() -> u64 {
    let lo: u32;
    let hi: u32;
    // SAFETY: LFENCE and RDTSC are always available on x86_64 and have no
    // side effects beyond reading the timestamp counter.
    unsafe {
        core::arch::asm!(
            "lfence",
            "rdtsc",
            "lfence",
            out("eax") lo,
            out("edx") hi,
            options(nomem, nostack, preserves_flags),
        );
    }
    (u64::from(hi) << 32) | u64::from(lo)
}

/// Read the generic virtual counter (fixed-frequency, not core cycles, but
/// monotonic and cheap to sample).
#[cfg(target_arch = "aarch64")]
#[inline]
fn cycle_count() -> u64 {
    let cnt: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 on Linux and has no side
    // effects.
    unsafe {
        core::arch::asm!("isb", "mrs {cnt}, cntvct_el0", cnt = out(reg) cnt,
            options(nomem, nostack, preserves_flags));
    }
    cnt
}

/// Fallback for architectures without an accessible cycle counter: monotonic
/// nanoseconds since first use, so cycle mode still produces stable numbers.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline]
fn cycle_count() -> u64 {
    use std::sync::OnceLock;
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_nanos() as u64
}
