//! System information and the startup banner.

use std::fmt;

use crate::cli::Config;
use crate::timer::TimingMode;

/// Host details reported before a run, for reproducibility of the numbers.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os: String,
    pub architecture: String,
    pub cpu_cores: usize,
    pub version: String,
}

impl SystemInfo {
    pub fn collect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            architecture: std::env::consts::ARCH.to_string(),
            cpu_cores: num_cpus::get(),
            version: crate::VERSION.to_string(),
        }
    }
}

impl fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}, {} cores, event-bench {}",
            self.os, self.architecture, self.cpu_cores, self.version
        )
    }
}

/// One-stop rendering of the effective run options, printed once at startup.
pub struct Banner<'a> {
    pub config: &'a Config,
    pub system: SystemInfo,
}

impl fmt::Display for Banner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "event-bench options")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "System:            {}", self.system)?;
        writeln!(f, "Burst size:        {}", self.config.burst_size)?;
        writeln!(f, "Event size:        {}", self.config.event_size)?;
        writeln!(
            f,
            "Measurement unit:  {}",
            match self.config.time {
                TimingMode::Cycles => "CPU cycles",
                TimingMode::Wallclock => "nsec",
            }
        )?;
        match self.config.cache_size {
            Some(cache) => writeln!(f, "Pool cache size:   {}", cache)?,
            None => writeln!(f, "Pool cache size:   default")?,
        }
        writeln!(f, "Test rounds:       {}", self.config.rounds)?;
        write!(f, "Vector size:       {}", self.config.vector_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_info_is_populated() {
        let info = SystemInfo::collect();
        assert!(!info.os.is_empty());
        assert!(!info.architecture.is_empty());
        assert!(info.cpu_cores > 0);
        assert_eq!(info.version, crate::VERSION);
    }

    #[test]
    fn banner_lists_the_tunables() {
        let config = Config {
            time: TimingMode::Wallclock,
            rounds: 50,
            bench_idx: None,
            burst_size: 16,
            event_size: 512,
            vector_size: 4,
            cache_size: Some(8),
        };
        let banner = Banner {
            config: &config,
            system: SystemInfo::collect(),
        }
        .to_string();
        assert!(banner.contains("Burst size:        16"));
        assert!(banner.contains("Measurement unit:  nsec"));
        assert!(banner.contains("Pool cache size:   8"));
        assert!(banner.contains("Test rounds:       50"));
    }
}
