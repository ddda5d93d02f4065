//! Lightweight run statistics for manifest builds and audio writes.
//!
//! Timings and counters are aggregated in a process-global collector and
//! printed as an end-of-run summary when the CLI runs with `--verbose`.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Named metrics tracked by the perf collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Metric {
    ManifestBuild,
    ManifestRowsProcessed,
    ManifestRowsSkipped,
    AudioSave,
    AudioPrimaryFailures,
    AudioSecondaryWrites,
}

impl Metric {
    const COUNT: usize = 6;
    const ALL: [Metric; Metric::COUNT] = [
        Metric::ManifestBuild,
        Metric::ManifestRowsProcessed,
        Metric::ManifestRowsSkipped,
        Metric::AudioSave,
        Metric::AudioPrimaryFailures,
        Metric::AudioSecondaryWrites,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::ManifestBuild => "manifest.build",
            Metric::ManifestRowsProcessed => "manifest.rows.processed",
            Metric::ManifestRowsSkipped => "manifest.rows.skipped",
            Metric::AudioSave => "audio.save",
            Metric::AudioPrimaryFailures => "audio.primary.failures",
            Metric::AudioSecondaryWrites => "audio.secondary.writes",
        }
    }

    /// Timed metrics count spans; the rest are plain counters.
    fn is_timed(self) -> bool {
        matches!(self, Metric::ManifestBuild | Metric::AudioSave)
    }
}

struct Collector {
    start: Instant,
    micros: [AtomicU64; Metric::COUNT],
    counts: [AtomicU64; Metric::COUNT],
}

static COLLECTOR: OnceLock<Collector> = OnceLock::new();

fn collector() -> &'static Collector {
    COLLECTOR.get_or_init(|| Collector {
        start: Instant::now(),
        micros: std::array::from_fn(|_| AtomicU64::new(0)),
        counts: std::array::from_fn(|_| AtomicU64::new(0)),
    })
}

/// A RAII timer that records its duration when dropped.
pub struct PerfSpan {
    metric: Metric,
    start: Instant,
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        let micros = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);
        let collector = collector();
        let index = self.metric as usize;
        collector.micros[index].fetch_add(micros, Ordering::Relaxed);
        collector.counts[index].fetch_add(1, Ordering::Relaxed);
    }
}

/// Begin a timing span for `metric`.
pub fn span(metric: Metric) -> PerfSpan {
    PerfSpan {
        metric,
        start: Instant::now(),
    }
}

/// Add `delta` to a counter metric.
pub fn add_count(metric: Metric, delta: u64) {
    collector().counts[metric as usize].fetch_add(delta, Ordering::Relaxed);
}

/// Point-in-time copy of the collector.
#[derive(Debug)]
pub struct PerfSnapshot {
    uptime: Duration,
    micros: [u64; Metric::COUNT],
    counts: [u64; Metric::COUNT],
}

impl PerfSnapshot {
    /// Counter value, or number of finished spans for timed metrics.
    pub fn count(&self, metric: Metric) -> u64 {
        self.counts[metric as usize]
    }

    pub fn total(&self, metric: Metric) -> Duration {
        Duration::from_micros(self.micros[metric as usize])
    }

    /// One line per metric that recorded anything, in declaration order.
    pub fn format(&self) -> String {
        let mut output = format!("Run summary ({:.3}s)\n", self.uptime.as_secs_f64());
        let mut empty = true;
        for metric in Metric::ALL {
            let count = self.count(metric);
            if count == 0 {
                continue;
            }
            empty = false;
            let _ = if metric.is_timed() {
                writeln!(
                    output,
                    "  {:<26} {:>9.3}s over {count}",
                    metric.name(),
                    self.total(metric).as_secs_f64()
                )
            } else {
                writeln!(output, "  {:<26} {count}", metric.name())
            };
        }
        if empty {
            output.push_str("  nothing recorded\n");
        }
        output
    }
}

pub fn snapshot() -> PerfSnapshot {
    let collector = collector();
    PerfSnapshot {
        uptime: collector.start.elapsed(),
        micros: std::array::from_fn(|i| collector.micros[i].load(Ordering::Relaxed)),
        counts: std::array::from_fn(|i| collector.counts[i].load(Ordering::Relaxed)),
    }
}

/// Formatted summary of everything recorded so far.
pub fn report() -> String {
    snapshot().format()
}
