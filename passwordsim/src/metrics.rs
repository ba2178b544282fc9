use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Tracks progress counters for a scan.
///
/// Cloning shares the counters, so the reader and every worker can hold their own handle.
#[derive(Debug, Clone)]
pub struct ScanMetrics {
    started: Instant,

    lines_read: Arc<AtomicU64>,
    lines_scored: Arc<AtomicU64>,
    matches_inserted: Arc<AtomicU64>,
    lossy_lines: Arc<AtomicU64>,
}

impl ScanMetrics {
    /// Creates a new ScanMetrics instance, starting the clock
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            lines_read: Arc::new(AtomicU64::new(0)),
            lines_scored: Arc::new(AtomicU64::new(0)),
            matches_inserted: Arc::new(AtomicU64::new(0)),
            lossy_lines: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a line handed to the workers
    pub fn record_line_read(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a line whose invalid UTF-8 was replaced
    pub fn record_lossy_line(&self) {
        self.lossy_lines.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a batch of work finished by one worker
    pub fn record_worker_finished(&self, scored: u64, matched: u64) {
        let total = self.lines_scored.fetch_add(scored, Ordering::Relaxed) + scored;
        self.matches_inserted.fetch_add(matched, Ordering::Relaxed);
        debug!(
            "Worker finished: {} lines scored, {} matched, total scored: {}",
            scored, matched, total
        );
    }

    /// Gets a snapshot of the counters
    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            lines_scored: self.lines_scored.load(Ordering::Relaxed),
            matches_inserted: self.matches_inserted.load(Ordering::Relaxed),
            lossy_lines: self.lossy_lines.load(Ordering::Relaxed),
            elapsed: self.started.elapsed(),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan stats:\n\
             Lines read/scored: {}/{}\n\
             Matches inserted: {}\n\
             Lines with invalid UTF-8: {}\n\
             Elapsed: {}",
            stats.lines_read,
            stats.lines_scored,
            stats.matches_inserted,
            stats.lossy_lines,
            humantime::format_duration(round_to_millis(stats.elapsed))
        );
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn round_to_millis(elapsed: Duration) -> Duration {
    Duration::from_millis(elapsed.as_millis() as u64)
}

/// Snapshot of scan counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanStats {
    pub lines_read: u64,
    pub lines_scored: u64,
    /// Inserts into the match set, including repeats of the same password
    pub matches_inserted: u64,
    pub lossy_lines: u64,
    pub elapsed: Duration,
}
