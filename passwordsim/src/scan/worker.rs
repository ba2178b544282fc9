use crossbeam_channel::Receiver;
use tracing::{debug, trace};

use crate::config::Threshold;
use crate::distance::DamerauLevenshtein;
use crate::metrics::ScanMetrics;
use crate::results::MatchSet;

/// Lifecycle of a scoring worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Pulling lines off the queue
    Running,
    /// The queue was closed and emptied; the worker is done
    Drained,
}

/// What one worker did before draining
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub lines_scored: u64,
    pub matches: u64,
}

/// Scores queued lines against the target and records the close ones.
///
/// Borrows everything shared with the other workers and owns only its distance
/// calculator, so no scratch state is shared between threads.
#[derive(Debug)]
pub struct Worker<'a> {
    id: usize,
    target: &'a str,
    threshold: Threshold,
    matches: &'a MatchSet,
    metrics: &'a ScanMetrics,
    calculator: DamerauLevenshtein,
    state: WorkerState,
}

impl<'a> Worker<'a> {
    pub fn new(
        id: usize,
        target: &'a str,
        threshold: Threshold,
        matches: &'a MatchSet,
        metrics: &'a ScanMetrics,
    ) -> Self {
        Self {
            id,
            target,
            threshold,
            matches,
            metrics,
            calculator: DamerauLevenshtein::new(),
            state: WorkerState::Running,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Consumes lines until the queue is closed and empty
    pub fn run(mut self, lines: Receiver<Vec<u8>>) -> WorkerReport {
        let mut report = WorkerReport {
            id: self.id,
            ..WorkerReport::default()
        };

        while self.state == WorkerState::Running {
            match lines.recv() {
                Ok(password) => self.score(password, &mut report),
                Err(_) => self.state = WorkerState::Drained,
            }
        }

        debug!(
            "Worker {} drained after {} lines",
            self.id, report.lines_scored
        );
        self.metrics
            .record_worker_finished(report.lines_scored, report.matches);
        report
    }

    fn score(&mut self, password: Vec<u8>, report: &mut WorkerReport) {
        // Only the scored text is decoded; the stored key keeps the original bytes
        let score = self
            .calculator
            .normalized_score(&String::from_utf8_lossy(&password), self.target);
        report.lines_scored += 1;

        if self.threshold.accepts(score) {
            trace!(
                "Worker {} matched {:?} with score {}",
                self.id,
                String::from_utf8_lossy(&password),
                score
            );
            self.matches.insert(password, score);
            report.matches += 1;
        }
    }
}
