use std::path::Path;
use std::thread;
use tracing::{debug, info, warn};

use super::source::LineSource;
use super::worker::{Worker, WorkerReport};
use crate::config::ScanConfig;
use crate::errors::{ScanError, ScanResult};
use crate::metrics::ScanMetrics;
use crate::results::{MatchSet, ScanOutput};
use crate::sink::write_results;

/// Scans the corpus and appends the sorted matches to the configured output file
pub fn scan(config: &ScanConfig) -> ScanResult<ScanOutput> {
    let source = LineSource::open(&config.corpus_path, config.encoding_mode)?;
    scan_source(config, source)
}

/// Like [`scan`], reading from a corpus the caller already opened
pub fn scan_source(config: &ScanConfig, source: LineSource) -> ScanResult<ScanOutput> {
    let output = find_similar_in(config, source)?;
    write_results(&config.output_path, &output.matches)?;

    info!(
        "Saved {} results to {}",
        output.len(),
        config.output_path.display()
    );
    Ok(output)
}

/// Runs one complete scan-and-write with default tuning
pub fn check_passwords(
    corpus_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    target: &str,
    threshold: f64,
) -> ScanResult<ScanOutput> {
    let config = ScanConfig::new(
        corpus_path.as_ref(),
        output_path.as_ref(),
        target,
        threshold,
    );
    scan(&config)
}

/// Scores every corpus line against the target and returns the sorted matches.
///
/// Nothing is written; the output path in `config` is ignored.
pub fn find_similar(config: &ScanConfig) -> ScanResult<ScanOutput> {
    let source = LineSource::open(&config.corpus_path, config.encoding_mode)?;
    find_similar_in(config, source)
}

/// Scores every line of an opened corpus; the corpus path in `config` is only logged
pub fn find_similar_in(config: &ScanConfig, source: LineSource) -> ScanResult<ScanOutput> {
    let threshold = config.threshold;
    info!(
        "Starting scan of {} with threshold {}",
        config.corpus_path.display(),
        threshold
    );

    let metrics = ScanMetrics::new();
    let source = source.with_metrics(metrics.clone());

    let matches = MatchSet::new();
    let worker_count = config.thread_count.get();
    let (line_tx, line_rx) = crossbeam_channel::bounded::<Vec<u8>>(config.queue_capacity.get());
    debug!(
        "Spawning {} workers with queue capacity {}",
        worker_count, config.queue_capacity
    );

    let reports = thread::scope(|scope| -> ScanResult<Vec<WorkerReport>> {
        let mut handles = Vec::with_capacity(worker_count);
        for worker_idx in 0..worker_count {
            let worker = Worker::new(
                worker_idx,
                &config.target,
                threshold,
                &matches,
                &metrics,
            );
            let rx = line_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("passwordsim-worker-{}", worker_idx))
                .spawn_scoped(scope, move || worker.run(rx))?;
            handles.push(handle);
        }

        // Workers hold the only receivers now
        drop(line_rx);

        let mut read_error = None;
        for line in source {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        // Every worker is gone; joining below reports why
                        break;
                    }
                    metrics.record_line_read();
                }
                Err(e) => {
                    read_error = Some(e);
                    break;
                }
            }
        }

        // Closing the queue lets the workers drain and exit
        drop(line_tx);

        let mut reports = Vec::with_capacity(worker_count);
        for (worker_idx, handle) in handles.into_iter().enumerate() {
            let report = handle
                .join()
                .map_err(|_| ScanError::WorkerPanicked(worker_idx))?;
            reports.push(report);
        }

        match read_error {
            Some(e) => Err(e),
            None => Ok(reports),
        }
    })?;

    debug!("All {} workers drained", reports.len());
    metrics.log_stats();

    let stats = metrics.get_stats();
    if stats.lossy_lines > 0 {
        warn!(
            "Invalid UTF-8 in {} lines of {} was replaced for scoring",
            stats.lossy_lines,
            config.corpus_path.display()
        );
    }

    let matches = matches.into_sorted();
    info!(
        "Scan complete. Found {} similar passwords in {} lines",
        matches.len(),
        stats.lines_read
    );

    Ok(ScanOutput {
        matches,
        threshold,
        stats,
    })
}
