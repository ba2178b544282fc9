use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Default capacity of the queue between the corpus reader and the scoring workers.
///
/// Workers spend far longer computing distances than the reader spends producing lines,
/// so the queue has to be deep enough that the reader rarely waits on them.
pub const DEFAULT_QUEUE_CAPACITY: usize = 512;

/// Default maximum normalised distance for a password to count as similar
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Default file results are appended to
pub const DEFAULT_OUTPUT_PATH: &str = "output.txt";

/// Maximum normalised Damerau-Levenshtein distance a candidate may have to be reported.
///
/// Always within `[0.0, 1.0]`: out-of-range values are clamped on construction and NaN
/// becomes `0.0`, so a threshold can never be rejected.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Whether a score is close enough to the target to be kept
    pub fn accepts(self, score: f64) -> bool {
        score <= self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl From<f64> for Threshold {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// How to treat corpus lines that are not valid UTF-8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    /// Abort the scan at the first invalid line
    FailFast,
    /// Replace invalid sequences with U+FFFD and keep going
    #[default]
    Lossy,
}

/// Configuration for a single scan.
///
/// # Configuration Locations
///
/// Loaded from these locations, later ones taking precedence:
/// 1. Global `$CONFIG_DIR/passwordsim/config.yaml`
/// 2. Local `.passwordsim.yaml` in the current directory
/// 3. Custom config file given with `--config`
///
/// Command-line flags override all of them (see [`ScanConfig::merge_with_cli`]).
///
/// # Configuration Format
///
/// ```yaml
/// # Dataset to scan, one password per line
/// corpus_path: "rockyou.txt"
///
/// # Results are appended here
/// output_path: "output.txt"
///
/// # Password to compare against
/// target: "correct horse battery staple"
///
/// # Maximum normalised distance, clamped to [0.0, 1.0]
/// threshold: 0.3
///
/// # Worker count (default: CPU cores)
/// thread_count: 8
///
/// # Lines buffered between reader and workers
/// queue_capacity: 512
///
/// # Invalid UTF-8 handling (lossy, failfast)
/// encoding_mode: lossy
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Path to the passwords dataset
    pub corpus_path: PathBuf,

    /// Path results are appended to
    pub output_path: PathBuf,

    /// Password that candidates are compared against
    pub target: String,

    /// Maximum normalised distance for a match
    pub threshold: Threshold,

    /// Number of scoring workers
    pub thread_count: NonZeroUsize,

    /// Capacity of the bounded line queue
    pub queue_capacity: NonZeroUsize,

    /// Invalid UTF-8 handling for corpus lines
    pub encoding_mode: EncodingMode,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Values given on the command line; `None` leaves the loaded value untouched
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub corpus_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub target: Option<String>,
    pub threshold: Option<f64>,
    pub thread_count: Option<NonZeroUsize>,
    pub queue_capacity: Option<NonZeroUsize>,
    pub encoding_mode: Option<EncodingMode>,
    pub log_level: Option<String>,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_queue_capacity() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_QUEUE_CAPACITY).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::new(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            target: String::new(),
            threshold: Threshold::default(),
            thread_count: default_thread_count(),
            queue_capacity: default_queue_capacity(),
            encoding_mode: EncodingMode::default(),
            log_level: default_log_level(),
        }
    }
}

impl ScanConfig {
    /// Builds a configuration for one scan, using defaults for the tuning knobs
    pub fn new(
        corpus_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        target: impl Into<String>,
        threshold: f64,
    ) -> Self {
        Self {
            corpus_path: corpus_path.into(),
            output_path: output_path.into(),
            target: target.into(),
            threshold: Threshold::new(threshold),
            ..Self::default()
        }
    }

    /// Loads configuration, layering a specific file over the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let defaults = [
            dirs::config_dir().map(|p| p.join("passwordsim/config.yaml")),
            Some(PathBuf::from(".passwordsim.yaml")),
        ];

        for path in defaults.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicitly requested file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges command-line values over configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(corpus_path) = cli.corpus_path {
            self.corpus_path = corpus_path;
        }
        if let Some(output_path) = cli.output_path {
            self.output_path = output_path;
        }
        if let Some(target) = cli.target {
            self.target = target;
        }
        if let Some(threshold) = cli.threshold {
            self.threshold = Threshold::new(threshold);
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if let Some(queue_capacity) = cli.queue_capacity {
            self.queue_capacity = queue_capacity;
        }
        if let Some(encoding_mode) = cli.encoding_mode {
            self.encoding_mode = encoding_mode;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }
}
