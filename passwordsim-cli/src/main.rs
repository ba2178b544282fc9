use anyhow::Context;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use passwordsim::config::CliOverrides;
use passwordsim::{scan_source, EncodingMode, LineSource, ScanConfig, ScanOutput};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LONG_ABOUT: &str = "\
Search any leaked passwords dataset for passwords similar to your specified password.
Dataset format: text file, one password per line.

The similarity metric is the Damerau-Levenshtein distance, normalised by the length of the
longer password so that scores range from 0.0 (identical) to 1.0. The smaller the score,
the more similar the two passwords.

EXAMPLE: passwordsim -f 'passwords.txt' -o 'output.txt' -p 'correct horse battery staple' -t 0.3

searches 'passwords.txt' for passwords whose normalised distance to
'correct horse battery staple' is at most 0.3, and appends them with their scores to
'output.txt'.";

#[derive(Parser)]
#[command(name = "passwordsim", author, version, about, long_about = LONG_ABOUT)]
struct Cli {
    /// Path to FILE containing the leaked passwords dataset
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to FILE where similar passwords and their scores are appended [default: output.txt]
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// PASSWORD to check
    #[arg(short = 'p', long, value_name = "PASSWORD", allow_hyphen_values = true)]
    password: Option<String>,

    /// Maximum normalised distance THRESHOLD; out-of-range values are clamped to [0.0, 1.0] [default: 0.3]
    #[arg(
        short = 't',
        long,
        value_name = "THRESHOLD",
        allow_negative_numbers = true
    )]
    threshold: Option<f64>,

    /// Number of scoring threads [default: CPU cores]
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Number of lines buffered between the reader and the scoring threads [default: 512]
    #[arg(long)]
    queue_capacity: Option<NonZeroUsize>,

    /// How to handle invalid UTF-8 in the dataset [default: lossy]
    #[arg(long, value_enum)]
    encoding: Option<EncodingArg>,

    /// Configuration file (YAML)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long)]
    log_level: Option<String>,

    /// Positional arguments are not accepted
    #[arg(hide = true)]
    stray_args: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum EncodingArg {
    Lossy,
    Failfast,
}

impl From<EncodingArg> for EncodingMode {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Lossy => EncodingMode::Lossy,
            EncodingArg::Failfast => EncodingMode::FailFast,
        }
    }
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            corpus_path: self.file.clone(),
            output_path: self.output.clone(),
            target: self.password.clone(),
            threshold: self.threshold,
            thread_count: self.threads,
            queue_capacity: self.queue_capacity,
            encoding_mode: self.encoding.map(EncodingMode::from),
            log_level: self.log_level.clone(),
        }
    }
}

/// Invalid invocation, reported with a hint rather than as a failure
#[derive(Debug)]
struct InputError(&'static str);

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for InputError {}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = match e.downcast_ref::<InputError>() {
                Some(input) => format!("Input Error: {}", input),
                None => format!("Error: {:#}", e),
            };
            eprintln!("{}", message.bright_red());
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.stray_args.is_empty() {
        return Err(InputError(
            "Use flags instead of arguments. Check `--help` for more details.",
        )
        .into());
    }

    let config = ScanConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?
        .merge_with_cli(cli.overrides());

    init_tracing(&config.log_level);

    if config.corpus_path.as_os_str().is_empty() {
        return Err(InputError("No dataset file specified. Is the `-f` flag missing?").into());
    }
    if cli.password.is_none() && config.target.is_empty() {
        return Err(
            InputError("No password to check specified. Is the `-p` flag missing?").into(),
        );
    }

    let source = LineSource::open(&config.corpus_path, config.encoding_mode)?;
    println!("{}", "Searching for similar passwords...".bright_yellow());
    let output = scan_source(&config, source)?;
    print_summary(&output, &config);
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_summary(output: &ScanOutput, config: &ScanConfig) {
    let count = match output.len() {
        0 => "No similar passwords found".to_string(),
        1 => "1 similar password found".to_string(),
        n => format!("{} similar passwords found", n),
    };
    let summary = format!(
        "{} in '{}'. Threshold: {}",
        count,
        config.corpus_path.display(),
        output.threshold
    );

    if output.is_empty() {
        println!("{}", summary.bold().bright_green());
    } else {
        println!("{}", summary.bold().red());
    }
    println!(
        "{}",
        format!(
            "Results saved to file '{}'.",
            config.output_path.display()
        )
        .white()
    );
}
