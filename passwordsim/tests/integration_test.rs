use anyhow::Result;
use passwordsim::distance::{distance, normalized_score};
use passwordsim::scan::LineSource;
use passwordsim::{check_passwords, find_similar, scan, EncodingMode, ScanConfig, ScanError};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn fixture_corpus() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("passwords.txt")
}

fn scan_fixture(target: &str, threshold: f64) -> Result<String> {
    let dir = tempdir()?;
    let output = dir.path().join("output.txt");
    check_passwords(fixture_corpus(), &output, target, threshold)?;
    Ok(fs::read_to_string(&output)?)
}

#[test]
fn test_line_source_reads_fixture_in_order() -> Result<()> {
    let lines = LineSource::open(&fixture_corpus(), EncodingMode::FailFast)?
        .map(|line| -> Result<String> { Ok(String::from_utf8(line?)?) })
        .collect::<Result<Vec<_>>>()?;

    let expected = vec![
        "// This file is for testing",
        "password",
        "123456",
        "123456789",
        "guest",
        "qwerty",
        "12345678",
        "111111",
        "12345",
        "col123456",
        "123123",
        "1234567",
        "1234",
        "1234567890",
        "000000",
        "555555",
        "666666",
        "123321",
        "654321",
        "7777777",
        "123",
        "correct horse battery staple",
        "incorrect horse battery staple",
        "incorrect horse battery st@ple",
    ];
    assert_eq!(lines, expected);
    Ok(())
}

#[test]
fn test_similar_numeric_passwords() -> Result<()> {
    let content = scan_fixture("12345677", 0.3)?;
    assert_eq!(
        content,
        "1234567 0.125\n\
         12345678 0.125\n\
         123456789 0.2222222222222222\n\
         123456 0.25\n\
         1234567890 0.3\n"
    );
    Ok(())
}

#[test]
fn test_threshold_above_one_clamps_to_everything() -> Result<()> {
    let content = scan_fixture("12345677", 1.1)?;
    assert_eq!(
        content,
        "1234567 0.125\n\
         12345678 0.125\n\
         123456789 0.2222222222222222\n\
         123456 0.25\n\
         1234567890 0.3\n\
         12345 0.375\n\
         1234 0.5\n\
         col123456 0.5555555555555556\n\
         123 0.625\n\
         123123 0.625\n\
         123321 0.625\n\
         7777777 0.75\n\
         111111 0.875\n\
         555555 0.875\n\
         654321 0.875\n\
         666666 0.875\n\
         // This file is for testing 1\n\
         000000 1\n\
         correct horse battery staple 1\n\
         guest 1\n\
         incorrect horse battery st@ple 1\n\
         incorrect horse battery staple 1\n\
         password 1\n\
         qwerty 1\n"
    );
    assert_eq!(content, scan_fixture("12345677", 1.0)?);
    Ok(())
}

#[test]
fn test_negative_threshold_clamps_to_zero() -> Result<()> {
    let content = scan_fixture("12345677", -1.0)?;
    assert_eq!(content, "");
    assert_eq!(content, scan_fixture("12345677", 0.0)?);
    Ok(())
}

#[test]
fn test_near_duplicate_passphrases() -> Result<()> {
    let content = scan_fixture("correct horse battery staple", 0.3)?;
    assert_eq!(
        content,
        "correct horse battery staple 0\n\
         incorrect horse battery staple 0.06666666666666667\n\
         incorrect horse battery st@ple 0.1\n"
    );
    Ok(())
}

#[test]
fn test_exact_match_only() -> Result<()> {
    let content = scan_fixture("password", 0.0)?;
    assert_eq!(content, "password 0\n");
    Ok(())
}

#[test]
fn test_duplicate_candidates_reported_once() -> Result<()> {
    let dir = tempdir()?;
    let corpus = dir.path().join("dupes.txt");
    let output = dir.path().join("output.txt");
    fs::write(&corpus, "letmein\nletmein1\nletmein\nletmein\n")?;

    let result = check_passwords(&corpus, &output, "letmein", 0.2)?;
    assert_eq!(result.len(), 2);
    assert_eq!(result.stats.lines_read, 4);
    assert_eq!(
        fs::read_to_string(&output)?,
        "letmein 0\nletmein1 0.125\n"
    );
    Ok(())
}

#[test]
fn test_distinct_invalid_utf8_candidates_kept_apart() -> Result<()> {
    let dir = tempdir()?;
    let corpus = dir.path().join("latin1.txt");
    let output = dir.path().join("output.txt");
    fs::write(&corpus, b"caf\xe9\ncaf\xe8\ncaf\xe9\n")?;

    let result = check_passwords(&corpus, &output, "cafe", 1.0)?;
    assert_eq!(result.len(), 2);
    assert_eq!(result.stats.lossy_lines, 3);
    assert_eq!(fs::read(&output)?, b"caf\xe8 0.25\ncaf\xe9 0.25\n");
    Ok(())
}

#[test]
fn test_repeated_scans_accumulate_output() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("output.txt");

    check_passwords(fixture_corpus(), &output, "password", 0.0)?;
    check_passwords(fixture_corpus(), &output, "12345677", 0.125)?;

    assert_eq!(
        fs::read_to_string(&output)?,
        "password 0\n1234567 0.125\n12345678 0.125\n"
    );
    Ok(())
}

#[test]
fn test_output_is_sorted() -> Result<()> {
    let mut config = ScanConfig::new(fixture_corpus(), "unused.txt", "qwerty1", 1.0);
    config.thread_count = NonZeroUsize::new(4).unwrap();
    config.queue_capacity = NonZeroUsize::new(2).unwrap();

    let output = find_similar(&config)?;
    assert_eq!(output.len(), 24);
    for pair in output.matches.windows(2) {
        assert!(pair[0].score <= pair[1].score);
        if pair[0].score == pair[1].score {
            assert!(pair[0].password < pair[1].password);
        }
    }
    Ok(())
}

#[test]
fn test_reported_threshold_is_clamped() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("output.txt");

    let result = check_passwords(fixture_corpus(), &output, "guest", 7.5)?;
    assert_eq!(result.threshold.get(), 1.0);
    Ok(())
}

#[test]
fn test_missing_corpus_is_fatal() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("output.txt");
    let config = ScanConfig::new(dir.path().join("nope.txt"), &output, "password", 0.3);

    let err = scan(&config).unwrap_err();
    assert!(matches!(err, ScanError::FileNotFound(_)));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_unwritable_output_is_fatal() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("missing_dir").join("output.txt");

    let result = check_passwords(fixture_corpus(), &output, "password", 0.3);
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_distance_properties() {
    assert_eq!(distance("ab", "ba"), 1);
    assert_eq!(distance("ca", "abc"), 2);
    assert_eq!(normalized_score("hunter2", "hunter2"), 0.0);
    assert_eq!(distance("hunter2", "2retnuh"), distance("2retnuh", "hunter2"));
}
