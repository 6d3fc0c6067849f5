//! End-to-end tests: result file in, HTML document out.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use report_core::config::ThresholdsConfig;
use report_core::{generate_report, Config, Field, ReportError};
use tempfile::TempDir;

const TWO_ROWS: &str = "timeStamp,elapsed,label,responseCode,success\n\
                        0,100,Home,200,true\n\
                        500,200,Home,500,false\n";

fn write_input(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn listing(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_generates_report_for_two_rows() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "results.csv", TWO_ROWS);
    let out = dir.path().join("report");

    let outcome = generate_report(&input, &out, &Config::default()).unwrap();

    assert_eq!(outcome.path, out.join("jmeter_report.html"));
    assert_eq!(outcome.warning_count, 0);

    let stats = &outcome.analysis.stats;
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.average, 0.15);
    assert_eq!(stats.median, 0.15);
    assert_eq!(stats.min, 0.1);
    assert_eq!(stats.max, 0.2);
    assert_eq!(stats.success_rate, 50.0);

    let html = fs::read_to_string(&outcome.path).unwrap();
    assert!(html.contains("results.csv"));
    assert!(html.contains("0.15 s"));
    assert!(html.contains("50.00 %"));
}

#[test]
fn test_elapsed_is_converted_to_seconds() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "results.csv",
        "timeStamp,elapsed,success,responseCode\n1000,1500,true,200\n",
    );

    let outcome = generate_report(&input, dir.path(), &Config::default()).unwrap();

    assert_eq!(
        outcome.analysis.dataset.samples[0].elapsed_seconds,
        Some(1.5)
    );
    assert_eq!(outcome.analysis.stats.max, 1.5);
}

#[test]
fn test_missing_success_column_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "results.csv",
        "timeStamp,elapsed,responseCode\n0,100,200\n",
    );
    let out = dir.path().join("report");

    let err = generate_report(&input, &out, &Config::default()).unwrap_err();

    match err {
        ReportError::SchemaViolation { missing } => assert_eq!(missing, vec!["success"]),
        other => panic!("Expected SchemaViolation, got {:?}", other),
    }
    assert_eq!(listing(&out), Vec::<String>::new());
}

#[test]
fn test_missing_input_is_ingest_error() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report");

    let err = generate_report(&dir.path().join("absent.csv"), &out, &Config::default())
        .unwrap_err();

    assert!(matches!(err, ReportError::Ingest { .. }));
    assert_eq!(listing(&out), Vec::<String>::new());
}

#[test]
fn test_invalid_config_is_rejected_before_reading() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "results.csv", TWO_ROWS);
    let mut config = Config::default();
    config.report.file_name = "../escape.html".to_string();

    let err = generate_report(&input, dir.path(), &config).unwrap_err();

    assert!(matches!(err, ReportError::Config(_)));
}

#[test]
fn test_malformed_rows_are_kept_with_warnings() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "results.csv",
        "timeStamp,elapsed,success,responseCode\n\
         1000,100,true,200\n\
         oops,300,true,200\n\
         2000,n/a,false,503\n",
    );

    let outcome = generate_report(&input, dir.path(), &Config::default()).unwrap();
    let analysis = &outcome.analysis;

    assert_eq!(outcome.warning_count, 2);
    assert_eq!(analysis.stats.total_requests, 3);
    assert_eq!(analysis.stats.elapsed_count, 2);
    assert_eq!(analysis.throughput.total(), 2);
    let warnings = analysis.dataset.warning_counts();
    assert_eq!(warnings[&Field::Timestamp], 1);
    assert_eq!(warnings[&Field::Elapsed], 1);

    let html = fs::read_to_string(&outcome.path).unwrap();
    assert!(html.contains("Data Quality"));
    assert!(html.contains("oops"));
}

#[test]
fn test_non_utf8_message_does_not_abort_the_run() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("results.jtl");
    fs::write(
        &input,
        b"timeStamp,elapsed,success,responseCode,responseMessage\n\
          0,100,true,200,OK\n\
          500,200,false,500,Erreur serveur \xe9\n\
          1500,300,true,200,OK\n",
    )
    .unwrap();

    let outcome = generate_report(&input, dir.path(), &Config::default()).unwrap();

    assert_eq!(outcome.analysis.stats.total_requests, 3);
    assert_eq!(outcome.warning_count, 0);
    assert_eq!(outcome.analysis.response_codes["500"], 1);
    assert!(outcome.path.exists());
}

#[test]
fn test_non_utf8_required_cell_becomes_a_warning() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("results.jtl");
    fs::write(
        &input,
        b"timeStamp,elapsed,success,responseCode\n\
          0,1\xff0,true,200\n\
          500,200,true,200\n",
    )
    .unwrap();

    let outcome = generate_report(&input, dir.path(), &Config::default()).unwrap();

    assert_eq!(outcome.analysis.stats.total_requests, 2);
    assert_eq!(outcome.analysis.dataset.warning_counts()[&Field::Elapsed], 1);
}

#[test]
fn test_custom_columns_and_delimiter() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "results.csv",
        "ts;ms;ok;code\n0;250;1;200\n1000;750;0;500\n",
    );
    let config = Config::from_str(
        r#"
        [input]
        delimiter = ";"

        [columns]
        timestamp = "ts"
        elapsed = "ms"
        success = "ok"
        response_code = "code"

        [report]
        file_name = "custom.html"
        "#,
    )
    .unwrap();

    let outcome = generate_report(&input, dir.path(), &config).unwrap();

    assert_eq!(outcome.path, dir.path().join("custom.html"));
    assert_eq!(outcome.analysis.stats.average, 0.5);
    assert_eq!(outcome.analysis.stats.success_rate, 50.0);
    assert_eq!(outcome.analysis.throughput.len(), 2);
}

#[test]
fn test_thresholds_do_not_block_the_report() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "results.csv", TWO_ROWS);
    let config = Config {
        thresholds: ThresholdsConfig {
            min_success_rate: Some(99.0),
            ..Default::default()
        },
        ..Default::default()
    };

    let outcome = generate_report(&input, dir.path(), &config).unwrap();

    assert!(!outcome.analysis.thresholds.passed);
    let html = fs::read_to_string(&outcome.path).unwrap();
    assert!(html.contains("is below threshold"));
}

#[test]
fn test_zero_fill_renders_dense_series() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "results.csv",
        "timeStamp,elapsed,success,responseCode\n0,100,true,200\n3000,100,true,200\n",
    );
    let mut config = Config::default();
    config.report.zero_fill_throughput = true;

    let outcome = generate_report(&input, dir.path(), &config).unwrap();

    // stored series stays sparse
    assert_eq!(outcome.analysis.throughput.len(), 2);
    let html = fs::read_to_string(&outcome.path).unwrap();
    assert!(html.contains("Seconds without requests are shown as zero."));
}

#[test]
fn test_header_only_input() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "results.csv",
        "timeStamp,elapsed,success,responseCode\n",
    );

    let outcome = generate_report(&input, dir.path(), &Config::default()).unwrap();

    assert_eq!(outcome.analysis.stats.total_requests, 0);
    assert!(outcome.analysis.throughput.is_empty());
    assert!(outcome.path.exists());
}

#[test]
fn test_rerun_overwrites_identically_apart_from_timestamp() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "results.csv", TWO_ROWS);

    let first = generate_report(&input, dir.path(), &Config::default()).unwrap();
    let second = generate_report(&input, dir.path(), &Config::default()).unwrap();

    assert_eq!(first.analysis.stats, second.analysis.stats);
    assert_eq!(first.analysis.throughput, second.analysis.throughput);
    assert_eq!(listing(dir.path()), vec!["jmeter_report.html", "results.csv"]);
}
