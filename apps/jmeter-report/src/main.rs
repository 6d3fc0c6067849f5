//! JMeter Report Binary
//!
//! Reads a JMeter CSV result file and writes a self-contained HTML report.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use report_core::{generate_report, Config, OutputFormat, Reporter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "jmeter-report")]
#[command(version, about = "Generate an HTML report from a JMeter CSV result file")]
struct Args {
    /// JMeter result file (CSV with a header row)
    csv_file: PathBuf,

    /// Directory the report is written to; created if missing
    output_dir: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Summary printed to stdout after the report is written
    #[arg(long, value_enum, default_value_t = SummaryFormat::Console)]
    summary: SummaryFormat,

    /// Show seconds without requests as zero in the throughput chart
    #[arg(long)]
    zero_fill: bool,

    /// Report heading
    #[arg(long)]
    title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    Console,
    Json,
    JsonPretty,
    None,
}

impl SummaryFormat {
    fn output_format(self) -> Option<OutputFormat> {
        match self {
            SummaryFormat::Console => Some(OutputFormat::Console),
            SummaryFormat::Json => Some(OutputFormat::Json),
            SummaryFormat::JsonPretty => Some(OutputFormat::JsonPretty),
            SummaryFormat::None => None,
        }
    }
}

/// Configuration file (or defaults) with command-line overrides applied
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if args.zero_fill {
        config.report.zero_fill_throughput = true;
    }
    if let Some(title) = &args.title {
        config.report.title = title.clone();
    }
    Ok(config)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let outcome = generate_report(&args.csv_file, &args.output_dir, &config)
        .with_context(|| format!("Failed to generate report for {}", args.csv_file.display()))?;

    if let Some(format) = args.summary.output_format() {
        Reporter::new(format).report(&outcome.analysis.summary())?;
    }
    if outcome.warning_count > 0 {
        tracing::warn!(
            "{} field values could not be parsed; see the Data Quality section",
            outcome.warning_count
        );
    }
    println!("Report generated successfully at: {}", outcome.path.display());
    Ok(())
}

fn main() {
    let args = Args::parse();

    // stdout carries the summary; logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("jmeter-report v{}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = run(&args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_positional_arguments() {
        let args = parse(&["jmeter-report", "results.csv", "out"]);
        assert_eq!(args.csv_file, PathBuf::from("results.csv"));
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.summary, SummaryFormat::Console);
        assert!(!args.zero_fill);
    }

    #[test]
    fn test_missing_output_dir_is_usage_error() {
        let err = Args::try_parse_from(["jmeter-report", "results.csv"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_summary_values() {
        let args = parse(&["jmeter-report", "a.csv", "out", "--summary", "json-pretty"]);
        assert_eq!(args.summary.output_format(), Some(OutputFormat::JsonPretty));
        let args = parse(&["jmeter-report", "a.csv", "out", "--summary", "none"]);
        assert_eq!(args.summary.output_format(), None);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.toml");
        fs::write(&path, "[report]\ntitle = \"From file\"\nfile_name = \"r.html\"\n").unwrap();

        let args = parse(&[
            "jmeter-report",
            "a.csv",
            "out",
            "--config",
            path.to_str().unwrap(),
            "--zero-fill",
            "--title",
            "From flag",
        ]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.report.title, "From flag");
        assert_eq!(config.report.file_name, "r.html");
        assert!(config.report.zero_fill_throughput);
    }

    #[test]
    fn test_run_writes_report() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("results.csv");
        fs::write(
            &csv,
            "timeStamp,elapsed,success,responseCode\n0,100,true,200\n500,200,false,500\n",
        )
        .unwrap();
        let out = dir.path().join("out");

        let args = parse(&[
            "jmeter-report",
            csv.to_str().unwrap(),
            out.to_str().unwrap(),
            "--summary",
            "none",
        ]);
        run(&args).unwrap();

        assert!(out.join("jmeter_report.html").exists());
    }

    #[test]
    fn test_run_fails_on_missing_input() {
        let dir = TempDir::new().unwrap();
        let args = parse(&[
            "jmeter-report",
            dir.path().join("absent.csv").to_str().unwrap(),
            dir.path().join("out").to_str().unwrap(),
        ]);
        assert!(run(&args).is_err());
        assert!(!dir.path().join("out").join("jmeter_report.html").exists());
    }
}
