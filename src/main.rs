// src/main.rs

//! `benchmarktest [options] <test-name> [<test-name> ...]`

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use mp4bench::packager::{write_test_files, IvSource};
use mp4bench::{run_workloads, BenchConfig, BenchConfigBuilder, Runner, TestFiles, WorkloadSelection};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

const TEST_NAMES_HELP: &str = "\
Test names:
  aes-block-decrypt
  aes-block-encrypt
  aes-cbc-stream-encrypt
  aes-cbc-stream-decrypt
  aes-ctr-stream
  read-samples
  read-samples-dcf-cbc
  read-samples-dcf-ctr
  read-samples-pdcf-cbc
  read-samples-pdcf-ctr
  all";

#[derive(Debug, Parser)]
#[command(
    name = "benchmarktest",
    version,
    about = "Throughput of AES primitives and MP4 / OMA DCF / PDCF sample loading",
    after_help = TEST_NAMES_HELP
)]
struct Cli {
    /// Workloads to run, in any order; `all` selects every workload
    #[arg(value_name = "TEST-NAME")]
    tests: Vec<String>,

    #[arg(long, value_name = "FILE")]
    test_file_mp4: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    test_file_dcf_cbc: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    test_file_dcf_ctr: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    test_file_pdcf_cbc: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    test_file_pdcf_ctr: Option<PathBuf>,

    /// Iteration cap per workload
    #[arg(long, value_name = "N")]
    iterations: Option<u64>,

    /// Time budget per workload, in seconds [default: 30]
    #[arg(long, value_name = "SECONDS")]
    max_time: Option<f64>,

    /// Passes over every track per sample-workload iteration [default: 16]
    #[arg(long, value_name = "N")]
    repeats: Option<u32>,

    /// Write the five default test files into DIR before running
    #[arg(long, value_name = "DIR")]
    write_test_files: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Result<BenchConfig, mp4bench::BenchError> {
        let mut builder = BenchConfigBuilder::new();
        if let Some(iterations) = self.iterations {
            builder = builder.with_max_iterations(iterations);
        }
        if let Some(seconds) = self.max_time {
            builder = builder.with_max_time(seconds);
        }
        if let Some(repeats) = self.repeats {
            builder = builder.with_sample_repeats(repeats);
        }
        builder.build()
    }

    /// Defaults (or the freshly written files), then explicit overrides.
    fn test_files(&self, written: Option<TestFiles>) -> TestFiles {
        let mut files = written.unwrap_or_default();
        let overrides = [
            (&self.test_file_mp4, &mut files.mp4),
            (&self.test_file_dcf_cbc, &mut files.dcf_cbc),
            (&self.test_file_dcf_ctr, &mut files.dcf_ctr),
            (&self.test_file_pdcf_cbc, &mut files.pdcf_cbc),
            (&self.test_file_pdcf_ctr, &mut files.pdcf_ctr),
        ];
        for (flag, path) in overrides {
            if let Some(flag) = flag {
                *path = flag.clone();
            }
        }
        files
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn print_usage() -> ExitCode {
    // stdout, like the rest of the report
    let _ = Cli::command().print_help();
    ExitCode::from(1)
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    // reject bad names and values before anything runs
    let selection = WorkloadSelection::parse(&cli.tests)?;
    let config = cli.config()?;

    let written = match &cli.write_test_files {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create {}", dir.display()))?;
            let files = write_test_files(dir, &config.content_key, &mut IvSource::default())
                .with_context(|| format!("cannot write test files into {}", dir.display()))?;
            info!(dir = %dir.display(), "test files written");
            Some(files)
        }
        None => None,
    };

    if selection.is_empty() {
        return Ok(if written.is_some() {
            ExitCode::SUCCESS
        } else {
            print_usage()
        });
    }

    let files = cli.test_files(written);
    let mut runner = Runner::new(&config);
    run_workloads(&mut runner, &selection, &files, &config)?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    if std::env::args_os().len() < 2 {
        return print_usage();
    }
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::UnknownArgument => {
            eprintln!("ERROR: {e}");
            return ExitCode::from(1);
        }
        Err(e) => e.exit(),
    };
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::from(1)
        }
    }
}
