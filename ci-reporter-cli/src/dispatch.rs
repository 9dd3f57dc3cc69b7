// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{ExpectedError, ReporterExitCode, Result},
    events::ReportEvent,
    output::{OutputContext, OutputOpts, clap_styles},
};
use camino::{Utf8Path, Utf8PathBuf};
use ci_reporter::{
    builder::SuiteReportBuilder,
    config::ReporterConfig,
    errors::DisplayErrorChain,
    writer::ReportWriter,
};
use clap::{Args, Parser};
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
};
use tracing::{debug, error, info, warn};

/// Writes JUnit XML reports from a stream of test events.
///
/// Events are read as JSON lines, one object per line, and one `TEST-<suite>.xml` report is
/// written per finished suite.
#[derive(Debug, Parser)]
#[command(version, name = "ci-reporter", styles = clap_styles::style())]
pub struct CiReporterApp {
    /// Read events from this file [default: standard input]
    #[arg(long, value_name = "PATH")]
    input: Option<Utf8PathBuf>,

    #[command(flatten)]
    report_opts: ReportOpts,

    #[command(flatten)]
    output: OutputOpts,
}

impl CiReporterApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code.
    pub fn exec(self, output: OutputContext) -> Result<i32> {
        let config = self
            .report_opts
            .make_config(Utf8Path::new("."), is_ci::cached())?;
        let builder = SuiteReportBuilder::new(config.backtrace_filter()?);
        let writer = ReportWriter::with_stdout(config);

        let summary = match &self.input {
            Some(path) => {
                let file = File::open(path).map_err(|err| ExpectedError::InputOpenError {
                    path: path.clone(),
                    err,
                })?;
                run_events(BufReader::new(file), builder, writer, output)?
            }
            None => run_events(io::stdin().lock(), builder, writer, output)?,
        };

        if summary.failed > 0 {
            return Err(ExpectedError::ReportWriteFailed {
                failed: summary.failed,
            });
        }
        Ok(ReporterExitCode::OK)
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Report options")]
struct ReportOpts {
    /// Config file [default: .config/ci-reporter.toml]
    #[arg(long, value_name = "PATH")]
    config: Option<Utf8PathBuf>,

    /// Directory to write reports to [default: test/reports]
    #[arg(long, value_name = "DIR", env = "CI_REPORTER_DIR")]
    report_dir: Option<Utf8PathBuf>,

    /// Keep reports from previous runs in the report directory
    #[arg(long)]
    no_clean: bool,

    /// Write reports even if no CI environment is detected
    #[arg(long)]
    report: bool,
}

impl ReportOpts {
    /// Builds the reporter config, applying command-line overrides on top of the config file.
    ///
    /// Reporting is enabled if `--report` is passed, the config file enables it, or `in_ci` is
    /// true.
    fn make_config(&self, base_dir: &Utf8Path, in_ci: bool) -> Result<ReporterConfig> {
        let mut config = ReporterConfig::from_sources(base_dir, self.config.as_deref())?;

        if let Some(report_dir) = &self.report_dir {
            config.set_report_dir(report_dir.clone());
        }
        if self.no_clean {
            config.set_clean_before_run(false);
        }
        let enabled = self.report || config.enabled() || in_ci;
        config.set_enabled(enabled);

        if !enabled {
            debug!("no CI environment detected and --report not passed, not writing reports");
        }
        Ok(config)
    }
}

/// Counts of reports processed by [`run_events`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    /// Reports written to disk.
    pub(crate) written: usize,
    /// Reports that failed to write.
    pub(crate) failed: usize,
}

/// Reads events from `input` until EOF, writing a report for each finished suite.
///
/// A report that fails to write is logged and counted, and processing continues with the next
/// suite. Malformed or out-of-order events stop processing.
pub(crate) fn run_events(
    input: impl BufRead,
    mut builder: SuiteReportBuilder,
    mut writer: ReportWriter<'_>,
    output: OutputContext,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|err| ExpectedError::InputReadError { err })?;
        if line.trim().is_empty() {
            continue;
        }

        let event: ReportEvent = serde_json::from_str(&line)
            .map_err(|err| ExpectedError::EventParseError { line_number, err })?;
        let invalid_sequence = |err| ExpectedError::InvalidSequence { line_number, err };

        match event {
            ReportEvent::SuiteStarted { name } => builder.on_suite_start(name),
            ReportEvent::CaseFinished(case) => builder
                .on_case_result(case.into_result())
                .map_err(invalid_sequence)?,
            ReportEvent::SuiteFinished => {
                let report = builder.on_suite_end().map_err(invalid_sequence)?;
                match writer.write(&report) {
                    Ok(Some(path)) => {
                        summary.written += 1;
                        if output.verbose {
                            info!("wrote report for `{}` to {path}", report.name);
                        }
                    }
                    Ok(None) => {}
                    Err(err) => {
                        summary.failed += 1;
                        error!(
                            "failed to write report for `{}`: {}",
                            report.name,
                            DisplayErrorChain::new(&err)
                        );
                    }
                }
            }
        }
    }

    if builder.is_in_progress() {
        warn!("input ended while a suite was in progress, its results were not reported");
    }
    if summary.written > 0 {
        let plural = if summary.written == 1 { "" } else { "s" };
        info!(
            "generated {} JUnit report{plural} in {}",
            summary.written,
            writer.config().report_dir()
        );
    }

    Ok(summary)
}
