// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::Utf8PathBuf;
use ci_reporter::errors::{BacktraceFilterBuildError, ConfigParseError, InvalidSequenceError};
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

/// Documented exit codes for `ci-reporter` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum ReporterExitCode {}

impl ReporterExitCode {
    /// No errors occurred and all reports were written.
    pub const OK: i32 = 0;

    /// A user issue happened while setting up the run, such as an invalid config file.
    pub const SETUP_ERROR: i32 = 96;

    /// The input stream could not be read, contained an invalid event, or delivered events out of
    /// order.
    pub const INVALID_INPUT: i32 = 97;

    /// One or more reports could not be written.
    pub const REPORT_WRITE_FAILED: i32 = 98;
}

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An expected failure of a `ci-reporter` run.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("backtrace filter build error")]
    BacktraceFilterBuildError {
        #[from]
        err: BacktraceFilterBuildError,
    },
    #[error("failed to open input file")]
    InputOpenError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to read input")]
    InputReadError {
        #[source]
        err: std::io::Error,
    },
    #[error("failed to parse event")]
    EventParseError {
        line_number: usize,
        #[source]
        err: serde_json::Error,
    },
    #[error("event out of order")]
    InvalidSequence {
        line_number: usize,
        #[source]
        err: InvalidSequenceError,
    },
    #[error("failed to write reports")]
    ReportWriteFailed { failed: usize },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigParseError { .. } | Self::BacktraceFilterBuildError { .. } => {
                ReporterExitCode::SETUP_ERROR
            }
            Self::InputOpenError { .. }
            | Self::InputReadError { .. }
            | Self::EventParseError { .. }
            | Self::InvalidSequence { .. } => ReporterExitCode::INVALID_INPUT,
            Self::ReportWriteFailed { .. } => ReporterExitCode::REPORT_WRITE_FAILED,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error: Option<&dyn Error> = match self {
            Self::ConfigParseError { err } => {
                error!(
                    "failed to parse config at `{}`",
                    err.config_file().style(styles.bold)
                );
                err.source()
            }
            Self::BacktraceFilterBuildError { err } => {
                error!("{err}");
                err.source()
            }
            Self::InputOpenError { path, err } => {
                error!("failed to open input file `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::InputReadError { err } => {
                error!("failed to read input");
                Some(err as &dyn Error)
            }
            Self::EventParseError { line_number, err } => {
                error!("failed to parse event on input line {line_number}");
                Some(err as &dyn Error)
            }
            Self::InvalidSequence { line_number, err } => {
                error!("event on input line {line_number} arrived out of order");
                Some(err as &dyn Error)
            }
            Self::ReportWriteFailed { failed } => {
                let plural = if *failed == 1 { "report" } else { "reports" };
                error!("failed to write {failed} {plural} (see errors above)");
                None
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
