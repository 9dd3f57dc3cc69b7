// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by ci-reporter.

use camino::Utf8PathBuf;
use config::ConfigError;
use std::{error::Error, fmt};
use thiserror::Error;

/// A suite notification arrived out of the start → cases → end order.
///
/// This indicates a bug in the code driving the
/// [`SuiteReportBuilder`](crate::builder::SuiteReportBuilder).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidSequenceError {
    /// A case result was reported while no suite was in progress.
    #[error("result for test case `{case_name}` received while no suite was in progress")]
    CaseWithoutSuite {
        /// The name of the case.
        case_name: String,
    },

    /// A suite end was reported while no suite was in progress.
    #[error("suite end received while no suite was in progress")]
    EndWithoutSuite,
}

/// An error that occurred while writing a report file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// The report directory could not be created.
    #[error("error creating report directory `{dir}`")]
    CreateDir {
        /// The report directory.
        dir: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Previously generated reports could not be removed.
    #[error("error removing previous report `{path}`")]
    Clean {
        /// The path being removed, or the directory being listed.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The report could not be serialized.
    #[error("error serializing JUnit report for `{path}`")]
    Serialize {
        /// The path the report was going to be written to.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: ci_junit::SerializeError,
    },

    /// The report file could not be written.
    ///
    /// The report is written to a temporary file and then renamed into place, so no partial file
    /// is left at `path`.
    #[error("error writing report to `{path}`")]
    Write {
        /// The report path.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },
}

impl WriteReportError {
    /// Returns the path involved in this error.
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::CreateDir { dir, .. } => dir,
            Self::Clean { path, .. } | Self::Serialize { path, .. } | Self::Write { path, .. } => {
                path
            }
        }
    }
}

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse ci-reporter config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    err: ConfigError,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, err: ConfigError) -> Self {
        Self {
            config_file: config_file.into(),
            err,
        }
    }

    /// Returns the config file that failed to parse.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }
}

/// An error that occurred while building a [`BacktraceFilter`](crate::backtrace::BacktraceFilter).
#[derive(Debug, Error)]
#[error("failed to build backtrace filter from fragments: {}", .fragments.join(", "))]
pub struct BacktraceFilterBuildError {
    fragments: Vec<String>,
    #[source]
    err: aho_corasick::BuildError,
}

impl BacktraceFilterBuildError {
    pub(crate) fn new(fragments: Vec<String>, err: aho_corasick::BuildError) -> Self {
        Self { fragments, err }
    }
}

/// Displays an error along with the chain of errors that caused it.
///
/// ```text
/// error writing report to `test/reports/TEST-foo.xml`
///   caused by:
///   - Permission denied (os error 13)
/// ```
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let mut source = self.error.source();
        if source.is_some() {
            write!(f, "\n  caused by:")?;
        }
        while let Some(error) = source {
            write!(f, "\n  - {error}")?;
            source = error.source();
        }

        Ok(())
    }
}
