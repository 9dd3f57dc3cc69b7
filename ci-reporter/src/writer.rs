// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persists suite reports to the report directory.

use crate::{
    config::ReporterConfig, errors::WriteReportError, sanitize::report_file_name,
    write_str::WriteStr,
};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::{Utf8Path, Utf8PathBuf};
use ci_junit::TestSuiteReport;
use globset::{Glob, GlobMatcher};
use std::{
    fs,
    io::{self, BufWriter, Write},
};
use tracing::{debug, warn};

static REPORT_FILE_GLOB: &str = "TEST-*.xml";

/// Writes one `TEST-<sanitized name>.xml` file per suite.
///
/// On the first write of a run, the writer prints a status line to its status output and, if
/// configured, removes report files left over from previous runs. A status output that can't be
/// written to is logged and otherwise ignored. If removing old reports fails, the write fails and
/// the next write tries again.
///
/// Files are written atomically: each report is written to a temporary file in the report
/// directory and then renamed into place, overwriting any existing report with the same name. Two
/// suites whose names sanitize to the same file name overwrite each other, and the last write wins.
pub struct ReportWriter<'a> {
    config: ReporterConfig,
    status_output: Box<dyn WriteStr + 'a>,
    report_file_matcher: GlobMatcher,
    banner_shown: bool,
    cleaned: bool,
}

impl<'a> ReportWriter<'a> {
    /// Creates a new writer which prints status messages to `status_output`.
    pub fn new(config: ReporterConfig, status_output: impl WriteStr + 'a) -> Self {
        let report_file_matcher = Glob::new(REPORT_FILE_GLOB)
            .expect("report file glob is valid")
            .compile_matcher();
        Self {
            config,
            status_output: Box::new(status_output),
            report_file_matcher,
            banner_shown: false,
            cleaned: false,
        }
    }

    /// Returns the config this writer was created with.
    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Writes a report, returning the path of the file written.
    ///
    /// Returns `Ok(None)` without touching the filesystem if reporting is disabled.
    pub fn write(
        &mut self,
        report: &TestSuiteReport,
    ) -> Result<Option<Utf8PathBuf>, WriteReportError> {
        if !self.config.enabled() {
            return Ok(None);
        }

        if !self.banner_shown {
            self.show_banner();
        }
        if !self.cleaned {
            if self.config.clean_before_run() {
                self.clean_report_dir()?;
            }
            self.cleaned = true;
        }

        let report_dir = self.config.report_dir();
        fs::create_dir_all(report_dir).map_err(|error| WriteReportError::CreateDir {
            dir: report_dir.to_owned(),
            error,
        })?;

        let path = report_dir.join(report_file_name(&report.name));
        // Serialize fully before touching the target so that a failure leaves no file behind.
        let bytes = report
            .to_bytes()
            .map_err(|error| WriteReportError::Serialize {
                path: path.clone(),
                error,
            })?;

        AtomicFile::new(&path, OverwriteBehavior::AllowOverwrite)
            .write(|file| {
                let mut writer = BufWriter::new(file);
                writer.write_all(&bytes)?;
                writer.flush()
            })
            .map_err(|err| {
                let error = match err {
                    atomicwrites::Error::Internal(error) | atomicwrites::Error::User(error) => {
                        error
                    }
                };
                WriteReportError::Write {
                    path: path.clone(),
                    error,
                }
            })?;

        debug!(suite = %report.name, %path, "wrote JUnit report");
        Ok(Some(path))
    }

    fn show_banner(&mut self) {
        self.banner_shown = true;

        let message = format!(
            "\n[{}] Generating test report in JUnit XML format...\n",
            self.config.tool_name()
        );
        if let Err(error) = self
            .status_output
            .write_str(&message)
            .and_then(|()| self.status_output.write_str_flush())
        {
            warn!("failed to write status message: {error}");
        }
    }

    fn clean_report_dir(&self) -> Result<(), WriteReportError> {
        let report_dir = self.config.report_dir();
        let entries = match report_dir.read_dir_utf8() {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(error) => {
                return Err(WriteReportError::Clean {
                    path: report_dir.to_owned(),
                    error,
                });
            }
        };

        for entry in entries {
            let entry = entry.map_err(|error| WriteReportError::Clean {
                path: report_dir.to_owned(),
                error,
            })?;
            if !self.is_report_file(entry.path()) {
                continue;
            }
            let is_file = entry
                .file_type()
                .map_err(|error| WriteReportError::Clean {
                    path: entry.path().to_owned(),
                    error,
                })?
                .is_file();
            if !is_file {
                continue;
            }

            fs::remove_file(entry.path()).map_err(|error| WriteReportError::Clean {
                path: entry.path().to_owned(),
                error,
            })?;
            debug!(path = %entry.path(), "removed previous report");
        }

        Ok(())
    }

    fn is_report_file(&self, path: &Utf8Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.report_file_matcher.is_match(name))
    }
}

impl ReportWriter<'static> {
    /// Creates a new writer which prints status messages to standard output.
    pub fn with_stdout(config: ReporterConfig) -> Self {
        Self::new(config, BufWriter::new(io::stdout()))
    }
}
