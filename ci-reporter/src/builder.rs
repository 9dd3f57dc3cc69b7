// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Accumulates case results into per-suite reports.

use crate::{backtrace::BacktraceFilter, errors::InvalidSequenceError};
use chrono::{DateTime, FixedOffset, Local};
use ci_junit::{TestCaseResult, TestSuiteReport};
use tracing::{debug, warn};

/// Builds a [`TestSuiteReport`] from a stream of suite notifications.
///
/// The expected sequence for each suite is one [`on_suite_start`](Self::on_suite_start), any number
/// of [`on_case_result`](Self::on_case_result) calls in completion order, and one
/// [`on_suite_end`](Self::on_suite_end). The builder can then be reused for the next suite.
///
/// A builder tracks a single suite at a time. If suites run in parallel, use one builder per
/// suite.
#[derive(Clone, Debug, Default)]
pub struct SuiteReportBuilder {
    backtrace_filter: BacktraceFilter,
    current: Option<TestSuiteReport>,
}

impl SuiteReportBuilder {
    /// Creates a new builder which runs failure and error backtraces through `backtrace_filter`.
    pub fn new(backtrace_filter: BacktraceFilter) -> Self {
        Self {
            backtrace_filter,
            current: None,
        }
    }

    /// Returns true if a suite is in progress.
    pub fn is_in_progress(&self) -> bool {
        self.current.is_some()
    }

    /// Starts a new suite, capturing the current local time as its timestamp.
    pub fn on_suite_start(&mut self, name: impl Into<String>) {
        self.on_suite_start_at(name, Local::now().fixed_offset());
    }

    /// Starts a new suite with the given timestamp.
    ///
    /// If a suite is already in progress, its cases are discarded.
    pub fn on_suite_start_at(
        &mut self,
        name: impl Into<String>,
        timestamp: impl Into<DateTime<FixedOffset>>,
    ) {
        let report = TestSuiteReport::new(name, timestamp);
        if let Some(previous) = self.current.replace(report) {
            warn!(
                "suite `{}` started before suite `{}` ended, discarding {} result(s)",
                self.current.as_ref().map_or("", |report| report.name.as_str()),
                previous.name,
                previous.cases.len(),
            );
        }
    }

    /// Records the result of a case in the current suite.
    ///
    /// Framework frames are removed from the case's backtrace.
    pub fn on_case_result(
        &mut self,
        mut result: TestCaseResult,
    ) -> Result<(), InvalidSequenceError> {
        let Some(report) = &mut self.current else {
            return Err(InvalidSequenceError::CaseWithoutSuite {
                case_name: result.name,
            });
        };

        if let Some(backtrace) = result.status.backtrace_mut() {
            self.backtrace_filter.filter_in_place(backtrace);
        }
        report.add_case(result);
        Ok(())
    }

    /// Finishes the current suite and returns its report.
    pub fn on_suite_end(&mut self) -> Result<TestSuiteReport, InvalidSequenceError> {
        let report = self
            .current
            .take()
            .ok_or(InvalidSequenceError::EndWithoutSuite)?;
        let counts = report.counts();
        debug!(
            suite = %report.name,
            tests = counts.tests,
            failures = counts.failures,
            errors = counts.errors,
            skipped = counts.skipped,
            "suite finished",
        );
        Ok(report)
    }
}
