// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{SerializeError, serialize::serialize_report};
use chrono::{DateTime, FixedOffset};
use std::io;

/// The report for a single test suite: one `<testsuite>` document, written to one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestSuiteReport {
    /// The name of this suite, as displayed by the test engine.
    ///
    /// This may contain any character, including path separators and quotes.
    pub name: String,

    /// The time at which the suite began reporting.
    pub timestamp: DateTime<FixedOffset>,

    /// The cases in this suite, in the order they completed.
    pub cases: Vec<TestCaseResult>,
}

impl TestSuiteReport {
    /// Creates a new, empty `TestSuiteReport`.
    pub fn new(name: impl Into<String>, timestamp: impl Into<DateTime<FixedOffset>>) -> Self {
        Self {
            name: name.into(),
            timestamp: timestamp.into(),
            cases: Vec::new(),
        }
    }

    /// Appends a case to this suite.
    ///
    /// Duplicate names are kept as separate cases.
    pub fn add_case(&mut self, case: TestCaseResult) -> &mut Self {
        self.cases.push(case);
        self
    }

    /// Appends several cases to this suite.
    pub fn add_cases(&mut self, cases: impl IntoIterator<Item = TestCaseResult>) -> &mut Self {
        self.cases.extend(cases);
        self
    }

    /// Computes the aggregate counters for this suite.
    pub fn counts(&self) -> SuiteCounts {
        let mut counts = SuiteCounts::default();
        for case in &self.cases {
            counts.tests += 1;
            counts.assertions += case.assertions;
            match case.status.kind() {
                StatusKind::Pass => counts.passed += 1,
                StatusKind::Skip => counts.skipped += 1,
                StatusKind::Failure => counts.failures += 1,
                StatusKind::Error => counts.errors += 1,
            }
        }
        counts
    }

    /// Serializes this report as XML to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        serialize_report(self, writer)
    }

    /// Serializes this report to a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializeError> {
        let mut buf = Vec::new();
        self.serialize(&mut buf)?;
        Ok(buf)
    }

    /// Serializes this report to a string.
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let buf = self.to_bytes()?;
        String::from_utf8(buf)
            .map_err(|error| SerializeError::Io(io::Error::new(io::ErrorKind::InvalidData, error)))
    }
}

/// Aggregate counters for a [`TestSuiteReport`].
///
/// `tests` is always equal to `passed + skipped + failures + errors`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SuiteCounts {
    /// The total number of cases.
    pub tests: usize,

    /// The number of cases that passed.
    pub passed: usize,

    /// The number of cases that were skipped.
    pub skipped: usize,

    /// The number of cases that failed an assertion.
    pub failures: usize,

    /// The number of cases that raised an unexpected error.
    pub errors: usize,

    /// The sum of assertion counts over all cases.
    pub assertions: usize,
}

/// The outcome of a single test case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCaseResult {
    /// The name of the test case.
    pub name: String,

    /// The number of assertions executed before the case completed or was interrupted.
    pub assertions: usize,

    /// The status of this case, along with any diagnostics.
    pub status: TestCaseStatus,
}

impl TestCaseResult {
    /// Creates a new case with the given status and no assertions.
    pub fn new(name: impl Into<String>, status: TestCaseStatus) -> Self {
        Self {
            name: name.into(),
            assertions: 0,
            status,
        }
    }

    /// Sets the number of assertions executed by this case.
    pub fn set_assertions(&mut self, assertions: usize) -> &mut Self {
        self.assertions = assertions;
        self
    }
}

/// The status of a [`TestCaseResult`].
///
/// Every status other than [`Pass`](Self::Pass) carries a message. Failures and errors also carry
/// the backtrace of the point where the test stopped, one frame per entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestCaseStatus {
    /// The test passed.
    Pass,

    /// The test was explicitly skipped.
    Skip {
        /// The reason given for skipping.
        message: String,
    },

    /// An assertion in the test failed.
    ///
    /// A "failure" is an *expected* kind of issue: the test ran and detected a problem.
    Failure {
        /// The assertion message.
        message: String,

        /// Backtrace frames, e.g. `path:line:in method`.
        backtrace: Vec<String>,
    },

    /// The test raised an unexpected error.
    Error {
        /// The error message.
        message: String,

        /// Backtrace frames, e.g. `path:line:in method`.
        backtrace: Vec<String>,
    },
}

impl TestCaseStatus {
    /// Creates a new `Skip` status.
    pub fn skip(message: impl Into<String>) -> Self {
        Self::Skip {
            message: message.into(),
        }
    }

    /// Creates a new `Failure` status.
    pub fn failure(
        message: impl Into<String>,
        backtrace: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::Failure {
            message: message.into(),
            backtrace: backtrace.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a new `Error` status.
    pub fn error(
        message: impl Into<String>,
        backtrace: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::Error {
            message: message.into(),
            backtrace: backtrace.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the kind of this status, without its payload.
    pub fn kind(&self) -> StatusKind {
        match self {
            Self::Pass => StatusKind::Pass,
            Self::Skip { .. } => StatusKind::Skip,
            Self::Failure { .. } => StatusKind::Failure,
            Self::Error { .. } => StatusKind::Error,
        }
    }

    /// Returns the message, or `None` for a passing test.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Pass => None,
            Self::Skip { message }
            | Self::Failure { message, .. }
            | Self::Error { message, .. } => Some(message),
        }
    }

    /// Returns the backtrace frames. Empty for passing and skipped tests.
    pub fn backtrace(&self) -> &[String] {
        match self {
            Self::Pass | Self::Skip { .. } => &[],
            Self::Failure { backtrace, .. } | Self::Error { backtrace, .. } => backtrace,
        }
    }

    /// Returns a mutable reference to the backtrace, if this status carries one.
    pub fn backtrace_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            Self::Pass | Self::Skip { .. } => None,
            Self::Failure { backtrace, .. } | Self::Error { backtrace, .. } => Some(backtrace),
        }
    }
}

/// The kind of a [`TestCaseStatus`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// The test passed.
    Pass,

    /// The test was skipped.
    Skip,

    /// The test failed.
    Failure,

    /// The test errored.
    Error,
}
