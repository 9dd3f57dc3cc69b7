// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The JSON-lines event format read by `ci-reporter`.
//!
//! Each non-blank input line is one JSON object, tagged by its `event` field:
//!
//! ```json
//! {"event":"suite-started","name":"MockTestSuite"}
//! {"event":"case-finished","name":"test_fail","status":"failure","assertions":1,"message":"boom","backtrace":["a.rs:1"]}
//! {"event":"suite-finished"}
//! ```

use ci_junit::{TestCaseResult, TestCaseStatus};
use serde::Deserialize;

/// A single event in the input stream.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub(crate) enum ReportEvent {
    /// A suite started running.
    SuiteStarted {
        /// The name of the suite.
        name: String,
    },

    /// A test case in the current suite finished.
    CaseFinished(CaseFinished),

    /// The current suite finished.
    SuiteFinished,
}

/// The payload of a [`ReportEvent::CaseFinished`] event.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CaseFinished {
    name: String,
    status: EventStatus,
    #[serde(default)]
    assertions: usize,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    backtrace: Vec<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum EventStatus {
    Pass,
    Skip,
    Failure,
    Error,
}

impl CaseFinished {
    /// Converts this event into a case result.
    ///
    /// A missing message on a non-passing case becomes an empty message. Messages and backtraces
    /// on passing cases are dropped, as are backtraces on skipped cases.
    pub(crate) fn into_result(self) -> TestCaseResult {
        let Self {
            name,
            status,
            assertions,
            message,
            backtrace,
        } = self;
        let message = message.unwrap_or_default();

        let status = match status {
            EventStatus::Pass => TestCaseStatus::Pass,
            EventStatus::Skip => TestCaseStatus::skip(message),
            EventStatus::Failure => TestCaseStatus::failure(message, backtrace),
            EventStatus::Error => TestCaseStatus::error(message, backtrace),
        };

        let mut result = TestCaseResult::new(name, status);
        result.set_assertions(assertions);
        result
    }
}
