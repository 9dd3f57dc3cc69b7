// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core logic for turning test results into JUnit XML reports.
//!
//! A test engine drives a [`SuiteReportBuilder`](builder::SuiteReportBuilder) with suite-start,
//! case-result and suite-end notifications. Each finished
//! [`TestSuiteReport`](ci_junit::TestSuiteReport) is handed to a
//! [`ReportWriter`](writer::ReportWriter), which persists it as `TEST-<sanitized name>.xml` in the
//! configured report directory.

#![warn(missing_docs)]

pub mod backtrace;
pub mod builder;
pub mod config;
pub mod errors;
pub mod sanitize;
pub mod write_str;
pub mod writer;
