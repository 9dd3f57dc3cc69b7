// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data model and serializer for per-suite JUnit XML reports.
//!
//! A [`TestSuiteReport`] collects the [`TestCaseResult`]s of a single suite in the order they
//! completed. Aggregate counters (tests, failures, errors, skips and assertions) are derived from
//! the cases when the report is serialized, so they can never drift out of sync with the cases
//! themselves.
//!
//! The XML produced by [`TestSuiteReport::serialize`] has a `<testsuite>` root element, which is
//! the shape most CI dashboards expect when they pick up `TEST-*.xml` files.

#![warn(missing_docs)]

mod errors;
pub mod escape;
mod report;
mod serialize;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use errors::*;
pub use report::*;
