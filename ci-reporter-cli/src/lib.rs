// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line frontend for ci-reporter.
//!
//! Reads JSON-lines test events (see the `events` module for the format) from a file or standard
//! input, and writes one JUnit XML report per finished suite.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod events;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::{Color, OutputContext, StderrStyles};
