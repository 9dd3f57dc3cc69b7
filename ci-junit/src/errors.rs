// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::io;
use thiserror::Error;

/// An error that occurs while serializing a [`TestSuiteReport`](crate::TestSuiteReport).
///
/// Returned by [`TestSuiteReport::serialize`](crate::TestSuiteReport::serialize) and
/// [`TestSuiteReport::to_bytes`](crate::TestSuiteReport::to_bytes).
///
/// Report contents never cause this error: it is only produced if the underlying writer fails.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerializeError {
    /// The writer returned an I/O error.
    #[error("error writing JUnit report")]
    Io(#[from] io::Error),

    /// The XML writer failed.
    #[error("error producing JUnit XML")]
    Xml(#[from] quick_xml::Error),
}
