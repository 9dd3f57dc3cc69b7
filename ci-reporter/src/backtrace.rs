// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Removes test framework frames from backtraces before they are embedded in reports.
//!
//! Frames are matched by path fragment: a frame is dropped if its text contains any of the
//! configured fragments. Frames from the reporting crates themselves are always dropped, whether
//! they come from a workspace checkout (`.../ci-reporter/src/...`) or from the registry
//! (`.../ci-reporter-0.1.0/src/...`). Backslashes are treated as forward slashes while matching,
//! so the same fragments work for Windows paths.

use crate::errors::BacktraceFilterBuildError;
use aho_corasick::AhoCorasick;
use regex::Regex;
use std::{borrow::Cow, sync::LazyLock};

/// Path fragments identifying frames inside the Rust test harness and panic machinery.
pub const DEFAULT_FRAMEWORK_FRAGMENTS: &[&str] = &[
    "/library/test/src/",
    "/library/core/src/panicking.rs",
    "/library/std/src/panicking.rs",
    "/library/std/src/panic.rs",
    "/library/std/src/rt.rs",
];

// The source directory of ci-reporter or ci-junit, optionally with a registry version suffix.
static REPORTER_CRATE_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/ci-(?:reporter|junit)(?:-\d[^/]*)?/src/")
        .expect("reporter crate source regex is valid")
});

/// Filters framework frames out of backtraces.
#[derive(Clone, Debug)]
pub struct BacktraceFilter {
    fragments: Vec<String>,
    // None if there are no fragments to match.
    matcher: Option<AhoCorasick>,
    drop_reporter_frames: bool,
}

impl BacktraceFilter {
    /// Creates a new filter dropping frames that contain any of `fragments`, as well as frames
    /// from the reporting crates.
    ///
    /// Empty fragments are ignored.
    pub fn new(
        fragments: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, BacktraceFilterBuildError> {
        let fragments: Vec<String> = fragments
            .into_iter()
            .map(Into::into)
            .filter(|fragment: &String| !fragment.is_empty())
            .collect();
        let matcher = if fragments.is_empty() {
            None
        } else {
            let matcher = AhoCorasick::new(&fragments)
                .map_err(|error| BacktraceFilterBuildError::new(fragments.clone(), error))?;
            Some(matcher)
        };
        Ok(Self {
            fragments,
            matcher,
            drop_reporter_frames: true,
        })
    }

    /// Returns a filter that keeps every frame.
    pub fn keep_all() -> Self {
        Self {
            fragments: Vec::new(),
            matcher: None,
            drop_reporter_frames: false,
        }
    }

    /// Returns the fragments this filter matches against.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Returns true if `frame` belongs to the framework and should be removed.
    pub fn is_framework_frame(&self, frame: &str) -> bool {
        if self.matcher.is_none() && !self.drop_reporter_frames {
            return false;
        }
        let normalized = if frame.contains('\\') {
            Cow::Owned(frame.replace('\\', "/"))
        } else {
            Cow::Borrowed(frame)
        };
        if self.drop_reporter_frames && REPORTER_CRATE_SOURCE.is_match(&normalized) {
            return true;
        }
        self.matcher
            .as_ref()
            .is_some_and(|matcher| matcher.is_match(&*normalized))
    }

    /// Returns the frames that don't belong to the framework, in their original order.
    ///
    /// If every frame is removed, the result is empty.
    pub fn filter(&self, frames: &[String]) -> Vec<String> {
        frames
            .iter()
            .filter(|frame| !self.is_framework_frame(frame))
            .cloned()
            .collect()
    }

    /// Like [`filter`](Self::filter), but in place.
    pub fn filter_in_place(&self, frames: &mut Vec<String>) {
        frames.retain(|frame| !self.is_framework_frame(frame));
    }
}

impl Default for BacktraceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_FRAMEWORK_FRAGMENTS.iter().copied())
            .expect("default framework fragments are valid")
    }
}
