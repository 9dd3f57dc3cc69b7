// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: results flow through the builder into report files on disk.

mod mock_suite;
mod suite_names;

use camino::Utf8Path;
use camino_tempfile::Utf8TempDir;
use ci_reporter::{config::ReporterConfig, write_str::WriteStr, writer::ReportWriter};

fn enabled_config(dir: &Utf8TempDir) -> ReporterConfig {
    let mut config = ReporterConfig::default_config();
    config
        .set_report_dir(dir.path().join("test/reports"))
        .set_enabled(true);
    config
}

fn writer_for<'a>(dir: &Utf8TempDir, status: impl WriteStr + 'a) -> ReportWriter<'a> {
    ReportWriter::new(enabled_config(dir), status)
}

fn read_report(path: &Utf8Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|error| panic!("reading {path}: {error}"))
}
