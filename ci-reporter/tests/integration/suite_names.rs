// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{read_report, writer_for};
use camino::Utf8PathBuf;
use camino_tempfile::tempdir;
use ci_junit::{TestCaseResult, TestCaseStatus, test_helpers::parse_suite};
use ci_reporter::{builder::SuiteReportBuilder, sanitize::MAX_FILE_NAME_LEN, write_str::NullWriter};
use pretty_assertions::assert_eq;
use test_case::test_case;

/// Runs a single-case suite named `suite_name` and returns the written path and report contents.
fn run_suite(suite_name: &str, case_name: &str) -> (Utf8PathBuf, String) {
    let dir = tempdir().expect("tempdir created");
    let mut writer = writer_for(&dir, NullWriter);
    let mut builder = SuiteReportBuilder::default();

    builder.on_suite_start(suite_name);
    builder
        .on_case_result(TestCaseResult::new(case_name, TestCaseStatus::Pass))
        .expect("suite in progress");
    let report = builder.on_suite_end().expect("suite in progress");

    let path = writer
        .write(&report)
        .expect("write succeeds")
        .expect("reporting enabled");
    let xml = read_report(&path);
    let relative = path
        .strip_prefix(dir.path())
        .expect("report is inside the tempdir")
        .to_owned();
    (relative, xml)
}

#[test_case(
    "spec/with::'punctuation'",
    "test_0001_will pass"
    ; "single quotes"
)]
#[test_case(
    r#"spec/with::"punctuation""#,
    r#"test_0001_will "pass""#
    ; "double quotes"
)]
fn punctuation_in_suite_name(suite_name: &str, case_name: &str) {
    let (path, xml) = run_suite(suite_name, case_name);
    assert_eq!(path, "test/reports/TEST-spec_with___punctuation_.xml");

    let suite = parse_suite(&xml);
    assert_eq!(suite.attributes["name"], suite_name);
    assert_eq!(suite.cases.len(), 1);
    assert_eq!(suite.cases[0].attributes["name"], case_name);
}

#[test_case("spec/with::long_file_name".repeat(100) ; "repeated name")]
#[test_case("x".repeat(10_000) ; "ten thousand characters")]
fn long_suite_name(suite_name: String) {
    let (path, xml) = run_suite(&suite_name, "test_long");

    let file_name = path.file_name().expect("path has a file name");
    assert_eq!(file_name.len(), MAX_FILE_NAME_LEN);
    assert!(file_name.starts_with("TEST-"));
    assert!(file_name.ends_with(".xml"));

    // The attribute keeps the full, untruncated name.
    assert_eq!(parse_suite(&xml).attributes["name"], suite_name);
}
