// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{read_report, writer_for};
use camino_tempfile::tempdir;
use chrono::{DateTime, Local};
use ci_junit::{
    TestCaseResult, TestCaseStatus,
    test_helpers::{ParsedCase, ParsedSuite, parse_suite},
};
use ci_reporter::builder::SuiteReportBuilder;
use pretty_assertions::assert_eq;
use regex::Regex;

static ESCAPING_MESSAGE: &str =
    r#"failed: doesn't like single or "double" quotes or symbols such as <"#;

fn framework_frames(user_frame: &str) -> Vec<String> {
    vec![
        "/rustc/9b00956e/library/core/src/panicking.rs:75:14 in core::panicking::panic_fmt"
            .to_owned(),
        user_frame.to_owned(),
        "/home/ci/.cargo/registry/src/index.crates.io-1949cf8c6b5b557f/ci-reporter-0.1.0/src/builder.rs:80:9 in ci_reporter::builder::SuiteReportBuilder::on_case_result"
            .to_owned(),
        "/rustc/9b00956e/library/test/src/lib.rs:645:25 in test::run_test_in_process".to_owned(),
        "/rustc/9b00956e/library/std/src/panicking.rs:557:40 in std::panicking::try".to_owned(),
    ]
}

fn case(name: &str, assertions: usize, status: TestCaseStatus) -> TestCaseResult {
    let mut case = TestCaseResult::new(name, status);
    case.set_assertions(assertions);
    case
}

struct MockRun {
    suite: ParsedSuite,
    status: String,
    started: DateTime<Local>,
}

fn run_mock_suite() -> MockRun {
    let dir = tempdir().expect("tempdir created");
    let mut status = String::new();
    let mut writer = writer_for(&dir, &mut status);
    let mut builder = SuiteReportBuilder::default();

    let started = Local::now();
    builder.on_suite_start("MockTestSuite");
    let results = [
        case(
            "test_raise_error",
            0,
            TestCaseStatus::error(
                "raise an error",
                framework_frames("/home/ci/project/tests/mock.rs:12:5 in mock::test_raise_error"),
            ),
        ),
        case(
            "test_fail_assertion",
            1,
            TestCaseStatus::failure(
                "fail assertion",
                framework_frames("/home/ci/project/tests/mock.rs:16:5 in mock::test_fail"),
            ),
        ),
        case(
            "test_skip_assertion",
            0,
            TestCaseStatus::skip("skip assertion"),
        ),
        case("test_pass", 1, TestCaseStatus::Pass),
        case(
            "test_invalid_characters_in_message",
            0,
            TestCaseStatus::error("#<Object:0x00007f3c5a1b2c40>", Vec::<String>::new()),
        ),
        case(
            "test_invalid_error_name",
            0,
            TestCaseStatus::error("#<Class:0x00007f3c5a1b2d08>", Vec::<String>::new()),
        ),
        case(
            "test_escaping_failure_message",
            1,
            TestCaseStatus::failure(ESCAPING_MESSAGE, framework_frames("tests/mock.rs:30:5")),
        ),
    ];
    for result in results {
        builder.on_case_result(result).expect("suite in progress");
    }
    let report = builder.on_suite_end().expect("suite in progress");

    let path = writer
        .write(&report)
        .expect("write succeeds")
        .expect("reporting enabled");
    drop(writer);

    assert_eq!(path, dir.path().join("test/reports/TEST-MockTestSuite.xml"));
    let suite = parse_suite(&read_report(&path));
    MockRun {
        suite,
        status,
        started,
    }
}

fn find_case<'a>(suite: &'a ParsedSuite, name: &str) -> &'a ParsedCase {
    suite
        .cases
        .iter()
        .find(|case| case.attributes["name"] == name)
        .unwrap_or_else(|| panic!("case {name} not found"))
}

#[test]
fn testsuite_counters() {
    let run = run_mock_suite();
    let attrs = &run.suite.attributes;
    assert_eq!(attrs["name"], "MockTestSuite");
    assert_eq!(attrs["skipped"], "1");
    assert_eq!(attrs["failures"], "2");
    assert_eq!(attrs["errors"], "3");
    assert_eq!(attrs["assertions"], "3");
    assert_eq!(attrs["tests"], "7");

    let case_assertions: usize = run
        .suite
        .cases
        .iter()
        .map(|case| {
            case.attributes["assertions"]
                .parse::<usize>()
                .expect("assertions is a number")
        })
        .sum();
    assert_eq!(case_assertions, 3);
}

#[test]
fn testsuite_timestamp() {
    let run = run_mock_suite();
    let timestamp = &run.suite.attributes["timestamp"];

    let format = Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[+-]\d{2}:\d{2}$")
        .expect("regex is valid");
    assert!(format.is_match(timestamp), "timestamp format: {timestamp}");

    let parsed = DateTime::parse_from_rfc3339(timestamp).expect("timestamp parses");
    let delta = parsed.signed_duration_since(run.started).num_seconds().abs();
    assert!(delta <= 5, "timestamp {timestamp} is {delta}s from suite start");
}

#[test]
fn testcases_in_completion_order() {
    let run = run_mock_suite();
    let names: Vec<_> = run
        .suite
        .cases
        .iter()
        .map(|case| case.attributes["name"].as_str())
        .collect();
    assert_eq!(
        names,
        [
            "test_raise_error",
            "test_fail_assertion",
            "test_skip_assertion",
            "test_pass",
            "test_invalid_characters_in_message",
            "test_invalid_error_name",
            "test_escaping_failure_message",
        ]
    );
}

#[test]
fn testcase_statuses() {
    let run = run_mock_suite();

    let passed = find_case(&run.suite, "test_pass");
    assert!(passed.child.is_none());
    assert_eq!(passed.attributes["assertions"], "1");

    let skipped = find_case(&run.suite, "test_skip_assertion");
    let child = skipped.child.as_ref().expect("skipped element");
    assert_eq!(child.tag, "skipped");
    assert_eq!(child.attributes["message"], "skip assertion");
    assert_eq!(skipped.attributes["assertions"], "0");

    let failure = find_case(&run.suite, "test_fail_assertion");
    let child = failure.child.as_ref().expect("failure element");
    assert_eq!(child.tag, "failure");
    assert_eq!(child.attributes["message"], "fail assertion");
    assert_eq!(failure.attributes["assertions"], "1");

    let error = find_case(&run.suite, "test_raise_error");
    let child = error.child.as_ref().expect("error element");
    assert_eq!(child.tag, "error");
    assert_eq!(child.attributes["message"], "raise an error");
    assert_eq!(error.attributes["assertions"], "0");

    for name in ["test_invalid_characters_in_message", "test_invalid_error_name"] {
        let error = find_case(&run.suite, name);
        let child = error.child.as_ref().expect("error element");
        assert_eq!(child.tag, "error");
        assert!(child.attributes["message"].starts_with("#<"));
        assert_eq!(child.text, "", "empty backtrace renders an empty body");
        assert_eq!(error.attributes["assertions"], "0");
    }
}

#[test]
fn escaped_failure_message_round_trips() {
    let run = run_mock_suite();
    let failure = find_case(&run.suite, "test_escaping_failure_message");
    let child = failure.child.as_ref().expect("failure element");
    assert_eq!(child.attributes["message"], ESCAPING_MESSAGE);
    assert_eq!(failure.attributes["assertions"], "1");
}

#[test]
fn framework_frames_are_filtered() {
    let run = run_mock_suite();
    for case in &run.suite.cases {
        let Some(child) = &case.child else { continue };
        assert!(
            !child.text.contains("/library/") && !child.text.contains("/ci-reporter-0.1.0/"),
            "framework frame in {}: {}",
            case.attributes["name"],
            child.text,
        );
    }

    let error = find_case(&run.suite, "test_raise_error");
    assert_eq!(
        error.child.as_ref().expect("error element").text,
        "/home/ci/project/tests/mock.rs:12:5 in mock::test_raise_error"
    );
}

#[test]
fn status_output() {
    let run = run_mock_suite();
    assert_eq!(
        run.status,
        "\n[ci-reporter] Generating test report in JUnit XML format...\n"
    );
}
