// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a `TestSuiteReport`.

use crate::{
    SerializeError, TestCaseResult, TestCaseStatus, TestSuiteReport,
    escape::{escape_attribute, escape_content},
};
use chrono::{DateTime, FixedOffset};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event, attributes::Attribute},
    name::QName,
};
use std::{borrow::Cow, io};

static TESTSUITE_TAG: &str = "testsuite";
static TESTCASE_TAG: &str = "testcase";
static FAILURE_TAG: &str = "failure";
static ERROR_TAG: &str = "error";
static SKIPPED_TAG: &str = "skipped";

// Always an explicit numeric offset: some consumers reject the `Z` shorthand.
static TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

pub(crate) fn serialize_report(
    report: &TestSuiteReport,
    writer: impl io::Write,
) -> Result<(), SerializeError> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;

    serialize_testsuite(report, &mut writer)?;

    // Add a trailing newline.
    writer.write_indent()?;
    Ok(())
}

fn serialize_testsuite(
    report: &TestSuiteReport,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let TestSuiteReport {
        name,
        timestamp,
        cases,
    } = report;
    let counts = report.counts();

    let mut testsuite_tag = BytesStart::new(TESTSUITE_TAG);
    push_attribute(&mut testsuite_tag, "name", name);
    push_attribute(&mut testsuite_tag, "skipped", &counts.skipped.to_string());
    push_attribute(&mut testsuite_tag, "failures", &counts.failures.to_string());
    push_attribute(&mut testsuite_tag, "errors", &counts.errors.to_string());
    push_attribute(&mut testsuite_tag, "tests", &counts.tests.to_string());
    push_attribute(
        &mut testsuite_tag,
        "assertions",
        &counts.assertions.to_string(),
    );
    push_attribute(&mut testsuite_tag, "timestamp", &format_timestamp(timestamp));
    writer.write_event(Event::Start(testsuite_tag))?;

    for case in cases {
        serialize_testcase(case, writer)?;
    }

    serialize_end_tag(TESTSUITE_TAG, writer)?;
    Ok(())
}

fn serialize_testcase(
    case: &TestCaseResult,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let TestCaseResult {
        name,
        assertions,
        status,
    } = case;

    let mut testcase_tag = BytesStart::new(TESTCASE_TAG);
    push_attribute(&mut testcase_tag, "name", name);
    push_attribute(&mut testcase_tag, "assertions", &assertions.to_string());

    match status {
        TestCaseStatus::Pass => {
            writer.write_event(Event::Empty(testcase_tag))?;
            return Ok(());
        }
        TestCaseStatus::Skip { message } => {
            writer.write_event(Event::Start(testcase_tag))?;
            let mut skipped_tag = BytesStart::new(SKIPPED_TAG);
            push_attribute(&mut skipped_tag, "message", message);
            writer.write_event(Event::Empty(skipped_tag))?;
        }
        TestCaseStatus::Failure { message, backtrace } => {
            writer.write_event(Event::Start(testcase_tag))?;
            serialize_problem(FAILURE_TAG, message, backtrace, writer)?;
        }
        TestCaseStatus::Error { message, backtrace } => {
            writer.write_event(Event::Start(testcase_tag))?;
            serialize_problem(ERROR_TAG, message, backtrace, writer)?;
        }
    }

    serialize_end_tag(TESTCASE_TAG, writer)?;
    Ok(())
}

// Serializes a <failure> or <error> element. The element is written even if the backtrace is
// empty, in which case its body is empty.
fn serialize_problem(
    tag_name: &'static str,
    message: &str,
    backtrace: &[String],
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let mut tag = BytesStart::new(tag_name);
    push_attribute(&mut tag, "message", message);
    writer.write_event(Event::Start(tag))?;

    let body = backtrace
        .iter()
        .map(|frame| escape_content(frame))
        .collect::<Vec<_>>()
        .join("\n");
    // An empty text event also keeps the end tag on the same line as the start tag.
    writer.write_event(Event::Text(BytesText::from_escaped(body)))?;

    serialize_end_tag(tag_name, writer)
}

// quick-xml's string attribute conversion also escapes single quotes, which must survive
// unchanged. Escape values ourselves and hand over the raw bytes instead.
fn push_attribute(tag: &mut BytesStart<'_>, key: &'static str, value: &str) {
    let escaped = escape_attribute(value);
    tag.push_attribute(Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Borrowed(escaped.as_bytes()),
    });
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let end_tag = BytesEnd::new(tag_name);
    writer.write_event(Event::End(end_tag))?;
    Ok(())
}

fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
