// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reads serialized reports back, for tests.
//!
//! This is a deliberately small reader that understands exactly the shape written by
//! [`TestSuiteReport::serialize`](crate::TestSuiteReport::serialize). All entities are unescaped,
//! so values can be compared against the original strings. It panics on malformed input.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use std::collections::BTreeMap;

/// A parsed `<testsuite>` element.
#[derive(Clone, Debug, Default)]
pub struct ParsedSuite {
    /// Attributes of the `<testsuite>` element.
    pub attributes: BTreeMap<String, String>,

    /// Parsed `<testcase>` elements, in document order.
    pub cases: Vec<ParsedCase>,
}

/// A parsed `<testcase>` element.
#[derive(Clone, Debug, Default)]
pub struct ParsedCase {
    /// Attributes of the `<testcase>` element.
    pub attributes: BTreeMap<String, String>,

    /// The `<skipped>`, `<failure>` or `<error>` child, if any.
    pub child: Option<ParsedChild>,
}

/// A parsed status element within a `<testcase>`.
#[derive(Clone, Debug, Default)]
pub struct ParsedChild {
    /// The element name.
    pub tag: String,

    /// The element's attributes.
    pub attributes: BTreeMap<String, String>,

    /// The unescaped text body.
    pub text: String,
}

/// Parses a serialized report.
pub fn parse_suite(xml: &str) -> ParsedSuite {
    let mut reader = Reader::from_str(xml);
    let mut suite = ParsedSuite::default();
    let mut in_child = false;

    loop {
        match reader.read_event().expect("report is well-formed XML") {
            Event::Start(start) => {
                in_child = handle_start(&mut suite, &start);
            }
            Event::Empty(start) => {
                handle_start(&mut suite, &start);
            }
            Event::Text(text) if in_child => {
                let text = text.unescape().expect("text unescapes");
                let child = current_child(&mut suite);
                child.text.push_str(&text);
            }
            Event::End(_) => in_child = false,
            Event::Eof => break,
            _ => {}
        }
    }

    suite
}

// Returns true if the element is a status element (so text that follows belongs to it).
fn handle_start(suite: &mut ParsedSuite, start: &BytesStart<'_>) -> bool {
    let tag = String::from_utf8(start.name().as_ref().to_vec()).expect("tag is UTF-8");
    let attributes = attributes(start);
    match tag.as_str() {
        "testsuite" => {
            suite.attributes = attributes;
            false
        }
        "testcase" => {
            suite.cases.push(ParsedCase {
                attributes,
                child: None,
            });
            false
        }
        _ => {
            let case = suite
                .cases
                .last_mut()
                .expect("status element appears within a testcase");
            case.child = Some(ParsedChild {
                tag,
                attributes,
                text: String::new(),
            });
            true
        }
    }
}

fn current_child(suite: &mut ParsedSuite) -> &mut ParsedChild {
    suite
        .cases
        .last_mut()
        .and_then(|case| case.child.as_mut())
        .expect("text appears within a status element")
}

fn attributes(start: &BytesStart<'_>) -> BTreeMap<String, String> {
    start
        .attributes()
        .map(|attr| {
            let attr = attr.expect("attribute is well-formed");
            let key = String::from_utf8(attr.key.as_ref().to_vec()).expect("key is UTF-8");
            let value = attr.unescape_value().expect("value unescapes").into_owned();
            (key, value)
        })
        .collect()
}
