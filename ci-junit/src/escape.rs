// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escaping of arbitrary text for embedding in XML.
//!
//! Both functions are total: any Rust string can be escaped, and the output is always valid XML
//! 1.0 character data. If nothing needs escaping, the input is returned borrowed.
//!
//! Parsing the output back yields the input exactly, with one exception: characters that XML 1.0
//! doesn't allow at all (C0 control characters other than tab, line feed and carriage return,
//! plus U+FFFE and U+FFFF) are removed. These most commonly show up as ANSI color sequences in
//! assertion messages.
//!
//! Whitespace that XML parsers would otherwise normalize is written as character references: tab,
//! line feed and carriage return within attribute values, and carriage return within text. This
//! keeps multi-line messages intact through conforming parsers.
//!
//! Single quotes are deliberately left alone in both contexts. Attribute values are always written
//! within double quotes, so an apostrophe can't terminate them, and CI tools display names such as
//! `spec/with::'punctuation'` verbatim.

use std::borrow::Cow;

/// Escapes `s` for use inside a double-quoted XML attribute value.
///
/// Replaces `&`, `<`, `>` and `"` with entities, and tab, line feed and carriage return with
/// character references. Characters not allowed in XML are removed. Every other character,
/// including `'`, is kept as is.
pub fn escape_attribute(s: &str) -> Cow<'_, str> {
    escape_with(s, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\t' => Some("&#9;"),
        '\n' => Some("&#10;"),
        '\r' => Some("&#13;"),
        c if is_disallowed_in_xml(c) => Some(""),
        _ => None,
    })
}

/// Escapes `s` for use as XML element text.
///
/// Replaces `&`, `<` and `>` with entities and carriage return with a character reference.
/// Characters not allowed in XML are removed. Quotes, tabs and line feeds are kept as is.
pub fn escape_content(s: &str) -> Cow<'_, str> {
    escape_with(s, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\r' => Some("&#13;"),
        c if is_disallowed_in_xml(c) => Some(""),
        _ => None,
    })
}

/// Returns true if `c` can't appear in an XML 1.0 document, even as a character reference.
pub fn is_disallowed_in_xml(c: char) -> bool {
    matches!(
        c,
        '\x00'..='\x08' | '\x0b' | '\x0c' | '\x0e'..='\x1f' | '\u{fffe}' | '\u{ffff}'
    )
}

fn escape_with(s: &str, replacement: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    let Some(first) = s.find(|c| replacement(c).is_some()) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + 16);
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        match replacement(c) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}
