// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derives report file names from arbitrary suite names.

/// The prefix of every report file name.
pub const REPORT_FILE_PREFIX: &str = "TEST-";

/// The suffix of every report file name.
pub const REPORT_FILE_SUFFIX: &str = ".xml";

/// The maximum length of a file name, in bytes, on common filesystems.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// The maximum length of a sanitized stem, so that prefix + stem + suffix fits in
/// [`MAX_FILE_NAME_LEN`].
pub const MAX_STEM_LEN: usize =
    MAX_FILE_NAME_LEN - REPORT_FILE_PREFIX.len() - REPORT_FILE_SUFFIX.len();

/// Converts a suite name into a string that is safe to use as a path component.
///
/// Every character that is not an ASCII letter, digit or underscore is replaced with one `_`.
/// Runs of replaced characters are not collapsed. The result is truncated to [`MAX_STEM_LEN`]
/// bytes.
///
/// Distinct names may map to the same stem, e.g. `a/b` and `a:b`.
pub fn sanitize_suite_name(name: &str) -> String {
    // Every output character is a single ASCII byte, so truncating by character count also bounds
    // the byte length and can never split a character.
    name.chars()
        .take(MAX_STEM_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Returns the report file name for the given suite name: `TEST-<sanitized name>.xml`.
pub fn report_file_name(suite_name: &str) -> String {
    format!(
        "{REPORT_FILE_PREFIX}{}{REPORT_FILE_SUFFIX}",
        sanitize_suite_name(suite_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use test_strategy::proptest;

    #[test_case("MockTestSuite", "MockTestSuite" ; "already safe")]
    #[test_case("spec/with::'punctuation'", "spec_with___punctuation_" ; "punctuation")]
    #[test_case(r#"spec/with::"doublequotes""#, "spec_with___doublequotes_" ; "double quotes")]
    #[test_case("a b\tc", "a_b_c" ; "whitespace")]
    #[test_case("ünï", "_n_" ; "non-ascii becomes one underscore per char")]
    #[test_case("", "" ; "empty")]
    #[test_case("../../etc/passwd", "______etc_passwd" ; "path traversal")]
    fn sanitize(input: &str, expected: &str) {
        assert_eq!(sanitize_suite_name(input), expected);
    }

    #[test]
    fn file_name() {
        assert_eq!(
            report_file_name("spec/with::'punctuation'"),
            "TEST-spec_with___punctuation_.xml"
        );
        assert_eq!(report_file_name(""), "TEST-.xml");
    }

    #[test]
    fn repeated_name_is_truncated() {
        let name = "spec/with::long_file_name".repeat(100);
        let file_name = report_file_name(&name);
        assert_eq!(file_name.len(), MAX_FILE_NAME_LEN);
        assert!(file_name.starts_with("TEST-spec_with__long_file_name"));
        assert!(file_name.ends_with(".xml"));
    }

    #[test]
    fn very_long_multibyte_name_is_truncated() {
        let name = "日本語".repeat(4000);
        let file_name = report_file_name(&name);
        assert!(file_name.len() <= MAX_FILE_NAME_LEN);
        assert!(file_name.is_ascii());
    }

    #[proptest(cases = 256)]
    fn output_is_safe_and_bounded(name: String) {
        let stem = sanitize_suite_name(&name);
        assert!(stem.len() <= MAX_STEM_LEN);
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        assert!(report_file_name(&name).len() <= MAX_FILE_NAME_LEN);
        // Deterministic.
        assert_eq!(stem, sanitize_suite_name(&name));
    }

    #[proptest(cases = 64)]
    fn short_names_keep_one_char_per_char(
        #[strategy("[a-zA-Z0-9_/:'\" .é]{0,100}")] name: String,
    ) {
        assert_eq!(sanitize_suite_name(&name).len(), name.chars().count());
    }
}
