//! Escape-aware field splitting for delimited record lines
//!
//! Splits a single line into fields on a one-byte delimiter while treating a
//! backslash as an escape: the backslash and the character after it are kept
//! verbatim in the current field and never act as a delimiter. Escapes are not
//! removed, so `a\|b|c` splits into `a\|b` and `c`.
//!
//! # Design
//!
//! Fields are borrowed slices of the input line. The delimiter is required to
//! be ASCII (checked by `PipelineConfig::validate`), so every split point falls
//! on a UTF-8 character boundary and bytes inside multi-byte characters can
//! never be mistaken for a delimiter or an escape.

use std::borrow::Cow;

/// The escape character
pub const ESCAPE: u8 = b'\\';

/// Split `line` into fields on `delimiter`, honoring backslash escapes
///
/// Returns exactly one more field than there are unescaped delimiters. The last
/// field is always present, even when empty. A backslash at the very end of the
/// line has nothing to escape and is dropped.
///
/// # Examples
///
/// ```
/// use rust_account_summary::io::split_escaped;
///
/// assert_eq!(split_escaped(r"a\|b|c", b'|'), vec![r"a\|b", "c"]);
/// assert_eq!(split_escaped("x||", b'|'), vec!["x", "", ""]);
/// ```
pub fn split_escaped(line: &str, delimiter: u8) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut fields = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let byte = bytes[pos];
        if byte == ESCAPE {
            if pos + 1 == bytes.len() {
                // Dangling escape: close the last field without it
                fields.push(&line[start..pos]);
                return fields;
            }
            pos += 2;
        } else if byte == delimiter {
            fields.push(&line[start..pos]);
            pos += 1;
            start = pos;
        } else {
            pos += 1;
        }
    }

    fields.push(&line[start..]);
    fields
}

/// Escape every delimiter and backslash in `field`
///
/// Fields that need no escaping are returned borrowed.
pub fn escape_field(field: &str, delimiter: u8) -> Cow<'_, str> {
    let needs_escape = field.bytes().any(|b| b == ESCAPE || b == delimiter);
    if !needs_escape {
        return Cow::Borrowed(field);
    }

    let mut escaped = String::with_capacity(field.len() + 4);
    for ch in field.chars() {
        if ch == ESCAPE as char || (ch.is_ascii() && ch as u8 == delimiter) {
            escaped.push(ESCAPE as char);
        }
        escaped.push(ch);
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::escaped_delimiter(r"a\|b|c", vec![r"a\|b", "c"])]
    #[case::plain("1|2|3", vec!["1", "2", "3"])]
    #[case::empty_line("", vec![""])]
    #[case::only_delimiters("||", vec!["", "", ""])]
    #[case::trailing_delimiter("a|", vec!["a", ""])]
    #[case::dangling_escape(r"a|b\", vec!["a", "b"])]
    #[case::lone_backslash(r"\", vec![""])]
    #[case::escaped_backslash(r"a\\|b", vec![r"a\\", "b"])]
    #[case::escaped_ordinary_char(r"a\nb|c", vec![r"a\nb", "c"])]
    #[case::escape_before_final_delimiter(r"a\||", vec![r"a\|", ""])]
    #[case::multibyte_text("café|naïve\\|ü|z", vec!["café", "naïve\\|ü", "z"])]
    #[case::escaped_multibyte(r"a\é|b", vec![r"a\é", "b"])]
    fn test_split_escaped(#[case] line: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_escaped(line, b'|'), expected);
    }

    #[test]
    fn test_split_escaped_full_record() {
        let line = r"1042|3|125.50|Coffee \| pastries|2021-03-04|debit|pos";
        let fields = split_escaped(line, b'|');
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[3], r"Coffee \| pastries");
        assert_eq!(fields[5], "debit");
    }

    #[rstest]
    #[case::comma(b',', "a,b\\,c", vec!["a", "b\\,c"])]
    #[case::tab(b'\t', "a\tb|c", vec!["a", "b|c"])]
    fn test_split_escaped_other_delimiters(
        #[case] delimiter: u8,
        #[case] line: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(split_escaped(line, delimiter), expected);
    }

    #[rstest]
    #[case::no_escape_needed("plain text", "plain text")]
    #[case::delimiter("a|b", r"a\|b")]
    #[case::backslash(r"a\b", r"a\\b")]
    #[case::both(r"|\", r"\|\\")]
    fn test_escape_field(#[case] field: &str, #[case] expected: &str) {
        assert_eq!(escape_field(field, b'|'), expected);
    }

    #[test]
    fn test_escape_field_borrows_when_clean() {
        assert!(matches!(escape_field("clean", b'|'), Cow::Borrowed(_)));
    }

    #[rstest]
    #[case::simple(vec!["1", "2", "3.00", "desc", "2020-01-01", "credit", "x"])]
    #[case::empty_fields(vec!["", "", ""])]
    #[case::single(vec!["only"])]
    #[case::unicode(vec!["ünï", "çødé", ""])]
    fn test_split_recovers_clean_fields(#[case] fields: Vec<&str>) {
        let escaped: Vec<_> = fields.iter().map(|f| escape_field(f, b'|')).collect();
        let line = escaped.join("|");
        assert_eq!(split_escaped(&line, b'|'), fields);
    }

    #[rstest]
    #[case::delimiters(vec!["a|b", "c", "|"])]
    #[case::backslashes(vec![r"ends with \", r"\", "x"])]
    #[case::mixed(vec![r"a\|b", "", r"\\|"])]
    fn test_split_returns_escaped_fields(#[case] fields: Vec<&str>) {
        let escaped: Vec<String> = fields
            .iter()
            .map(|f| escape_field(f, b'|').into_owned())
            .collect();
        let line = escaped.join("|");
        assert_eq!(split_escaped(&line, b'|'), escaped);
    }
}
