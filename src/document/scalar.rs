//! Locating and rendering scalar text.

use super::node::ScalarStyle;
use serde_yaml::Value;

/// Characters that may not start a plain scalar.
const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
];

/// End (exclusive byte offset) of the scalar that starts at `start`.
///
/// Returns `None` when the extent cannot be determined from a single
/// scan: block scalars, unterminated quotes, or a start that does not
/// look like the expected style.
pub(crate) fn scalar_end(source: &str, start: usize, style: ScalarStyle, flow: bool) -> Option<usize> {
    let bytes = source.as_bytes();
    match style {
        ScalarStyle::SingleQuoted => {
            if bytes.get(start) != Some(&b'\'') {
                return None;
            }
            let mut i = start + 1;
            while i < bytes.len() {
                if bytes[i] == b'\'' {
                    if bytes.get(i + 1) == Some(&b'\'') {
                        i += 2;
                        continue;
                    }
                    return Some(i + 1);
                }
                i += 1;
            }
            None
        }
        ScalarStyle::DoubleQuoted => {
            if bytes.get(start) != Some(&b'"') {
                return None;
            }
            let mut i = start + 1;
            while i < bytes.len() {
                match bytes[i] {
                    b'\\' => i += 2,
                    b'"' => return Some(i + 1),
                    _ => i += 1,
                }
            }
            None
        }
        ScalarStyle::Plain => {
            let mut end = start;
            while end < bytes.len() {
                let b = bytes[end];
                if b == b'\n' || b == b'\r' {
                    break;
                }
                if b == b'#' && end > start && matches!(bytes[end - 1], b' ' | b'\t') {
                    break;
                }
                if b == b':' && matches!(bytes.get(end + 1), None | Some(b' ' | b'\t' | b'\n' | b'\r')) {
                    break;
                }
                if flow && matches!(b, b',' | b'[' | b']' | b'{' | b'}') {
                    break;
                }
                end += 1;
            }
            while end > start && matches!(bytes[end - 1], b' ' | b'\t') {
                end -= 1;
            }
            Some(end)
        }
        ScalarStyle::Block => None,
    }
}

/// Whether `value` can be written unquoted and still read back as the
/// same string.
pub(crate) fn is_plain_safe(value: &str, flow: bool) -> bool {
    let Some(first) = value.chars().next() else {
        return false;
    };
    if INDICATORS.contains(&first) || first.is_whitespace() {
        return false;
    }
    if value.ends_with(char::is_whitespace) || value.ends_with(':') {
        return false;
    }
    if value.chars().any(char::is_control) || value.contains(": ") || value.contains(" #") {
        return false;
    }
    if flow && value.contains([',', '[', ']', '{', '}']) {
        return false;
    }
    if reads_as_non_string_in_yaml_1_1(value) {
        return false;
    }
    // Rules out null, booleans and numbers, which would change type.
    matches!(serde_yaml::from_str::<Value>(value), Ok(Value::String(ref s)) if s == value)
}

/// Helm reads values with YAML 1.1 rules, where leading-zero digits,
/// `yes`/`no` and friends are not strings.
fn reads_as_non_string_in_yaml_1_1(value: &str) -> bool {
    const BOOLS: &[&str] = &["y", "n", "yes", "no", "on", "off", "true", "false"];
    BOOLS.contains(&value.to_ascii_lowercase().as_str())
        || value.bytes().all(|b| b.is_ascii_digit() || b == b'_')
        || value.parse::<f64>().is_ok()
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render `value` in the given style, falling back to double quotes when
/// the style cannot represent it faithfully.
pub(crate) fn render(value: &str, style: ScalarStyle, flow: bool) -> String {
    match style {
        ScalarStyle::SingleQuoted if !value.chars().any(char::is_control) => single_quoted(value),
        ScalarStyle::Plain if is_plain_safe(value, flow) => value.to_string(),
        _ => double_quoted(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(source: &str, style: ScalarStyle, flow: bool) -> &str {
        let end = scalar_end(source, 0, style, flow).unwrap();
        &source[..end]
    }

    #[test]
    fn test_plain_extent_stops_at_comment() {
        assert_eq!(extent("v1.2.3   # pinned\nnext: x", ScalarStyle::Plain, false), "v1.2.3");
        assert_eq!(extent("a#b\n", ScalarStyle::Plain, false), "a#b");
        assert_eq!(extent("trailing  \n", ScalarStyle::Plain, false), "trailing");
    }

    #[test]
    fn test_plain_extent_in_flow() {
        assert_eq!(extent("abc, value: x}", ScalarStyle::Plain, true), "abc");
        assert_eq!(extent("abc}", ScalarStyle::Plain, true), "abc");
        // Commas are ordinary characters outside flow collections.
        assert_eq!(extent("a,b\n", ScalarStyle::Plain, false), "a,b");
    }

    #[test]
    fn test_plain_key_extent_stops_at_colon() {
        assert_eq!(extent("tag: old", ScalarStyle::Plain, false), "tag");
        assert_eq!(extent("http://x\n", ScalarStyle::Plain, false), "http://x");
    }

    #[test]
    fn test_quoted_extents() {
        assert_eq!(extent("'it''s' # c", ScalarStyle::SingleQuoted, false), "'it''s'");
        assert_eq!(extent(r#""a\"b" rest"#, ScalarStyle::DoubleQuoted, false), r#""a\"b""#);
        assert_eq!(scalar_end("'open", 0, ScalarStyle::SingleQuoted, false), None);
        assert_eq!(scalar_end("plain", 0, ScalarStyle::DoubleQuoted, false), None);
        assert_eq!(scalar_end("|\n  x", 0, ScalarStyle::Block, false), None);
    }

    #[test]
    fn test_plain_safety() {
        assert!(is_plain_safe("v2.3.4", false));
        assert!(is_plain_safe("sha-0123456789ab", false));
        assert!(is_plain_safe("0123456789ab", false));
        assert!(is_plain_safe("unversioned", false));

        assert!(!is_plain_safe("", false));
        assert!(!is_plain_safe("012345678901", false)); // reads as an integer
        assert!(!is_plain_safe("1e10", false));
        assert!(!is_plain_safe("true", false));
        assert!(!is_plain_safe("yes", false));
        assert!(!is_plain_safe("Off", false));
        assert!(!is_plain_safe("null", false));
        assert!(!is_plain_safe("- x", false));
        assert!(!is_plain_safe("a: b", false));
        assert!(!is_plain_safe("a,b", true));
        assert!(is_plain_safe("a,b", false));
    }

    #[test]
    fn test_render_keeps_style() {
        assert_eq!(render("v1.0.0", ScalarStyle::Plain, false), "v1.0.0");
        assert_eq!(render("v1.0.0", ScalarStyle::SingleQuoted, false), "'v1.0.0'");
        assert_eq!(render("v1.0.0", ScalarStyle::DoubleQuoted, false), "\"v1.0.0\"");
        assert_eq!(render("it's", ScalarStyle::SingleQuoted, false), "'it''s'");
    }

    #[test]
    fn test_render_quotes_when_plain_would_change_type() {
        assert_eq!(render("", ScalarStyle::Plain, false), "\"\"");
        assert_eq!(render("012345678901", ScalarStyle::Plain, false), "\"012345678901\"");
        assert_eq!(render("a\"b", ScalarStyle::Block, false), "\"a\\\"b\"");
    }
}
