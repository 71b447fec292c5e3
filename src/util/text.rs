use std::fmt::Write;

/// Quotes a string as a double quoted literal.
///
/// Quotes, backslashes and control characters are escaped; everything else,
/// including non-ASCII text, is kept as is.
///
/// ## Example
/// ```
/// use grol::util::text::quote;
///
/// assert_eq!(quote("a\"b\n"), r#""a\"b\n""#);
/// assert_eq!(quote("café"), "\"café\"");
/// assert_eq!(quote("\u{7}"), r#""\x07""#);
/// ```
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() && u32::from(c) < 0x100 => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            },
            c if c.is_control() => {
                let _ = write!(out, "\\U{:08x}", u32::from(c));
            },
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
