#![forbid(unsafe_code)]

//! Entity escaping for C14N output.
//!
//! Per Canonical XML 1.0:
//! - Text nodes: `&` → `&amp;`, `<` → `&lt;`, `>` → `&gt;`, `\r` → `&#xD;`
//! - Attribute values: `&`, `<`, `"`, `\t`, `\n`, `\r` (but not `>`)
//! - PI data: `\r` → `&#xD;`

/// Append text node content, escaped per C14N rules.
pub fn write_text(s: &str, out: &mut Vec<u8>) {
    write_escaped(s, out, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\r' => Some("&#xD;"),
        _ => None,
    });
}

/// Append an attribute (or namespace) value, escaped per C14N rules.
pub fn write_attr(s: &str, out: &mut Vec<u8>) {
    write_escaped(s, out, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '"' => Some("&quot;"),
        '\t' => Some("&#x9;"),
        '\n' => Some("&#xA;"),
        '\r' => Some("&#xD;"),
        _ => None,
    });
}

/// Append processing instruction data.
pub fn write_pi(s: &str, out: &mut Vec<u8>) {
    write_escaped(s, out, |ch| (ch == '\r').then_some("&#xD;"));
}

fn write_escaped(s: &str, out: &mut Vec<u8>, entity: impl Fn(char) -> Option<&'static str>) {
    let mut buf = [0u8; 4];
    for ch in s.chars() {
        match entity(ch) {
            Some(e) => out.extend_from_slice(e.as_bytes()),
            None => out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes()),
        }
    }
}
