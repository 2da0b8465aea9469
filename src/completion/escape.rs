//! JSON string escaping for request content.
//!
//! Control characters without a short escape are dropped rather than
//! written as `\u00XX`. Existing fixtures depend on that, so it stays.

pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\u{08}' => escaped.push_str("\\b"),
            '\u{0c}' => escaped.push_str("\\f"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if (c as u32) < 0x20 => {}
            c => escaped.push(c),
        }
    }

    escaped
}
