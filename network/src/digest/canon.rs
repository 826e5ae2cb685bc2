//! Canonical JSON bytes: the single serialization-for-hashing implementation.
//!
//! # Canonicalization rules
//!
//! 1. Object keys are sorted lexicographically (byte order).
//! 2. No extraneous whitespace (compact form: `{"a":1,"b":2}`).
//! 3. Strings are JSON-escaped per RFC 8259 §7.
//! 4. Integers are written as `i64`/`u64`; other numbers use the shortest
//!    round-trip decimal form (`serde_json::Number` cannot hold NaN or ±∞).
//! 5. `null`, `true`, `false` are written literally.

use std::io::Write;

/// Produce canonical JSON bytes from a `serde_json::Value`.
#[must_use]
pub fn canonical_json_bytes(value: &serde_json::Value) -> Vec<u8> {
    let mut buf = Vec::new();
    write_value(&mut buf, value);
    buf
}

fn write_value(buf: &mut Vec<u8>, value: &serde_json::Value) {
    match value {
        serde_json::Value::Null => buf.extend_from_slice(b"null"),
        serde_json::Value::Bool(true) => buf.extend_from_slice(b"true"),
        serde_json::Value::Bool(false) => buf.extend_from_slice(b"false"),
        serde_json::Value::Number(n) => write_number(buf, n),
        serde_json::Value::String(s) => write_string(buf, s),
        serde_json::Value::Array(arr) => {
            buf.push(b'[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_value(buf, item);
            }
            buf.push(b']');
        }
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            buf.push(b'{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_string(buf, key);
                buf.push(b':');
                write_value(buf, &map[*key]);
            }
            buf.push(b'}');
        }
    }
}

fn write_number(buf: &mut Vec<u8>, n: &serde_json::Number) {
    if let Some(i) = n.as_i64() {
        let _ = write!(buf, "{i}");
    } else if let Some(u) = n.as_u64() {
        let _ = write!(buf, "{u}");
    } else {
        let _ = write!(buf, "{n}");
    }
}

fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for ch in s.chars() {
        match ch {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            c if c < '\u{0020}' => {
                let _ = write!(buf, "\\u{:04x}", c as u32);
            }
            c => {
                let mut utf8_buf = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut utf8_buf).as_bytes());
            }
        }
    }
    buf.push(b'"');
}
