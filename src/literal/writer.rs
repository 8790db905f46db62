//! Deterministic object-literal output.
//!
//! Layout: four spaces per nesting level relative to the assignment line,
//! scalar arrays inline, one member per line, no trailing commas.

use super::JsValue;

const INDENT: &str = "    ";

/// Render members as a `{ ... }` literal whose closing brace sits at `base_indent`.
pub fn write_object(members: &[(String, JsValue)], base_indent: &str) -> String {
    let mut out = String::new();
    write_members(&mut out, members, base_indent);
    out
}

fn write_members(out: &mut String, members: &[(String, JsValue)], indent: &str) {
    if members.is_empty() {
        out.push_str("{}");
        return;
    }
    let inner = format!("{indent}{INDENT}");
    out.push_str("{\n");
    for (idx, (key, value)) in members.iter().enumerate() {
        out.push_str(&inner);
        write_key(out, key);
        out.push_str(": ");
        write_value(out, value, &inner);
        if idx + 1 < members.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(indent);
    out.push('}');
}

fn write_value(out: &mut String, value: &JsValue, indent: &str) {
    match value {
        JsValue::String(s) => write_string(out, s),
        JsValue::Number(raw) => out.push_str(raw),
        JsValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        JsValue::Null => out.push_str("null"),
        JsValue::Object(members) => write_members(out, members, indent),
        JsValue::Array(items) if items.iter().all(JsValue::is_scalar) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, indent);
            }
            out.push(']');
        }
        JsValue::Array(items) => {
            let inner = format!("{indent}{INDENT}");
            out.push_str("[\n");
            for (idx, item) in items.iter().enumerate() {
                out.push_str(&inner);
                write_value(out, item, &inner);
                if idx + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(indent);
            out.push(']');
        }
    }
}

fn write_key(out: &mut String, key: &str) {
    if is_identifier(key) {
        out.push_str(key);
    } else {
        write_string(out, key);
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
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
}

/// ASCII identifiers are written bare; anything else is quoted.
pub fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
