//! Block-style text rendering of documents.
//!
//! The output is YAML-compatible and meant for line diffs: one mapping entry
//! or list item per line, mapping keys in document order, numbers printed
//! from their original literal, and multi-line strings written as literal
//! blocks so that each line of the string diffs on its own.

use serde_json::{Map, Value};

use crate::Document;

/// Render a document as block-style text. Non-empty output ends with a newline.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();
    match doc {
        Value::Object(map) if !map.is_empty() => write_mapping(&mut out, map, 0, false),
        Value::Array(items) if !items.is_empty() => write_sequence(&mut out, items, 0, false),
        Value::String(s) if literal_eligible(s) => {
            write_literal(&mut out, s, 2);
        }
        scalar => {
            out.push_str(&scalar_text(scalar));
            out.push('\n');
        }
    }
    out
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent));
}

/// Write mapping entries at `indent`. With `inline_first`, the first key
/// continues the current line (after a list dash).
fn write_mapping(out: &mut String, map: &Map<String, Value>, indent: usize, inline_first: bool) {
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 || !inline_first {
            push_indent(out, indent);
        }
        out.push_str(&string_text(key));
        out.push(':');
        write_entry_value(out, value, indent);
    }
}

fn write_entry_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            out.push('\n');
            write_mapping(out, map, indent + 2, false);
        }
        Value::Array(items) if !items.is_empty() => {
            out.push('\n');
            write_sequence(out, items, indent, false);
        }
        Value::String(s) if literal_eligible(s) => {
            out.push(' ');
            write_literal(out, s, indent + 2);
        }
        scalar => {
            out.push(' ');
            out.push_str(&scalar_text(scalar));
            out.push('\n');
        }
    }
}

fn write_sequence(out: &mut String, items: &[Value], indent: usize, inline_first: bool) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 || !inline_first {
            push_indent(out, indent);
        }
        out.push('-');
        match item {
            Value::Object(map) if !map.is_empty() => {
                out.push(' ');
                write_mapping(out, map, indent + 2, true);
            }
            Value::Array(inner) if !inner.is_empty() => {
                out.push(' ');
                write_sequence(out, inner, indent + 2, true);
            }
            Value::String(s) if literal_eligible(s) => {
                out.push(' ');
                write_literal(out, s, indent + 2);
            }
            scalar => {
                out.push(' ');
                out.push_str(&scalar_text(scalar));
                out.push('\n');
            }
        }
    }
}

/// Multi-line strings without control characters go into literal blocks.
fn literal_eligible(s: &str) -> bool {
    s.contains('\n')
        && !s.trim_end_matches('\n').trim().is_empty()
        && !s.chars().any(|c| c.is_control() && c != '\n' && c != '\t')
}

/// Write a literal block header and body; the body sits at `indent`.
fn write_literal(out: &mut String, s: &str, indent: usize) {
    let body = s.trim_end_matches('\n');
    let trailing = s.len() - body.len();

    out.push('|');
    let first_content = body.split('\n').find(|line| !line.is_empty());
    if first_content.is_some_and(|line| line.starts_with(' ')) {
        out.push('2');
    }
    out.push_str(match trailing {
        0 => "-",
        1 => "",
        _ => "+",
    });
    out.push('\n');

    for line in body.split('\n') {
        if !line.is_empty() {
            push_indent(out, indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    for _ in 1..trailing {
        out.push('\n');
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string_text(s),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    }
}

/// A string as a plain scalar when that reads back unchanged, otherwise
/// double-quoted with JSON escapes.
fn string_text(s: &str) -> String {
    if is_plain_safe(s) {
        s.to_string()
    } else {
        Value::String(s.to_string()).to_string()
    }
}

const RESERVED_WORDS: &[&str] = &[
    "null", "~", "true", "false", "yes", "no", "on", "off", "y", "n",
];

fn is_plain_safe(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    if s.trim() != s {
        return false;
    }
    if "-?:,[]{}#&*!|>'\"%@`".contains(first) {
        return false;
    }
    if s.ends_with(':') || s.contains(": ") || s.contains(" #") || s == "..." {
        return false;
    }
    if s.chars().any(char::is_control) {
        return false;
    }
    let lower = s.to_ascii_lowercase();
    if RESERVED_WORDS.contains(&lower.as_str()) {
        return false;
    }
    if ["0x", "0o", ".inf", ".nan"].iter().any(|prefix| lower.starts_with(prefix)) {
        return false;
    }
    s.parse::<f64>().is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_mappings_and_lists() {
        let doc = json!({
            "Name": "nightly",
            "Target": {
                "Arn": "arn:aws:lambda:ap-northeast-1:123456789012:function:job",
                "RetryPolicy": {"MaximumRetryAttempts": 3},
            },
            "Subnets": ["subnet-a", "subnet-b"],
            "Tags": [{"Key": "team", "Value": "ops"}],
        });
        assert_eq!(
            render(&doc),
            "Name: nightly\n\
             Target:\n  Arn: arn:aws:lambda:ap-northeast-1:123456789012:function:job\n  RetryPolicy:\n    MaximumRetryAttempts: 3\n\
             Subnets:\n- subnet-a\n- subnet-b\n\
             Tags:\n- Key: team\n  Value: ops\n"
        );
    }

    #[test]
    fn scalars_and_empty_containers() {
        let doc = json!({"a": null, "b": true, "c": 1.5, "d": {}, "e": [], "f": ""});
        assert_eq!(render(&doc), "a: null\nb: true\nc: 1.5\nd: {}\ne: []\nf: \"\"\n");
    }

    #[test]
    fn ambiguous_strings_are_quoted() {
        let doc = json!({
            "a": "123",
            "b": "true",
            "c": "OFF",
            "d": "- x",
            "e": "k: v",
            "f": " pad",
            "g": "rate(5 minutes)",
        });
        assert_eq!(
            render(&doc),
            "a: \"123\"\nb: \"true\"\nc: \"OFF\"\nd: \"- x\"\ne: \"k: v\"\nf: \" pad\"\ng: rate(5 minutes)\n"
        );
    }

    #[test]
    fn multi_line_strings_render_literally() {
        let doc = json!({"Input": "{\n  \"b\": 1\n}", "Kept": "a\nb\n", "Extra": "a\n\n"});
        assert_eq!(
            render(&doc),
            "Input: |-\n  {\n    \"b\": 1\n  }\nKept: |\n  a\n  b\nExtra: |+\n  a\n\n"
        );
    }

    #[test]
    fn literal_blocks_inside_nested_values() {
        let doc = json!({"Target": {"Input": "x\ny"}, "List": ["p\nq"]});
        assert_eq!(
            render(&doc),
            "Target:\n  Input: |-\n    x\n    y\nList:\n- |-\n  p\n  q\n"
        );
    }

    #[test]
    fn leading_space_gets_indentation_indicator() {
        let doc = json!({"s": "  indented\nnext"});
        assert_eq!(render(&doc), "s: |2-\n    indented\n  next\n");
    }

    #[test]
    fn control_characters_fall_back_to_quotes() {
        let doc = json!({"s": "a\r\nb"});
        assert_eq!(render(&doc), "s: \"a\\r\\nb\"\n");
    }

    #[test]
    fn nested_lists() {
        let doc = json!([[1, 2], [], {"k": [3]}]);
        assert_eq!(render(&doc), "- - 1\n  - 2\n- []\n- k:\n  - 3\n");
    }

    #[test]
    fn top_level_scalars() {
        assert_eq!(render(&json!(null)), "null\n");
        assert_eq!(render(&json!({})), "{}\n");
        assert_eq!(render(&json!("x")), "x\n");
    }

    #[test]
    fn numbers_are_not_reformatted() {
        let source = r#"{"a": 1, "b": 1.0, "c": 2.50, "d": 18446744073709551616}"#;
        let doc: Document = serde_json::from_str(source).unwrap();
        assert_eq!(render(&doc), "a: 1\nb: 1.0\nc: 2.50\nd: 18446744073709551616\n");
    }

    #[test]
    fn top_level_literal_body_is_indented() {
        assert_eq!(render(&json!("x\ny")), "|-\n  x\n  y\n");
        assert_eq!(render(&json!("  a\nb\n")), "|2\n    a\n  b\n");
    }
}
