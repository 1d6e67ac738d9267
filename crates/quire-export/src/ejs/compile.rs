//! Turns scanned segments into the body of an EJS render function.
//!
//! The generated code has the same shape as the function `ejs.compile`
//! produces: output accumulates in `__output` through `__append`, escaped
//! tags go through `escapeFn`, and `__line` tracks the template line of the
//! statement being run so runtime errors can point back into the template.

use super::scan::{Segment, TagKind};

pub fn function_body(segments: &[Segment]) -> String {
    let mut body = String::new();
    for segment in segments {
        match segment {
            Segment::Text { text, line } => {
                body.push_str(&format!("    ; __line = {line}; __append({});\n", js_string(text)));
            }
            Segment::Tag { kind, code, line } => {
                body.push_str(&format!("    ; __line = {line}\n"));
                match kind {
                    TagKind::Scriptlet => {
                        body.push_str("    ; ");
                        body.push_str(code);
                        body.push('\n');
                    }
                    TagKind::Escaped => {
                        body.push_str("    ; __append(escapeFn(");
                        push_expression(&mut body, code);
                        body.push_str("))\n");
                    }
                    TagKind::Raw => {
                        body.push_str("    ; __append(");
                        push_expression(&mut body, code);
                        body.push_str(")\n");
                    }
                }
            }
        }
    }
    body
}

/// Output tags may end in `;` and may end in a line comment. Neither may
/// swallow the closing parenthesis.
fn push_expression(body: &mut String, code: &str) {
    let trimmed = code.trim_end();
    let expr = trimmed.strip_suffix(';').unwrap_or(trimmed);
    body.push_str(expr);
    let last_line = expr.rsplit('\n').next().unwrap_or(expr);
    if last_line.contains("//") {
        body.push('\n');
    }
}

/// A JSON string literal is also a valid JavaScript string literal.
pub fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}
