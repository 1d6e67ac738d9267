//! Splits template source into literal text and `<% %>` tags.

use super::SyntaxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<% code %>`
    Scriptlet,
    /// `<%= expr %>`
    Escaped,
    /// `<%- expr %>`
    Raw,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text { text: String, line: usize },
    Tag { kind: TagKind, code: String, line: usize },
}

/// Whitespace handling requested by the previous closing tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trim {
    None,
    /// `-%>`: drop one following newline.
    Newline,
    /// `_%>`: drop following spaces and tabs.
    Blanks,
}

pub fn scan(src: &str) -> Result<Vec<Segment>, SyntaxError> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut text_line = 1;
    let mut line = 1;
    let mut trim = Trim::None;
    let mut rest = src;

    while let Some(open) = rest.find("<%") {
        let before = &rest[..open];
        push_text(&mut text, before, &mut trim);
        line += newlines(before);

        let after_open = &rest[open + 2..];
        if let Some(after_literal) = after_open.strip_prefix('%') {
            text.push_str("<%");
            rest = after_literal;
            continue;
        }

        let (opener, kind, body) = match after_open.as_bytes().first() {
            Some(b'=') => ("<%=", Some(TagKind::Escaped), &after_open[1..]),
            Some(b'-') => ("<%-", Some(TagKind::Raw), &after_open[1..]),
            Some(b'#') => ("<%#", None, &after_open[1..]),
            Some(b'_') => ("<%_", Some(TagKind::Scriptlet), &after_open[1..]),
            _ => ("<%", Some(TagKind::Scriptlet), after_open),
        };

        if opener == "<%_" {
            let kept = text.trim_end_matches([' ', '\t']).len();
            text.truncate(kept);
        }

        let Some(close) = body.find("%>") else {
            return Err(SyntaxError::new(
                line,
                format!("could not find matching close tag for \"{opener}\""),
            ));
        };

        let mut code = &body[..close];
        let closing = if let Some(stripped) = code.strip_suffix('-') {
            code = stripped;
            Trim::Newline
        } else if let Some(stripped) = code.strip_suffix('_') {
            code = stripped;
            Trim::Blanks
        } else {
            Trim::None
        };

        if !text.is_empty() {
            segments.push(Segment::Text {
                text: std::mem::take(&mut text),
                line: text_line,
            });
        }
        if let Some(kind) = kind {
            segments.push(Segment::Tag {
                kind,
                code: code.to_string(),
                line,
            });
        }

        line += newlines(&body[..close + 2]);
        rest = &body[close + 2..];
        trim = closing;
        text_line = line;
    }

    push_text(&mut text, rest, &mut trim);
    if !text.is_empty() {
        segments.push(Segment::Text {
            text,
            line: text_line,
        });
    }

    Ok(segments)
}

fn push_text(buf: &mut String, piece: &str, trim: &mut Trim) {
    let piece = match std::mem::replace(trim, Trim::None) {
        Trim::None => piece,
        Trim::Newline => piece
            .strip_prefix("\r\n")
            .or_else(|| piece.strip_prefix('\n'))
            .unwrap_or(piece),
        Trim::Blanks => piece.trim_start_matches([' ', '\t']),
    };
    if piece.contains("%%>") {
        buf.push_str(&piece.replace("%%>", "%>"));
    } else {
        buf.push_str(piece);
    }
}

fn newlines(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}
