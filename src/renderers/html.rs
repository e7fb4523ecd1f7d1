//! Read-only HTML preview of marker text
//!
//! Used where a note is shown without an editor (cards on the canvas).
//! Backtick spans render as monospace and are not scanned for markers; the
//! rest goes through the marker decoder. Leading spaces of each line are kept
//! as `&nbsp;` and line breaks become `<br>`.

use crate::models::{FormatKind, Fragment};
use crate::parse::markers::decode_text;

const MONOSPACE_OPEN: &str = r#"<span style="font-family:Consolas; background:#f4f4f4;">"#;

fn tag(kind: FormatKind) -> &'static str {
    match kind {
        FormatKind::Bold => "b",
        FormatKind::Italic => "i",
        FormatKind::Underline => "u",
        FormatKind::Strikethrough => "s",
    }
}

/// Escape text for use inside HTML element content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn push_fragment(out: &mut String, fragment: &Fragment) {
    for kind in fragment.formats.iter() {
        out.push('<');
        out.push_str(tag(kind));
        out.push('>');
    }
    out.push_str(&escape_html(&fragment.text));
    for kind in fragment.formats.iter().rev() {
        out.push_str("</");
        out.push_str(tag(kind));
        out.push('>');
    }
}

fn push_marked(out: &mut String, text: &str) {
    for fragment in decode_text(text).fragments {
        push_fragment(out, &fragment);
    }
}

/// Render marker text as an HTML snippet
pub fn marker_text_to_html(text: &str) -> String {
    let mut body = String::with_capacity(text.len() * 2);
    let mut rest = text;

    while let Some(open) = rest.find('`') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('`').filter(|&len| len > 0) else {
            break;
        };
        push_marked(&mut body, &rest[..open]);
        body.push_str(MONOSPACE_OPEN);
        body.push_str(&escape_html(&after[..close]));
        body.push_str("</span>");
        rest = &after[close + 1..];
    }
    push_marked(&mut body, rest);

    body.split('\n')
        .map(|line| {
            let spaces = line.len() - line.trim_start_matches(' ').len();
            format!("{}{}", "&nbsp;".repeat(spaces), &line[spaces..])
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_become_tags() {
        assert_eq!(
            marker_text_to_html("**bold**, *it* and ~~gone~~"),
            "<b>bold</b>, <i>it</i> and <s>gone</s>"
        );
        assert_eq!(marker_text_to_html("***both***"), "<b><i>both</i></b>");
        assert_eq!(marker_text_to_html("__u__"), "<u>u</u>");
    }

    #[test]
    fn test_backticks_are_monospace_and_literal() {
        assert_eq!(
            marker_text_to_html("run `a **b**` now"),
            format!("run {}a **b**</span> now", MONOSPACE_OPEN)
        );
        // a lone backtick stays text
        assert_eq!(marker_text_to_html("it`s"), "it`s");
    }

    #[test]
    fn test_escaping_and_line_handling() {
        assert_eq!(
            marker_text_to_html("a < b & c\n  indented"),
            "a &lt; b &amp; c<br>&nbsp;&nbsp;indented"
        );
    }
}
