//! Constrained markdown rendering for report text.
//!
//! The backend emits a small markdown subset: `#`/`##`/`###` headings, bold,
//! italic, and flat list items. This renderer is a line-oriented scanner:
//! each line is classified once (heading, list item, plain) and inline spans
//! are applied in a single pass, so there is no cross-rule interference
//! between block and inline markup.
//!
//! Output is an HTML fragment. Headings shift down to `<h3>`..`<h5>` so they
//! nest under the page's own headings. List items are emitted bare (`<li>`
//! without a wrapping `<ul>`/`<ol>`); the caller owns the list container.
//! Input is trusted backend output and is not HTML-escaped.

use once_cell::sync::Lazy;
use regex::Regex;

static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| {
    // `1. item`, `12. item`
    Regex::new(r"^\d+\.\s+").unwrap()
});

/// Render a markdown string to an HTML fragment.
///
/// Pure function: no shared state, safe to call concurrently.
pub fn render(text: &str) -> String {
    let mut html = String::with_capacity(text.len() + text.len() / 4);
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len().saturating_sub(1);

    for (idx, line) in lines.iter().enumerate() {
        match classify(line) {
            Line::Heading { level, rest } => {
                let tag = heading_tag(level);
                html.push('<');
                html.push_str(tag);
                html.push('>');
                render_inline(rest, &mut html);
                html.push_str("</");
                html.push_str(tag);
                html.push('>');
            }
            Line::ListItem(rest) => {
                html.push_str("<li>");
                render_inline(rest, &mut html);
                html.push_str("</li>");
            }
            Line::Plain(rest) => {
                render_inline(rest, &mut html);
                if idx != last {
                    html.push_str("<br>");
                }
            }
        }
    }

    html
}

enum Line<'a> {
    Heading { level: usize, rest: &'a str },
    ListItem(&'a str),
    Plain(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if (1..=3).contains(&hashes) {
        if let Some(rest) = line[hashes..].strip_prefix(' ') {
            return Line::Heading {
                level: hashes,
                rest: rest.trim_start(),
            };
        }
    }

    if let Some(rest) = line.strip_prefix("- ") {
        return Line::ListItem(rest);
    }
    if let Some(found) = ORDERED_ITEM.find(line) {
        return Line::ListItem(&line[found.end()..]);
    }

    Line::Plain(line)
}

/// Page-level `<h1>`/`<h2>` are reserved for the shell, so markdown heading
/// levels 1..=3 map to `<h3>`..`<h5>`.
fn heading_tag(level: usize) -> &'static str {
    match level {
        1 => "h3",
        2 => "h4",
        _ => "h5",
    }
}

/// Single-pass inline span tokenizer: `**` toggles bold, `*` toggles italic.
/// Spans left open at end of line are closed so the fragment stays balanced.
fn render_inline(text: &str, out: &mut String) {
    let mut bold_open = false;
    let mut italic_open = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '*' {
            out.push(ch);
            continue;
        }

        if chars.peek() == Some(&'*') {
            chars.next();
            out.push_str(if bold_open { "</strong>" } else { "<strong>" });
            bold_open = !bold_open;
        } else {
            out.push_str(if italic_open { "</em>" } else { "<em>" });
            italic_open = !italic_open;
        }
    }

    if italic_open {
        out.push_str("</em>");
    }
    if bold_open {
        out.push_str("</strong>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_then_italic_in_order() {
        let html = render("**bold** and *italic*");

        let bold_at = html.find("<strong>bold</strong>").unwrap();
        let italic_at = html.find("<em>italic</em>").unwrap();
        assert!(bold_at < italic_at);
    }

    #[test]
    fn headings_shift_down_three_levels() {
        let html = render("# Title\n## Sub");
        assert_eq!(html, "<h3>Title</h3><h4>Sub</h4>");
    }

    #[test]
    fn third_level_heading_maps_to_h5() {
        assert_eq!(render("### Deep"), "<h5>Deep</h5>");
    }

    #[test]
    fn hash_without_space_is_plain_text() {
        assert_eq!(render("#hashtag"), "#hashtag");
    }

    #[test]
    fn list_items_have_no_container() {
        let html = render("- first\n- second");
        assert_eq!(html, "<li>first</li><li>second</li>");
    }

    #[test]
    fn numeric_items_become_list_items() {
        let html = render("1. one\n2. two");
        assert_eq!(html, "<li>one</li><li>two</li>");
    }

    #[test]
    fn plain_lines_join_with_breaks() {
        assert_eq!(render("a\nb"), "a<br>b");
        assert_eq!(render("a\n\nb"), "a<br><br>b");
    }

    #[test]
    fn no_trailing_break_on_last_line() {
        assert_eq!(render("only"), "only");
    }

    #[test]
    fn inline_spans_inside_heading() {
        assert_eq!(render("# A **big** deal"), "<h3>A <strong>big</strong> deal</h3>");
    }

    #[test]
    fn unclosed_span_is_balanced_at_line_end() {
        assert_eq!(render("**loud"), "<strong>loud</strong>");
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render(""), "");
    }
}
