//! Response formatter
//!
//! Turns lightweight markup in model answers into HTML structure. The rules
//! run in a fixed order and each one sees the output of the previous ones.
//!
//! [`format_response`] does not escape anything. Model output is untrusted, so
//! anything that ends up in a page must go through [`render_response`], which
//! escapes the raw text before formatting it.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("formatter pattern must compile")
}

static NUMBERED_HEADING: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^(\d+\.[ \t]+)(.+)$"));
static HASH_HEADING: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^(#{1,6})[ \t]*(.+)$"));
static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)^(?:[-*][ \t]+(.+)|(\d+\.)[ \t]+(.+))$"));
static LIST_RUN: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^<li>.*</li>$(?:\n<li>.*</li>$)*"));
static STRONG_STARS: Lazy<Regex> = Lazy::new(|| compile(r"\*\*(.+?)\*\*"));
static STRONG_UNDERSCORES: Lazy<Regex> = Lazy::new(|| compile(r"__(.+?)__"));
static EM_STAR: Lazy<Regex> = Lazy::new(|| compile(r"\*(.+?)\*"));
static EM_UNDERSCORE: Lazy<Regex> = Lazy::new(|| compile(r"_(.+?)_"));
static BLOCKQUOTE: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^(?:>|&gt;)[ \t]*(.+)$"));
static FENCED_CODE: Lazy<Regex> = Lazy::new(|| compile(r"(?s)```(.*?)```"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| compile(r"`([^`]+)`"));
static BLOCK_CLOSE: Lazy<Regex> = Lazy::new(|| compile(r"(</h[1-6]>|</p>)"));

/// Line prefixes that already open a block element
const BLOCK_PREFIXES: [&str; 10] = [
    "<h1", "<h2", "<h3", "<h4", "<h5", "<h6", "<ul", "<li", "<blockquote", "<pre",
];

/// Format a raw model answer into HTML structure
///
/// Empty input gives empty output. Unmatched markers are left as literal text.
pub fn format_response(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let text = raw.replace("\r\n", "\n");

    // 1-2. headings
    let text = NUMBERED_HEADING.replace_all(&text, "<h3>${1}${2}</h3>");
    let text = HASH_HEADING.replace_all(&text, |caps: &Captures| {
        let level = caps[1].len();
        format!("<h{0}>{1}</h{0}>", level, &caps[2])
    });

    // 3-4. list items, then one <ul> per run of items
    let text = LIST_ITEM.replace_all(&text, |caps: &Captures| match caps.get(1) {
        Some(item) => format!("<li>{}</li>", item.as_str()),
        None => format!("<li>{} {}</li>", &caps[2], &caps[3]),
    });
    let text = LIST_RUN.replace_all(&text, |caps: &Captures| format!("<ul>{}</ul>", &caps[0]));

    // 5. emphasis
    let text = STRONG_STARS.replace_all(&text, "<strong>${1}</strong>");
    let text = STRONG_UNDERSCORES.replace_all(&text, "<strong>${1}</strong>");
    let text = EM_STAR.replace_all(&text, "<em>${1}</em>");
    let text = EM_UNDERSCORE.replace_all(&text, "<em>${1}</em>");

    // 6. quotes
    let text = BLOCKQUOTE.replace_all(&text, "<blockquote>${1}</blockquote>");

    // 7. code, fenced first so its backticks are not taken as inline spans
    let text = FENCED_CODE.replace_all(&text, "<pre><code>${1}</code></pre>");
    let text = INLINE_CODE.replace_all(&text, "<code>${1}</code>");

    // 8-9. paragraphs, then line breaks after closing tags
    let text = wrap_paragraphs(&text);
    BLOCK_CLOSE.replace_all(&text, "${1}\n").into_owned()
}

/// Escape raw model text, then format it
///
/// This is the only entry point whose output is safe to insert into a page.
pub fn render_response(raw: &str) -> String {
    let escaped = html_escape::encode_text(raw);
    format_response(&escaped)
}

fn is_block_line(line: &str) -> bool {
    BLOCK_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

/// Group loose text lines into `<p>` elements separated by blank lines
fn wrap_paragraphs(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut in_pre = false;

    let flush = |paragraph: &mut Vec<&str>, out: &mut Vec<String>| {
        if !paragraph.is_empty() {
            out.push(format!("<p>{}</p>", paragraph.join("\n")));
            paragraph.clear();
        }
    };

    for line in text.lines() {
        if in_pre {
            out.push(line.to_string());
            if line.contains("</pre>") {
                in_pre = false;
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush(&mut paragraph, &mut out);
        } else if is_block_line(trimmed) {
            flush(&mut paragraph, &mut out);
            out.push(trimmed.to_string());
            if trimmed.starts_with("<pre") && !trimmed.contains("</pre>") {
                in_pre = true;
            }
        } else {
            paragraph.push(trimmed);
        }
    }
    flush(&mut paragraph, &mut out);

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(format_response(""), "");
        assert_eq!(format_response("  \n\n "), "");
    }

    #[test]
    fn test_bold_and_heading() {
        assert!(format_response("**bold**").contains("<strong>bold</strong>"));
        assert_eq!(format_response("# Title"), "<h1>Title</h1>\n");
        assert_eq!(format_response("### Deep"), "<h3>Deep</h3>\n");
    }

    #[test]
    fn test_numbered_line_becomes_heading() {
        assert_eq!(format_response("1. Introduction"), "<h3>1. Introduction</h3>\n");
    }

    #[test]
    fn test_consecutive_items_share_one_list() {
        let out = format_response("- first\n- second\n\nAfter the list");
        assert!(out.contains("<ul><li>first</li>\n<li>second</li></ul>"));
        assert_eq!(out.matches("<ul>").count(), 1);
        assert!(out.contains("<p>After the list</p>"));
    }

    #[test]
    fn test_separate_runs_get_separate_lists() {
        let out = format_response("* a\n\ntext\n\n* b");
        assert_eq!(out.matches("<ul>").count(), 2);
    }

    #[test]
    fn test_emphasis_variants() {
        let out = format_response("__strong__ and *em* and _em2_");
        assert!(out.contains("<strong>strong</strong>"));
        assert!(out.contains("<em>em</em>"));
        assert!(out.contains("<em>em2</em>"));
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(format_response("> wise words"), "<blockquote>wise words</blockquote>");
    }

    #[test]
    fn test_code() {
        let out = format_response("Use `cargo` here");
        assert!(out.contains("<code>cargo</code>"));

        let out = format_response("```\nlet x = 1;\n```");
        assert!(out.contains("<pre><code>\nlet x = 1;\n</code></pre>"));
        assert!(!out.contains("<p>let"));
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let out = format_response("First line\nsame paragraph\n\nSecond");
        assert_eq!(out, "<p>First line\nsame paragraph</p>\n\n<p>Second</p>\n");
    }

    #[test]
    fn test_unmatched_markers_stay_literal() {
        assert_eq!(format_response("*"), "<p>*</p>\n");
        assert!(format_response("**unclosed").contains("**unclosed"));
        assert!(format_response("a_b").contains("a_b"));
        assert!(format_response("`open").contains("`open"));
    }

    #[test]
    fn test_render_escapes_markup() {
        let out = render_response("<script>alert('x')</script>");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_keeps_quotes_and_structure() {
        assert_eq!(render_response("> quoted"), "<blockquote>quoted</blockquote>");
        let out = render_response("# Title\n\n**a** < b");
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<strong>a</strong> &lt; b"));
    }
}
