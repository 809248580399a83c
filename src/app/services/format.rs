//! "Format document" for the three source languages.
//!
//! - CSS is validated by lightningcss, then re-indented by brace depth so
//!   comments and values are kept as written.
//! - JavaScript is parsed and regenerated by oxc.
//! - HTML is re-indented by tag depth; text inside `<pre>`, `<script>`,
//!   `<style>` and `<textarea>` is left alone.
//!
//! A source that fails to parse is never modified.

use thiserror::Error;

use crate::app::domain::Language;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("CSS: {0}")]
    Style(String),
    #[error("JavaScript: {0}")]
    Script(String),
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["pre", "script", "style", "textarea"];

/// Format `text` as `language`, indenting with `tab_size` spaces.
pub fn format_source(language: Language, text: &str, tab_size: u32) -> Result<String, FormatError> {
    let tab_size = tab_size.max(1) as usize;
    let formatted = match language {
        Language::Markup => format_markup(text, tab_size),
        Language::Style => format_style(text, tab_size)?,
        Language::Script => format_script(text, tab_size)?,
    };
    Ok(formatted)
}

fn format_style(text: &str, tab_size: usize) -> Result<String, FormatError> {
    use lightningcss::stylesheet::{ParserOptions, StyleSheet};

    StyleSheet::parse(text, ParserOptions::default())
        .map_err(|e| FormatError::Style(e.to_string()))?;
    Ok(reindent_braces(text, tab_size))
}

/// Indent each line by the number of `{` blocks it sits in. Braces inside
/// comments and strings do not count; lines inside a multi-line comment are
/// kept verbatim.
fn reindent_braces(text: &str, tab_size: usize) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut depth: usize = 0;
    let mut in_comment = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if in_comment {
            out.push(line.trim_end().to_string());
        } else if trimmed.is_empty() {
            out.push(String::new());
        } else {
            let line_depth = if trimmed.starts_with('}') { depth.saturating_sub(1) } else { depth };
            out.push(indent(trimmed, line_depth, tab_size));
        }

        let bytes = line.as_bytes();
        let mut quote: Option<u8> = None;
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if in_comment {
                if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    in_comment = false;
                    i += 1;
                }
            } else if let Some(q) = quote {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            } else {
                match b {
                    b'/' if bytes.get(i + 1) == Some(&b'*') => {
                        in_comment = true;
                        i += 1;
                    }
                    b'"' | b'\'' => quote = Some(b),
                    b'{' => depth += 1,
                    b'}' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            i += 1;
        }
    }

    let mut formatted = out.join("\n");
    if text.ends_with('\n') {
        formatted.push('\n');
    }
    formatted
}

fn format_script(text: &str, tab_size: usize) -> Result<String, FormatError> {
    use oxc::allocator::Allocator;
    use oxc::codegen::Codegen;
    use oxc::parser::Parser;
    use oxc::span::SourceType;

    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, text, SourceType::cjs()).parse();
    if let Some(err) = parsed.errors.first() {
        return Err(FormatError::Script(format!("{err}")));
    }
    let generated = Codegen::new().build(&parsed.program).code;
    // oxc indents with one tab per level.
    Ok(reindent_leading(&generated, '\t', 1, tab_size))
}

/// Rewrite leading indentation made of `unit_width` x `unit` per level into
/// `tab_size` spaces per level.
fn reindent_leading(text: &str, unit: char, unit_width: usize, tab_size: usize) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let leading = line.chars().take_while(|&c| c == unit).count();
        let levels = leading / unit_width;
        let remainder = leading % unit_width;
        out.push_str(&" ".repeat(levels * tab_size + remainder));
        out.push_str(line[leading * unit.len_utf8()..].trim_end());
    }
    out
}

fn format_markup(text: &str, tab_size: usize) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut depth: usize = 0;
    let mut raw_until: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(ref closing) = raw_until {
            let Some(pos) = trimmed.to_ascii_lowercase().find(closing.as_str()) else {
                out.push(line.trim_end().to_string());
                continue;
            };
            depth = depth.saturating_sub(1);
            if pos == 0 {
                out.push(indent(trimmed, depth, tab_size));
            } else {
                out.push(line.trim_end().to_string());
            }
            // Tags after the closing one still count.
            let rest = &trimmed[pos..];
            let rest = rest.find('>').map_or("", |gt| &rest[gt + 1..]);
            raw_until = apply_tags(&scan_tags(rest), &mut depth);
            continue;
        }

        if trimmed.is_empty() {
            out.push(String::new());
            continue;
        }

        let tags = scan_tags(trimmed);
        let starts_with_close = matches!(tags.first(), Some(Tag::Close(_))) && trimmed.starts_with("</");
        let line_depth = if starts_with_close { depth.saturating_sub(1) } else { depth };
        out.push(indent(trimmed, line_depth, tab_size));

        raw_until = apply_tags(&tags, &mut depth);
    }

    let mut formatted = out.join("\n");
    if text.ends_with('\n') {
        formatted.push('\n');
    }
    formatted
}

/// Track nesting for one line's tags. Returns the closing tag to wait for
/// when a raw-text element is left open.
fn apply_tags(tags: &[Tag], depth: &mut usize) -> Option<String> {
    let mut open_raw: Option<&str> = None;
    for tag in tags {
        match tag {
            Tag::Open(name) => {
                *depth += 1;
                if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                    open_raw = Some(name.as_str());
                }
            }
            Tag::Close(name) => {
                *depth = depth.saturating_sub(1);
                if open_raw == Some(name.as_str()) {
                    open_raw = None;
                }
            }
        }
    }
    open_raw.map(|name| format!("</{name}"))
}

fn indent(line: &str, depth: usize, tab_size: usize) -> String {
    format!("{}{}", " ".repeat(depth * tab_size), line)
}

#[derive(Debug, PartialEq)]
enum Tag {
    Open(String),
    Close(String),
}

/// Opening and closing tags on one line. Void, self-closing, comment and
/// doctype tags are skipped.
fn scan_tags(line: &str) -> Vec<Tag> {
    let bytes = line.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        let closing = bytes.get(i + 1) == Some(&b'/');
        let name_start = if closing { i + 2 } else { i + 1 };
        let name_len = bytes[name_start.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
            .count();
        if name_len == 0 || !bytes[name_start].is_ascii_alphabetic() {
            i += 1;
            continue;
        }
        let name = line[name_start..name_start + name_len].to_ascii_lowercase();

        // Find the end of the tag, skipping quoted attribute values.
        let mut j = name_start + name_len;
        let mut quote: Option<u8> = None;
        while j < bytes.len() {
            match (quote, bytes[j]) {
                (Some(q), b) if b == q => quote = None,
                (None, b'"') | (None, b'\'') => quote = Some(bytes[j]),
                (None, b'>') => break,
                _ => {}
            }
            j += 1;
        }
        let self_closing = j > 0 && j < bytes.len() && bytes[j - 1] == b'/';

        if closing {
            tags.push(Tag::Close(name));
        } else if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
            tags.push(Tag::Open(name));
        }
        i = j + 1;
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_reindents_nested_tags() {
        let input = "<div>\n<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n</div>";
        let expected = "<div>\n  <ul>\n    <li>one</li>\n    <li>two</li>\n  </ul>\n</div>";
        assert_eq!(format_source(Language::Markup, input, 2).unwrap(), expected);
    }

    #[test]
    fn test_markup_respects_tab_size() {
        let input = "<section>\n<p>hi</p>\n</section>";
        let expected = "<section>\n    <p>hi</p>\n</section>";
        assert_eq!(format_source(Language::Markup, input, 4).unwrap(), expected);
    }

    #[test]
    fn test_markup_void_and_self_closing_tags_do_not_nest() {
        let input = "<div>\n<img src=\"a.png\">\n<br/>\n<input type=\"text\" />\n<p>after</p>\n</div>";
        let expected =
            "<div>\n  <img src=\"a.png\">\n  <br/>\n  <input type=\"text\" />\n  <p>after</p>\n</div>";
        assert_eq!(format_source(Language::Markup, input, 2).unwrap(), expected);
    }

    #[test]
    fn test_markup_leaves_raw_text_alone() {
        let input = "<div>\n<pre>\n  keep   this\nas is\n</pre>\n</div>";
        let expected = "<div>\n  <pre>\n  keep   this\nas is\n  </pre>\n</div>";
        assert_eq!(format_source(Language::Markup, input, 2).unwrap(), expected);
    }

    #[test]
    fn test_markup_raw_text_closed_mid_line() {
        let input = "<div>\n<pre>\nfoo</pre>\n<p>x</p>\n</div>";
        let expected = "<div>\n  <pre>\nfoo</pre>\n  <p>x</p>\n</div>";
        assert_eq!(format_source(Language::Markup, input, 2).unwrap(), expected);
    }

    #[test]
    fn test_markup_quoted_angle_bracket_in_attribute() {
        let tags = scan_tags(r##"<a title="x > y" href="#">link</a>"##);
        assert_eq!(tags, vec![Tag::Open("a".into()), Tag::Close("a".into())]);
    }

    #[test]
    fn test_markup_ignores_comments_and_doctype() {
        assert!(scan_tags("<!DOCTYPE html>").is_empty());
        assert!(scan_tags("<!-- note -->").is_empty());
        assert!(scan_tags("a < b").is_empty());
    }

    #[test]
    fn test_markup_is_idempotent_on_default_sample() {
        let sample = crate::app::domain::buffers::DEFAULT_MARKUP;
        assert_eq!(format_source(Language::Markup, sample, 2).unwrap(), sample);
    }

    #[test]
    fn test_markup_keeps_trailing_newline() {
        let out = format_source(Language::Markup, "<p>x</p>\n", 2).unwrap();
        assert_eq!(out, "<p>x</p>\n");
    }

    #[test]
    fn test_style_reindents_by_brace_depth() {
        let input = "h1 {\ncolor: red;\n}\n@media (max-width: 600px) {\nh1 {\n        font-size: 1rem;\n}\n}\n";
        let expected =
            "h1 {\n    color: red;\n}\n@media (max-width: 600px) {\n    h1 {\n        font-size: 1rem;\n    }\n}\n";
        assert_eq!(format_source(Language::Style, input, 4).unwrap(), expected);
    }

    #[test]
    fn test_style_keeps_comments_and_values() {
        let input = "/* brand colour */\nh1 { color: #333; }\np {\nmargin: 0px 0px 0px 0px;\ncolor: #ff0000;\n}";
        let out = format_source(Language::Style, input, 2).unwrap();
        assert_eq!(
            out,
            "/* brand colour */\nh1 { color: #333; }\np {\n  margin: 0px 0px 0px 0px;\n  color: #ff0000;\n}"
        );
    }

    #[test]
    fn test_style_ignores_braces_in_comments_and_strings() {
        let input = "/* {\n  not a block\n*/\na::before {\ncontent: \"{\";\n}\nb {\ncolor: blue;\n}";
        let expected = "/* {\n  not a block\n*/\na::before {\n  content: \"{\";\n}\nb {\n  color: blue;\n}";
        assert_eq!(format_source(Language::Style, input, 2).unwrap(), expected);
    }

    #[test]
    fn test_style_rejects_invalid_css() {
        assert!(matches!(
            format_source(Language::Style, "h1[ { color: red }", 2),
            Err(FormatError::Style(_))
        ));
    }

    #[test]
    fn test_script_formats_valid_js() {
        let out = format_source(Language::Script, "function f(a){return a+1}", 2).unwrap();
        assert!(out.contains("function f(a) {"));
        assert!(out.contains("\n  return a + 1;"));
    }

    #[test]
    fn test_script_rejects_syntax_errors() {
        let err = format_source(Language::Script, "function (", 2).unwrap_err();
        assert!(matches!(err, FormatError::Script(_)));
        assert!(err.to_string().starts_with("JavaScript: "));
    }

    #[test]
    fn test_reindent_leading() {
        assert_eq!(reindent_leading("a\n\tb\n\t\tc", '\t', 1, 4), "a\n    b\n        c");
        assert_eq!(reindent_leading("x\n  y\n   z", ' ', 2, 4), "x\n    y\n     z");
    }
}
