//! Static projection of a composed document for the docked preview.
//!
//! The docked panel is an FLTK `HelpView`, which renders a subset of HTML and
//! runs no code. `<script>` and `<style>` elements are removed entirely so
//! their source text never shows up as page content.

const STRIPPED_ELEMENTS: &[&str] = &["script", "style"];

pub fn project(document: &str) -> String {
    let lower = document.to_ascii_lowercase();
    let mut out = String::with_capacity(document.len());
    let mut pos = 0;

    while let Some((start, end)) = next_stripped_element(&lower, pos) {
        out.push_str(&document[pos..start]);
        pos = end;
    }
    out.push_str(&document[pos..]);
    out
}

/// Byte range of the next `<script>` or `<style>` element at or after `from`.
/// An element with no closing tag runs to the end of the document.
fn next_stripped_element(lower: &str, from: usize) -> Option<(usize, usize)> {
    let mut best: Option<(usize, &str)> = None;
    for name in STRIPPED_ELEMENTS {
        let mut search = from;
        while let Some(offset) = lower[search..].find('<') {
            let at = search + offset;
            if is_open_tag(lower, at, name) {
                if best.is_none_or(|(b, _)| at < b) {
                    best = Some((at, name));
                }
                break;
            }
            search = at + 1;
        }
    }

    let (start, name) = best?;
    let closing = format!("</{name}");
    let end = match lower[start..].find(&closing) {
        Some(offset) => {
            let close_at = start + offset;
            lower[close_at..]
                .find('>')
                .map_or(lower.len(), |gt| close_at + gt + 1)
        }
        None => lower.len(),
    };
    Some((start, end))
}

fn is_open_tag(lower: &str, at: usize, name: &str) -> bool {
    let rest = &lower[at + 1..];
    rest.starts_with(name)
        && matches!(
            rest.as_bytes().get(name.len()),
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'/')
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::SourceBuffer;
    use crate::app::services::composer::compose;

    #[test]
    fn test_removes_script_and_style_elements() {
        let html = "<head><style>h1{color:red}</style></head><body><h1>Hi</h1><script>alert(1)</script></body>";
        assert_eq!(project(html), "<head></head><body><h1>Hi</h1></body>");
    }

    #[test]
    fn test_case_insensitive_with_attributes() {
        let html = "<p>a</p><SCRIPT type=\"module\">x()</Script><p>b</p>";
        assert_eq!(project(html), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_similar_tag_names_are_kept() {
        let html = "<styled-box>keep</styled-box><scripts>keep</scripts>";
        assert_eq!(project(html), html);
    }

    #[test]
    fn test_unterminated_element_runs_to_end() {
        assert_eq!(project("<p>x</p><script>never closed"), "<p>x</p>");
    }

    #[test]
    fn test_composed_default_document() {
        let doc = compose(&SourceBuffer::with_defaults());
        let projected = project(doc.as_str());
        assert!(projected.contains("<h1>Hello World!</h1>"));
        assert!(!projected.contains("console.log"));
        assert!(!projected.contains("font-family"));
    }

    #[test]
    fn test_non_ascii_text_survives() {
        let html = "<p>héllo ✓</p><style>p{}</style><p>wörld</p>";
        assert_eq!(project(html), "<p>héllo ✓</p><p>wörld</p>");
    }
}
