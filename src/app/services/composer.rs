//! Merges the three source buffers into one standalone HTML document.
//!
//! The document is never escaped or validated: it only ever runs inside an
//! isolated preview surface.

use std::fmt;
use std::rc::Rc;

use crate::app::domain::{Language, SourceBuffer};

/// A complete document built from a `SourceBuffer`. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument(Rc<str>);

impl ComposedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ComposedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Style goes in the head, markup in the body, script after the markup.
pub fn compose(buffers: &SourceBuffer) -> ComposedDocument {
    let style = buffers.get(Language::Style);
    let markup = buffers.get(Language::Markup);
    let script = buffers.get(Language::Script);

    let mut out = String::with_capacity(buffers.total_len() + 160);
    out.push_str("\n<html>\n  <head>\n    <style>");
    out.push_str(style);
    out.push_str("</style>\n  </head>\n  <body>\n    ");
    out.push_str(markup);
    out.push_str("\n    <script>\n      ");
    out.push_str(script);
    out.push_str("\n    </script>\n  </body>\n</html>\n");

    ComposedDocument(Rc::from(out))
}

/// Memoizes `compose` on the identity of the buffer triple.
#[derive(Default)]
pub struct DocumentComposer {
    last: Option<(SourceBuffer, ComposedDocument)>,
    compositions: u64,
}

impl DocumentComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compose(&mut self, buffers: &SourceBuffer) -> ComposedDocument {
        if let Some((key, doc)) = &self.last {
            if key.same_as(buffers) {
                return doc.clone();
            }
        }
        let doc = compose(buffers);
        self.compositions += 1;
        self.last = Some((buffers.clone(), doc.clone()));
        doc
    }

    /// Number of times the document was actually rebuilt.
    pub fn compositions(&self) -> u64 {
        self.compositions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::buffers::{DEFAULT_MARKUP, DEFAULT_SCRIPT, DEFAULT_STYLE};

    #[test]
    fn test_compose_is_deterministic() {
        let buffers = SourceBuffer::with_defaults();
        let a = compose(&buffers);
        let b = compose(&buffers);
        let c = compose(&SourceBuffer::with_defaults());
        assert_eq!(a.as_str().as_bytes(), b.as_str().as_bytes());
        assert_eq!(a, c);
    }

    #[test]
    fn test_compose_embeds_buffers_verbatim_in_order() {
        let doc = compose(&SourceBuffer::with_defaults());
        let text = doc.as_str();

        let style_at = text.find(DEFAULT_STYLE).expect("style missing");
        let markup_at = text.find(DEFAULT_MARKUP).expect("markup missing");
        let script_at = text.find(DEFAULT_SCRIPT).expect("script missing");
        assert!(style_at < markup_at);
        assert!(markup_at < script_at);
    }

    #[test]
    fn test_compose_layout() {
        let doc = compose(&SourceBuffer::from_texts("<p>m</p>", "p{}", "s()"));
        let text = doc.as_str();
        let head = text.find("<head>").unwrap();
        let style = text.find("<style>p{}</style>").unwrap();
        let body = text.find("<body>").unwrap();
        let script = text.find("<script>").unwrap();
        assert!(head < style && style < body && body < script);
        assert!(text.contains("<p>m</p>"));
        assert!(text.contains("s()"));
        assert!(text.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_markup_is_not_escaped() {
        let buffers = SourceBuffer::with_defaults().set(Language::Markup, "<b>hi</b>");
        let doc = compose(&buffers);
        assert_eq!(doc.as_str().matches("<b>hi</b>").count(), 1);
        assert!(!doc.as_str().contains("&lt;b&gt;"));
    }

    #[test]
    fn test_hostile_content_is_passed_through() {
        let buffers =
            SourceBuffer::from_texts("</body><h1>", "</style><script>x()</script>", "throw 1;");
        let doc = compose(&buffers);
        assert!(doc.as_str().contains("</style><script>x()</script>"));
        assert!(doc.as_str().contains("throw 1;"));
    }

    #[test]
    fn test_composer_memoizes_on_identity() {
        let mut composer = DocumentComposer::new();
        let buffers = SourceBuffer::with_defaults();
        let first = composer.compose(&buffers);
        let second = composer.compose(&buffers.clone());
        assert_eq!(first, second);
        assert_eq!(composer.compositions(), 1);

        let edited = buffers.set(Language::Script, "alert(1)");
        let third = composer.compose(&edited);
        assert_eq!(composer.compositions(), 2);
        assert!(third.as_str().contains("alert(1)"));
        assert_eq!(third, compose(&edited));
    }
}
