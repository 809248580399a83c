//! The three source buffers a playground is composed from.
//!
//! `SourceBuffer` is an immutable value: `set` returns a new buffer that
//! shares the untouched entries with the old one, so a write to one language
//! can never disturb the other two.

use std::rc::Rc;

use super::language::Language;

pub const DEFAULT_MARKUP: &str = "<div id=\"app\">\n  <h1>Hello World!</h1>\n  <p>Start editing to see some magic happen!</p>\n</div>";

pub const DEFAULT_STYLE: &str =
    "body {\n  font-family: sans-serif;\n  padding: 20px;\n}\n\nh1 {\n  color: #333;\n}";

pub const DEFAULT_SCRIPT: &str =
    "console.log(\"Welcome to CodeBench!\");\n\n// Try editing this code and check the console!";

/// Text for every `Language`, indexed by `Language::index`.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    entries: [Rc<str>; 3],
}

impl SourceBuffer {
    /// Buffers holding the bundled sample program.
    pub fn with_defaults() -> Self {
        Self::from_texts(DEFAULT_MARKUP, DEFAULT_STYLE, DEFAULT_SCRIPT)
    }

    pub fn from_texts(markup: &str, style: &str, script: &str) -> Self {
        Self {
            entries: [Rc::from(markup), Rc::from(style), Rc::from(script)],
        }
    }

    pub fn get(&self, language: Language) -> &str {
        &self.entries[language.index()]
    }

    /// Replace the text for one language. The other two entries are shared
    /// with `self`.
    pub fn set(&self, language: Language, text: &str) -> SourceBuffer {
        let mut entries = self.entries.clone();
        entries[language.index()] = Rc::from(text);
        SourceBuffer { entries }
    }

    /// True when both buffers hold the very same allocation for `language`.
    pub fn shares_entry(&self, other: &SourceBuffer, language: Language) -> bool {
        Rc::ptr_eq(&self.entries[language.index()], &other.entries[language.index()])
    }

    /// True when every entry is shared with `other`.
    pub fn same_as(&self, other: &SourceBuffer) -> bool {
        Language::ALL.iter().all(|&lang| self.shares_entry(other, lang))
    }

    /// Total size in bytes across all three buffers.
    pub fn total_len(&self) -> usize {
        self.entries.iter().map(|e| e.len()).sum()
    }
}

impl Default for SourceBuffer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
