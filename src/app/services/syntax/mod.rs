//! Syntax highlighting for the three editor buffers.

mod style_map;

use fltk::enums::Font;
use fltk::text::StyleTableEntry;
use syntect::highlighting::{HighlightIterator, HighlightState, Highlighter, ThemeSet};
use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};

use style_map::StyleMap;

use crate::app::domain::{Language, SyntaxTheme};

/// Style char for text the highlighter has nothing to say about.
pub const PLAIN_STYLE: char = 'A';

pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme: SyntaxTheme,
    style_map: StyleMap,
}

impl SyntaxHighlighter {
    pub fn new(theme: SyntaxTheme, font: Font, font_size: i32) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme,
            style_map: StyleMap::new(font, font_size),
        }
    }

    /// One style char per byte of `text`, for `TextBuffer` style buffers.
    pub fn highlight(&mut self, language: Language, text: &str) -> String {
        let Some(syntax) = self.syntax_set.find_syntax_by_name(language.syntax_name()) else {
            log::warn!("no bundled syntax for {}", language.syntax_name());
            return plain_style(text);
        };
        let Some(theme) = self.theme_set.themes.get(self.theme.theme_key()) else {
            log::warn!("missing syntax theme {}", self.theme.theme_key());
            return plain_style(text);
        };

        let highlighter = Highlighter::new(theme);
        let mut parse_state = ParseState::new(syntax);
        let mut highlight_state = HighlightState::new(&highlighter, ScopeStack::new());
        let mut styles = String::with_capacity(text.len());

        for line in LinesWithEndings::new(text) {
            let ops = match parse_state.parse_line(line, &self.syntax_set) {
                Ok(ops) => ops,
                Err(e) => {
                    log::debug!("highlight parse error, rest left plain: {e}");
                    styles.extend(std::iter::repeat_n(PLAIN_STYLE, text.len() - styles.len()));
                    return styles;
                }
            };
            for (style, piece) in
                HighlightIterator::new(&mut highlight_state, &ops, line, &highlighter)
            {
                let ch = self.style_map.char_for(style);
                styles.extend(std::iter::repeat_n(ch, piece.len()));
            }
        }
        styles
    }

    pub fn theme(&self) -> SyntaxTheme {
        self.theme
    }

    /// Switch theme. Style chars handed out before are no longer valid.
    pub fn set_theme(&mut self, theme: SyntaxTheme) {
        if self.theme != theme {
            self.theme = theme;
            self.style_map.clear();
        }
    }

    pub fn set_font(&mut self, font: Font, size: i32) {
        self.style_map.set_font(font, size);
    }

    pub fn style_table(&self) -> Vec<StyleTableEntry> {
        self.style_map.entries().to_vec()
    }

    /// Editor background and foreground of the current theme.
    pub fn theme_colors(&self) -> Option<((u8, u8, u8), (u8, u8, u8))> {
        let settings = &self.theme_set.themes.get(self.theme.theme_key())?.settings;
        let bg = settings.background?;
        let fg = settings.foreground?;
        Some(((bg.r, bg.g, bg.b), (fg.r, fg.g, fg.b)))
    }
}

pub fn plain_style(text: &str) -> String {
    std::iter::repeat_n(PLAIN_STYLE, text.len()).collect()
}

/// Lines of `text`, each keeping its trailing newline.
struct LinesWithEndings<'a> {
    text: &'a str,
}

impl<'a> LinesWithEndings<'a> {
    fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl<'a> Iterator for LinesWithEndings<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.text.is_empty() {
            return None;
        }
        let end = self.text.find('\n').map_or(self.text.len(), |i| i + 1);
        let (line, rest) = self.text.split_at(end);
        self.text = rest;
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::buffers::{DEFAULT_MARKUP, DEFAULT_SCRIPT, DEFAULT_STYLE};

    fn highlighter() -> SyntaxHighlighter {
        SyntaxHighlighter::new(SyntaxTheme::Base16OceanDark, Font::Courier, 14)
    }

    #[test]
    fn test_style_string_covers_every_byte() {
        let mut hl = highlighter();
        for (lang, text) in [
            (Language::Markup, DEFAULT_MARKUP),
            (Language::Style, DEFAULT_STYLE),
            (Language::Script, DEFAULT_SCRIPT),
            (Language::Script, "let s = \"héllo ✓\";\n"),
        ] {
            let styles = hl.highlight(lang, text);
            assert_eq!(styles.len(), text.len(), "{lang}");
            assert!(styles.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_code_gets_more_than_one_style() {
        let mut hl = highlighter();
        let styles = hl.highlight(Language::Script, "function f() { return 42; }\n");
        let distinct: std::collections::HashSet<char> = styles.chars().collect();
        assert!(distinct.len() > 1);
        assert!(hl.style_table().len() >= distinct.len());
    }

    #[test]
    fn test_set_theme_resets_table() {
        let mut hl = highlighter();
        hl.highlight(Language::Style, DEFAULT_STYLE);
        assert!(hl.style_table().len() > 1);

        hl.set_theme(SyntaxTheme::InspiredGitHub);
        assert_eq!(hl.theme(), SyntaxTheme::InspiredGitHub);
        assert_eq!(hl.style_table().len(), 1);
    }

    #[test]
    fn test_default_themes_have_colors() {
        let mut hl = highlighter();
        assert!(hl.theme_colors().is_some());
        hl.set_theme(SyntaxTheme::InspiredGitHub);
        let (bg, _) = hl.theme_colors().unwrap();
        assert_eq!(bg, (255, 255, 255));
    }

    #[test]
    fn test_lines_with_endings() {
        let lines: Vec<&str> = LinesWithEndings::new("a\nb\n\nc").collect();
        assert_eq!(lines, vec!["a\n", "b\n", "\n", "c"]);
        assert_eq!(LinesWithEndings::new("").count(), 0);
    }

    #[test]
    fn test_plain_style() {
        assert_eq!(plain_style("héllo"), "AAAAAA");
    }
}
