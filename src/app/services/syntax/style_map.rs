use std::collections::HashMap;

use fltk::enums::{Color, Font};
use fltk::text::StyleTableEntry;
use syntect::highlighting::{FontStyle, Style};

/// Highest style char handed out. Colors past it share the last entry.
const LAST_STYLE: u8 = b'Z';

/// Assigns FLTK style characters ('A', 'B', ...) to syntect styles.
/// 'A' is always plain text in the widget's foreground color.
pub struct StyleMap {
    by_style: HashMap<(u8, u8, u8, bool), char>,
    entries: Vec<StyleTableEntry>,
    font: Font,
    font_size: i32,
}

impl StyleMap {
    pub fn new(font: Font, font_size: i32) -> Self {
        let mut map = Self {
            by_style: HashMap::new(),
            entries: Vec::new(),
            font,
            font_size,
        };
        map.clear();
        map
    }

    pub fn char_for(&mut self, style: Style) -> char {
        let fg = style.foreground;
        let bold = style.font_style.contains(FontStyle::BOLD);
        let key = (fg.r, fg.g, fg.b, bold);
        if let Some(&ch) = self.by_style.get(&key) {
            return ch;
        }

        let next = b'A' + self.entries.len() as u8;
        if next > LAST_STYLE {
            return LAST_STYLE as char;
        }
        let ch = next as char;
        self.entries.push(StyleTableEntry {
            color: Color::from_rgb(fg.r, fg.g, fg.b),
            font: self.font_for(bold),
            size: self.font_size,
        });
        self.by_style.insert(key, ch);
        ch
    }

    pub fn entries(&self) -> &[StyleTableEntry] {
        &self.entries
    }

    /// Forget every assignment. Called when the theme changes.
    pub fn clear(&mut self) {
        self.by_style.clear();
        self.entries.clear();
        self.entries.push(StyleTableEntry {
            color: Color::Foreground,
            font: self.font,
            size: self.font_size,
        });
    }

    pub fn set_font(&mut self, font: Font, size: i32) {
        self.font = font;
        self.font_size = size;
        let bold_font = self.font_for(true);
        let bold: Vec<bool> = {
            let mut flags = vec![false; self.entries.len()];
            for (&(_, _, _, is_bold), &ch) in &self.by_style {
                flags[(ch as u8 - b'A') as usize] = is_bold;
            }
            flags
        };
        for (entry, is_bold) in self.entries.iter_mut().zip(bold) {
            entry.font = if is_bold { bold_font } else { font };
            entry.size = size;
        }
    }

    fn font_for(&self, bold: bool) -> Font {
        const BOLD_VARIANTS: [(Font, Font); 4] = [
            (Font::Courier, Font::CourierBold),
            (Font::Helvetica, Font::HelveticaBold),
            (Font::Times, Font::TimesBold),
            (Font::Screen, Font::ScreenBold),
        ];
        if !bold {
            return self.font;
        }
        BOLD_VARIANTS
            .iter()
            .find(|(regular, _)| *regular == self.font)
            .map_or(self.font, |&(_, bold_font)| bold_font)
    }
}
