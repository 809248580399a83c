use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fltk::{
    app::Sender,
    enums::{Color, Font},
    prelude::*,
    text::{TextBuffer, TextEditor, WrapMode},
};

use crate::app::controllers::tabs::EditorHandle;
use crate::app::domain::{Language, Message, SyntaxTheme};
use crate::app::infrastructure::buffer::read_buffer_text;
use crate::app::infrastructure::error::Result;
use crate::app::services::format::format_source;
use crate::app::services::syntax::{SyntaxHighlighter, plain_style};

/// Text and style buffers for one language.
#[derive(Clone)]
struct LanguageBuffer {
    text: TextBuffer,
    style: TextBuffer,
}

/// The editor widget plus one buffer per language.
///
/// Cloning yields another handle to the same widget and buffers, so the
/// session can own one as its `EditorHandle` while the window keeps another
/// for theming.
#[derive(Clone)]
pub struct CodeEditor {
    editor: TextEditor,
    buffers: [LanguageBuffer; 3],
    language: Rc<Cell<Language>>,
    highlighter: Rc<RefCell<SyntaxHighlighter>>,
    highlighting: Rc<Cell<bool>>,
    tab_size: Rc<Cell<u32>>,
    show_line_numbers: Rc<Cell<bool>>,
}

impl CodeEditor {
    /// Wrap `editor`, fill the buffers with `initial` and report every edit
    /// as `Message::BufferEdited`.
    pub fn new(
        editor: TextEditor,
        initial: impl Fn(Language) -> String,
        highlighter: SyntaxHighlighter,
        sender: &Sender<Message>,
    ) -> Self {
        let buffers = Language::ALL.map(|lang| {
            let mut text = TextBuffer::default();
            let mut style = TextBuffer::default();
            let content = initial(lang);
            text.set_text(&content);
            style.set_text(&plain_style(&content));

            let mut style_for_cb = style.clone();
            let s = *sender;
            text.add_modify_callback(move |pos, inserted, deleted, _restyled, _deleted_text| {
                if inserted == 0 && deleted == 0 {
                    return;
                }
                // Keep the style buffer the same length until the next rehighlight.
                if deleted > 0 {
                    style_for_cb.remove(pos, pos + deleted);
                }
                if inserted > 0 {
                    let filler: String = std::iter::repeat_n('A', inserted as usize).collect();
                    style_for_cb.insert(pos, &filler);
                }
                s.send(Message::BufferEdited(lang));
            });
            LanguageBuffer { text, style }
        });

        let mut code_editor = Self {
            editor,
            buffers,
            language: Rc::new(Cell::new(Language::Markup)),
            highlighter: Rc::new(RefCell::new(highlighter)),
            highlighting: Rc::new(Cell::new(true)),
            tab_size: Rc::new(Cell::new(2)),
            show_line_numbers: Rc::new(Cell::new(true)),
        };
        code_editor.bind(Language::Markup);
        code_editor
    }

    pub fn widget(&self) -> &TextEditor {
        &self.editor
    }

    pub fn widget_mut(&mut self) -> &mut TextEditor {
        &mut self.editor
    }

    pub fn text(&self, language: Language) -> String {
        read_buffer_text(&self.buffers[language.index()].text)
    }

    /// Replace a buffer's content. Fires `BufferEdited` like a user edit.
    pub fn set_text(&mut self, language: Language, text: &str) {
        self.buffers[language.index()].text.set_text(text);
    }

    pub fn rehighlight(&mut self, language: Language) {
        let text = self.text(language);
        let styles = if self.highlighting.get() {
            self.highlighter.borrow_mut().highlight(language, &text)
        } else {
            plain_style(&text)
        };
        self.buffers[language.index()].style.set_text(&styles);
        if language == self.language.get() {
            self.apply_style_table();
        }
    }

    pub fn rehighlight_all(&mut self) {
        for lang in Language::ALL {
            self.rehighlight(lang);
        }
    }

    pub fn set_highlighting(&mut self, enabled: bool) {
        self.highlighting.set(enabled);
        self.rehighlight_all();
        self.apply_syntax_colors();
    }

    pub fn set_syntax_theme(&mut self, theme: SyntaxTheme) {
        self.highlighter.borrow_mut().set_theme(theme);
        self.rehighlight_all();
        self.apply_syntax_colors();
    }

    /// Paint the editor with the syntax theme's background and foreground.
    /// No-op while highlighting is off, leaving the window theme's colors.
    pub fn apply_syntax_colors(&mut self) {
        if !self.highlighting.get() {
            return;
        }
        if let Some(((br, bg, bb), (fr, fg, fb))) = self.highlighter.borrow().theme_colors() {
            self.editor.set_color(Color::from_rgb(br, bg, bb));
            self.editor.set_text_color(Color::from_rgb(fr, fg, fb));
            self.editor.set_cursor_color(Color::from_rgb(fr, fg, fb));
            self.editor.redraw();
        }
    }

    pub fn set_font(&mut self, font: Font, size: i32) {
        self.editor.set_text_font(font);
        self.editor.set_text_size(size);
        self.highlighter.borrow_mut().set_font(font, size);
        self.apply_style_table();
    }

    pub fn set_tab_size(&mut self, tab_size: u32) {
        self.tab_size.set(tab_size);
        for buf in &mut self.buffers {
            buf.text.set_tab_distance(tab_size as i32);
        }
    }

    pub fn set_word_wrap(&mut self, enabled: bool) {
        let mode = if enabled { WrapMode::AtBounds } else { WrapMode::None };
        self.editor.wrap_mode(mode, 0);
        self.editor.redraw();
    }

    pub fn set_line_numbers(&mut self, enabled: bool) {
        self.show_line_numbers.set(enabled);
        self.update_linenumber_width();
        self.editor.redraw();
    }

    pub fn update_linenumber_width(&mut self) {
        if !self.show_line_numbers.get() {
            self.editor.set_linenumber_width(0);
            return;
        }
        let buf = &self.buffers[self.language.get().index()].text;
        let line_count = buf.count_lines(0, buf.length());
        let digits = ((line_count + 1) as f64).log10().floor() as i32 + 1;
        self.editor.set_linenumber_width((digits * 8 + 16).max(40));
    }

    fn apply_style_table(&mut self) {
        let style = self.buffers[self.language.get().index()].style.clone();
        let table = self.highlighter.borrow().style_table();
        self.editor.set_highlight_data(style, table);
        self.editor.redraw();
    }

    fn bind(&mut self, language: Language) {
        self.language.set(language);
        let buf = &self.buffers[language.index()];
        self.editor.set_buffer(buf.text.clone());
        self.apply_style_table();
        self.update_linenumber_width();
    }
}

impl EditorHandle for CodeEditor {
    fn set_language(&mut self, language: Language) {
        if self.language.get() != language || self.editor.buffer().is_none() {
            self.bind(language);
        }
        self.rehighlight(language);
    }

    fn format(&mut self) -> Result<()> {
        let language = self.language.get();
        let text = self.text(language);
        let formatted = format_source(language, &text, self.tab_size.get())?;
        if formatted != text {
            let cursor = self.editor.insert_position();
            self.set_text(language, &formatted);
            let end = self.buffers[language.index()].text.length();
            self.editor.set_insert_position(cursor.min(end));
        }
        Ok(())
    }

    fn relayout(&mut self) {
        // Fl_Text_Display recomputes wrapping and line starts on resize.
        let (x, y, w, h) = (self.editor.x(), self.editor.y(), self.editor.w(), self.editor.h());
        self.editor.resize(x, y, w, h);
        self.update_linenumber_width();
        self.editor.redraw();
    }
}
