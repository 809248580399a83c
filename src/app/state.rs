use std::cell::RefCell;
use std::rc::Rc;

use fltk::{app, app::Sender, dialog, enums::Font, prelude::*};

use super::controllers::layout::ViewportClass;
use super::controllers::preview::Schedule;
use super::domain::{AppSettings, FontChoice, Language, Message, SyntaxTheme};
use super::infrastructure::error::Result;
use super::infrastructure::platform::detect_system_dark_mode;
use super::services::live_server::LiveServer;
use super::services::syntax::SyntaxHighlighter;
use super::session::Session;
use crate::ui::code_editor::CodeEditor;
use crate::ui::dialogs::settings_dialog::show_settings_dialog;
use crate::ui::divider::DIVIDER_WIDTH;
use crate::ui::main_window::MainWidgets;
use crate::ui::preview_overlay::PreviewOverlay;
use crate::ui::theme::apply_theme;
#[cfg(target_os = "windows")]
use crate::ui::theme::set_windows_titlebar_theme;

pub fn font_for(choice: FontChoice) -> Font {
    match choice {
        FontChoice::ScreenBold => Font::ScreenBold,
        FontChoice::Courier => Font::Courier,
        FontChoice::HelveticaMono => Font::Screen,
    }
}

/// Owns the widgets and the session, and turns each `Message` into calls on
/// them.
pub struct AppState {
    pub widgets: MainWidgets,
    pub editor: CodeEditor,
    pub overlay: PreviewOverlay,
    pub session: Session,
    pub sender: Sender<Message>,
    pub settings: Rc<RefCell<AppSettings>>,
    pub dark_mode: bool,
    /// Address of the browser preview once its server is running.
    live_url: Option<String>,
}

impl AppState {
    pub fn new(
        mut widgets: MainWidgets,
        sender: Sender<Message>,
        settings: Rc<RefCell<AppSettings>>,
        dark_mode: bool,
    ) -> Result<Self> {
        let s = settings.borrow().clone();
        let font = font_for(s.font);
        let font_size = s.font_size as i32;

        let mut session = Session::new(&s, widgets.wind.w());

        let highlighter = SyntaxHighlighter::new(s.current_syntax_theme(dark_mode), font, font_size);
        let mut editor = CodeEditor::new(
            widgets.text_editor.clone(),
            |lang| session.buffer(lang).to_string(),
            highlighter,
            &sender,
        );
        editor.set_font(font, font_size);
        editor.set_tab_size(s.tab_size);
        editor.set_word_wrap(s.word_wrap_enabled);
        editor.set_line_numbers(s.line_numbers_enabled);
        editor.set_highlighting(s.highlighting_enabled);
        session.attach_editor(Box::new(editor.clone()))?;
        widgets.tab_bar.set_active(session.active_language());

        let overlay = PreviewOverlay::new(&sender);
        widgets.apply_layout(session.layout());
        session.add_surface(Box::new(widgets.preview.surface()));
        session.add_surface(Box::new(overlay.surface()));

        let mut state = Self {
            widgets,
            editor,
            overlay,
            session,
            sender,
            settings,
            dark_mode,
            live_url: None,
        };
        state.apply_colors();
        state.session.schedule_render();
        state.session.flush_preview();
        state.widgets.set_status("Ready");
        Ok(state)
    }

    pub fn handle(&mut self, msg: Message) {
        match msg {
            Message::BufferEdited(lang) => self.buffer_edited(lang),
            Message::SelectLanguage(lang) => self.select_language(lang),
            Message::FormatCode => self.format_code(),
            Message::ResetCode => self.reset_code(),

            Message::FlushPreview => self.flush_preview(),
            Message::OpenPreviewOverlay => self.run_preview(),
            Message::ClosePreviewOverlay => self.close_overlay(),
            Message::OpenLivePreview => self.open_live_preview(),
            Message::Preview(preview_msg) => {
                let entry = self.session.receive(&preview_msg).clone();
                self.widgets.preview.push_console(&entry);
            }
            Message::ToggleConsole => self.toggle_console(),
            Message::ClearConsole => {
                self.session.clear_console();
                self.widgets.preview.clear_console();
            }

            Message::WindowResized(width) => self.window_resized(width),
            Message::DividerDragged(x) => self.divider_dragged(x),

            Message::ToggleDarkMode => self.toggle_dark_mode(),
            Message::ToggleLineNumbers => self.toggle_line_numbers(),
            Message::ToggleWordWrap => self.toggle_word_wrap(),
            Message::ToggleHighlighting => self.toggle_highlighting(),
            Message::SetFontSize(size) => self.set_font_size(size),

            Message::OpenSettings => self.open_settings(),
            Message::PreviewSyntaxTheme(theme) => self.editor.set_syntax_theme(theme),

            Message::Quit => {
                self.overlay.close();
                self.widgets.wind.hide();
            }
        }
    }

    // --- Editing ---

    fn buffer_edited(&mut self, lang: Language) {
        let text = self.editor.text(lang);
        let schedule = self.session.set_buffer(lang, &text);
        self.editor.rehighlight(lang);
        if lang == self.session.active_language() {
            self.editor.update_linenumber_width();
        }
        self.apply_schedule(schedule);
    }

    fn select_language(&mut self, lang: Language) {
        self.session.select_language(lang);
        self.widgets.tab_bar.set_active(lang);
    }

    fn format_code(&mut self) {
        let lang = self.session.active_language();
        match self.session.format_active() {
            Ok(()) => self.widgets.set_status(&format!("Formatted {lang}")),
            Err(e) => {
                log::warn!("format failed: {e}");
                self.widgets.set_status(&e.to_string());
            }
        }
    }

    fn reset_code(&mut self) {
        let choice = dialog::choice2_default(
            "Replace all three buffers with the sample code?",
            "Cancel",
            "Reset",
            "",
        );
        if choice != Some(1) {
            return;
        }
        let schedule = self.session.reset_buffers();
        for lang in Language::ALL {
            let text = self.session.buffer(lang).to_string();
            self.editor.set_text(lang, &text);
        }
        self.editor.rehighlight_all();
        self.apply_schedule(schedule);
        self.widgets.set_status("Sample code restored");
    }

    // --- Preview ---

    fn apply_schedule(&mut self, schedule: Schedule) {
        match schedule {
            Schedule::FlushNow => self.flush_preview(),
            Schedule::StartTimer(secs) => {
                let s = self.sender;
                app::add_timeout3(secs, move |_| s.send(Message::FlushPreview));
            }
            Schedule::AlreadyPending => {}
        }
    }

    fn flush_preview(&mut self) {
        if let Some(revision) = self.session.flush_preview() {
            log::debug!("rendered revision {revision}");
        }
    }

    /// Run button: render now, and in narrow mode open the overlay.
    fn run_preview(&mut self) {
        if self.session.layout().class() == ViewportClass::Wide {
            self.flush_preview();
            return;
        }
        if self.session.layout().overlay_open() {
            self.flush_preview();
            self.overlay.window.show();
            return;
        }
        self.overlay.open_over(&self.widgets.wind);
        self.session.open_overlay();
    }

    fn close_overlay(&mut self) {
        self.session.close_overlay();
        self.overlay.close();
    }

    fn open_live_preview(&mut self) {
        if self.live_url.is_none() {
            let s = self.sender;
            let port = self.settings.borrow().live_preview_port;
            match LiveServer::start(port, Box::new(move |msg| s.send(Message::Preview(msg)))) {
                Ok(server) => {
                    self.live_url = Some(server.url());
                    self.session.add_surface(Box::new(server));
                }
                Err(e) => {
                    log::error!("could not start live preview: {e}");
                    self.widgets.set_status(&e.to_string());
                    return;
                }
            }
        }
        let Some(url) = self.live_url.clone() else {
            return;
        };
        match open::that(&url) {
            Ok(()) => self.widgets.set_status(&format!("Live preview at {url}")),
            Err(e) => {
                log::warn!("failed to open browser: {e}");
                self.widgets.set_status(&format!("Open {url} in a browser"));
            }
        }
    }

    fn toggle_console(&mut self) {
        let visible = !self.widgets.preview.console_visible();
        self.widgets.preview.set_console_visible(visible);
        self.update_menu_checkbox("View/Toggle Console", visible);
        self.settings.borrow_mut().console_visible = visible;
        self.persist_settings();
    }

    // --- Layout ---

    fn window_resized(&mut self, width: i32) {
        let widgets = &mut self.widgets;
        let changed = self.session.resize(width, |layout| widgets.apply_layout(layout));
        if changed == Some(ViewportClass::Wide) {
            self.overlay.close();
        }
    }

    fn divider_dragged(&mut self, x: i32) {
        let body_x = self.widgets.body.x();
        let body_w = self.widgets.body.w() - DIVIDER_WIDTH;
        let widgets = &mut self.widgets;
        self.session
            .drag_divider(x, body_x, body_w, |layout| widgets.apply_layout(layout));
    }

    // --- View ---

    fn apply_colors(&mut self) {
        apply_theme(&mut self.widgets, self.dark_mode);
        self.editor.apply_syntax_colors();
        #[cfg(target_os = "windows")]
        set_windows_titlebar_theme(&self.widgets.wind, self.dark_mode);
    }

    fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.apply_colors();
        let theme = self.settings.borrow().current_syntax_theme(self.dark_mode);
        self.editor.set_syntax_theme(theme);
        self.update_menu_checkbox("View/Toggle Dark Mode", self.dark_mode);
    }

    fn toggle_line_numbers(&mut self) {
        let enabled = !self.settings.borrow().line_numbers_enabled;
        self.settings.borrow_mut().line_numbers_enabled = enabled;
        self.editor.set_line_numbers(enabled);
        self.persist_settings();
    }

    fn toggle_word_wrap(&mut self) {
        let enabled = !self.settings.borrow().word_wrap_enabled;
        self.settings.borrow_mut().word_wrap_enabled = enabled;
        self.editor.set_word_wrap(enabled);
        self.persist_settings();
    }

    fn toggle_highlighting(&mut self) {
        let enabled = !self.settings.borrow().highlighting_enabled;
        self.settings.borrow_mut().highlighting_enabled = enabled;
        self.editor.set_highlighting(enabled);
        self.persist_settings();
    }

    fn set_font_size(&mut self, size: i32) {
        let font = font_for(self.settings.borrow().font);
        self.editor.set_font(font, size);
        self.editor.update_linenumber_width();
        self.settings.borrow_mut().font_size = size as u32;
        self.persist_settings();
    }

    fn update_menu_checkbox(&self, path: &str, checked: bool) {
        let idx = self.widgets.menu.find_index(path);
        if idx >= 0 {
            if let Some(mut item) = self.widgets.menu.at(idx) {
                if checked {
                    item.set();
                } else {
                    item.clear();
                }
            }
        }
    }

    // --- Settings ---

    fn persist_settings(&self) {
        if let Err(e) = self.settings.borrow().save() {
            log::warn!("failed to save settings: {e}");
        }
    }

    fn open_settings(&mut self) {
        let current = self.settings.borrow().clone();
        if let Some(new_settings) = show_settings_dialog(&current, &self.sender, self.dark_mode) {
            if let Err(e) = new_settings.save() {
                dialog::alert_default(&format!("Failed to save settings: {}", e));
                return;
            }
            self.apply_settings(new_settings);
        }
    }

    pub fn apply_settings(&mut self, new_settings: AppSettings) {
        self.dark_mode = new_settings.theme_mode.is_dark(detect_system_dark_mode());
        self.apply_colors();
        self.update_menu_checkbox("View/Toggle Dark Mode", self.dark_mode);

        let font = font_for(new_settings.font);
        self.editor.set_font(font, new_settings.font_size as i32);
        self.editor.set_tab_size(new_settings.tab_size);

        self.editor.set_line_numbers(new_settings.line_numbers_enabled);
        self.update_menu_checkbox("View/Toggle Line Numbers", new_settings.line_numbers_enabled);

        self.editor.set_word_wrap(new_settings.word_wrap_enabled);
        self.update_menu_checkbox("View/Toggle Word Wrap", new_settings.word_wrap_enabled);

        let theme: SyntaxTheme = new_settings.current_syntax_theme(self.dark_mode);
        self.editor.set_syntax_theme(theme);
        self.editor.set_highlighting(new_settings.highlighting_enabled);
        self.update_menu_checkbox("View/Toggle Syntax Highlighting", new_settings.highlighting_enabled);

        self.widgets.preview.set_console_visible(new_settings.console_visible);
        self.update_menu_checkbox("View/Toggle Console", new_settings.console_visible);

        self.session.set_preview_debounce(new_settings.preview_debounce_ms);

        *self.settings.borrow_mut() = new_settings;
    }
}
