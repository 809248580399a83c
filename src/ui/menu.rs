use fltk::{
    app::Sender,
    enums::{Key, Shortcut},
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::domain::{AppSettings, Language, Message};

fn toggle_flag(on: bool) -> MenuFlag {
    if on { MenuFlag::Toggle | MenuFlag::Value } else { MenuFlag::Toggle }
}

pub fn build_menu(
    menu: &mut MenuBar,
    sender: &Sender<Message>,
    settings: &AppSettings,
    initial_dark_mode: bool,
) {
    let s = sender;

    // File
    menu.add("File/Reset to Sample", Shortcut::None, MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::ResetCode) });
    menu.add("File/Settings...", Shortcut::Ctrl | ',', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::OpenSettings) });
    menu.add("File/Quit", Shortcut::Ctrl | 'q', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Quit) });

    // Code
    for (i, lang) in Language::ALL.into_iter().enumerate() {
        let key = char::from(b'1' + i as u8);
        menu.add(&format!("Code/{}", lang.label()), Shortcut::Ctrl | key, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SelectLanguage(lang)) });
    }
    menu.add("Code/Format", Shortcut::Ctrl | Shortcut::Shift | 'f', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FormatCode) });
    menu.add("Code/Run", Shortcut::Ctrl | Key::Enter, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::OpenPreviewOverlay) });
    menu.add("Code/Open in Browser", Shortcut::Ctrl | 'm', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::OpenLivePreview) });

    // View
    menu.add("View/Toggle Line Numbers", Shortcut::None, toggle_flag(settings.line_numbers_enabled), { let s = *s; move |_| s.send(Message::ToggleLineNumbers) });
    menu.add("View/Toggle Word Wrap", Shortcut::None, toggle_flag(settings.word_wrap_enabled), { let s = *s; move |_| s.send(Message::ToggleWordWrap) });
    menu.add("View/Toggle Dark Mode", Shortcut::None, toggle_flag(initial_dark_mode), { let s = *s; move |_| s.send(Message::ToggleDarkMode) });
    menu.add("View/Toggle Syntax Highlighting", Shortcut::None, toggle_flag(settings.highlighting_enabled), { let s = *s; move |_| s.send(Message::ToggleHighlighting) });
    menu.add("View/Toggle Console", Shortcut::Ctrl | '`', toggle_flag(settings.console_visible), { let s = *s; move |_| s.send(Message::ToggleConsole) });
    menu.add("View/Clear Console", Shortcut::None, MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::ClearConsole) });
    menu.add("View/Font Size/Small (12)", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetFontSize(12)) });
    menu.add("View/Font Size/Medium (16)", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetFontSize(16)) });
    menu.add("View/Font Size/Large (20)", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetFontSize(20)) });
}
