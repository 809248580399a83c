use fltk::{
    app::Sender,
    button::{Button, CheckButton, RadioRoundButton},
    enums::Align,
    frame::Frame,
    group::Group,
    menu::Choice,
    misc::Spinner,
    prelude::*,
    window::Window,
};
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::domain::{AppSettings, FontChoice, Language, Message, SyntaxTheme, ThemeMode};

fn section_label(y: i32, label: &str) {
    Frame::default()
        .with_pos(15, y)
        .with_size(320, 25)
        .with_label(label)
        .with_align(Align::Left | Align::Inside);
}

fn spinner_row(y: i32, label: &str, min: f64, max: f64, step: f64, value: f64) -> Spinner {
    Frame::default()
        .with_pos(30, y)
        .with_size(180, 25)
        .with_label(label)
        .with_align(Align::Left | Align::Inside);
    let mut spinner = Spinner::default().with_pos(220, y).with_size(90, 25);
    spinner.set_range(min, max);
    spinner.set_step(step);
    spinner.set_value(value.clamp(min, max));
    spinner
}

/// Show settings dialog and return updated settings if user clicked Save.
/// The sender is used to send live preview messages for theme changes.
pub fn show_settings_dialog(
    current_settings: &AppSettings,
    sender: &Sender<Message>,
    is_dark: bool,
) -> Option<AppSettings> {
    let mut dialog = Window::default()
        .with_size(350, 790)
        .with_label("Settings")
        .center_screen();
    dialog.make_modal(true);

    // Theme section
    section_label(15, "Theme:");
    let theme_group = Group::default().with_pos(30, 45).with_size(280, 75);
    let mut theme_light = RadioRoundButton::default().with_pos(30, 45).with_size(280, 25).with_label("Light");
    let mut theme_dark = RadioRoundButton::default().with_pos(30, 70).with_size(280, 25).with_label("Dark");
    let mut theme_system = RadioRoundButton::default().with_pos(30, 95).with_size(280, 25).with_label("System Default");
    theme_group.end();

    match current_settings.theme_mode {
        ThemeMode::Light => theme_light.set_value(true),
        ThemeMode::Dark => theme_dark.set_value(true),
        ThemeMode::SystemDefault => theme_system.set_value(true),
    }

    // Syntax Theme section
    section_label(130, "Syntax Theme (Light Mode):");
    let mut theme_light_choice = Choice::default().with_pos(30, 155).with_size(280, 25);
    for theme in SyntaxTheme::all() {
        theme_light_choice.add_choice(theme.display_name());
    }
    theme_light_choice.set_value(theme_index(current_settings.syntax_theme_light));

    section_label(185, "Syntax Theme (Dark Mode):");
    let mut theme_dark_choice = Choice::default().with_pos(30, 210).with_size(280, 25);
    for theme in SyntaxTheme::all() {
        theme_dark_choice.add_choice(theme.display_name());
    }
    theme_dark_choice.set_value(theme_index(current_settings.syntax_theme_dark));

    // Live preview callbacks for theme changes
    let sender_light = *sender;
    theme_light_choice.set_callback(move |c| {
        if !is_dark {
            if let Some(theme) = index_to_theme(c.value()) {
                sender_light.send(Message::PreviewSyntaxTheme(theme));
            }
        }
    });

    let sender_dark = *sender;
    theme_dark_choice.set_callback(move |c| {
        if is_dark {
            if let Some(theme) = index_to_theme(c.value()) {
                sender_dark.send(Message::PreviewSyntaxTheme(theme));
            }
        }
    });

    // Font section
    section_label(245, "Font:");
    let font_group = Group::default().with_pos(30, 275).with_size(280, 75);
    let mut font_screenbold = RadioRoundButton::default().with_pos(30, 275).with_size(280, 25).with_label("Screen (Bold)");
    let mut font_courier = RadioRoundButton::default().with_pos(30, 300).with_size(280, 25).with_label("Courier");
    let mut font_helvetica = RadioRoundButton::default().with_pos(30, 325).with_size(280, 25).with_label("Helvetica Mono");
    font_group.end();

    match current_settings.font {
        FontChoice::ScreenBold => font_screenbold.set_value(true),
        FontChoice::Courier => font_courier.set_value(true),
        FontChoice::HelveticaMono => font_helvetica.set_value(true),
    }

    let font_size = spinner_row(355, "Font size:", 6.0, 72.0, 1.0, f64::from(current_settings.font_size));

    // Editor section
    section_label(390, "Editor:");
    let mut check_line_numbers = CheckButton::default().with_pos(30, 420).with_size(280, 25).with_label("Show Line Numbers");
    check_line_numbers.set_value(current_settings.line_numbers_enabled);
    let mut check_word_wrap = CheckButton::default().with_pos(30, 445).with_size(280, 25).with_label("Word Wrap");
    check_word_wrap.set_value(current_settings.word_wrap_enabled);
    let mut check_highlighting = CheckButton::default().with_pos(30, 470).with_size(280, 25).with_label("Syntax Highlighting");
    check_highlighting.set_value(current_settings.highlighting_enabled);
    let tab_size = spinner_row(500, "Indent width:", 1.0, 16.0, 1.0, f64::from(current_settings.tab_size));

    Frame::default()
        .with_pos(30, 530)
        .with_size(180, 25)
        .with_label("Start on tab:")
        .with_align(Align::Left | Align::Inside);
    let mut initial_language = Choice::default().with_pos(220, 530).with_size(90, 25);
    for lang in Language::ALL {
        initial_language.add_choice(lang.label());
    }
    initial_language.set_value(current_settings.initial_language.index() as i32);

    // Preview section
    section_label(565, "Preview:");
    let debounce = spinner_row(595, "Render delay (ms):", 0.0, 2000.0, 50.0, current_settings.preview_debounce_ms as f64);
    let port = spinner_row(625, "Browser preview port:", 1024.0, 65535.0, 1.0, f64::from(current_settings.live_preview_port));
    let mut check_console = CheckButton::default().with_pos(30, 655).with_size(280, 25).with_label("Show Console");
    check_console.set_value(current_settings.console_visible);

    let mut info_frame = Frame::default().with_pos(30, 685).with_size(290, 35);
    info_frame.set_label("A render delay of 0 updates the preview\non every keystroke. Port changes apply on restart.");
    info_frame.set_label_size(11);
    info_frame.set_align(Align::Left | Align::Inside | Align::Wrap);

    // Buttons at bottom
    let mut save_btn = Button::default().with_pos(150, 745).with_size(90, 30).with_label("Save");
    let mut cancel_btn = Button::default().with_pos(250, 745).with_size(90, 30).with_label("Cancel");

    dialog.end();
    dialog.show();

    let result = Rc::new(RefCell::new(None));
    let result_save = result.clone();
    let result_cancel = result.clone();

    // Store original theme for reverting on cancel
    let original_theme = current_settings.current_syntax_theme(is_dark);
    let sender_cancel = *sender;

    let dialog_save = dialog.clone();
    let current = current_settings.clone();
    save_btn.set_callback(move |_| {
        let new_settings = AppSettings {
            theme_mode: if theme_light.value() {
                ThemeMode::Light
            } else if theme_dark.value() {
                ThemeMode::Dark
            } else {
                ThemeMode::SystemDefault
            },
            font: if font_screenbold.value() {
                FontChoice::ScreenBold
            } else if font_courier.value() {
                FontChoice::Courier
            } else {
                FontChoice::HelveticaMono
            },
            font_size: font_size.value() as u32,
            line_numbers_enabled: check_line_numbers.value(),
            word_wrap_enabled: check_word_wrap.value(),
            highlighting_enabled: check_highlighting.value(),
            syntax_theme_light: index_to_theme(theme_light_choice.value()).unwrap_or(current.syntax_theme_light),
            syntax_theme_dark: index_to_theme(theme_dark_choice.value()).unwrap_or(current.syntax_theme_dark),
            tab_size: tab_size.value() as u32,
            preview_debounce_ms: debounce.value() as u64,
            live_preview_port: port.value() as u16,
            console_visible: check_console.value(),
            initial_language: index_to_language(initial_language.value()).unwrap_or(current.initial_language),
        };

        *result_save.borrow_mut() = Some(new_settings);
        dialog_save.clone().hide();
    });

    let dialog_cancel = dialog.clone();
    cancel_btn.set_callback(move |_| {
        // Revert to original theme
        sender_cancel.send(Message::PreviewSyntaxTheme(original_theme));
        *result_cancel.borrow_mut() = None;
        dialog_cancel.clone().hide();
    });

    let result_close = result.clone();
    let sender_close = *sender;
    dialog.set_callback(move |w| {
        // Revert to original theme on close (X button)
        sender_close.send(Message::PreviewSyntaxTheme(original_theme));
        *result_close.borrow_mut() = None;
        w.hide();
    });

    super::run_dialog(&dialog);

    result.borrow().clone()
}

/// Convert SyntaxTheme to dropdown index
fn theme_index(theme: SyntaxTheme) -> i32 {
    SyntaxTheme::all()
        .iter()
        .position(|t| *t == theme)
        .map(|i| i as i32)
        .unwrap_or(0)
}

/// Convert dropdown index to SyntaxTheme
fn index_to_theme(index: i32) -> Option<SyntaxTheme> {
    if index < 0 {
        return None;
    }
    SyntaxTheme::all().get(index as usize).copied()
}

fn index_to_language(index: i32) -> Option<Language> {
    usize::try_from(index)
        .ok()
        .and_then(|i| Language::ALL.get(i).copied())
}
