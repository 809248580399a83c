use fltk::{
    button::Button,
    enums::{Color, FrameType},
    prelude::*,
};

use super::main_window::MainWidgets;

fn style_button(btn: &mut Button, is_dark: bool) {
    if is_dark {
        btn.set_color(Color::from_rgb(55, 55, 55));
        btn.set_label_color(Color::from_rgb(220, 220, 220));
    } else {
        btn.set_color(Color::from_rgb(225, 225, 225));
        btn.set_label_color(Color::Black);
    }
    btn.redraw();
}

pub fn apply_theme(w: &mut MainWidgets, is_dark: bool) {
    let editor = &mut w.text_editor;
    if is_dark {
        // Dark mode colors
        editor.set_color(Color::from_rgb(30, 30, 30));
        editor.set_text_color(Color::from_rgb(220, 220, 220));
        editor.set_cursor_color(Color::from_rgb(255, 255, 255));
        editor.set_selection_color(Color::from_rgb(70, 70, 100));
        editor.set_linenumber_bgcolor(Color::from_rgb(40, 40, 40));
        editor.set_linenumber_fgcolor(Color::from_rgb(150, 150, 150));
        w.wind.set_color(Color::from_rgb(25, 25, 25));
        w.wind.set_label_color(Color::from_rgb(220, 220, 220));
        w.menu.set_color(Color::from_rgb(35, 35, 35));
        w.menu.set_text_color(Color::from_rgb(220, 220, 220));
        w.menu.set_selection_color(Color::from_rgb(60, 60, 60)); // Hover color
        w.header.set_color(Color::from_rgb(32, 32, 32));
        w.title.set_label_color(Color::from_rgb(230, 230, 230));
        w.divider.set_color(Color::from_rgb(60, 60, 60));
        w.status.set_color(Color::from_rgb(35, 35, 35));
        w.status.set_label_color(Color::from_rgb(180, 180, 180));
    } else {
        // Light mode colors
        editor.set_color(Color::White);
        editor.set_text_color(Color::Black);
        editor.set_cursor_color(Color::Black);
        editor.set_selection_color(Color::from_rgb(173, 216, 230));
        editor.set_linenumber_bgcolor(Color::from_rgb(240, 240, 240));
        editor.set_linenumber_fgcolor(Color::from_rgb(100, 100, 100));
        w.wind.set_color(Color::from_rgb(240, 240, 240));
        w.wind.set_label_color(Color::Black);
        w.menu.set_color(Color::from_rgb(240, 240, 240));
        w.menu.set_text_color(Color::Black);
        w.menu.set_selection_color(Color::from_rgb(200, 200, 200)); // Hover color
        w.header.set_color(Color::from_rgb(245, 245, 245));
        w.title.set_label_color(Color::from_rgb(30, 30, 30));
        w.divider.set_color(Color::from_rgb(200, 200, 200));
        w.status.set_color(Color::from_rgb(230, 230, 230));
        w.status.set_label_color(Color::from_rgb(60, 60, 60));
    }
    w.header.set_frame(FrameType::FlatBox);

    let buttons = &mut w.buttons;
    for btn in [&mut buttons.run, &mut buttons.format, &mut buttons.browser, &mut buttons.theme] {
        style_button(btn, is_dark);
    }
    w.buttons.theme.set_label(if is_dark { "Light" } else { "Dark" });

    w.tab_bar.apply_theme(is_dark);
    w.preview.apply_theme(is_dark);

    w.text_editor.redraw();
    w.wind.redraw();
    w.menu.redraw();
}

/// Set Windows title bar theme (Windows 10 build 1809+)
/// Must be called AFTER window.show() to have a valid HWND
#[cfg(target_os = "windows")]
pub fn set_windows_titlebar_theme(window: &fltk::window::Window, is_dark: bool) {
    use std::mem::size_of;
    use std::ptr::from_ref;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Dwm::{DwmSetWindowAttribute, DWMWINDOWATTRIBUTE};

    unsafe {
        let hwnd = HWND(window.raw_handle() as *mut std::ffi::c_void);

        let on: i32 = if is_dark { 1 } else { 0 };

        // Try attribute 20 (Windows 11 / Windows 10 2004+)
        let _ = DwmSetWindowAttribute(
            hwnd,
            DWMWINDOWATTRIBUTE(20), // DWMWA_USE_IMMERSIVE_DARK_MODE
            from_ref(&on).cast(),
            size_of::<i32>() as u32,
        );

        // Also try attribute 19 (Windows 10 1809-1903)
        let _ = DwmSetWindowAttribute(
            hwnd,
            DWMWINDOWATTRIBUTE(19),
            from_ref(&on).cast(),
            size_of::<i32>() as u32,
        );
    }
}
