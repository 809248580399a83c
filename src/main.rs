#![cfg_attr(all(target_os = "windows", not(debug_assertions)), windows_subsystem = "windows")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fltk::{app, dialog, enums::Event, prelude::*};

use code_bench::app::domain::{AppSettings, Message};
use code_bench::app::infrastructure::platform::detect_system_dark_mode;
use code_bench::app::state::AppState;
use code_bench::ui::main_window::build_main_window;
use code_bench::ui::menu::build_menu;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = app::App::default().with_scheme(app::Scheme::Gtk);
    let (sender, receiver) = app::channel::<Message>();

    let settings = AppSettings::load();
    let dark_mode = settings.theme_mode.is_dark(detect_system_dark_mode());
    log::info!("starting CodeBench (dark mode: {dark_mode})");

    let mut widgets = build_main_window(&settings, &sender);
    build_menu(&mut widgets.menu, &sender, &settings, dark_mode);

    // Escape would close the main window; only the close button quits.
    widgets.wind.set_callback({
        let s = sender;
        move |_| {
            if app::event() == Event::Close {
                s.send(Message::Quit);
            }
        }
    });

    let last_width = Rc::new(Cell::new(widgets.wind.w()));
    widgets.wind.resize_callback({
        let s = sender;
        move |_, _x, _y, w, _h| {
            if last_width.replace(w) != w {
                s.send(Message::WindowResized(w));
            }
        }
    });

    let settings = Rc::new(RefCell::new(settings));
    let mut state = match AppState::new(widgets, sender, settings, dark_mode) {
        Ok(state) => state,
        Err(e) => {
            log::error!("startup failed: {e}");
            dialog::alert_default(&format!("CodeBench could not start: {e}"));
            return;
        }
    };

    state.widgets.wind.show();
    #[cfg(target_os = "windows")]
    code_bench::ui::theme::set_windows_titlebar_theme(&state.widgets.wind, dark_mode);
    sender.send(Message::WindowResized(state.widgets.wind.w()));

    while app.wait() {
        if let Some(msg) = receiver.recv() {
            state.handle(msg);
        }
    }
}
