use std::cell::Cell;
use std::rc::Rc;

use fltk::{
    app::Sender,
    browser::Browser,
    button::Button,
    enums::{Align, Color, FrameType},
    frame::Frame,
    group::{Flex, FlexType},
    misc::HelpView,
    prelude::*,
};

use crate::app::controllers::console::{CONSOLE_CAPACITY, ConsoleEntry};
use crate::app::controllers::preview::PreviewSurface;
use crate::app::domain::Message;
use crate::app::services::composer::ComposedDocument;
use crate::app::services::static_html;

const CONSOLE_BAR_HEIGHT: i32 = 24;
const CONSOLE_HEIGHT: i32 = 130;

/// A `HelpView` fed with the static projection of each document.
///
/// `shown` is owned by whoever decides whether the view is on screen; the
/// preview controller skips loads while it is false.
pub struct HelpViewSurface {
    view: HelpView,
    shown: Rc<Cell<bool>>,
}

impl HelpViewSurface {
    pub fn new(view: HelpView, shown: Rc<Cell<bool>>) -> Self {
        Self { view, shown }
    }
}

impl PreviewSurface for HelpViewSurface {
    fn load_document(&mut self, doc: &ComposedDocument) {
        self.view.set_value(&static_html::project(doc.as_str()));
        self.view.redraw();
    }

    fn is_visible(&self) -> bool {
        self.shown.get()
    }
}

/// Docked preview column: rendered page on top, console below.
pub struct PreviewPanel {
    pub column: Flex,
    pub view: HelpView,
    pub console_bar: Flex,
    pub console_title: Frame,
    pub console: Browser,
    pub shown: Rc<Cell<bool>>,
    console_visible: bool,
}

impl PreviewPanel {
    pub fn new(sender: &Sender<Message>, console_visible: bool) -> Self {
        let mut column = Flex::default();
        column.set_type(FlexType::Column);

        let mut view = HelpView::default();
        view.set_frame(FrameType::FlatBox);
        view.set_color(Color::White);

        let mut console_bar = Flex::default();
        console_bar.set_type(FlexType::Row);
        console_bar.set_margins(4, 2, 4, 2);
        let mut console_title = Frame::default().with_label("Console");
        console_title.set_align(Align::Left | Align::Inside);
        console_title.set_label_size(12);
        let mut clear_btn = Button::default().with_label("Clear");
        clear_btn.set_label_size(11);
        clear_btn.set_callback({
            let s = *sender;
            move |_| s.send(Message::ClearConsole)
        });
        console_bar.fixed(&clear_btn, 50);
        console_bar.end();
        column.fixed(&console_bar, CONSOLE_BAR_HEIGHT);

        let mut console = Browser::default();
        console.set_text_size(12);
        column.fixed(&console, CONSOLE_HEIGHT);

        column.end();

        let mut panel = Self {
            column,
            view,
            console_bar,
            console_title,
            console,
            shown: Rc::new(Cell::new(false)),
            console_visible: true,
        };
        panel.set_console_visible(console_visible);
        panel
    }

    /// Surface handle for the preview controller.
    pub fn surface(&self) -> HelpViewSurface {
        HelpViewSurface::new(self.view.clone(), self.shown.clone())
    }

    pub fn console_visible(&self) -> bool {
        self.console_visible
    }

    pub fn set_console_visible(&mut self, visible: bool) {
        self.console_visible = visible;
        if visible {
            self.console_bar.show();
            self.console.show();
        } else {
            self.console_bar.hide();
            self.console.hide();
        }
        self.column.layout();
        self.column.redraw();
    }

    pub fn push_console(&mut self, entry: &ConsoleEntry) {
        self.console.add(&console_line(entry));
        while self.console.size() > CONSOLE_CAPACITY as i32 {
            self.console.remove(1);
        }
        self.console.bottom_line(self.console.size());
    }

    pub fn clear_console(&mut self) {
        self.console.clear();
    }

    pub fn apply_theme(&mut self, is_dark: bool) {
        let (bg, fg, bar) = if is_dark {
            (Color::from_rgb(30, 30, 30), Color::from_rgb(220, 220, 220), Color::from_rgb(40, 40, 40))
        } else {
            (Color::White, Color::Black, Color::from_rgb(230, 230, 230))
        };
        self.console.set_color(bg);
        self.console.set_text_color(fg);
        self.console_bar.set_color(bar);
        self.console_bar.set_frame(FrameType::FlatBox);
        self.console_title.set_label_color(fg);
        self.console.redraw();
        self.console_bar.redraw();
    }
}

/// Browser line for a console entry. `@.` turns off format codes for the
/// rest of the line so user text is shown as-is; errors are drawn red.
fn console_line(entry: &ConsoleEntry) -> String {
    if entry.is_error {
        format!("@C1@.{}", entry.text)
    } else {
        format!("@.{}", entry.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_line_disables_format_codes() {
        let entry = ConsoleEntry {
            text: "log: @b not bold".to_string(),
            is_error: false,
        };
        assert_eq!(console_line(&entry), "@.log: @b not bold");
    }

    #[test]
    fn test_console_line_marks_errors_red() {
        let entry = ConsoleEntry {
            text: "uncaught (line 2): boom".to_string(),
            is_error: true,
        };
        assert_eq!(console_line(&entry), "@C1@.uncaught (line 2): boom");
    }
}
