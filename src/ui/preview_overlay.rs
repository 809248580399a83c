use std::cell::Cell;
use std::rc::Rc;

use fltk::{
    app::Sender,
    button::Button,
    enums::{Color, FrameType},
    group::{Flex, FlexType},
    misc::HelpView,
    prelude::*,
    window::Window,
};

use super::preview_panel::HelpViewSurface;
use crate::app::domain::Message;

const CLOSE_BAR_HEIGHT: i32 = 32;

/// Preview shown on demand over the editor when the window is narrow.
pub struct PreviewOverlay {
    pub window: Window,
    view: HelpView,
    shown: Rc<Cell<bool>>,
}

impl PreviewOverlay {
    pub fn new(sender: &Sender<Message>) -> Self {
        let mut window = Window::default().with_size(600, 500).with_label("Preview");
        window.set_xclass("CodeBench");

        let mut flex = Flex::default_fill();
        flex.set_type(FlexType::Column);

        let mut view = HelpView::default();
        view.set_frame(FrameType::FlatBox);
        view.set_color(Color::White);

        let mut bar = Flex::default();
        bar.set_type(FlexType::Row);
        bar.set_margins(6, 3, 6, 3);
        fltk::frame::Frame::default();
        let mut close_btn = Button::default().with_label("Close");
        close_btn.set_callback({
            let s = *sender;
            move |_| s.send(Message::ClosePreviewOverlay)
        });
        bar.fixed(&close_btn, 80);
        bar.end();
        flex.fixed(&bar, CLOSE_BAR_HEIGHT);

        flex.end();
        window.end();
        window.resizable(&flex);

        // Escape and the title bar close button both land here.
        window.set_callback({
            let s = *sender;
            move |_| s.send(Message::ClosePreviewOverlay)
        });

        Self {
            window,
            view,
            shown: Rc::new(Cell::new(false)),
        }
    }

    pub fn surface(&self) -> HelpViewSurface {
        HelpViewSurface::new(self.view.clone(), self.shown.clone())
    }

    /// Show over `parent`. Call before `Session::open_overlay` so its
    /// catch-up render lands.
    pub fn open_over(&mut self, parent: &Window) {
        self.shown.set(true);
        self.window
            .resize(parent.x() + 20, parent.y() + 40, (parent.w() - 40).max(200), (parent.h() - 60).max(150));
        self.window.show();
    }

    pub fn close(&mut self) {
        self.shown.set(false);
        self.window.hide();
    }
}
