use fltk::{
    app::Sender,
    button::Button,
    enums::{Align, FrameType},
    frame::Frame,
    group::{Flex, FlexType},
    menu::MenuBar,
    prelude::*,
    text::TextEditor,
    window::Window,
};

use super::divider::{DIVIDER_WIDTH, build_divider};
use super::preview_panel::PreviewPanel;
use super::tab_bar::{TAB_BAR_HEIGHT, TabBar};
use crate::app::controllers::layout::LayoutSelector;
use crate::app::domain::{AppSettings, Message};

pub const INITIAL_WIDTH: i32 = 1200;
pub const INITIAL_HEIGHT: i32 = 760;

const MENU_HEIGHT: i32 = 30;
const HEADER_HEIGHT: i32 = 36;
const STATUS_HEIGHT: i32 = 22;

pub struct HeaderButtons {
    pub run: Button,
    pub format: Button,
    pub browser: Button,
    pub theme: Button,
}

pub struct MainWidgets {
    pub wind: Window,
    pub flex: Flex,
    pub menu: MenuBar,
    pub header: Flex,
    pub title: Frame,
    pub buttons: HeaderButtons,
    pub tab_bar: TabBar,
    pub body: Flex,
    pub text_editor: TextEditor,
    pub divider: Frame,
    pub preview: PreviewPanel,
    pub status: Frame,
}

fn header_button(label: &str, msg: Message, sender: &Sender<Message>) -> Button {
    let mut btn = Button::default().with_label(label);
    btn.set_label_size(12);
    let s = *sender;
    btn.set_callback(move |_| s.send(msg.clone()));
    btn
}

pub fn build_main_window(settings: &AppSettings, sender: &Sender<Message>) -> MainWidgets {
    let mut wind = Window::new(100, 100, INITIAL_WIDTH, INITIAL_HEIGHT, "CodeBench");
    wind.set_xclass("CodeBench");
    wind.size_range(480, 360, 0, 0);

    let mut flex = Flex::new(0, 0, INITIAL_WIDTH, INITIAL_HEIGHT, None);
    flex.set_type(FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, MENU_HEIGHT, "");
    flex.fixed(&menu, MENU_HEIGHT);

    let mut header = Flex::default();
    header.set_type(FlexType::Row);
    header.set_margins(10, 4, 10, 4);
    header.set_pad(6);
    let mut title = Frame::default().with_label("CodeBench");
    title.set_align(Align::Left | Align::Inside);
    title.set_label_size(16);
    let run = header_button("Run", Message::OpenPreviewOverlay, sender);
    let format = header_button("Format", Message::FormatCode, sender);
    let browser = header_button("Open in Browser", Message::OpenLivePreview, sender);
    let theme = header_button("Theme", Message::ToggleDarkMode, sender);
    header.fixed(&run, 70);
    header.fixed(&format, 70);
    header.fixed(&browser, 130);
    header.fixed(&theme, 70);
    header.end();
    flex.fixed(&header, HEADER_HEIGHT);

    let tab_bar = TabBar::new(0, 0, INITIAL_WIDTH, settings.initial_language, *sender);
    flex.fixed(&tab_bar.widget, TAB_BAR_HEIGHT);

    let mut body = Flex::default();
    body.set_type(FlexType::Row);
    let text_editor = TextEditor::default();
    let divider = build_divider(sender);
    body.fixed(&divider, DIVIDER_WIDTH);
    let preview = PreviewPanel::new(sender, settings.console_visible);
    body.end();

    let mut status = Frame::default();
    status.set_frame(FrameType::FlatBox);
    status.set_align(Align::Left | Align::Inside);
    status.set_label_size(12);
    flex.fixed(&status, STATUS_HEIGHT);

    flex.end();
    wind.end();
    wind.resizable(&flex);

    MainWidgets {
        wind,
        flex,
        menu,
        header,
        title,
        buttons: HeaderButtons {
            run,
            format,
            browser,
            theme,
        },
        tab_bar,
        body,
        text_editor,
        divider,
        preview,
        status,
    }
}

impl MainWidgets {
    /// Place the body panels for the current layout. Wide shows editor,
    /// divider and docked preview; narrow gives the editor the whole body.
    pub fn apply_layout(&mut self, layout: &LayoutSelector) {
        let wide = layout.docked_visible();
        self.preview.shown.set(wide);
        if wide {
            self.divider.show();
            self.preview.column.show();
            let editor_w = layout.editor_width(self.body.w() - DIVIDER_WIDTH);
            self.body.fixed(&self.text_editor, editor_w);
        } else {
            self.divider.hide();
            self.preview.column.hide();
            self.body.fixed(&self.text_editor, 0);
        }
        self.body.layout();
        self.body.redraw();
    }

    pub fn set_status(&mut self, text: &str) {
        self.status.set_label(&format!(" {text}"));
        self.status.redraw();
    }
}
