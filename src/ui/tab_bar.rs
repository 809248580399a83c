use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    app::Sender,
    draw,
    enums::{Align, Color, Event, Font},
    prelude::*,
    widget::Widget,
};

use crate::app::domain::{Language, Message};

pub const TAB_BAR_HEIGHT: i32 = 30;

const TAB_WIDTH: i32 = 110;
const TAB_GAP: i32 = 1;
const TAB_LEFT_MARGIN: i32 = 6;
const CORNER_RADIUS: i32 = 6;
const ACCENT_HEIGHT: i32 = 2;

struct TabBarState {
    active: Language,
    hover: Option<Language>,
    is_dark: bool,
    sender: Sender<Message>,
}

/// Custom-drawn HTML / CSS / JavaScript switcher above the editor.
pub struct TabBar {
    pub widget: Widget,
    state: Rc<RefCell<TabBarState>>,
}

impl TabBar {
    pub fn new(x: i32, y: i32, w: i32, active: Language, sender: Sender<Message>) -> Self {
        let state = Rc::new(RefCell::new(TabBarState {
            active,
            hover: None,
            is_dark: false,
            sender,
        }));

        let mut widget = Widget::new(x, y, w, TAB_BAR_HEIGHT, None);

        let draw_state = state.clone();
        widget.draw(move |wid| {
            let st = draw_state.borrow();
            draw_tab_bar(wid, &st);
        });

        let handle_state = state.clone();
        widget.handle(move |wid, event| handle_tab_bar(wid, event, &handle_state));

        Self { widget, state }
    }

    pub fn set_active(&mut self, language: Language) {
        self.state.borrow_mut().active = language;
        self.widget.redraw();
    }

    pub fn apply_theme(&mut self, is_dark: bool) {
        self.state.borrow_mut().is_dark = is_dark;
        self.widget.redraw();
    }
}

/// Left edge of each tab, relative to the widget.
fn tab_x(language: Language) -> i32 {
    TAB_LEFT_MARGIN + language.index() as i32 * (TAB_WIDTH + TAB_GAP)
}

/// Tab under widget-relative x, if any.
fn hit_test(mx: i32) -> Option<Language> {
    Language::ALL
        .into_iter()
        .find(|&lang| mx >= tab_x(lang) && mx < tab_x(lang) + TAB_WIDTH)
}

// --- Colors ---

struct ThemeColors {
    bar_bg: Color,
    active_bg: Color,
    inactive_bg: Color,
    hover_bg: Color,
    active_text: Color,
    inactive_text: Color,
}

fn theme_colors(is_dark: bool) -> ThemeColors {
    if is_dark {
        ThemeColors {
            bar_bg: Color::from_rgb(25, 25, 25),
            active_bg: Color::from_rgb(50, 50, 50),
            inactive_bg: Color::from_rgb(35, 35, 35),
            hover_bg: Color::from_rgb(42, 42, 42),
            active_text: Color::from_rgb(230, 230, 230),
            inactive_text: Color::from_rgb(140, 140, 140),
        }
    } else {
        ThemeColors {
            bar_bg: Color::from_rgb(200, 200, 200),
            active_bg: Color::from_rgb(255, 255, 255),
            inactive_bg: Color::from_rgb(220, 220, 220),
            hover_bg: Color::from_rgb(235, 235, 235),
            active_text: Color::from_rgb(0, 0, 0),
            inactive_text: Color::from_rgb(80, 80, 80),
        }
    }
}

/// Accent drawn under the active tab.
fn language_accent(language: Language) -> Color {
    match language {
        Language::Markup => Color::from_rgb(227, 79, 38),
        Language::Style => Color::from_rgb(38, 77, 228),
        Language::Script => Color::from_rgb(240, 200, 30),
    }
}

// --- Drawing ---

fn draw_rounded_top_rect(x: i32, y: i32, w: i32, h: i32, r: i32, color: Color) {
    draw::set_draw_color(color);
    draw::draw_rectf(x, y + r, w, h - r);
    draw::draw_rectf(x + r, y, w - 2 * r, r);
    draw::draw_pie(x, y, 2 * r, 2 * r, 90.0, 180.0);
    draw::draw_pie(x + w - 2 * r, y, 2 * r, 2 * r, 0.0, 90.0);
}

fn draw_tab_bar(wid: &Widget, st: &TabBarState) {
    let (wx, wy, ww, wh) = (wid.x(), wid.y(), wid.w(), wid.h());
    let colors = theme_colors(st.is_dark);

    draw::set_draw_color(colors.bar_bg);
    draw::draw_rectf(wx, wy, ww, wh);

    for lang in Language::ALL {
        let tx = wx + tab_x(lang);
        let is_active = lang == st.active;

        if is_active {
            draw_rounded_top_rect(tx, wy, TAB_WIDTH, wh, CORNER_RADIUS, colors.active_bg);
            draw::set_draw_color(language_accent(lang));
            draw::draw_rectf(tx, wy + wh - ACCENT_HEIGHT, TAB_WIDTH, ACCENT_HEIGHT);
        } else {
            let bg = if st.hover == Some(lang) { colors.hover_bg } else { colors.inactive_bg };
            draw_rounded_top_rect(tx, wy + 2, TAB_WIDTH, wh - 2, CORNER_RADIUS, bg);
        }

        let (font, text_color) = if is_active {
            (Font::HelveticaBold, colors.active_text)
        } else {
            (Font::Helvetica, colors.inactive_text)
        };
        draw::set_draw_color(text_color);
        draw::set_font(font, 12);
        draw::draw_text2(lang.label(), tx, wy, TAB_WIDTH, wh, Align::Center);
    }
}

// --- Event handling ---

fn handle_tab_bar(wid: &mut Widget, event: Event, state: &Rc<RefCell<TabBarState>>) -> bool {
    match event {
        Event::Push => {
            if fltk::app::event_button() != 1 {
                return false;
            }
            let Some(lang) = hit_test(fltk::app::event_x() - wid.x()) else {
                return false;
            };
            let sender = state.borrow().sender;
            sender.send(Message::SelectLanguage(lang));
            true
        }
        Event::Move | Event::Enter => {
            let hover = hit_test(fltk::app::event_x() - wid.x());
            let mut st = state.borrow_mut();
            if st.hover != hover {
                st.hover = hover;
                drop(st);
                wid.redraw();
            }
            true
        }
        Event::Leave => {
            state.borrow_mut().hover = None;
            wid.redraw();
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_test_maps_each_tab() {
        for lang in Language::ALL {
            assert_eq!(hit_test(tab_x(lang)), Some(lang));
            assert_eq!(hit_test(tab_x(lang) + TAB_WIDTH - 1), Some(lang));
        }
    }

    #[test]
    fn test_hit_test_misses_gaps_and_margins() {
        assert_eq!(hit_test(0), None);
        assert_eq!(hit_test(tab_x(Language::Markup) + TAB_WIDTH), None);
        assert_eq!(hit_test(tab_x(Language::Script) + TAB_WIDTH + 50), None);
    }
}
