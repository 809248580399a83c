use fltk::{
    app::{self, Sender},
    draw,
    enums::{Color, Cursor, Event, FrameType},
    frame::Frame,
    prelude::*,
};

use crate::app::domain::Message;

pub const DIVIDER_WIDTH: i32 = 6;

/// Vertical bar between editor and docked preview. Dragging it reports the
/// pointer's window x-coordinate.
pub fn build_divider(sender: &Sender<Message>) -> Frame {
    let mut divider = Frame::default();
    divider.set_frame(FrameType::FlatBox);
    divider.set_color(Color::from_rgb(200, 200, 200));

    let s = *sender;
    divider.handle(move |_, event| match event {
        Event::Enter => {
            draw::set_cursor(Cursor::WE);
            true
        }
        Event::Leave => {
            draw::set_cursor(Cursor::Default);
            true
        }
        Event::Push => true,
        Event::Drag => {
            s.send(Message::DividerDragged(app::event_x()));
            true
        }
        _ => false,
    });
    divider
}
