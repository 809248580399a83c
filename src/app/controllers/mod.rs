//! Controllers layer - the state machines the session is built from.
//!
//! - Language tabs and the editor handle
//! - Responsive layout
//! - Preview scheduling
//! - Console log

pub mod console;
pub mod layout;
pub mod preview;
pub mod tabs;
