//! Document building, formatting, highlighting and the live preview server.

pub mod composer;
pub mod format;
pub mod live_server;
pub mod static_html;
pub mod syntax;
