//! Application layer.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (languages, buffers, settings, messages)
//! - `controllers/` - Tabs, layout, preview scheduling and the console log
//! - `services/` - Composition, formatting, highlighting and the live server
//! - `infrastructure/` - External integrations (FLTK buffer, platform, error)
//! - `session.rs` - Playground state behind one dispatch target
//! - `state.rs` - Main application coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod session;
pub mod state;

// Re-exports for convenient external access
pub use domain::{AppSettings, FontChoice, Language, Message, SourceBuffer, SyntaxTheme, ThemeMode};
pub use infrastructure::platform::detect_system_dark_mode;
pub use services::composer::{ComposedDocument, compose};
pub use session::Session;
