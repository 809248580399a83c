//! Domain layer - core data structures and types.
//!
//! - Source languages and the buffer store
//! - Application settings
//! - Message types for the event system and the preview bridge

pub mod buffers;
pub mod language;
pub mod messages;
pub mod preview_message;
pub mod settings;

pub use buffers::SourceBuffer;
pub use language::{Language, LanguageParseError};
pub use messages::Message;
pub use preview_message::{ConsoleMethod, PreviewMessage};
pub use settings::{AppSettings, FontChoice, SyntaxTheme, ThemeMode};
