//! Messages posted back by the isolated preview context.
//!
//! The bridge script installed in the live browser preview forwards
//! `console.*` calls and uncaught errors to the host as JSON:
//!
//! - `{"type":"console","method":"log","args":["a","b"]}`
//! - `{"type":"error","message":"x is not defined","line":3}`

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleMethod {
    Log,
    Info,
    Warn,
    Error,
    Debug,
    #[serde(other)]
    Other,
}

impl ConsoleMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ConsoleMethod::Log => "log",
            ConsoleMethod::Info => "info",
            ConsoleMethod::Warn => "warn",
            ConsoleMethod::Error => "error",
            ConsoleMethod::Debug => "debug",
            ConsoleMethod::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PreviewMessage {
    Console {
        method: ConsoleMethod,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Uncaught exception inside the preview document.
    Error {
        message: String,
        #[serde(default)]
        line: u32,
    },
}

impl PreviewMessage {
    /// Parse one inbound frame. Anything that doesn't match the schema is
    /// dropped.
    pub fn from_json(s: &str) -> Option<Self> {
        match serde_json::from_str(s) {
            Ok(msg) => Some(msg),
            Err(e) => {
                log::debug!("dropping malformed preview message: {}", e);
                None
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            PreviewMessage::Error { .. }
                | PreviewMessage::Console {
                    method: ConsoleMethod::Error,
                    ..
                }
        )
    }
}

impl fmt::Display for PreviewMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewMessage::Console { method, args } => {
                write!(f, "{}: {}", method.as_str(), args.join(" "))
            }
            PreviewMessage::Error { message, line } if *line > 0 => {
                write!(f, "uncaught (line {}): {}", line, message)
            }
            PreviewMessage::Error { message, .. } => write!(f, "uncaught: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_console_message() {
        let msg = PreviewMessage::from_json(
            r#"{"type":"console","method":"warn","args":["careful","now"]}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            PreviewMessage::Console {
                method: ConsoleMethod::Warn,
                args: vec!["careful".to_string(), "now".to_string()],
            }
        );
        assert_eq!(msg.to_string(), "warn: careful now");
    }

    #[test]
    fn test_unknown_method_maps_to_other() {
        let msg = PreviewMessage::from_json(r#"{"type":"console","method":"table","args":[]}"#)
            .unwrap();
        assert!(matches!(
            msg,
            PreviewMessage::Console {
                method: ConsoleMethod::Other,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_error_message() {
        let msg =
            PreviewMessage::from_json(r#"{"type":"error","message":"boom","line":7}"#).unwrap();
        assert!(msg.is_error());
        assert_eq!(msg.to_string(), "uncaught (line 7): boom");

        let no_line = PreviewMessage::from_json(r#"{"type":"error","message":"boom"}"#).unwrap();
        assert_eq!(no_line.to_string(), "uncaught: boom");
    }

    #[test]
    fn test_malformed_messages_are_dropped() {
        assert!(PreviewMessage::from_json("not json").is_none());
        assert!(PreviewMessage::from_json(r#"{"type":"render","html":""}"#).is_none());
        assert!(PreviewMessage::from_json(r#"{"method":"log"}"#).is_none());
    }

    #[test]
    fn test_missing_args_default_to_empty() {
        let msg = PreviewMessage::from_json(r#"{"type":"console","method":"log"}"#).unwrap();
        assert_eq!(msg.to_string(), "log: ");
    }
}
