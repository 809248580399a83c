use std::collections::VecDeque;

use crate::app::domain::PreviewMessage;

/// Entries kept before the oldest are dropped.
pub const CONSOLE_CAPACITY: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEntry {
    pub text: String,
    pub is_error: bool,
}

impl From<&PreviewMessage> for ConsoleEntry {
    fn from(msg: &PreviewMessage) -> Self {
        Self {
            text: msg.to_string(),
            is_error: msg.is_error(),
        }
    }
}

/// Bounded log of messages posted by the running preview.
#[derive(Debug)]
pub struct ConsoleLog {
    entries: VecDeque<ConsoleEntry>,
    capacity: usize,
    dropped: u64,
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::with_capacity(CONSOLE_CAPACITY)
    }
}

impl ConsoleLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn push(&mut self, msg: &PreviewMessage) -> &ConsoleEntry {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.dropped += 1;
        }
        self.entries.push_back(ConsoleEntry::from(msg));
        &self.entries[self.entries.len() - 1]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries evicted since the log was created.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn entries(&self) -> impl Iterator<Item = &ConsoleEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::ConsoleMethod;

    fn log_msg(text: &str) -> PreviewMessage {
        PreviewMessage::Console {
            method: ConsoleMethod::Log,
            args: vec![text.to_string()],
        }
    }

    #[test]
    fn test_push_formats_entry() {
        let mut console = ConsoleLog::default();
        let entry = console.push(&log_msg("hi")).clone();
        assert_eq!(entry.text, "log: hi");
        assert!(!entry.is_error);

        let err = console.push(&PreviewMessage::Error {
            message: "boom".into(),
            line: 2,
        });
        assert!(err.is_error);
        assert_eq!(console.len(), 2);
    }

    #[test]
    fn test_log_is_bounded() {
        let mut console = ConsoleLog::with_capacity(3);
        for i in 0..5 {
            console.push(&log_msg(&i.to_string()));
        }
        let texts: Vec<&str> = console.entries().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["log: 2", "log: 3", "log: 4"]);
        assert_eq!(console.dropped(), 2);
    }

    #[test]
    fn test_default_capacity() {
        let mut console = ConsoleLog::default();
        for i in 0..(CONSOLE_CAPACITY + 10) {
            console.push(&log_msg(&i.to_string()));
        }
        assert_eq!(console.len(), CONSOLE_CAPACITY);
    }

    #[test]
    fn test_clear() {
        let mut console = ConsoleLog::default();
        console.push(&log_msg("x"));
        console.clear();
        assert!(console.is_empty());
    }
}
