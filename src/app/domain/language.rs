use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three source languages a playground is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "html")]
    Markup,
    #[serde(rename = "css")]
    Style,
    #[serde(rename = "javascript")]
    Script,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language tag: {0:?}")]
pub struct LanguageParseError(pub String);

impl Language {
    /// Tab order.
    pub const ALL: [Language; 3] = [Language::Markup, Language::Style, Language::Script];

    /// Position in `ALL`, also the tab index.
    pub fn index(self) -> usize {
        match self {
            Language::Markup => 0,
            Language::Style => 1,
            Language::Script => 2,
        }
    }

    /// Language shown at a tab position.
    ///
    /// # Panics
    ///
    /// Panics on an index outside `0..3`; tab positions come from our own
    /// widget, so anything else is a bug.
    pub fn from_index(index: usize) -> Language {
        Self::ALL[index]
    }

    /// Label shown on the tab.
    pub fn label(self) -> &'static str {
        match self {
            Language::Markup => "HTML",
            Language::Style => "CSS",
            Language::Script => "JavaScript",
        }
    }

    /// Stable identifier used in settings files.
    pub fn id(self) -> &'static str {
        match self {
            Language::Markup => "html",
            Language::Style => "css",
            Language::Script => "javascript",
        }
    }

    /// Name of the matching syntax in syntect's default set.
    pub fn syntax_name(self) -> &'static str {
        match self {
            Language::Markup => "HTML",
            Language::Style => "CSS",
            Language::Script => "JavaScript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Language::Markup),
            "css" => Ok(Language::Style),
            "javascript" | "js" => Ok(Language::Script),
            other => Err(LanguageParseError(other.to_string())),
        }
    }
}
