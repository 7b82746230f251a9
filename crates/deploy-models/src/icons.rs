//! Project icons.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Icon slot of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Default,
    Shortcut,
    Splash,
}

impl IconKind {
    pub const ALL: [IconKind; 3] = [IconKind::Default, IconKind::Shortcut, IconKind::Splash];

    /// Wire name of the slot.
    pub fn as_str(&self) -> &'static str {
        match self {
            IconKind::Default => "default",
            IconKind::Shortcut => "shortcut",
            IconKind::Splash => "splash",
        }
    }
}

impl fmt::Display for IconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IconKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(IconKind::Default),
            "shortcut" => Ok(IconKind::Shortcut),
            "splash" => Ok(IconKind::Splash),
            _ => Err(ModelError::UnknownIconKind(s.to_string())),
        }
    }
}

/// Icons of a project (`_icons`), each a data URL when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icons {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splash: Option<String>,
}

impl Icons {
    pub fn get(&self, kind: IconKind) -> Option<&str> {
        match kind {
            IconKind::Default => self.default.as_deref(),
            IconKind::Shortcut => self.shortcut.as_deref(),
            IconKind::Splash => self.splash.as_deref(),
        }
    }

    pub fn set(&mut self, kind: IconKind, content: Option<String>) {
        let slot = match kind {
            IconKind::Default => &mut self.default,
            IconKind::Shortcut => &mut self.shortcut,
            IconKind::Splash => &mut self.splash,
        };
        *slot = content;
    }
}
