//! Display-mode preference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Binary display setting persisted across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Dark palette. Used when nothing has been stored yet.
    #[default]
    Dark,
    /// Light palette.
    Light,
}

impl DisplayMode {
    /// Returns the stored string form.
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Dark => "dark",
            DisplayMode::Light => "light",
        }
    }

    /// Returns the other mode.
    pub fn opposite(self) -> Self {
        match self {
            DisplayMode::Dark => DisplayMode::Light,
            DisplayMode::Light => DisplayMode::Dark,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(DisplayMode::Dark),
            "light" => Ok(DisplayMode::Light),
            other => Err(format!("unknown display mode: {}", other)),
        }
    }
}
