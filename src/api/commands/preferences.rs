//! Preferences command module
//!
//! Handles the persisted light/dark theme flag.

use std::fmt;

use serde::Serialize;

use crate::shared::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl From<bool> for Theme {
    fn from(dark: bool) -> Self {
        if dark { Theme::Dark } else { Theme::Light }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

pub async fn get_theme_command(state: &AppState) -> AppResult<Theme> {
    Ok(state.preferences.dark_mode().into())
}

pub async fn toggle_theme_command(state: &AppState) -> AppResult<Theme> {
    Ok(state.preferences.toggle_dark_mode().into())
}
