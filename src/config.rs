use crate::error::Result;
use crate::nav::keys::KeyBinding;
use crate::theme::{Palette, ThemeMode};
use crossterm::event::KeyCode;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_INVALID_MESSAGE: &str =
    "Some fields missing or invalid. Fields that need attention are highlighted in red.";

/// Per-session knobs. Every field has a default, so an empty YAML document
/// (or none at all) gives the classic F10 / F4 form.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub submit_key: KeyBinding,
    pub cancel_key: KeyBinding,
    /// Overrides the key hint shown above and below the form.
    pub banner: Option<String>,
    pub theme: ThemeMode,
    pub popup_width: u16,
    pub popup_height: u16,
    pub invalid_title: String,
    pub invalid_message: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            submit_key: KeyBinding::plain(KeyCode::F(10)),
            cancel_key: KeyBinding::plain(KeyCode::F(4)),
            banner: None,
            theme: ThemeMode::Dark,
            popup_width: 50,
            popup_height: 10,
            invalid_title: "Error in input".to_string(),
            invalid_message: DEFAULT_INVALID_MESSAGE.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn banner_text(&self) -> String {
        match &self.banner {
            Some(b) => b.clone(),
            None => format!(
                "Press {} to save & exit; {} to cancel",
                self.submit_key, self.cancel_key
            ),
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::from_mode(self.theme)
    }
}
