use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use std::fmt;

/// A single key with modifiers, written in config as `f10`, `esc`, `ctrl+s`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        let lower = text.trim().to_ascii_lowercase();
        let mut modifiers = KeyModifiers::NONE;
        let mut parts: Vec<&str> = lower.split('+').collect();
        let key = parts.pop().unwrap_or_default();
        for m in parts {
            modifiers |= match m {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                other => return Err(format!("unknown modifier '{other}' in key '{text}'")),
            };
        }
        let code = match key {
            "esc" | "escape" => KeyCode::Esc,
            "enter" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "space" => KeyCode::Char(' '),
            k if k.len() > 1 && k.starts_with('f') => {
                let n: u8 = k[1..]
                    .parse()
                    .map_err(|_| format!("unknown key '{text}'"))?;
                if !(1..=24).contains(&n) {
                    return Err(format!("function key out of range in '{text}'"));
                }
                KeyCode::F(n)
            }
            k => {
                let mut chars = k.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(format!("unknown key '{text}'")),
                }
            }
        };
        Ok(Self { code, modifiers })
    }

    /// Whether `key` is this binding. Shift is ignored on character keys since
    /// terminals disagree on reporting it.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let relevant = KeyModifiers::CONTROL | KeyModifiers::ALT;
        let mods_match = match self.code {
            KeyCode::Char(_) => (key.modifiers & relevant) == (self.modifiers & relevant),
            _ => key.modifiers == self.modifiers,
        };
        let code_match = match (self.code, key.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        code_match && mods_match
    }
}

impl TryFrom<String> for KeyBinding {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "Alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "Shift+")?;
        }
        match self.code {
            KeyCode::F(n) => write!(f, "F{n}"),
            KeyCode::Esc => write!(f, "Esc"),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::BackTab => write!(f, "BackTab"),
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_function_and_modified_keys() {
        assert_eq!(KeyBinding::parse("F10").unwrap(), KeyBinding::plain(KeyCode::F(10)));
        assert_eq!(
            KeyBinding::parse("ctrl+s").unwrap(),
            KeyBinding::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
        );
        assert_eq!(KeyBinding::parse("esc").unwrap(), KeyBinding::plain(KeyCode::Esc));
        assert!(KeyBinding::parse("f99").is_err());
        assert!(KeyBinding::parse("hyper+x").is_err());
        assert!(KeyBinding::parse("nope").is_err());
    }

    #[test]
    fn matching_respects_modifiers() {
        let b = KeyBinding::parse("ctrl+s").unwrap();
        assert!(b.matches(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(b.matches(&KeyEvent::new(
            KeyCode::Char('S'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        )));
        assert!(!b.matches(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)));
        let f4 = KeyBinding::plain(KeyCode::F(4));
        assert!(f4.matches(&KeyEvent::new(KeyCode::F(4), KeyModifiers::NONE)));
        assert!(!f4.matches(&KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE)));
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(KeyBinding::plain(KeyCode::F(10)).to_string(), "F10");
        assert_eq!(KeyBinding::parse("ctrl+s").unwrap().to_string(), "Ctrl+S");
    }
}
