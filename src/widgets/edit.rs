use crate::widgets::Editable;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::fmt;
use tui_textarea::TextArea;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditKind {
    Text,
    Integer,
    IpAddress,
}

/// Pure input rules for a single-line edit, independent of rendering.
#[derive(Clone, Debug)]
pub struct EditValidator {
    pub kind: EditKind,
    pub pattern: Option<Regex>,
}

impl EditValidator {
    pub fn new(kind: EditKind, pattern: Option<Regex>) -> Self {
        Self { kind, pattern }
    }

    /// Whether a typed character may enter the buffer at all.
    pub fn accepts_char(&self, c: char) -> bool {
        match self.kind {
            EditKind::Text => !c.is_control(),
            EditKind::Integer => c.is_ascii_digit(),
            EditKind::IpAddress => c.is_ascii_digit() || c == '.',
        }
    }

    pub fn parse(&self, raw: &str) -> JsonValue {
        match self.kind {
            EditKind::Integer => {
                let digits = raw.trim();
                if let Ok(n) = digits.parse::<i64>() {
                    JsonValue::from(n)
                } else if let Ok(n) = digits.parse::<u64>() {
                    JsonValue::from(n)
                } else {
                    JsonValue::Null
                }
            }
            EditKind::Text | EditKind::IpAddress => JsonValue::String(raw.to_string()),
        }
    }

    pub fn validate(&self, raw: &str) -> bool {
        // Integer patterns see the parsed number, not the raw keystrokes.
        let checked = match self.kind {
            EditKind::Integer => match self.parse(raw) {
                // text that does not fit a 64-bit integer is flagged, not dropped
                JsonValue::Null if !raw.trim().is_empty() => return false,
                JsonValue::Null => String::new(),
                v => v.to_string(),
            },
            EditKind::Text | EditKind::IpAddress => raw.to_string(),
        };
        if let Some(re) = &self.pattern {
            if !re.is_match(&checked) {
                return false;
            }
        }
        match self.kind {
            EditKind::IpAddress => is_ipv4(raw),
            EditKind::Text | EditKind::Integer => true,
        }
    }
}

/// Four dot-separated, non-empty decimal components in 0..=255.
pub fn is_ipv4(text: &str) -> bool {
    let quads: Vec<&str> = text.split('.').collect();
    if quads.len() != 4 {
        return false;
    }
    quads.iter().all(|q| {
        !q.is_empty()
            && q.chars().all(|c| c.is_ascii_digit())
            && q.parse::<u32>().map(|n| n <= 255).unwrap_or(false)
    })
}

/// Single-line edit with a caption, e.g. `*Client city: Springfield`.
#[derive(Clone, Debug)]
pub struct TextEdit {
    pub caption: String,
    pub text: String,
    pub validator: EditValidator,
}

impl TextEdit {
    pub fn new(caption: impl Into<String>, default: impl Into<String>, validator: EditValidator) -> Self {
        Self {
            caption: caption.into(),
            text: default.into(),
            validator,
        }
    }

    pub fn height(&self, width: u16) -> u16 {
        let chars = self.caption.chars().count() + self.text.chars().count() + 1;
        wrapped_rows(chars, width)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, label: Style, style: Style, focused: bool) {
        let mut val = self.text.clone();
        if focused {
            val.push('▏');
        }
        let line = Line::from(vec![
            Span::styled(self.caption.clone(), label),
            Span::styled(val, style),
        ]);
        let p = Paragraph::new(line).style(style).wrap(Wrap { trim: false });
        f.render_widget(p, area);
    }
}

impl Editable for TextEdit {
    fn edit_value(&self) -> JsonValue {
        self.validator.parse(&self.text)
    }

    fn validate(&self) -> bool {
        self.validator.validate(&self.text)
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                if self.validator.accepts_char(c) {
                    self.text.push(c);
                }
                true
            }
            KeyCode::Backspace => {
                self.text.pop();
                true
            }
            _ => false,
        }
    }
}

/// Multi-line free text backed by a `tui-textarea` editor.
pub struct LongText {
    pub caption: String,
    pub pattern: Option<Regex>,
    area: TextArea<'static>,
}

impl LongText {
    pub fn new(caption: impl Into<String>, default: &str, pattern: Option<Regex>) -> Self {
        let area = TextArea::from(default.split('\n').map(|l| l.to_string()));
        Self {
            caption: caption.into(),
            pattern,
            area,
        }
    }

    pub fn text(&self) -> String {
        self.area.lines().join("\n")
    }

    pub fn height(&self, _width: u16) -> u16 {
        let lines = self.area.lines().len().max(1);
        let caption_rows = if self.caption.is_empty() { 0 } else { 1 };
        u16::try_from(lines + caption_rows).unwrap_or(u16::MAX)
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, label: Style, style: Style, focused: bool) {
        let mut body = area;
        if !self.caption.is_empty() && area.height > 0 {
            let head = Rect { height: 1, ..area };
            f.render_widget(
                Paragraph::new(Span::styled(self.caption.clone(), label)),
                head,
            );
            body = Rect {
                y: area.y + 1,
                height: area.height - 1,
                ..area
            };
        }
        self.area.set_style(style);
        self.area.set_cursor_line_style(Style::default());
        if focused {
            self.area
                .set_cursor_style(style.add_modifier(Modifier::REVERSED));
        } else {
            self.area.set_cursor_style(style);
        }
        f.render_widget(&self.area, body);
    }
}

impl fmt::Debug for LongText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LongText")
            .field("caption", &self.caption)
            .field("lines", &self.area.lines())
            .finish_non_exhaustive()
    }
}

impl Editable for LongText {
    fn edit_value(&self) -> JsonValue {
        JsonValue::String(self.text())
    }

    fn validate(&self) -> bool {
        match &self.pattern {
            Some(re) => re.is_match(&self.text()),
            None => true,
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc | KeyCode::F(_) => false,
            // cursor moves leave the text unchanged, so `input` reports false for them
            KeyCode::Up
            | KeyCode::Down
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End
            | KeyCode::PageUp
            | KeyCode::PageDown => {
                self.area.input(key);
                true
            }
            _ => self.area.input(key),
        }
    }
}

/// Rows needed to show `chars` cells wrapped at `width`.
pub(crate) fn wrapped_rows(chars: usize, width: u16) -> u16 {
    let w = usize::from(width.max(1));
    u16::try_from(chars.div_ceil(w).max(1)).unwrap_or(u16::MAX)
}
