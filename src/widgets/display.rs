use crate::widgets::edit::wrapped_rows;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

/// Static text: field captions, choice descriptions, group names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub text: String,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn height(&self, width: u16) -> u16 {
        self.text
            .split('\n')
            .map(|l| wrapped_rows(l.chars().count(), width))
            .sum::<u16>()
            .max(1)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, style: Style) {
        let p = Paragraph::new(self.text.clone())
            .style(style)
            .wrap(Wrap { trim: false });
        f.render_widget(p, area);
    }
}

/// Horizontal rule drawn with a repeated character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Divider {
    pub ch: char,
}

impl Divider {
    pub fn render(&self, f: &mut Frame, area: Rect, style: Style) {
        let rule: String = std::iter::repeat(self.ch)
            .take(usize::from(area.width))
            .collect();
        f.render_widget(Paragraph::new(rule).style(style), area);
    }
}

/// Read-only text computed by a callback, shown as `caption: output`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalDisplay {
    pub caption: String,
    pub output: String,
}

impl ExternalDisplay {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            output: "---".to_string(),
        }
    }

    pub fn set_output(&mut self, output: impl Into<String>) {
        self.output = output.into();
    }

    pub fn text(&self) -> String {
        format!("{}: {}", self.caption, self.output)
    }

    pub fn height(&self, width: u16) -> u16 {
        wrapped_rows(self.text().chars().count(), width)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, style: Style) {
        let p = Paragraph::new(self.text())
            .style(style)
            .wrap(Wrap { trim: false });
        f.render_widget(p, area);
    }
}
