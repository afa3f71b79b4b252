use crate::theme::Palette;
use crate::widgets::chrome::{centered_rect, dialog_block};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

/// Modal message box drawn over the form. Only one is shown at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub text: String,
    /// Button captions with the exit code each one reports.
    pub buttons: Vec<(String, i32)>,
    pub width: u16,
    pub height: u16,
    pub selected: usize,
}

impl Dialog {
    pub fn new(title: impl Into<String>, text: impl Into<String>, width: u16, height: u16) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            buttons: Vec::new(),
            width,
            height,
            selected: 0,
        }
    }

    pub fn with_buttons(mut self, buttons: &[(&str, i32)]) -> Self {
        self.buttons = buttons
            .iter()
            .map(|(name, code)| (name.to_string(), *code))
            .collect();
        self
    }

    /// Exit code of the focused button, 0 when there are no buttons.
    pub fn exit_code(&self) -> i32 {
        self.buttons.get(self.selected).map(|b| b.1).unwrap_or(0)
    }

    pub fn select_next(&mut self) {
        if !self.buttons.is_empty() {
            self.selected = (self.selected + 1) % self.buttons.len();
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, palette: &Palette) {
        // border + shadow around the requested interior size
        let outer = centered_rect(
            self.width.saturating_add(2),
            self.height.saturating_add(2),
            area,
        );
        let shadow = Rect {
            x: outer.x.saturating_add(1),
            y: outer.y.saturating_add(1),
            ..outer
        }
        .intersection(area);
        f.render_widget(Clear, shadow);
        f.render_widget(Block::default().style(palette.shadow), shadow);
        f.render_widget(Clear, outer);

        let block = dialog_block(&self.title, palette);
        let inner = block.inner(outer);
        f.render_widget(block, outer);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);
        let body = Paragraph::new(self.text.clone())
            .style(palette.edit_label)
            .wrap(Wrap { trim: true });
        f.render_widget(body, rows[0]);
        let rule: String = "─".repeat(usize::from(rows[1].width));
        f.render_widget(Paragraph::new(rule).style(palette.edit_label), rows[1]);

        let mut spans = Vec::new();
        for (i, (name, _)) in self.buttons.iter().enumerate() {
            let st = if i == self.selected {
                palette.button_focus
            } else {
                palette.button
            };
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(format!("< {name} >"), st));
        }
        f.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            rows[2],
        );
    }
}
