use crate::widgets::Editable;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use serde_json::Value as JsonValue;

/// Label of the implicit "none of the above" radio in optional choice fields.
pub const NONE_LABEL: &str = "<NONE>";

/// Grid cell width for a set of labels: short labels pack tighter.
fn cell_width(labels: &[String]) -> usize {
    let max_len = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    if max_len < 16 {
        max_len + 4
    } else {
        20
    }
}

/// Mark-prefixed cells laid out left to right, wrapping at `width`.
fn grid_lines(
    cells: Vec<String>,
    cell_w: usize,
    width: u16,
    cursor: Option<usize>,
    style: Style,
    cursor_style: Style,
) -> Vec<Line<'static>> {
    let per_row = (usize::from(width) / (cell_w + 1)).max(1);
    let mut lines = Vec::new();
    for (row, chunk) in cells.chunks(per_row).enumerate() {
        let mut spans = Vec::new();
        for (col, cell) in chunk.iter().enumerate() {
            let idx = row * per_row + col;
            let st = if Some(idx) == cursor { cursor_style } else { style };
            spans.push(Span::styled(format!("{cell:<cell_w$}"), st));
            spans.push(Span::styled(" ", style));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn grid_height(count: usize, cell_w: usize, width: u16) -> u16 {
    let per_row = (usize::from(width) / (cell_w + 1)).max(1);
    u16::try_from(count.div_ceil(per_row).max(1)).unwrap_or(u16::MAX)
}

/// Mutually exclusive choice group.
#[derive(Clone, Debug)]
pub struct RadioSet {
    pub labels: Vec<String>,
    pub selected: usize,
    pub cursor: usize,
    pub optional: bool,
}

impl RadioSet {
    /// Selects `default` when it names a choice, otherwise the first entry
    /// (which is `<NONE>` for optional sets).
    pub fn new(choices: &[String], default: &str, optional: bool) -> Self {
        let mut labels = Vec::with_capacity(choices.len() + 1);
        if optional {
            labels.push(NONE_LABEL.to_string());
        }
        labels.extend(choices.iter().cloned());
        let skip = usize::from(optional);
        let selected = if default.is_empty() {
            0
        } else {
            choices
                .iter()
                .position(|c| c == default)
                .map(|i| i + skip)
                .unwrap_or(0)
        };
        Self {
            labels,
            selected,
            cursor: selected,
            optional,
        }
    }

    pub fn select(&mut self, idx: usize) {
        if idx < self.labels.len() {
            self.selected = idx;
            self.cursor = idx;
        }
    }

    pub fn height(&self, width: u16) -> u16 {
        grid_height(self.labels.len(), cell_width(&self.labels) + 4, width)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, style: Style, focused: bool) {
        let cells = self
            .labels
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let mark = if i == self.selected { "(X)" } else { "( )" };
                format!("{mark} {l}")
            })
            .collect();
        let cursor = focused.then_some(self.cursor);
        let lines = grid_lines(
            cells,
            cell_width(&self.labels) + 4,
            area.width,
            cursor,
            style,
            style.add_modifier(Modifier::REVERSED),
        );
        f.render_widget(Paragraph::new(lines).style(style), area);
    }
}

impl Editable for RadioSet {
    fn edit_value(&self) -> JsonValue {
        match self.labels.get(self.selected) {
            Some(_) if self.optional && self.selected == 0 => JsonValue::Null,
            Some(label) => JsonValue::String(label.clone()),
            None => JsonValue::Null,
        }
    }

    fn validate(&self) -> bool {
        true
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor + 1 < self.labels.len() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.selected = self.cursor;
                true
            }
            _ => false,
        }
    }
}

/// Independent checkboxes; the value is the list of checked labels.
#[derive(Clone, Debug)]
pub struct CheckBoxSet {
    pub labels: Vec<String>,
    pub checked: Vec<bool>,
    pub cursor: usize,
    pub optional: bool,
}

impl CheckBoxSet {
    pub fn new(labels: Vec<String>, optional: bool, default_state: bool) -> Self {
        let checked = vec![default_state; labels.len()];
        Self {
            labels,
            checked,
            cursor: 0,
            optional,
        }
    }

    pub fn toggle(&mut self, idx: usize) {
        if let Some(slot) = self.checked.get_mut(idx) {
            *slot = !*slot;
        }
    }

    pub fn checked_labels(&self) -> Vec<String> {
        self.labels
            .iter()
            .zip(&self.checked)
            .filter(|(_, on)| **on)
            .map(|(l, _)| l.clone())
            .collect()
    }

    pub fn height(&self, width: u16) -> u16 {
        grid_height(self.labels.len(), cell_width(&self.labels) + 4, width)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, style: Style, focused: bool) {
        let cells = self
            .labels
            .iter()
            .zip(&self.checked)
            .map(|(l, on)| {
                let mark = if *on { "[X]" } else { "[ ]" };
                format!("{mark} {l}")
            })
            .collect();
        let cursor = focused.then_some(self.cursor);
        let lines = grid_lines(
            cells,
            cell_width(&self.labels) + 4,
            area.width,
            cursor,
            style,
            style.add_modifier(Modifier::REVERSED),
        );
        f.render_widget(Paragraph::new(lines).style(style), area);
    }
}

impl Editable for CheckBoxSet {
    fn edit_value(&self) -> JsonValue {
        JsonValue::Array(
            self.checked_labels()
                .into_iter()
                .map(JsonValue::String)
                .collect(),
        )
    }

    fn validate(&self) -> bool {
        self.optional || self.checked.iter().any(|b| *b)
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor + 1 < self.labels.len() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.toggle(self.cursor);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn radio_defaults_to_declared_choice_or_first() {
        let choices = labels(&["Pirate", "Ninja", "Monkey"]);
        let r = RadioSet::new(&choices, "Ninja", false);
        assert_eq!(r.edit_value(), JsonValue::from("Ninja"));
        let r = RadioSet::new(&choices, "", false);
        assert_eq!(r.edit_value(), JsonValue::from("Pirate"));
        let r = RadioSet::new(&choices, "Zombie", false);
        assert_eq!(r.edit_value(), JsonValue::from("Pirate"));
    }

    #[test]
    fn optional_radio_starts_on_none() {
        let choices = labels(&["aa", "egv"]);
        let mut r = RadioSet::new(&choices, "", true);
        assert_eq!(r.labels[0], NONE_LABEL);
        assert_eq!(r.edit_value(), JsonValue::Null);
        r.on_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        r.on_key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
        assert_eq!(r.edit_value(), JsonValue::from("aa"));
    }

    #[test]
    fn select_moves_selection_and_ignores_out_of_range() {
        let mut r = RadioSet::new(&labels(&["aa", "egv"]), "", true);
        r.select(2);
        assert_eq!(r.edit_value(), JsonValue::from("egv"));
        assert_eq!(r.cursor, 2);
        r.select(7);
        assert_eq!(r.edit_value(), JsonValue::from("egv"));
        r.select(0);
        assert_eq!(r.edit_value(), JsonValue::Null);
    }

    #[test]
    fn checkboxes_collect_checked_labels() {
        let mut c = CheckBoxSet::new(labels(&["router_1", "router_2"]), false, false);
        assert!(!c.validate());
        c.toggle(0);
        assert_eq!(c.edit_value(), serde_json::json!(["router_1"]));
        assert!(c.validate());
        c.toggle(0);
        assert_eq!(c.edit_value(), serde_json::json!([]));
    }

    #[test]
    fn optional_checkboxes_accept_nothing_checked() {
        let c = CheckBoxSet::new(labels(&["a"]), true, false);
        assert!(c.validate());
    }

    #[test]
    fn grid_wraps_by_cell_width() {
        // 6 labels of length 5 => cell 9 + 4 marks = 13 wide (+1 gap) => 3 per row at 42 cols
        let c = CheckBoxSet::new(labels(&["aaaaa"; 6]), true, false);
        assert_eq!(c.height(42), 2);
        assert_eq!(c.height(14), 6);
    }
}
