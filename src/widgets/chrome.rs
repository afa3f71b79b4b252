use crate::theme::Palette;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Centered status line shown above and below the form body.
pub fn banner<'a>(text: &'a str, palette: &Palette) -> Paragraph<'a> {
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(palette.status_line)
}

pub fn dialog_block<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(palette.edit_label)
        .border_style(palette.border)
}

/// Rect of the given size centered in `area`; a zero size takes 80% of the area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = if width == 0 {
        area.width.saturating_mul(4) / 5
    } else {
        width.min(area.width)
    };
    let h = if height == 0 {
        area.height.saturating_mul(4) / 5
    } else {
        height.min(area.height)
    };
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
