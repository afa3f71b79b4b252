use crate::app::{Form, FormOutcome};
use crate::error::Result;
use crate::widgets::chrome::banner;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use std::io::stdout;

/// Raw mode plus the alternate screen for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
    }
}

pub fn run(form: &mut Form) -> Result<FormOutcome> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;
    let outcome = loop {
        terminal.draw(|f| draw_form(f, form))?;
        if let Event::Key(key) = event::read()? {
            let step = form.handle_key(key)?;
            if let Some(outcome) = form.outcome(step) {
                break outcome;
            }
        }
    };
    terminal.show_cursor()?;
    Ok(outcome)
}

/// First element to draw so that `focus` fits in `avail` rows, moving as
/// little as possible from `prev`.
pub(crate) fn scroll_start(heights: &[u16], focus: usize, prev: usize, avail: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let focus = focus.min(heights.len() - 1);
    let mut start = prev.min(focus);
    while start < focus {
        let used: u32 = heights[start..=focus].iter().map(|h| u32::from(*h)).sum();
        if used <= u32::from(avail) {
            break;
        }
        start += 1;
    }
    start
}

pub fn draw_form(f: &mut Frame, form: &mut Form) {
    let area = f.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let hint = form.config.banner_text();
    f.render_widget(banner(&hint, &form.palette), rows[0]);
    f.render_widget(banner(&hint, &form.palette), rows[2]);

    let body = rows[1];
    let width_at = |indent: u16| body.width.saturating_sub(indent).max(1);
    if let Some(focus) = form.focus {
        let heights: Vec<u16> = form
            .flat
            .iter()
            .take(focus + 1)
            .map(|fe| {
                form.tree
                    .element(&fe.addr)
                    .map(|e| e.widget.height(width_at(fe.indent())))
                    .unwrap_or(1)
            })
            .collect();
        form.scroll = scroll_start(&heights, focus, form.scroll, body.height);
    }

    let bottom = body.y.saturating_add(body.height);
    let mut y = body.y;
    for (idx, fe) in form.flat.iter().enumerate().skip(form.scroll) {
        if y >= bottom {
            break;
        }
        let indent = fe.indent().min(body.width.saturating_sub(1));
        let width = width_at(indent);
        let Some(element) = form.tree.element_mut(&fe.addr) else {
            continue;
        };
        let h = element.widget.height(width).min(bottom - y);
        let rect = Rect::new(body.x + indent, y, width, h);
        element.render(f, rect, &form.palette, form.focus == Some(idx));
        y += h;
    }

    if let Some(popup) = &form.popup {
        popup.render(f, area, &form.palette);
    }
}
