use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

/// Fixed style table for one session. Built once and handed to the form.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub mode: ThemeMode,
    pub status_line: Style,
    pub edit_label: Style,
    pub text_unfocus: Style,
    pub edit_focus: Style,
    pub edit_unfocus: Style,
    pub err_focus: Style,
    pub err_unfocus: Style,
    pub border: Style,
    pub shadow: Style,
    pub button: Style,
    pub button_focus: Style,
}

impl Palette {
    pub fn classic_dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            status_line: Style::default().fg(Color::White).bg(Color::Red),
            edit_label: Style::default().fg(Color::Reset).bg(Color::Black),
            edit_focus: Style::default()
                .fg(Color::White)
                .bg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            edit_unfocus: Style::default().fg(Color::Gray).bg(Color::Blue),
            text_unfocus: Style::default().fg(Color::Gray).bg(Color::Black),
            err_focus: Style::default()
                .fg(Color::White)
                .bg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
            err_unfocus: Style::default().fg(Color::Gray).bg(Color::Red),
            border: Style::default().fg(Color::White).bg(Color::Black),
            shadow: Style::default().fg(Color::White).bg(Color::Black),
            button: Style::default()
                .fg(Color::Gray)
                .bg(Color::Blue)
                .add_modifier(Modifier::REVERSED),
            button_focus: Style::default()
                .fg(Color::White)
                .bg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn classic_light() -> Self {
        Self {
            mode: ThemeMode::Light,
            status_line: Style::default().fg(Color::White).bg(Color::Rgb(200, 0, 0)),
            edit_label: Style::default().fg(Color::Rgb(20, 20, 22)),
            edit_focus: Style::default()
                .fg(Color::Rgb(20, 20, 22))
                .bg(Color::Rgb(170, 200, 240))
                .add_modifier(Modifier::BOLD),
            edit_unfocus: Style::default()
                .fg(Color::Rgb(20, 20, 22))
                .bg(Color::Rgb(215, 225, 240)),
            text_unfocus: Style::default().fg(Color::Rgb(120, 120, 130)),
            err_focus: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(220, 60, 60))
                .add_modifier(Modifier::BOLD),
            err_unfocus: Style::default()
                .fg(Color::Rgb(20, 20, 22))
                .bg(Color::Rgb(245, 190, 190)),
            border: Style::default().fg(Color::Rgb(200, 200, 210)),
            shadow: Style::default().bg(Color::Rgb(120, 120, 130)),
            button: Style::default()
                .fg(Color::Rgb(20, 20, 22))
                .bg(Color::Rgb(215, 225, 240)),
            button_focus: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(40, 120, 220))
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::classic_dark(),
            ThemeMode::Light => Self::classic_light(),
        }
    }

    /// Style for an element given its visual state and whether it holds focus.
    pub fn element_style(&self, state: VisualState, focused: bool) -> Style {
        match (state, focused) {
            (VisualState::Normal, false) => self.edit_unfocus,
            (VisualState::Normal, true) => self.edit_focus,
            (VisualState::ReadOnly, _) => self.text_unfocus,
            (VisualState::Invalid, false) => self.err_unfocus,
            (VisualState::Invalid, true) => self.err_focus,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::classic_dark()
    }
}

/// Visual state of one input element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum VisualState {
    #[default]
    Normal,
    ReadOnly,
    Invalid,
}
