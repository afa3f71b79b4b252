pub mod choice;
pub mod chrome;
pub mod dialog;
pub mod display;
pub mod edit;
pub mod factory;

use crate::theme::{Palette, VisualState};
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use serde_json::Value as JsonValue;

use choice::{CheckBoxSet, RadioSet};
use display::{Divider, ExternalDisplay, Label};
use edit::{LongText, TextEdit};

/// Widgets that hold a user-entered value. Only these take focus, take part
/// in validation and contribute to collected values.
pub trait Editable {
    fn edit_value(&self) -> JsonValue;
    fn validate(&self) -> bool;
    /// Returns true when the key was consumed.
    fn on_key(&mut self, key: KeyEvent) -> bool;
}

#[derive(Debug)]
pub enum Widget {
    /// Group name; never selectable.
    Heading(Label),
    Label(Label),
    Divider(Divider),
    Edit(TextEdit),
    TextArea(LongText),
    Radio(RadioSet),
    Checks(CheckBoxSet),
    Display(ExternalDisplay),
}

impl Widget {
    pub fn editable(&self) -> Option<&dyn Editable> {
        match self {
            Self::Edit(w) => Some(w as &dyn Editable),
            Self::TextArea(w) => Some(w as &dyn Editable),
            Self::Radio(w) => Some(w as &dyn Editable),
            Self::Checks(w) => Some(w as &dyn Editable),
            Self::Heading(_) | Self::Label(_) | Self::Divider(_) | Self::Display(_) => None,
        }
    }

    pub fn editable_mut(&mut self) -> Option<&mut dyn Editable> {
        match self {
            Self::Edit(w) => Some(w as &mut dyn Editable),
            Self::TextArea(w) => Some(w as &mut dyn Editable),
            Self::Radio(w) => Some(w as &mut dyn Editable),
            Self::Checks(w) => Some(w as &mut dyn Editable),
            Self::Heading(_) | Self::Label(_) | Self::Divider(_) | Self::Display(_) => None,
        }
    }

    pub fn selectable(&self) -> bool {
        self.editable().is_some()
    }

    pub fn height(&self, width: u16) -> u16 {
        match self {
            Self::Heading(w) | Self::Label(w) => w.height(width),
            Self::Divider(_) => 1,
            Self::Edit(w) => w.height(width),
            Self::TextArea(w) => w.height(width),
            Self::Radio(w) => w.height(width),
            Self::Checks(w) => w.height(width),
            Self::Display(w) => w.height(width),
        }
    }
}

/// One row-block of the form body: a widget plus its visual state.
#[derive(Debug)]
pub struct Element {
    pub widget: Widget,
    pub state: VisualState,
}

impl Element {
    pub fn new(widget: Widget) -> Self {
        Self {
            widget,
            state: VisualState::Normal,
        }
    }

    pub fn read_only(widget: Widget) -> Self {
        Self {
            widget,
            state: VisualState::ReadOnly,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, palette: &Palette, focused: bool) {
        let style = palette.element_style(self.state, focused);
        match &mut self.widget {
            Widget::Heading(w) => w.render(f, area, palette.edit_label),
            Widget::Label(w) => w.render(f, area, style),
            Widget::Divider(w) => w.render(f, area, style),
            Widget::Edit(w) => w.render(f, area, palette.edit_label, style, focused),
            Widget::TextArea(w) => w.render(f, area, palette.edit_label, style, focused),
            Widget::Radio(w) => w.render(f, area, style, focused),
            Widget::Checks(w) => w.render(f, area, style, focused),
            Widget::Display(w) => w.render(f, area, style),
        }
    }
}
