use crate::callbacks::{registered_snapshot, CallbackArgs, CallbackRegistry};
use crate::config::SessionConfig;
use crate::error::{FormError, Result};
use crate::model::{FieldType, FormSpec};
use crate::nav::flatten::{flatten_tree, FlatElement};
use crate::theme::Palette;
use crate::tree::FormTree;
use crate::widgets::dialog::Dialog;
use crate::widgets::{Element, Widget};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use serde_json::{Map, Value as JsonValue};


/// What one key press did to the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopResult {
    Continue,
    Completed,
    Aborted,
    /// The popup was dismissed with the given button code.
    PopupClosed(i32),
}

/// How a session ended. Aborted sessions never carry values.
#[derive(Clone, Debug, PartialEq)]
pub enum FormOutcome {
    Completed(Map<String, JsonValue>),
    Aborted,
}

/// An interactive form session over a compiled tree.
#[derive(Debug)]
pub struct Form {
    pub(crate) tree: FormTree,
    pub(crate) flat: Vec<FlatElement>,
    pub(crate) focus: Option<usize>,
    /// First flattened element drawn in the body.
    pub(crate) scroll: usize,
    pub(crate) popup: Option<Dialog>,
    pub(crate) palette: Palette,
    pub(crate) config: SessionConfig,
    callbacks: CallbackRegistry,
    object_type: String,
    object_name: String,
    template_name: String,
}

impl Form {
    pub fn new(spec: &FormSpec, callbacks: CallbackRegistry, config: SessionConfig) -> Result<Self> {
        let mut tree = FormTree::build(&spec.variables)?;
        tree.try_for_each_field_mut(|field| match &field.spec.callback {
            Some(name) if !callbacks.contains(name) => Err(FormError::UnknownCallback {
                path: field.full_name(),
                name: name.clone(),
            }),
            _ => Ok(()),
        })?;
        let flat = flatten_tree(&tree);
        let palette = config.palette();
        let mut form = Self {
            tree,
            flat,
            focus: None,
            scroll: 0,
            popup: None,
            palette,
            config,
            callbacks,
            object_type: spec.object_type.clone(),
            object_name: spec.object_name.clone(),
            template_name: spec.template_name.clone(),
        };
        form.focus = form.flat.iter().position(|fe| form.is_selectable(fe));
        tracing::debug!(
            elements = form.flat.len(),
            focus = ?form.focus,
            "form session ready"
        );
        Ok(form)
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn tree(&self) -> &FormTree {
        &self.tree
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn popup(&self) -> Option<&Dialog> {
        self.popup.as_ref()
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn values(&self) -> Map<String, JsonValue> {
        self.tree.values()
    }

    pub fn validate(&mut self) -> bool {
        self.tree.validate()
    }

    /// Run the session on the real terminal until it completes or is aborted.
    pub fn run(&mut self) -> Result<FormOutcome> {
        crate::ui::run(self)
    }

    /// Terminal outcome for a step result, `None` while the session goes on.
    pub fn outcome(&self, step: LoopResult) -> Option<FormOutcome> {
        match step {
            LoopResult::Completed => Some(FormOutcome::Completed(self.values())),
            LoopResult::Aborted => Some(FormOutcome::Aborted),
            LoopResult::Continue | LoopResult::PopupClosed(_) => None,
        }
    }

    pub(crate) fn element_at(&self, idx: usize) -> Option<&Element> {
        self.flat.get(idx).and_then(|fe| self.tree.element(&fe.addr))
    }

    fn is_selectable(&self, fe: &FlatElement) -> bool {
        self.tree
            .element(&fe.addr)
            .map(|e| e.widget.selectable())
            .unwrap_or(false)
    }

    /// Move focus `delta` selectable elements forward (or back), wrapping around.
    pub fn focus_next(&mut self, delta: isize) {
        let len = self.flat.len();
        let Some(start) = self.focus else {
            return;
        };
        if len == 0 {
            return;
        }
        let step = if delta < 0 { len - 1 } else { 1 };
        let mut remaining = delta.unsigned_abs();
        let mut idx = start;
        // bounded so a form with nothing selectable cannot spin
        for _ in 0..len.saturating_mul(remaining) {
            idx = (idx + step) % len;
            if self.is_selectable(&self.flat[idx]) {
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
        }
        self.focus = Some(idx);
    }

    /// Recompute every external field from the current values.
    pub fn refresh_external(&mut self) -> Result<()> {
        let values = JsonValue::Object(self.tree.values());
        let callbacks = &self.callbacks;
        let (object_type, object_name, template_name) =
            (&self.object_type, &self.object_name, &self.template_name);
        self.tree.try_for_each_field_mut(|field| {
            if field.spec.kind != FieldType::External {
                return Ok(());
            }
            let path = field.full_name();
            let output = match field.spec.callback.as_deref().and_then(|n| callbacks.get(n)) {
                Some(callback) => {
                    let vars = registered_snapshot(&values, &field.spec.registered_var_names);
                    let args = CallbackArgs {
                        object_type,
                        object_name,
                        template_name,
                        field_path: &path,
                        vars: &vars,
                    };
                    callback(&args).map_err(|source| FormError::Callback {
                        path: path.clone(),
                        source,
                    })?
                }
                None => "--".to_string(),
            };
            tracing::trace!(field = %path, %output, "external field refreshed");
            for e in &mut field.elements {
                if let Widget::Display(d) = &mut e.widget {
                    d.set_output(output.clone());
                }
            }
            Ok(())
        })
    }

    fn submit(&mut self) -> LoopResult {
        if self.tree.validate() {
            tracing::debug!("form submitted");
            return LoopResult::Completed;
        }
        tracing::debug!(invalid = ?self.tree.invalid_fields(), "submit rejected");
        self.popup = Some(
            Dialog::new(
                self.config.invalid_title.clone(),
                self.config.invalid_message.clone(),
                self.config.popup_width,
                self.config.popup_height,
            )
            .with_buttons(&[("OK", 0)]),
        );
        LoopResult::Continue
    }

    fn popup_key(&mut self, key: &KeyEvent) -> LoopResult {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                let code = self.popup.take().map(|d| d.exit_code()).unwrap_or(0);
                LoopResult::PopupClosed(code)
            }
            _ if self.config.cancel_key.matches(key) => LoopResult::Aborted,
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
                if let Some(d) = self.popup.as_mut() {
                    d.select_next();
                }
                LoopResult::Continue
            }
            _ => LoopResult::Continue,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<LoopResult> {
        if key.kind != KeyEventKind::Press {
            return Ok(LoopResult::Continue);
        }
        tracing::trace!(code = ?key.code, modifiers = ?key.modifiers, "key");
        if self.popup.is_some() {
            return Ok(self.popup_key(&key));
        }
        if self.config.submit_key.matches(&key) {
            return Ok(self.submit());
        }
        if self.config.cancel_key.matches(&key) {
            tracing::debug!("form aborted");
            return Ok(LoopResult::Aborted);
        }
        match key.code {
            KeyCode::Tab => {
                self.refresh_external()?;
                self.focus_next(1);
                return Ok(LoopResult::Continue);
            }
            KeyCode::BackTab => {
                self.refresh_external()?;
                self.focus_next(-1);
                return Ok(LoopResult::Continue);
            }
            _ => {}
        }

        let consumed = match self.focus.and_then(|i| self.flat.get(i)) {
            Some(fe) => {
                let addr = fe.addr.clone();
                self.tree
                    .element_mut(&addr)
                    .and_then(|e| e.widget.editable_mut())
                    .map(|w| w.on_key(key))
                    .unwrap_or(false)
            }
            None => false,
        };
        if consumed {
            return Ok(LoopResult::Continue);
        }
        match key.code {
            KeyCode::Enter => {
                self.refresh_external()?;
                self.focus_next(1);
            }
            KeyCode::Down => self.focus_next(1),
            KeyCode::Up => self.focus_next(-1),
            _ => {}
        }
        Ok(LoopResult::Continue)
    }
}
