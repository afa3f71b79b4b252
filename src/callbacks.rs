use crate::model::get_by_path;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::fmt;

/// Everything an external field's callback gets to see.
#[derive(Clone, Copy, Debug)]
pub struct CallbackArgs<'a> {
    pub object_type: &'a str,
    pub object_name: &'a str,
    pub template_name: &'a str,
    /// Dotted path of the external field itself, e.g. `sub.sub.name`.
    pub field_path: &'a str,
    /// Current values of the registered variables, nested like the form.
    pub vars: &'a JsonValue,
}

impl CallbackArgs<'_> {
    pub fn var(&self, dotted: &str) -> Option<&JsonValue> {
        get_by_path(self.vars, dotted)
    }
}

pub type FieldCallback = Box<dyn Fn(&CallbackArgs<'_>) -> anyhow::Result<String>>;

/// Named callbacks that `^callback` directives refer to.
#[derive(Default)]
pub struct CallbackRegistry {
    map: HashMap<String, FieldCallback>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&CallbackArgs<'_>) -> anyhow::Result<String> + 'static,
    {
        self.map.insert(name.into(), Box::new(f));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldCallback> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.map.keys().collect();
        names.sort();
        f.debug_struct("CallbackRegistry")
            .field("names", &names)
            .finish()
    }
}

/// Subset of `values` holding only the registered dotted paths. Paths that
/// do not resolve are left out.
pub fn registered_snapshot(values: &JsonValue, names: &[String]) -> JsonValue {
    let mut out = Map::new();
    for name in names {
        if let Some(v) = get_by_path(values, name) {
            let segs: Vec<&str> = name.split('.').collect();
            insert_path(&mut out, &segs, v.clone());
        }
    }
    JsonValue::Object(out)
}

fn insert_path(target: &mut Map<String, JsonValue>, segs: &[&str], v: JsonValue) {
    match segs {
        [] => {}
        [last] => {
            target.insert(last.to_string(), v);
        }
        [head, rest @ ..] => {
            let slot = target
                .entry(head.to_string())
                .or_insert_with(|| JsonValue::Object(Map::new()));
            if !slot.is_object() {
                *slot = JsonValue::Object(Map::new());
            }
            if let JsonValue::Object(next) = slot {
                insert_path(next, rest, v);
            }
        }
    }
}
