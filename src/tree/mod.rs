//! Compiled form tree: fields and named groups, built once per session.

use crate::error::Result;
use crate::model::{is_truthy, FieldSpec, FieldType, SpecEntry};
use crate::theme::VisualState;
use crate::widgets::display::Label;
use crate::widgets::factory::materialize;
use crate::widgets::{Element, Widget};
use serde_json::{Map, Value as JsonValue};
use std::cmp::Reverse;

#[cfg(test)]
mod tests;

fn join_path(parent: Option<&str>, name: &str) -> String {
    match parent {
        None | Some("") => name.to_string(),
        Some(p) => format!("{p}.{name}"),
    }
}

/// Compile one level of a spec mapping, sorted by weight (heaviest first,
/// equal weights in declaration order).
pub fn compile(spec: &Map<String, JsonValue>, parent: &str) -> Result<Vec<FormNode>> {
    let mut nodes = Vec::with_capacity(spec.len());
    for (name, value) in spec {
        let path = join_path(Some(parent), name);
        let node = match SpecEntry::classify(&path, value)? {
            SpecEntry::Field(directives) => {
                let field = FieldSpec::from_directives(name, &path, directives)?;
                FormNode::Field(FieldNode::new(name, parent, field))
            }
            SpecEntry::Group(children) => FormNode::Group(GroupNode::new(name, parent, children)?),
        };
        nodes.push(node);
    }
    // sort_by_key is stable
    nodes.sort_by_key(|n| Reverse(n.weight()));
    Ok(nodes)
}

#[derive(Debug)]
pub enum FormNode {
    Field(FieldNode),
    Group(GroupNode),
}

impl FormNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Field(f) => &f.name,
            Self::Group(g) => &g.name,
        }
    }

    /// Dotted path of the parent, `None` for the root.
    pub fn parent(&self) -> Option<&str> {
        match self {
            Self::Field(f) => f.parent.as_deref(),
            Self::Group(g) => g.parent.as_deref(),
        }
    }

    pub fn full_name(&self) -> String {
        join_path(self.parent(), self.name())
    }

    pub fn weight(&self) -> i64 {
        match self {
            Self::Field(f) => f.spec.weight,
            Self::Group(g) => g.weight,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Field(_))
    }

    pub fn value(&self) -> JsonValue {
        match self {
            Self::Field(f) => f.value(),
            Self::Group(g) => g.value(),
        }
    }

    pub fn validate(&mut self) -> bool {
        match self {
            Self::Field(f) => f.validate(),
            Self::Group(g) => g.validate(),
        }
    }

    pub fn children(&self) -> &[FormNode] {
        match self {
            Self::Field(_) => &[],
            Self::Group(g) => &g.children,
        }
    }
}

/// A single field and the widgets that edit it.
#[derive(Debug)]
pub struct FieldNode {
    pub name: String,
    pub parent: Option<String>,
    pub spec: FieldSpec,
    pub elements: Vec<Element>,
}

impl FieldNode {
    pub fn new(name: &str, parent: &str, mut spec: FieldSpec) -> Self {
        let elements = materialize(&spec);
        if spec.kind == FieldType::External {
            // computed display, nothing for the user to fill in
            spec.optional = true;
        }
        Self {
            name: name.to_string(),
            parent: Some(parent.to_string()),
            spec,
            elements,
        }
    }

    pub fn full_name(&self) -> String {
        join_path(self.parent.as_deref(), &self.name)
    }

    /// Null without editable widgets, the bare value for a single one,
    /// otherwise the list of values.
    pub fn value(&self) -> JsonValue {
        let mut values: Vec<JsonValue> = self
            .elements
            .iter()
            .filter_map(|e| e.widget.editable())
            .map(|w| w.edit_value())
            .collect();
        match values.len() {
            0 => JsonValue::Null,
            1 if self.spec.kind != FieldType::Multi => values.remove(0),
            _ if self.spec.kind == FieldType::Multi => JsonValue::Array(
                values
                    .into_iter()
                    .flat_map(|v| match v {
                        JsonValue::Array(items) => items,
                        other => vec![other],
                    })
                    .collect(),
            ),
            _ => JsonValue::Array(values),
        }
    }

    /// Run widget checks plus the required-value rule, then restyle every widget.
    pub fn validate(&mut self) -> bool {
        let mut valid = true;
        for e in &self.elements {
            if let Some(w) = e.widget.editable() {
                if !w.validate() {
                    valid = false;
                }
            }
        }
        if !self.spec.optional && !is_truthy(&self.value()) {
            valid = false;
        }
        let state = if valid {
            VisualState::Normal
        } else {
            VisualState::Invalid
        };
        for e in &mut self.elements {
            if e.state != VisualState::ReadOnly {
                e.state = state;
            }
        }
        if !valid {
            tracing::debug!(field = %self.full_name(), "field failed validation");
        }
        valid
    }

    pub fn is_invalid(&self) -> bool {
        self.elements
            .iter()
            .any(|e| e.state == VisualState::Invalid)
    }
}

/// A named nesting level.
#[derive(Debug)]
pub struct GroupNode {
    pub name: String,
    pub parent: Option<String>,
    pub children: Vec<FormNode>,
    pub weight: i64,
    pub heading: Element,
}

impl GroupNode {
    pub fn new(name: &str, parent: &str, spec: &Map<String, JsonValue>) -> Result<Self> {
        let path = join_path(Some(parent), name);
        let children = compile(spec, &path)?;
        Ok(Self::with_children(name, Some(parent.to_string()), children))
    }

    fn with_children(name: &str, parent: Option<String>, children: Vec<FormNode>) -> Self {
        let weight = children.iter().map(FormNode::weight).max().unwrap_or(0);
        Self {
            name: name.to_string(),
            parent,
            children,
            weight,
            heading: Element::new(Widget::Heading(Label::new(name))),
        }
    }

    pub fn full_name(&self) -> String {
        join_path(self.parent.as_deref(), &self.name)
    }

    pub fn value(&self) -> JsonValue {
        let mut out = Map::new();
        for child in &self.children {
            out.insert(child.name().to_string(), child.value());
        }
        JsonValue::Object(out)
    }

    /// Every child is validated, even after a failure, so all bad fields get flagged.
    pub fn validate(&mut self) -> bool {
        let mut valid = true;
        for child in &mut self.children {
            if !child.validate() {
                valid = false;
            }
        }
        valid
    }
}

/// Position of one element inside the tree: child indices from the root,
/// then either the group heading or a widget slot of a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementAddr {
    pub node: Vec<usize>,
    pub slot: Slot,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    Heading,
    Widget(usize),
}

/// Root of a compiled form. The root group has an empty name that is
/// dropped when values are collected.
#[derive(Debug)]
pub struct FormTree {
    root: GroupNode,
}

impl FormTree {
    pub fn build(variables: &Map<String, JsonValue>) -> Result<Self> {
        let children = compile(variables, "")?;
        tracing::debug!(top_level = children.len(), "compiled form spec");
        let tree = Self {
            root: GroupNode::with_children("", None, children),
        };
        tracing::trace!("form tree:\n{}", tree.outline());
        Ok(tree)
    }

    pub fn nodes(&self) -> &[FormNode] {
        &self.root.children
    }

    pub fn weight(&self) -> i64 {
        self.root.weight
    }

    pub fn values(&self) -> Map<String, JsonValue> {
        match self.root.value() {
            JsonValue::Object(map) => map,
            _ => Map::new(),
        }
    }

    pub fn validate(&mut self) -> bool {
        self.root.validate()
    }

    pub fn node(&self, path: &[usize]) -> Option<&FormNode> {
        let (first, rest) = path.split_first()?;
        let mut cur = self.root.children.get(*first)?;
        for idx in rest {
            cur = cur.children().get(*idx)?;
        }
        Some(cur)
    }

    fn node_mut(&mut self, path: &[usize]) -> Option<&mut FormNode> {
        let (first, rest) = path.split_first()?;
        let mut cur = self.root.children.get_mut(*first)?;
        for idx in rest {
            let FormNode::Group(g) = cur else {
                return None;
            };
            cur = g.children.get_mut(*idx)?;
        }
        Some(cur)
    }

    pub fn element(&self, addr: &ElementAddr) -> Option<&Element> {
        match (self.node(&addr.node)?, addr.slot) {
            (FormNode::Group(g), Slot::Heading) => Some(&g.heading),
            (FormNode::Field(f), Slot::Widget(i)) => f.elements.get(i),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, addr: &ElementAddr) -> Option<&mut Element> {
        match (self.node_mut(&addr.node)?, addr.slot) {
            (FormNode::Group(g), Slot::Heading) => Some(&mut g.heading),
            (FormNode::Field(f), Slot::Widget(i)) => f.elements.get_mut(i),
            _ => None,
        }
    }

    /// Field by dotted path, e.g. `client.city`.
    pub fn field(&self, dotted: &str) -> Option<&FieldNode> {
        fn find<'a>(nodes: &'a [FormNode], dotted: &str) -> Option<&'a FieldNode> {
            nodes.iter().find_map(|n| match n {
                FormNode::Field(f) if f.full_name() == dotted => Some(f),
                FormNode::Field(_) => None,
                FormNode::Group(g) => find(&g.children, dotted),
            })
        }
        find(&self.root.children, dotted)
    }

    /// Visit every field, depth first in display order, stopping at the first error.
    pub fn try_for_each_field_mut<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut FieldNode) -> Result<()>,
    {
        fn walk<F>(nodes: &mut [FormNode], f: &mut F) -> Result<()>
        where
            F: FnMut(&mut FieldNode) -> Result<()>,
        {
            for n in nodes {
                match n {
                    FormNode::Field(field) => f(field)?,
                    FormNode::Group(g) => walk(&mut g.children, f)?,
                }
            }
            Ok(())
        }
        walk(&mut self.root.children, &mut f)
    }

    /// Dotted paths of fields currently styled as invalid.
    pub fn invalid_fields(&self) -> Vec<String> {
        fn collect(nodes: &[FormNode], out: &mut Vec<String>) {
            for n in nodes {
                match n {
                    FormNode::Field(f) if f.is_invalid() => out.push(f.full_name()),
                    FormNode::Field(_) => {}
                    FormNode::Group(g) => collect(&g.children, out),
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.root.children, &mut out);
        out
    }

    /// Indented outline of the tree, one node per line.
    pub fn outline(&self) -> String {
        fn lines(nodes: &[FormNode], prefix: &str, out: &mut Vec<String>) {
            for (i, n) in nodes.iter().enumerate() {
                let last = i + 1 == nodes.len();
                let branch = if last { "`-" } else { "+-" };
                match n {
                    FormNode::Field(f) => out.push(format!("{prefix}{branch}{}", f.name)),
                    FormNode::Group(g) => {
                        out.push(format!("{prefix}{branch}[{}]", g.name));
                        let next = format!("{prefix}{}", if last { "  " } else { "| " });
                        lines(&g.children, &next, out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        lines(&self.root.children, "", &mut out);
        out.join("\n")
    }
}
