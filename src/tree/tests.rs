use super::*;
use crate::error::FormError;
use crate::widgets::Editable;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

fn tree(v: JsonValue) -> FormTree {
    FormTree::build(v.as_object().unwrap()).unwrap()
}

fn names(nodes: &[FormNode]) -> Vec<&str> {
    nodes.iter().map(FormNode::name).collect()
}

fn type_into(tree: &mut FormTree, dotted: &str, text: &str) {
    let mut done = false;
    tree.try_for_each_field_mut(|f| {
        if f.full_name() == dotted {
            let w = f
                .elements
                .iter_mut()
                .find_map(|e| e.widget.editable_mut())
                .unwrap();
            for c in text.chars() {
                w.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
            }
            done = true;
        }
        Ok(())
    })
    .unwrap();
    assert!(done, "no field {dotted}");
}

#[test]
fn heavier_entries_come_first_and_ties_keep_declaration_order() {
    let t = tree(json!({
        "a": {"^weight": 1},
        "b": {"^weight": 5},
        "c": {"^weight": 1},
        "d": {}
    }));
    assert_eq!(names(t.nodes()), vec!["b", "a", "c", "d"]);
}

#[test]
fn group_weight_is_max_of_children() {
    let t = tree(json!({
        "plain": {"^weight": 10},
        "grp": {"x": {"^weight": 3}, "y": {"^weight": 50}},
        "empty": {"inner": {}}
    }));
    assert_eq!(names(t.nodes()), vec!["grp", "plain", "empty"]);
    assert_eq!(t.nodes()[0].weight(), 50);
    assert_eq!(t.nodes()[2].weight(), 0);
    assert_eq!(t.weight(), 50);
}

#[test]
fn mixed_mapping_is_rejected_with_its_path() {
    let err = FormTree::build(
        json!({"outer": {"bad": {"^label": "x", "nested": {}}}})
            .as_object()
            .unwrap(),
    )
    .unwrap_err();
    match err {
        FormError::MalformedSpec { path, .. } => assert_eq!(path, "outer.bad"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn scalar_entry_is_rejected() {
    let err = FormTree::build(json!({"x": 5}).as_object().unwrap()).unwrap_err();
    assert!(matches!(err, FormError::MalformedSpec { .. }));
}

#[test]
fn values_mirror_nesting_and_drop_root_name() {
    let t = tree(json!({
        "CMF": {"^type": "integer", "^default": 999999999},
        "client": {"city": {"^default": "O FALLON"}, "poc": {"^optional": true}},
        "sub": {"sub": {"name": {"^type": "external"}}}
    }));
    let values = JsonValue::Object(t.values());
    assert_eq!(
        values,
        json!({
            "CMF": 999999999,
            "client": {"city": "O FALLON", "poc": ""},
            "sub": {"sub": {"name": null}}
        })
    );
}

#[test]
fn full_names_are_dotted_from_the_root() {
    let t = tree(json!({"client": {"city": {}}}));
    let group = &t.nodes()[0];
    assert_eq!(group.full_name(), "client");
    assert!(!group.is_terminal());
    assert_eq!(group.children()[0].full_name(), "client.city");
    assert!(t.field("client.city").is_some());
    assert!(t.field("city").is_none());
}

#[test]
fn validation_flags_every_failing_field() {
    let mut t = tree(json!({
        "one": {},
        "two": {"^optional": true},
        "grp": {"three": {}, "ip": {"^type": "ip_address", "^default": "1.2.3"}}
    }));
    assert!(!t.validate());
    assert_eq!(t.invalid_fields(), vec!["one", "grp.three", "grp.ip"]);

    type_into(&mut t, "one", "x");
    type_into(&mut t, "grp.three", "y");
    type_into(&mut t, "grp.ip", ".4");
    assert!(t.validate());
    assert!(t.invalid_fields().is_empty());
}

#[test]
fn regex_runs_as_a_search() {
    let mut t = tree(json!({"code": {"^validation": "[0-9]{3}", "^default": "ab123cd"}}));
    assert!(t.validate());
    let mut t = tree(json!({"code": {"^validation": "[0-9]{3}", "^default": "ab12cd"}}));
    assert!(!t.validate());
}

#[test]
fn required_integer_zero_counts_as_empty() {
    let mut t = tree(json!({"n": {"^type": "integer", "^default": 0}}));
    assert!(!t.validate());
    let mut t = tree(json!({"n": {"^type": "integer", "^default": 0, "^optional": true}}));
    assert!(t.validate());
}

#[test]
fn external_fields_are_optional_and_stay_read_only() {
    let mut t = tree(json!({"name": {"^type": "external"}}));
    assert!(t.validate());
    let f = t.field("name").unwrap();
    assert!(f.spec.optional);
    assert_eq!(f.elements[0].state, VisualState::ReadOnly);
}

#[test]
fn multi_value_is_flat_list_of_checked_labels() {
    let mut t = tree(json!({
        "routers": {"^type": "multi", "^choices": ["r1", "r2", "r3"]}
    }));
    t.try_for_each_field_mut(|f| {
        for e in &mut f.elements {
            if let Widget::Checks(c) = &mut e.widget {
                c.toggle(0);
                c.toggle(2);
            }
        }
        Ok(())
    })
    .unwrap();
    assert_eq!(t.values()["routers"], json!(["r1", "r3"]));
}

#[test]
fn joblist_value_lists_comment_then_jobs() {
    let t = tree(json!({
        "jobs": {"^type": "joblist", "^choices": [["a", "job a"], ["b", "job b"]]}
    }));
    assert_eq!(t.values()["jobs"], json!(["", ["a", "b"]]));
}

#[test]
fn element_addresses_resolve_headings_and_widgets() {
    let t = tree(json!({"grp": {"f": {}}}));
    let heading = ElementAddr {
        node: vec![0],
        slot: Slot::Heading,
    };
    assert!(matches!(
        t.element(&heading).map(|e| &e.widget),
        Some(Widget::Heading(_))
    ));
    let edit = ElementAddr {
        node: vec![0, 0],
        slot: Slot::Widget(0),
    };
    assert!(t.element(&edit).unwrap().widget.selectable());
    let bogus = ElementAddr {
        node: vec![0, 0],
        slot: Slot::Heading,
    };
    assert!(t.element(&bogus).is_none());
}

#[test]
fn walk_stops_at_first_error() {
    let mut t = tree(json!({"a": {}, "b": {}, "c": {}}));
    let mut seen = Vec::new();
    let res = t.try_for_each_field_mut(|f| {
        seen.push(f.name.clone());
        if f.name == "b" {
            return Err(FormError::malformed("b", "stop"));
        }
        Ok(())
    });
    assert!(res.is_err());
    assert_eq!(seen, vec!["a", "b"]);
}

#[test]
fn outline_draws_nesting() {
    let t = tree(json!({"a": {}, "g": {"b": {}, "c": {}}}));
    assert_eq!(t.outline(), "+-a\n`-[g]\n  +-b\n  `-c");
}
