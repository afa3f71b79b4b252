use crate::model::{FieldSpec, FieldType};
use crate::widgets::choice::{CheckBoxSet, RadioSet};
use crate::widgets::display::{Divider, ExternalDisplay, Label};
use crate::widgets::edit::{EditKind, EditValidator, LongText, TextEdit};
use crate::widgets::{Element, Widget};

/// Caption shown before a field: required fields carry a leading `*`.
pub fn caption(spec: &FieldSpec) -> String {
    let marker = if spec.optional { "" } else { "*" };
    format!("{marker}{}: ", spec.label)
}

/// Build the widgets that represent one field, in display order.
pub fn materialize(spec: &FieldSpec) -> Vec<Element> {
    let cap = caption(spec);
    let default = spec.default_text();
    let values: Vec<String> = spec
        .choices
        .iter()
        .flatten()
        .map(|c| c.value.clone())
        .collect();
    let descriptions = || {
        spec.choices
            .iter()
            .flatten()
            .map(|c| Element::new(Widget::Label(Label::new(c.describe()))))
    };
    let edit = |kind: EditKind| {
        Widget::Edit(TextEdit::new(
            cap.clone(),
            default.clone(),
            EditValidator::new(kind, spec.validation.clone()),
        ))
    };

    let widgets: Vec<Element> = match &spec.kind {
        FieldType::Integer => vec![Element::new(edit(EditKind::Integer))],
        FieldType::IpAddress => vec![Element::new(edit(EditKind::IpAddress))],
        FieldType::LongText => vec![Element::new(Widget::TextArea(LongText::new(
            cap.clone(),
            &default,
            spec.validation.clone(),
        )))],
        FieldType::Multi if spec.has_choices() => vec![
            Element::new(Widget::Label(Label::new(cap.clone()))),
            Element::new(Widget::Checks(CheckBoxSet::new(
                values,
                spec.optional,
                false,
            ))),
        ],
        FieldType::MultiCheck => {
            let head = if spec.optional {
                format!("(OPTIONAL) {cap}")
            } else {
                cap.clone()
            };
            let mut out = vec![
                Element::new(Widget::Label(Label::new(head))),
                Element::new(Widget::Checks(CheckBoxSet::new(
                    values,
                    spec.optional,
                    false,
                ))),
                Element::new(Widget::Divider(Divider { ch: '-' })),
            ];
            out.extend(descriptions());
            out.push(Element::new(Widget::Divider(Divider { ch: '-' })));
            out
        }
        FieldType::JobList => {
            // Comment box plus the jobs it applies to; every job starts checked.
            let mut out = vec![
                Element::new(Widget::Label(Label::new(cap.clone()))),
                Element::new(Widget::TextArea(LongText::new("", "", None))),
                Element::new(Widget::Divider(Divider { ch: '-' })),
                Element::new(Widget::Checks(CheckBoxSet::new(values, false, true))),
            ];
            out.extend(descriptions());
            out
        }
        FieldType::External => vec![Element::read_only(Widget::Display(
            ExternalDisplay::new(spec.label.clone()),
        ))],
        _ if spec.has_choices() => vec![
            Element::new(Widget::Label(Label::new(cap.clone()))),
            Element::new(Widget::Radio(RadioSet::new(
                &values,
                &default,
                spec.optional,
            ))),
        ],
        _ => vec![Element::new(edit(EditKind::Text))],
    };
    widgets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Editable;
    use serde_json::{json, Map, Value as JsonValue};

    fn spec(v: JsonValue) -> FieldSpec {
        let map: Map<String, JsonValue> = v.as_object().cloned().unwrap();
        FieldSpec::from_directives("f", "f", &map).unwrap()
    }

    fn editables(elements: &[Element]) -> Vec<&dyn Editable> {
        elements
            .iter()
            .filter_map(|e| e.widget.editable())
            .collect()
    }

    #[test]
    fn caption_marks_required_fields() {
        assert_eq!(caption(&spec(json!({"^label": "City"}))), "*City: ");
        assert_eq!(
            caption(&spec(json!({"^label": "POC", "^optional": true}))),
            "POC: "
        );
    }

    #[test]
    fn plain_field_is_one_text_edit_with_default() {
        let els = materialize(&spec(json!({"^default": "This router"})));
        assert_eq!(els.len(), 1);
        assert_eq!(editables(&els)[0].edit_value(), json!("This router"));
    }

    #[test]
    fn integer_default_is_rendered_as_text() {
        let els = materialize(&spec(json!({"^type": "integer", "^default": 999})));
        match &els[0].widget {
            Widget::Edit(e) => assert_eq!(e.text, "999"),
            other => panic!("expected edit, got {other:?}"),
        }
    }

    #[test]
    fn multicheck_has_one_checkbox_per_choice_and_descriptions() {
        let els = materialize(&spec(json!({
            "^type": "multicheck",
            "^optional": true,
            "^choices": [["router_1", "label1"], ["router_2", "label2"]]
        })));
        let checks = els
            .iter()
            .find_map(|e| match &e.widget {
                Widget::Checks(c) => Some(c),
                _ => None,
            })
            .unwrap();
        assert_eq!(checks.labels, vec!["router_1", "router_2"]);
        assert!(checks.checked.iter().all(|c| !c));
        let described: Vec<&str> = els
            .iter()
            .filter_map(|e| match &e.widget {
                Widget::Label(l) => Some(l.text.as_str()),
                _ => None,
            })
            .collect();
        assert!(described[0].starts_with("(OPTIONAL) "));
        assert!(described.contains(&"router_1 : label1"));
        assert!(described.contains(&"router_2 : label2"));
    }

    #[test]
    fn joblist_is_comment_plus_prechecked_jobs() {
        let els = materialize(&spec(json!({
            "^type": "joblist",
            "^choices": [["job_a", "label a"], ["job_b", "label b"]]
        })));
        let eds = editables(&els);
        assert_eq!(eds.len(), 2);
        assert_eq!(eds[0].edit_value(), json!(""));
        assert_eq!(eds[1].edit_value(), json!(["job_a", "job_b"]));
    }

    #[test]
    fn choices_without_composite_type_make_radio_set() {
        let els = materialize(&spec(json!({
            "^type": "choice",
            "^choices": ["aa", "egv"],
            "^default": "egv"
        })));
        assert!(matches!(els[1].widget, Widget::Radio(_)));
        assert_eq!(editables(&els)[0].edit_value(), json!("egv"));
    }

    #[test]
    fn multi_without_choices_falls_back_to_text() {
        let els = materialize(&spec(json!({"^type": "multi"})));
        assert_eq!(els.len(), 1);
        assert!(matches!(els[0].widget, Widget::Edit(_)));
    }

    #[test]
    fn external_is_read_only_display() {
        let els = materialize(&spec(json!({"^type": "external", "^label": "Name"})));
        assert_eq!(els.len(), 1);
        assert!(!els[0].widget.selectable());
        assert_eq!(els[0].state, crate::theme::VisualState::ReadOnly);
    }
}
