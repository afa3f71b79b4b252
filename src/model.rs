use crate::error::{FormError, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

/// Keys starting with this character are field directives (`^label`, `^type`, ...).
pub const DIRECTIVE_PREFIX: char = '^';

/// Top-level form document: identifying strings for callbacks plus the nested variables.
#[derive(Debug, Deserialize, Clone)]
pub struct FormSpec {
    pub object_type: String,
    pub object_name: String,
    pub template_name: String,
    #[serde(default)]
    pub variables: Map<String, JsonValue>,
}

impl FormSpec {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    IpAddress,
    LongText,
    Multi,
    MultiCheck,
    JobList,
    External,
    // Unrecognized names ("choice", "phone", ...) keep their spelling; they
    // render as a radio set when choices are present, else as plain text.
    Other(String),
}

impl FieldType {
    pub fn parse(name: &str) -> Self {
        match name {
            "text" => Self::Text,
            "integer" => Self::Integer,
            "ip_address" => Self::IpAddress,
            "long_text" => Self::LongText,
            "multi" => Self::Multi,
            "multicheck" => Self::MultiCheck,
            "joblist" => Self::JobList,
            "external" => Self::External,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub description: Option<String>,
}

impl Choice {
    fn from_json(v: &JsonValue) -> Option<Self> {
        match v {
            JsonValue::Array(pair) if pair.len() == 2 => Some(Self {
                value: scalar_text(&pair[0]),
                description: Some(scalar_text(&pair[1])),
            }),
            JsonValue::Array(_) | JsonValue::Object(_) => None,
            scalar => Some(Self {
                value: scalar_text(scalar),
                description: None,
            }),
        }
    }

    /// `value : description` line shown under checkbox sets.
    pub fn describe(&self) -> String {
        match &self.description {
            Some(d) => format!("{} : {}", self.value, d),
            None => self.value.clone(),
        }
    }
}

/// Parsed directives of one field.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub label: String,
    pub default: JsonValue,
    pub kind: FieldType,
    pub validation: Option<Regex>,
    pub optional: bool,
    pub choices: Option<Vec<Choice>>,
    pub weight: i64,
    pub callback: Option<String>,
    pub registered_var_names: Vec<String>,
}

impl FieldSpec {
    /// Build from a mapping whose keys are all directives. `path` is only used in errors.
    pub fn from_directives(name: &str, path: &str, spec: &Map<String, JsonValue>) -> Result<Self> {
        let get = |key: &str| spec.get(&format!("{DIRECTIVE_PREFIX}{key}"));

        let label = get("label")
            .map(scalar_text)
            .unwrap_or_else(|| name.to_string());
        let default = get("default")
            .cloned()
            .unwrap_or_else(|| JsonValue::String(String::new()));
        let kind = match get("type") {
            Some(JsonValue::String(s)) => FieldType::parse(s),
            Some(other) => FieldType::parse(&scalar_text(other)),
            None => FieldType::Text,
        };
        let validation = match get("validation") {
            None | Some(JsonValue::Null) => None,
            Some(v) => {
                let pattern = scalar_text(v);
                let re = Regex::new(&pattern).map_err(|e| {
                    FormError::malformed(path, format!("invalid ^validation pattern: {e}"))
                })?;
                Some(re)
            }
        };
        let optional = get("optional").map(is_truthy).unwrap_or(false);
        let choices = match get("choices") {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let choice = Choice::from_json(item).ok_or_else(|| {
                        FormError::malformed(
                            path,
                            "^choices entries must be labels or [value, description] pairs",
                        )
                    })?;
                    out.push(choice);
                }
                Some(out)
            }
            Some(_) => return Err(FormError::malformed(path, "^choices must be a list")),
        };
        let weight = match get("weight") {
            None | Some(JsonValue::Null) => 0,
            Some(v) => v
                .as_i64()
                .ok_or_else(|| FormError::malformed(path, "^weight must be an integer"))?,
        };
        let callback = get("callback").and_then(|v| v.as_str()).map(str::to_string);
        let registered_var_names = get("registered_var_names")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            label,
            default,
            kind,
            validation,
            optional,
            choices,
            weight,
            callback,
            registered_var_names,
        })
    }

    /// Default rendered as edit text; numbers become integer text.
    pub fn default_text(&self) -> String {
        scalar_text(&self.default)
    }

    pub fn has_choices(&self) -> bool {
        self.choices.as_ref().map(|c| !c.is_empty()).unwrap_or(false)
    }
}

/// How one entry of a spec mapping should be compiled.
pub enum SpecEntry<'a> {
    Field(&'a Map<String, JsonValue>),
    Group(&'a Map<String, JsonValue>),
}

impl<'a> SpecEntry<'a> {
    pub fn classify(path: &str, value: &'a JsonValue) -> Result<Self> {
        let JsonValue::Object(map) = value else {
            return Err(FormError::malformed(path, "expected a mapping"));
        };
        let tagged = map
            .keys()
            .filter(|k| k.starts_with(DIRECTIVE_PREFIX))
            .count();
        if tagged == map.len() {
            // An empty mapping is a field with every directive defaulted.
            Ok(Self::Field(map))
        } else if tagged == 0 {
            Ok(Self::Group(map))
        } else {
            Err(FormError::malformed(
                path,
                "mapping mixes ^directives with nested keys",
            ))
        }
    }
}

/// Text form of a scalar: strings verbatim, numbers as integers, null as empty.
pub fn scalar_text(v: &JsonValue) -> String {
    match v {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64().unwrap_or_default();
                format!("{:.0}", f.trunc())
            }
        }
        other => other.to_string(),
    }
}

/// Emptiness test used for required fields: null, "", [], {}, 0 and false are empty.
pub fn is_truthy(v: &JsonValue) -> bool {
    match v {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}

/// Look up a dotted path (`thing.test_ip2`) in a nested mapping.
pub fn get_by_path<'a>(v: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut cur = v;
    for seg in path.split('.') {
        cur = cur.get(seg)?;
    }
    Some(cur)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directives(v: JsonValue) -> Map<String, JsonValue> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn field_spec_reads_directives_and_ignores_unknown_ones() {
        let spec = directives(json!({
            "^default": 999999999,
            "^example": 211168045,
            "^label": "CMF ship-to number",
            "^optional": true,
            "^type": "integer",
            "^validation": r"^\d{9}$",
            "^weight": 3
        }));
        let f = FieldSpec::from_directives("CMF", "CMF", &spec).unwrap();
        assert_eq!(f.label, "CMF ship-to number");
        assert_eq!(f.kind, FieldType::Integer);
        assert!(f.optional);
        assert_eq!(f.weight, 3);
        assert_eq!(f.default_text(), "999999999");
        assert!(f.validation.as_ref().unwrap().is_match("123456789"));
    }

    #[test]
    fn field_spec_defaults() {
        let f = FieldSpec::from_directives("city", "client.city", &Map::new()).unwrap();
        assert_eq!(f.label, "city");
        assert_eq!(f.kind, FieldType::Text);
        assert!(!f.optional);
        assert_eq!(f.weight, 0);
        assert_eq!(f.default_text(), "");
        assert!(f.choices.is_none());
        assert!(f.callback.is_none());
    }

    #[test]
    fn choices_accept_labels_and_pairs() {
        let spec = directives(json!({
            "^type": "multicheck",
            "^choices": [["router_1", "label1"], "plain", [7, "label for job_e"]]
        }));
        let f = FieldSpec::from_directives("m", "m", &spec).unwrap();
        let choices = f.choices.unwrap();
        assert_eq!(choices[0].value, "router_1");
        assert_eq!(choices[0].describe(), "router_1 : label1");
        assert_eq!(choices[1].description, None);
        assert_eq!(choices[2].value, "7");
    }

    #[test]
    fn bad_regex_and_bad_choices_are_malformed() {
        let spec = directives(json!({"^validation": "(unclosed"}));
        let err = FieldSpec::from_directives("x", "a.x", &spec).unwrap_err();
        assert!(matches!(err, FormError::MalformedSpec { ref path, .. } if path == "a.x"));

        let spec = directives(json!({"^choices": "not-a-list"}));
        assert!(FieldSpec::from_directives("x", "x", &spec).is_err());
    }

    #[test]
    fn classify_distinguishes_fields_groups_and_mixed() {
        assert!(matches!(
            SpecEntry::classify("a", &json!({"^label": "A"})),
            Ok(SpecEntry::Field(_))
        ));
        assert!(matches!(
            SpecEntry::classify("a", &json!({})),
            Ok(SpecEntry::Field(_))
        ));
        assert!(matches!(
            SpecEntry::classify("a", &json!({"b": {"^label": "B"}})),
            Ok(SpecEntry::Group(_))
        ));
        assert!(SpecEntry::classify("a", &json!({"^label": "A", "b": {}})).is_err());
        assert!(SpecEntry::classify("a", &json!({"b": {}, "^weight": 1})).is_err());
        assert!(SpecEntry::classify("a", &json!("scalar")).is_err());
    }

    #[test]
    fn truthiness_matches_required_field_rules() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!(123)));
        assert!(is_truthy(&json!(["x"])));
    }

    #[test]
    fn form_spec_loads_from_yaml() {
        let text = r#"
object_type: router
object_name: test_router
template_name: big test
variables:
  b: { "^label": B }
  a: { "^label": A }
"#;
        let spec = FormSpec::from_yaml_str(text).unwrap();
        assert_eq!(spec.object_type, "router");
        let keys: Vec<&String> = spec.variables.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn get_by_path_traverses_nested_objects() {
        let v = json!({"thing": {"test_ip2": "127.0.0.1"}, "CMF": 1});
        assert_eq!(get_by_path(&v, "thing.test_ip2"), Some(&json!("127.0.0.1")));
        assert_eq!(get_by_path(&v, "CMF"), Some(&json!(1)));
        assert!(get_by_path(&v, "thing.missing").is_none());
    }
}
