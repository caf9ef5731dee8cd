//! Recursive structural matching of JSON values against [`Spec`]s.
//!
//! Every function here is pure: the value is only borrowed, nothing is cached,
//! and the same inputs always produce the same errors in the same order.
use serde_json::Value;

use crate::mismatch::{render_value, Mismatch, PathError};
use crate::path::Segment;
use crate::spec::{Kind, Spec, Union};

/// All mismatches between `value` and `spec`, in spec field order then
/// element order. Empty when the value conforms.
pub fn validate(value: &Value, spec: &Spec) -> Vec<PathError> {
    validate_slot(Some(value), spec)
}

pub fn conforms(value: &Value, spec: &Spec) -> bool {
    validate(value, spec).is_empty()
}

/// Like [`validate`], for a value that may be absent (`None`), such as a
/// missing object field.
pub fn validate_slot(value: Option<&Value>, spec: &Spec) -> Vec<PathError> {
    match spec {
        Spec::Union(union) => match_union(value, union),
        Spec::AnyArray => match value {
            Some(Value::Array(_)) => Vec::new(),
            _ => vec![PathError::at_root(Mismatch::NotAnArray { found: render_value(value) })],
        },
        Spec::Array(element) => match value {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .flat_map(|(index, item)| {
                    validate_slot(Some(item), element)
                        .into_iter()
                        .map(move |err| err.prefixed(Segment::Index(index)))
                })
                .collect(),
            _ => vec![PathError::at_root(Mismatch::NotAnArray { found: render_value(value) })],
        },
        Spec::Object(fields) => match value {
            Some(Value::Object(map)) => fields
                .iter()
                .flat_map(|(name, field_spec)| {
                    validate_slot(map.get(name), field_spec)
                        .into_iter()
                        .map(move |err| err.prefixed(Segment::Field(name.clone())))
                })
                .collect(),
            _ => vec![PathError::at_root(Mismatch::NotAnObject { found: render_value(value) })],
        },
        Spec::Null => match value {
            None | Some(Value::Null) => Vec::new(),
            Some(_) => vec![PathError::at_root(Mismatch::NotNull { found: render_value(value) })],
        },
        Spec::Primitive(kind) => {
            if Kind::of(value) == *kind {
                Vec::new()
            } else {
                vec![PathError::at_root(Mismatch::NotOfKind {
                    expected: *kind,
                    found: render_value(value),
                })]
            }
        }
    }
}

/// One passing alternative is enough; otherwise a single error collecting
/// every alternative's errors.
fn match_union(value: Option<&Value>, union: &Union) -> Vec<PathError> {
    let mut failures = Vec::new();
    for alternative in union.alternatives() {
        let errors = validate_slot(value, alternative);
        if errors.is_empty() {
            return Vec::new();
        }
        failures.extend(errors);
    }
    vec![PathError::at_root(Mismatch::NoAlternativeMatched { failures })]
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(src: Value) -> Spec { Spec::from_json(&src).unwrap() }

    fn lines(value: &Value, spec: &Spec) -> Vec<String> {
        validate(value, spec).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn conforming_values_yield_nothing() {
        let s = spec(json!({
            "id": "number",
            "name": "string",
            "tags": ["string"],
            "meta": [],
            "deleted_at": null,
            "owner": {"email": ["string", null]},
        }));
        let v = json!({
            "id": 7,
            "name": "widget",
            "tags": ["a", "b"],
            "meta": [1, "two", null],
            "owner": {"email": null, "ignored": true},
            "unchecked": {"anything": []},
        });
        assert!(validate(&v, &s).is_empty());
        assert!(conforms(&v, &s));
    }

    #[test]
    fn primitive_mismatch() {
        assert_eq!(lines(&json!("5"), &Spec::number()), [r#" is not a number: "5""#]);
        assert_eq!(lines(&json!(null), &Spec::boolean()), [" is not a boolean: null"]);
        assert!(lines(&json!(false), &Spec::boolean()).is_empty());
    }

    #[test]
    fn primitive_against_absent_renders_undefined() {
        let errors = validate_slot(None, &Spec::string());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "is not a string: undefined");
    }

    #[test]
    fn undefined_kind_accepts_only_absence() {
        let s = spec(json!({"legacy": "undefined"}));
        assert!(validate(&json!({"other": 1}), &s).is_empty());
        assert_eq!(lines(&json!({"legacy": null}), &s), [".legacy is not a undefined: null"]);
        assert_eq!(lines(&json!({"legacy": 0}), &s), [".legacy is not a undefined: 0"]);
    }

    #[test]
    fn object_kind_follows_typeof() {
        let s = spec(json!("object"));
        assert!(conforms(&json!({"a": 1}), &s));
        assert!(conforms(&json!([1, 2]), &s));
        assert!(conforms(&json!(null), &s));
        assert_eq!(lines(&json!("x"), &s), [r#" is not a object: "x""#]);
        assert_eq!(validate_slot(None, &s)[0].message(), "is not a object: undefined");
    }

    #[test]
    fn null_spec_accepts_null_and_absence_only() {
        assert!(validate(&json!(null), &Spec::null()).is_empty());
        assert!(validate_slot(None, &Spec::null()).is_empty());
        let errors = validate(&json!(false), &Spec::null());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].path.is_root());
        assert_eq!(errors[0].message(), "is not null: false");
    }

    #[test]
    fn any_array_rejects_objects() {
        let errors = validate(&json!({}), &spec(json!([])));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].path.is_root());
        assert_eq!(errors[0].message(), "is not an array: {}");
        assert!(validate(&json!([]), &Spec::any_array()).is_empty());
    }

    #[test]
    fn typed_array_reports_element_indices() {
        let errors = validate(&json!([1, "x", 3]), &spec(json!(["number"])));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.to_string(), "[1]");
        assert_eq!(errors[0].message(), r#"is not a number: "x""#);
    }

    #[test]
    fn typed_array_rejects_non_arrays() {
        assert_eq!(lines(&json!("abc"), &spec(json!(["string"]))), [r#" is not an array: "abc""#]);
        assert_eq!(lines(&json!({"0": "a"}), &spec(json!(["string"]))), [r#" is not an array: {"0":"a"}"#]);
    }

    #[test]
    fn object_spec_rejects_null_arrays_and_scalars() {
        let s = spec(json!({"a": "string"}));
        assert_eq!(lines(&json!(null), &s), [" is not an object: null"]);
        assert_eq!(lines(&json!([1]), &s), [" is not an object: [1]"]);
        assert_eq!(lines(&json!(3), &s), [" is not an object: 3"]);
        assert_eq!(
            validate_slot(None, &s)[0].message(),
            "is not an object: undefined"
        );
    }

    #[test]
    fn missing_fields_are_absent() {
        let s = spec(json!({"name": "string", "age": "number"}));
        assert_eq!(
            lines(&json!({"name": 5}), &s),
            [".name is not a string: 5", ".age is not a number: undefined"]
        );
    }

    #[test]
    fn union_with_null_accepts_missing_field() {
        let s = spec(json!({"name": "string", "age": ["number", null]}));
        assert_eq!(lines(&json!({"name": 5}), &s), [".name is not a string: 5"]);
    }

    #[test]
    fn errors_follow_spec_field_order() {
        let s = spec(json!({"z": "string", "a": "string", "m": "string"}));
        let v = json!({"a": 1, "m": 2, "z": 3});
        let paths: Vec<String> = validate(&v, &s).iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, [".z", ".a", ".m"]);
    }

    #[test]
    fn union_failure_is_one_joined_error() {
        let errors = validate(&json!(true), &spec(json!(["string", "number"])));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].path.is_root());
        assert_eq!(errors[0].message(), "is not a string: true and is not a number: true");
        assert_eq!(errors[0].to_string(), " is not a string: true and is not a number: true");
    }

    #[test]
    fn union_passes_when_any_alternative_passes() {
        let s = spec(json!(["string", "number", null]));
        assert!(conforms(&json!("x"), &s));
        assert!(conforms(&json!(2), &s));
        assert!(conforms(&json!(null), &s));
        assert!(!conforms(&json!([]), &s));
    }

    #[test]
    fn union_flattens_nested_alternative_errors() {
        let s = spec(json!({"items": [[{"a": "string"}, "number"]]}));
        let v = json!({"items": [1, {"a": 2}]});
        assert_eq!(
            lines(&v, &s),
            [r#".items[1].a is not a string: 2 and is not a number: {"a":2}"#]
        );
    }

    #[test]
    fn nested_union_inside_union() {
        let inner = Spec::either(Spec::string(), Spec::number());
        let s = Spec::either(inner, Spec::null());
        assert_eq!(
            lines(&json!(false), &s),
            [" is not a string: false and is not a number: false and is not null: false"]
        );
    }

    #[test]
    fn every_element_error_is_reported() {
        let s = spec(json!([{"id": "number", "tags": ["string"]}]));
        let v = json!([{"id": "1", "tags": ["a", 2]}, {"id": 2}, {"id": 3, "tags": "x"}]);
        assert_eq!(
            lines(&v, &s),
            [
                r#"[0].id is not a number: "1""#,
                "[0].tags[1] is not a string: 2",
                "[1].tags is not an array: undefined",
                r#"[2].tags is not an array: "x""#,
            ]
        );
    }

    #[test]
    fn validation_is_idempotent_and_leaves_value_alone() {
        let s = spec(json!({"a": ["number"], "b": ["string", "boolean"]}));
        let v = json!({"a": [1, "2"], "b": 3});
        let before = v.clone();
        let first = validate(&v, &s);
        let second = validate(&v, &s);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(v, before);
    }

    #[test]
    fn validation_is_shareable_across_threads() {
        let s = spec(json!({"n": "number"}));
        let s = &s;
        let docs = [json!({"n": 1}), json!({"n": "x"}), json!({})];
        let counts: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = docs.iter().map(|d| scope.spawn(move || validate(d, s).len())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(counts, [0, 1, 1]);
    }
}
