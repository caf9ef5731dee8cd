//! What went wrong, and where.
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::path::{Path, Segment};
use crate::spec::Kind;

/// Rendering used for a value that is not there at all (a missing field).
pub const UNDEFINED: &str = "undefined";

/// Compact JSON for present values, [`UNDEFINED`] for absent ones.
///
/// Numbers print as `serde_json` keeps them: a float parsed from `1.0`
/// renders `1.0`, where JS `JSON.stringify` would print `1`. Integers and
/// every other literal render the same in both.
pub fn render_value(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => UNDEFINED.to_string(),
    }
}

/// Mismatch kinds. These are data, not failures: validation always returns
/// normally and hands these back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    #[error("is not an array: {found}")]
    NotAnArray { found: String },
    #[error("is not an object: {found}")]
    NotAnObject { found: String },
    #[error("is not null: {found}")]
    NotNull { found: String },
    #[error("is not a {expected}: {found}")]
    NotOfKind { expected: Kind, found: String },
    /// Every alternative of a union failed. The alternatives' errors are kept
    /// with paths relative to the union, and render as one joined message.
    #[error("{}", join_alternatives(.failures))]
    NoAlternativeMatched { failures: Vec<PathError> },
}

// Joiner kept verbatim: existing consumers match on this exact text.
const ALTERNATIVE_JOINER: &str = " and";

fn join_alternatives(failures: &[PathError]) -> String {
    failures
        .iter()
        .map(PathError::to_string)
        .collect::<Vec<_>>()
        .join(ALTERNATIVE_JOINER)
}

/// One mismatch at one path.
///
/// Renders as `<path> <message>`, except union failures which render as
/// `<path><joined alternatives>`; each joined alternative already carries its
/// own leading path or space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    pub path: Path,
    pub mismatch: Mismatch,
}

impl PathError {
    pub fn at_root(mismatch: Mismatch) -> Self { Self { path: Path::root(), mismatch } }

    pub fn prefixed(self, segment: Segment) -> Self {
        Self { path: self.path.prefixed(segment), mismatch: self.mismatch }
    }

    /// The message without its path.
    pub fn message(&self) -> String {
        match &self.mismatch {
            Mismatch::NoAlternativeMatched { .. } => self.mismatch.to_string().trim_start().to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mismatch {
            Mismatch::NoAlternativeMatched { .. } => write!(f, "{}{}", self.path, self.mismatch),
            other => write!(f, "{} {}", self.path, other),
        }
    }
}

impl std::error::Error for PathError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn not_a(expected: Kind, found: &str) -> Mismatch {
        Mismatch::NotOfKind { expected, found: found.to_string() }
    }

    #[test]
    fn absent_values_render_as_undefined() {
        assert_eq!(render_value(None), "undefined");
        assert_eq!(render_value(Some(&json!(null))), "null");
        assert_eq!(render_value(Some(&json!({"b": 1, "a": "x"}))), r#"{"b":1,"a":"x"}"#);
    }

    #[test]
    fn floats_keep_their_fraction() {
        assert_eq!(render_value(Some(&json!(1.0))), "1.0");
        assert_eq!(render_value(Some(&json!(1))), "1");
        assert_eq!(render_value(Some(&json!(2.5))), "2.5");
    }

    #[test]
    fn leaf_errors_render_path_space_message() {
        let err = PathError::at_root(not_a(Kind::String, "5")).prefixed(Segment::Field("name".into()));
        assert_eq!(err.to_string(), ".name is not a string: 5");
        assert_eq!(err.message(), "is not a string: 5");

        let root = PathError::at_root(Mismatch::NotNull { found: "false".into() });
        assert_eq!(root.to_string(), " is not null: false");
    }

    #[test]
    fn union_failures_join_without_extra_spaces() {
        let err = PathError::at_root(Mismatch::NoAlternativeMatched {
            failures: vec![
                PathError::at_root(not_a(Kind::String, "true")),
                PathError::at_root(not_a(Kind::Number, "true")),
            ],
        });
        assert_eq!(err.to_string(), " is not a string: true and is not a number: true");
        assert_eq!(err.message(), "is not a string: true and is not a number: true");

        let nested = err.prefixed(Segment::Index(0));
        assert_eq!(nested.to_string(), "[0] is not a string: true and is not a number: true");
    }

    #[test]
    fn union_failures_keep_relative_paths() {
        let err = PathError::at_root(Mismatch::NoAlternativeMatched {
            failures: vec![
                PathError::at_root(not_a(Kind::String, "1")).prefixed(Segment::Field("a".into())),
                PathError::at_root(not_a(Kind::Number, r#"{"a":1}"#)),
            ],
        })
        .prefixed(Segment::Field("p".into()));
        assert_eq!(err.to_string(), r#".p.a is not a string: 1 and is not a number: {"a":1}"#);
    }
}
