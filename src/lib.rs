//! Structural shape checking for JSON values.
//!
//! Describe the expected shape with a [`Spec`] (usually written in its JSON
//! literal notation), then either collect every deviation with [`validate`]
//! or pass the value through [`check`], which reports deviations and hands the
//! value back unchanged.
//!
//! ```
//! use json_shapecheck::{validate, Spec};
//! use serde_json::json;
//!
//! let spec = Spec::from_json(&json!({"name": "string", "tags": ["string"]})).unwrap();
//! let errors = validate(&json!({"name": 5, "tags": ["a", 2]}), &spec);
//! let lines: Vec<String> = errors.iter().map(|e| format!("user{e}")).collect();
//! assert_eq!(lines, ["user.name is not a string: 5", "user.tags[1] is not a string: 2"]);
//! ```
pub mod infer;
pub mod jq_exec;
pub mod mismatch;
pub mod path;
pub mod reporter;
pub mod spec;
pub mod validate;

pub use mismatch::{Mismatch, PathError, UNDEFINED};
pub use path::{Path, Segment};
pub use reporter::{check, check_with, ConsoleReporter, Reporter, TracingReporter, DEFAULT_ROOT_LABEL};
pub use spec::{Kind, Spec, SpecError, Union};
pub use validate::{conforms, validate, validate_slot};
