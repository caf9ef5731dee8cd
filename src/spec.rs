//! Shape descriptions ("specs") and their JSON literal notation.
//!
//! A spec is written the same way the data it describes is written:
//! - `"string"`, `"number"`, `"boolean"`: the value must be of that kind
//! - `"object"`: JS `typeof` semantics, so objects, arrays and null all match
//! - `"undefined"`: the value must be absent
//! - `null`: the value must be null or absent
//! - `{ "field": <spec>, ... }`: an object whose declared fields match (extra fields are ignored)
//! - `[]`: any array
//! - `[<spec>]`: an array whose every element matches `<spec>`
//! - `[<spec>, <spec>, ...]`: any one of the listed specs
//!
//! The last form overloads array syntax for unions. That keeps the notation
//! small; in Rust the overload is resolved once, at parse time, into [`Spec`].
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ------------------------------- Kinds ----------------------------------- //

/// Runtime value kinds a spec can name, following JS `typeof` over JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Number,
    Boolean,
    /// Objects, arrays and null alike.
    Object,
    /// Only an absent value (a missing field), never JSON null.
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown kind `{0}`, expected \"string\", \"number\", \"boolean\", \"object\" or \"undefined\"")]
pub struct UnknownKind(pub String);

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Object => "object",
            Kind::Undefined => "undefined",
        }
    }

    /// Kind of a possibly-absent value.
    pub fn of(value: Option<&Value>) -> Kind {
        match value {
            None => Kind::Undefined,
            Some(Value::String(_)) => Kind::String,
            Some(Value::Number(_)) => Kind::Number,
            Some(Value::Bool(_)) => Kind::Boolean,
            Some(Value::Null | Value::Array(_) | Value::Object(_)) => Kind::Object,
        }
    }
}

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Kind::String),
            "number" => Ok(Kind::Number),
            "boolean" => Ok(Kind::Boolean),
            "object" => Ok(Kind::Object),
            "undefined" => Ok(Kind::Undefined),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

// ------------------------------- Specs ----------------------------------- //

#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Primitive(Kind),
    Null,
    /// Declared fields, checked in declaration order.
    Object(IndexMap<String, Spec>),
    AnyArray,
    Array(Box<Spec>),
    Union(Union),
}

/// Two or more alternatives; see [`Spec::one_of`].
#[derive(Debug, Clone, PartialEq)]
pub struct Union(Vec<Spec>);

impl Union {
    pub fn new(alternatives: Vec<Spec>) -> Result<Self, SpecError> {
        if alternatives.len() < 2 {
            return Err(SpecError::TooFewAlternatives(alternatives.len()));
        }
        Ok(Self(alternatives))
    }
    pub fn alternatives(&self) -> &[Spec] { &self.0 }
}

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("invalid spec at `{path}`: {reason}")]
    Invalid { path: String, reason: String },
    #[error("a union needs at least two alternatives, got {0}")]
    TooFewAlternatives(usize),
}

impl Spec {
    pub fn string() -> Self { Spec::Primitive(Kind::String) }
    pub fn number() -> Self { Spec::Primitive(Kind::Number) }
    pub fn boolean() -> Self { Spec::Primitive(Kind::Boolean) }
    pub fn null() -> Self { Spec::Null }
    pub fn any_array() -> Self { Spec::AnyArray }
    pub fn array_of(element: Spec) -> Self { Spec::Array(Box::new(element)) }

    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Spec)>,
        K: Into<String>,
    {
        Spec::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn either(a: Spec, b: Spec) -> Self { Spec::Union(Union(vec![a, b])) }

    pub fn one_of<I>(alternatives: I) -> Result<Self, SpecError>
    where
        I: IntoIterator<Item = Spec>,
    {
        Union::new(alternatives.into_iter().collect()).map(Spec::Union)
    }

    /// Resolve array notation: `[]`, `[T]` or `[A, B, ...]`.
    pub fn from_sequence(mut specs: Vec<Spec>) -> Self {
        match specs.len() {
            0 => Spec::AnyArray,
            1 => Spec::Array(Box::new(specs.remove(0))),
            _ => Spec::Union(Union(specs)),
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, SpecError> {
        serde_path_to_error::deserialize(value).map_err(SpecError::from_path_error)
    }

    pub fn from_json_str(src: &str) -> Result<Self, SpecError> {
        let de = &mut serde_json::Deserializer::from_str(src);
        let spec = serde_path_to_error::deserialize(&mut *de).map_err(SpecError::from_path_error)?;
        de.end().map_err(|error| SpecError::Invalid { path: ".".to_string(), reason: error.to_string() })?;
        Ok(spec)
    }

    pub fn to_json(&self) -> Value {
        match self {
            Spec::Primitive(kind) => Value::from(kind.name()),
            Spec::Null => Value::Null,
            Spec::Object(fields) => Value::Object(
                fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()
            ),
            Spec::AnyArray => Value::Array(Vec::new()),
            Spec::Array(element) => Value::Array(vec![element.to_json()]),
            Spec::Union(union) => Value::Array(union.0.iter().map(Spec::to_json).collect()),
        }
    }
}

impl SpecError {
    fn from_path_error<E: fmt::Display>(error: serde_path_to_error::Error<E>) -> Self {
        let path = error.path().to_string();
        SpecError::Invalid { path, reason: error.into_inner().to_string() }
    }
}

impl TryFrom<&Value> for Spec {
    type Error = SpecError;
    fn try_from(value: &Value) -> Result<Self, Self::Error> { Spec::from_json(value) }
}

impl FromStr for Spec {
    type Err = SpecError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Spec::from_json_str(s) }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.to_json()) }
}

// ------------------------------- Serde ----------------------------------- //

impl Serialize for Spec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Spec::Primitive(kind) => serializer.serialize_str(kind.name()),
            Spec::Null => serializer.serialize_unit(),
            Spec::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, spec) in fields {
                    map.serialize_entry(name, spec)?;
                }
                map.end()
            }
            Spec::AnyArray => serializer.serialize_seq(Some(0))?.end(),
            Spec::Array(element) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(element.as_ref())?;
                seq.end()
            }
            Spec::Union(union) => {
                let mut seq = serializer.serialize_seq(Some(union.0.len()))?;
                for alternative in &union.0 {
                    seq.serialize_element(alternative)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Spec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SpecVisitor)
    }
}

struct SpecVisitor;

impl<'de> Visitor<'de> for SpecVisitor {
    type Value = Spec;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a kind name, null, an object of field specs, or an array of specs")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Spec, E> {
        v.parse::<Kind>().map(Spec::Primitive).map_err(E::custom)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Spec, E> { Ok(Spec::Null) }

    fn visit_none<E: de::Error>(self) -> Result<Spec, E> { Ok(Spec::Null) }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Spec, A::Error> {
        let mut fields = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, spec)) = map.next_entry::<String, Spec>()? {
            fields.insert(name, spec);
        }
        Ok(Spec::Object(fields))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Spec, A::Error> {
        let mut specs = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(spec) = seq.next_element::<Spec>()? {
            specs.push(spec);
        }
        Ok(Spec::from_sequence(specs))
    }
}

// ------------------------------- Tests ------------------------------------ //
