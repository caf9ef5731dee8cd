//! Spec inference from sample documents.
//!
//! Stream JSON samples in, fold them into per-kind evidence, then lower the
//! evidence to the loosest [`Spec`] every sample conforms to.
//!
//! - Join ⊔ is associative/commutative/idempotent on the evidence, so the
//!   inferred shape does not depend on sample order (field *order* follows
//!   first appearance).
//! - At most one arm per kind; several kinds become a union.
//! - An object field missing from some samples also accepts null/absence.
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::spec::Spec;

// ------------------------------ Evidence --------------------------------- //

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evidence {
    pub nullable: bool,
    pub has_bool: bool,
    pub has_num: bool,
    pub has_str: bool,
    pub arr: Option<ArrE>,
    pub obj: Option<ObjE>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArrE {
    pub item: Box<Evidence>,   // joined over every element of every array
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjE {
    pub fields: IndexMap<String, FieldE>,
    pub seen_objects: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldE {
    pub ty: Evidence,
    pub present_in: u64,
}

impl Evidence {
    pub fn empty() -> Self { Self::default() }
    pub fn is_bottom(&self) -> bool {
        !self.nullable && !self.has_bool && !self.has_num && !self.has_str
            && self.arr.is_none() && self.obj.is_none()
    }
}

// ------------------------------ Observe ---------------------------------- //

pub fn observe_value(v: &Value) -> Evidence {
    match v {
        Value::Null => Evidence { nullable: true, ..Evidence::default() },
        Value::Bool(_) => Evidence { has_bool: true, ..Evidence::default() },
        Value::Number(_) => Evidence { has_num: true, ..Evidence::default() },
        Value::String(_) => Evidence { has_str: true, ..Evidence::default() },
        Value::Array(xs) => observe_array(xs),
        Value::Object(m) => observe_object(m),
    }
}

fn observe_array(xs: &[Value]) -> Evidence {
    let item = xs.iter().fold(Evidence::empty(), |acc, el| join(&acc, &observe_value(el)));
    let arr = ArrE { item: Box::new(item) };
    Evidence { arr: Some(arr), ..Evidence::default() }
}

fn observe_object(map: &Map<String, Value>) -> Evidence {
    let fields = map
        .iter()
        .map(|(k, v)| (k.clone(), FieldE { ty: observe_value(v), present_in: 1 }))
        .collect();
    Evidence { obj: Some(ObjE { fields, seen_objects: 1 }), ..Evidence::default() }
}

// -------------------------------- Join (⊔) -------------------------------- //

pub fn join(a: &Evidence, b: &Evidence) -> Evidence {
    Evidence {
        nullable: a.nullable || b.nullable,
        has_bool: a.has_bool || b.has_bool,
        has_num: a.has_num || b.has_num,
        has_str: a.has_str || b.has_str,
        arr: match (&a.arr, &b.arr) {
            (None, None) => None,
            (Some(x), None) | (None, Some(x)) => Some(x.clone()),
            (Some(x), Some(y)) => Some(join_arr(x, y)),
        },
        obj: match (&a.obj, &b.obj) {
            (None, None) => None,
            (Some(x), None) | (None, Some(x)) => Some(x.clone()),
            (Some(x), Some(y)) => Some(join_obj(x, y)),
        },
    }
}

fn join_arr(a: &ArrE, b: &ArrE) -> ArrE {
    ArrE { item: Box::new(join(&a.item, &b.item)) }
}

fn join_obj(a: &ObjE, b: &ObjE) -> ObjE {
    let mut fields = IndexMap::with_capacity(a.fields.len().max(b.fields.len()));

    // keys from a, merged with b where shared
    for (k, fa) in &a.fields {
        let merged = match b.fields.get(k) {
            None => fa.clone(),
            Some(fb) => FieldE {
                ty: join(&fa.ty, &fb.ty),
                present_in: fa.present_in + fb.present_in,
            },
        };
        fields.insert(k.clone(), merged);
    }
    // keys only in b
    for (k, fb) in &b.fields {
        if !fields.contains_key(k) {
            fields.insert(k.clone(), fb.clone());
        }
    }

    ObjE { fields, seen_objects: a.seen_objects + b.seen_objects }
}

// ------------------------------- Lowering --------------------------------- //

/// Lower evidence to a spec. `None` for bottom (nothing observed).
pub fn to_spec(e: &Evidence) -> Option<Spec> {
    if e.is_bottom() { return None; }
    let mut arms = Vec::new();

    if e.has_str { arms.push(Spec::string()); }
    if e.has_num { arms.push(Spec::number()); }
    if e.has_bool { arms.push(Spec::boolean()); }

    if let Some(obj) = &e.obj {
        let fields = obj.fields.iter().map(|(name, field)| {
            let mut ty = field.ty.clone();
            // missing somewhere → absence must pass
            ty.nullable |= field.present_in < obj.seen_objects;
            let spec = to_spec(&ty).unwrap_or(Spec::Null);
            (name.clone(), spec)
        });
        arms.push(Spec::object(fields));
    }

    if let Some(arr) = &e.arr {
        // only empty arrays seen → no element evidence
        arms.push(to_spec(&arr.item).map_or_else(Spec::any_array, Spec::array_of));
    }

    if e.nullable { arms.push(Spec::null()); }

    match arms.len() {
        1 => arms.pop(),
        _ => Some(Spec::from_sequence(arms)),
    }
}

// ------------------------------- Front API -------------------------------- //

#[derive(Debug, Default)]
pub struct Inference { state: Evidence, samples: u64 }

impl Inference {
    pub fn new() -> Self { Self::default() }

    pub fn observe_value(&mut self, v: &Value) {
        self.state = join(&self.state, &observe_value(v));
        self.samples += 1;
    }

    pub fn samples(&self) -> u64 { self.samples }

    pub fn solve(&self) -> Option<Spec> { to_spec(&self.state) }
}

pub fn infer_from_values<'a, I>(values: I) -> Option<Spec>
where
    I: IntoIterator<Item = &'a Value>
{
    let mut inf = Inference::new();
    for v in values { inf.observe_value(v); }
    inf.solve()
}

// ------------------------------- Tests ------------------------------------ //
