//! Leaf classification of JSON values and the join over type descriptors.
//!
//! `Classifier::classify` maps one value to a [`TypeDescriptor`] without
//! looking into object field sets; the builder owns that, because only it
//! sees every sibling sample of a field. [`unify`] is the lattice join:
//! commutative, idempotent and total.
//!
//! Lattice sketch (nullability is an orthogonal flag on every kind):
//! - `Unconstrained` carries no evidence and is the identity of the join;
//! - `Null` joins as "T, but nullable";
//! - `Integer < Long < Float` widen;
//! - arrays and dictionaries join element-wise; objects join to a fresh
//!   placeholder; `{}` joins with either an object or a dictionary;
//! - everything else meets at `Anything`, which absorbs.
pub mod str;
pub mod num;
pub mod arr;
pub mod obj;

use serde_json::Value;

use crate::config::{DatePolicy, DictionaryPolicy, GeneratorConfig};
use crate::ir::{TypeDescriptor, TypeKind};

// ------------------------------ Classify --------------------------------- //

/// Policy-bound classifier; cheap to build, borrows its policies.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    dates: &'a DatePolicy,
    dictionaries: &'a DictionaryPolicy,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { dates: &config.dates, dictionaries: &config.dictionaries }
    }

    pub fn classify(&self, v: &Value) -> TypeDescriptor {
        match v {
            Value::Null => TypeDescriptor::null(),
            Value::Bool(_) => TypeDescriptor::boolean(),
            Value::Number(n) => TypeDescriptor::new(num::classify_number(n)),
            Value::String(s) => TypeDescriptor::new(str::classify_string(s, self.dates)),
            Value::Array(xs) => self.classify_array(xs),
            Value::Object(m) => self.classify_object(m),
        }
    }
}

// -------------------------------- Join (⊔) -------------------------------- //

pub fn unify(a: &TypeDescriptor, b: &TypeDescriptor) -> TypeDescriptor {
    use TypeKind as K;

    let nullable = a.is_nullable() || b.is_nullable();
    let kind = match (&a.kind, &b.kind) {
        (K::Anything, _) | (_, K::Anything) => K::Anything,
        (K::Unconstrained, _) => return b.clone(),
        (_, K::Unconstrained) => return a.clone(),
        (K::Null, _) => return b.clone().into_nullable(),
        (_, K::Null) => return a.clone().into_nullable(),

        (K::Array(x), K::Array(y)) => K::Array(Box::new(unify(x, y))),
        (K::Dictionary(x), K::Dictionary(y)) => K::Dictionary(Box::new(unify(x, y))),
        // field sets are merged by the builder from the pooled samples
        (K::Object(x), K::Object(y)) => K::Object(if x == y { *x } else { None }),
        // `{}` carries no key evidence
        (K::EmptyObject, K::Object(id)) | (K::Object(id), K::EmptyObject) => K::Object(*id),
        (K::EmptyObject, K::Dictionary(v)) | (K::Dictionary(v), K::EmptyObject) => K::Dictionary(v.clone()),

        (x, y) if x == y => x.clone(),
        (x, y) => match num::widen(x, y) {
            Some(wider) => wider,
            None => K::Anything,
        },
    };
    TypeDescriptor::new(kind).with_nullable(nullable)
}

/// Join of a whole sequence; `None` (no information) when it is empty.
pub fn unify_all<I>(types: I) -> Option<TypeDescriptor>
where
    I: IntoIterator<Item = TypeDescriptor>,
{
    types.into_iter().reduce(|acc, t| unify(&acc, &t))
}

// ------------------------------- Tests ------------------------------------ //
