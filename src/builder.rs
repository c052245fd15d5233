//! Turns example objects into a [`SchemaGraph`].
//!
//! One `build` call handles one class level: it merges every example's
//! properties into an ordered field map, then recurses into fields whose
//! (innermost) type is an object, pooling the sub-objects from *all*
//! examples so sibling samples contribute to the same nested class.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::config::{AbsencePolicy, GeneratorConfig};
use crate::error::{json_kind_name, Error, Result};
use crate::inference::{unify, Classifier};
use crate::ir::{ClassId, ClassSchema, FieldSchema, SchemaGraph, TypeDescriptor, TypeKind};
use crate::naming::{member_identifier, NameRegistry};

type Object = Map<String, Value>;

/// Owns all per-run state: the name registry and the classes built so far.
#[derive(Debug)]
pub struct SchemaBuilder<'a> {
    config: &'a GeneratorConfig,
    classifier: Classifier<'a>,
    names: NameRegistry,
    next_id: u32,
    secondary: IndexMap<ClassId, ClassSchema>,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self::with_names(config, NameRegistry::new())
    }

    /// Uses a caller-supplied registry, e.g. one with another singularizer.
    pub fn with_names(config: &'a GeneratorConfig, names: NameRegistry) -> Self {
        Self {
            config,
            classifier: Classifier::new(config),
            names,
            next_id: 0,
            secondary: IndexMap::new(),
        }
    }

    /// Runs a whole generation. Every example must be a JSON object.
    pub fn build_graph(mut self, examples: &[Value]) -> Result<SchemaGraph> {
        if examples.is_empty() {
            return Err(Error::NoExamples);
        }
        let objects = examples
            .iter()
            .enumerate()
            .map(|(index, v)| {
                v.as_object().ok_or(Error::NotAnObject { index, found: json_kind_name(v) })
            })
            .collect::<Result<Vec<&Object>>>()?;

        let root_name = self.names.unique_name(&self.config.root_name);
        let root = self.build(&objects, root_name, true, 0);
        debug!(classes = 1 + self.secondary.len(), "schema graph complete");
        Ok(SchemaGraph::new(root, self.secondary))
    }

    fn allocate_id(&mut self) -> ClassId {
        let id = ClassId(self.next_id);
        self.next_id += 1;
        id
    }

    fn build(&mut self, examples: &[&Object], name: String, is_root: bool, depth: usize) -> ClassSchema {
        let id = self.allocate_id();
        let mut fields = self.merge_fields(examples, &name);
        let mut has_nested_classes = false;

        for (key, ty) in fields.iter_mut() {
            if !ty.wants_class() {
                continue;
            }
            if depth >= self.config.max_depth {
                warn!(class = %name, field = %key, max_depth = self.config.max_depth,
                    "nesting too deep, field degraded to an untyped value");
                ty.replace_innermost(TypeKind::Anything);
                continue;
            }

            let mut pooled = Vec::new();
            for obj in examples {
                if let Some(value) = obj.get(key) {
                    pool_objects(&ty.kind, value, &mut pooled);
                }
            }

            let child_name = if ty.is_container() {
                self.names.unique_name_from_plural(key)
            } else {
                self.names.unique_name(key)
            };
            let child = self.build(&pooled, child_name, false, depth + 1);
            ty.link_class(child.id);
            self.secondary.insert(child.id, child);
            has_nested_classes = true;
        }

        let fields = assemble_fields(fields, self.config.use_pascal_case);
        debug!(class = %name, id = id.0, fields = fields.len(), examples = examples.len(), "built class");
        ClassSchema { id, name, is_root, fields, has_nested_classes }
    }

    /// Folds every example's properties into one ordered field map.
    fn merge_fields(&self, examples: &[&Object], class_name: &str) -> IndexMap<String, TypeDescriptor> {
        let mut fields: IndexMap<String, TypeDescriptor> = IndexMap::new();

        for (i, obj) in examples.iter().enumerate() {
            for (key, value) in obj.iter() {
                let observed = self.classifier.classify(value);
                match fields.get_mut(key) {
                    Some(current) => *current = unify(current, &observed),
                    None => {
                        // absent from every earlier example
                        let ty = if i == 0 { observed } else { unify(&observed, &TypeDescriptor::null()) };
                        fields.insert(key.clone(), ty);
                    }
                }
            }
        }

        if self.config.absence == AbsencePolicy::Retroactive {
            for (key, ty) in fields.iter_mut() {
                if examples.iter().any(|obj| !obj.contains_key(key)) {
                    *ty = unify(ty, &TypeDescriptor::null());
                }
            }
        }

        for (key, ty) in &fields {
            trace!(class = %class_name, field = %key, ty = ?ty, "merged field");
            if ty.kind == TypeKind::Anything {
                debug!(class = %class_name, field = %key, "samples disagree, field left untyped");
            }
        }
        fields
    }
}

/// Collects the objects `value` holds at the position the descriptor's
/// innermost `Object` describes. Nulls and mismatched shapes are skipped.
fn pool_objects<'v>(kind: &TypeKind, value: &'v Value, out: &mut Vec<&'v Object>) {
    match (kind, value) {
        (TypeKind::Object(_) | TypeKind::EmptyObject, Value::Object(m)) => out.push(m),
        (TypeKind::Array(elem), Value::Array(xs)) => {
            for x in xs {
                pool_objects(&elem.kind, x, out);
            }
        }
        (TypeKind::Dictionary(elem), Value::Object(m)) => {
            for x in m.values() {
                pool_objects(&elem.kind, x, out);
            }
        }
        _ => {}
    }
}

fn assemble_fields(fields: IndexMap<String, TypeDescriptor>, pascal_case: bool) -> Vec<FieldSchema> {
    let mut used = HashSet::new();
    fields
        .into_iter()
        .map(|(source_key, ty)| {
            let base = member_identifier(&source_key, pascal_case);
            let mut identifier = base.clone();
            let mut i = 2u64;
            while !used.insert(identifier.clone()) {
                identifier = format!("{base}{i}");
                i += 1;
            }
            FieldSchema { source_key, identifier, ty }
        })
        .collect()
}
