//! Infers a class schema from example JSON documents and renders it as
//! source code.
//!
//! ```
//! use json_classgen::{generate, GeneratorConfig};
//! use serde_json::json;
//!
//! let graph = generate(&[json!({"user": {"name": "a"}})], &GeneratorConfig::default()).unwrap();
//! assert_eq!(graph.root.name, "Root");
//! assert!(graph.class_by_name("User").is_some());
//! ```
pub mod builder;
pub mod config;
pub mod emit;
pub mod error;
pub mod inference;
pub mod ir;
pub mod naming;
pub mod path_de;

pub use builder::SchemaBuilder;
pub use config::{AbsencePolicy, DatePolicy, DictionaryPolicy, GeneratorConfig, Settings};
pub use emit::{EmitOptions, Emitter, Language};
pub use error::{Error, Result};
pub use inference::{unify, Classifier};
pub use ir::{ClassId, ClassSchema, FieldSchema, SchemaGraph, TypeDescriptor, TypeKind};
pub use naming::{NameRegistry, Singularize};

/// Runs one generation with a fresh name registry.
pub fn generate(examples: &[serde_json::Value], config: &GeneratorConfig) -> Result<SchemaGraph> {
    SchemaBuilder::new(config).build_graph(examples)
}
