//! Rendering a [`SchemaGraph`] as source text.
//!
//! Emitters are pure functions of (class, graph, options): they never touch
//! inference, and every target-language detail lives behind [`Emitter`].
pub mod csharp;
pub mod rust;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ir::{ClassSchema, SchemaGraph, TypeDescriptor};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    #[serde(rename = "csharp")]
    #[value(name = "csharp")]
    CSharp,
    Rust,
}

impl Language {
    pub fn emitter(self) -> Box<dyn Emitter> {
        match self {
            Language::CSharp => Box::new(csharp::CSharpEmitter),
            Language::Rust => Box::new(rust::RustEmitter),
        }
    }
}

/// Rendering switches. Each emitter ignores the ones its language has no
/// counterpart for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    pub namespace: String,
    /// Namespace for every class but the root; the root's when `None`.
    pub secondary_namespace: Option<String>,
    /// Properties (`{ get; set; }`) instead of plain fields.
    pub use_properties: bool,
    pub internal_visibility: bool,
    /// `IList<T>` instead of `T[]`.
    pub arrays_as_lists: bool,
    /// Secondary classes nested inside a partial root class.
    pub use_nested_classes: bool,
    pub apply_obfuscation_attributes: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            namespace: "Example".to_string(),
            secondary_namespace: None,
            use_properties: true,
            internal_visibility: false,
            arrays_as_lists: false,
            use_nested_classes: false,
            apply_obfuscation_attributes: false,
        }
    }
}

pub trait Emitter {
    fn display_name(&self) -> &'static str;

    /// Including the leading dot.
    fn file_extension(&self) -> &'static str;

    fn type_name(&self, ty: &TypeDescriptor, graph: &SchemaGraph, options: &EmitOptions) -> String;

    /// Imports and similar preamble shared by every file of one graph.
    fn file_header(&self, graph: &SchemaGraph, options: &EmitOptions) -> String;

    /// One class declaration, without the file header.
    fn render(&self, class: &ClassSchema, graph: &SchemaGraph, options: &EmitOptions) -> String;

    /// Header, then the root, then every secondary class in completion order.
    fn render_graph(&self, graph: &SchemaGraph, options: &EmitOptions) -> String {
        let mut out = self.file_header(graph, options);
        for class in graph.classes() {
            out.push('\n');
            out.push_str(&self.render(class, graph, options));
        }
        out
    }

    fn file_name(&self, class: &ClassSchema, _graph: &SchemaGraph, _options: &EmitOptions) -> String {
        format!("{}{}", class.name, self.file_extension())
    }

    /// Where `class` goes under an output directory, relative to it.
    fn output_path(&self, class: &ClassSchema, graph: &SchemaGraph, options: &EmitOptions) -> PathBuf {
        PathBuf::from(self.file_name(class, graph, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_names_round_trip_through_serde() {
        assert_eq!(serde_json::to_string(&Language::CSharp).unwrap(), "\"csharp\"");
        assert_eq!(serde_json::from_str::<Language>("\"rust\"").unwrap(), Language::Rust);
    }

    #[test]
    fn each_language_has_an_emitter() {
        assert_eq!(Language::CSharp.emitter().file_extension(), ".cs");
        assert_eq!(Language::Rust.emitter().display_name(), "Rust");
    }
}
