//! Rust structs for serde.
//!
//! Field names are snake_cased from the schema identifiers; a
//! `#[serde(rename)]` keeps the wire name whenever the two differ. Namespace,
//! nesting, property and obfuscation options have no Rust counterpart and
//! are ignored.

use std::collections::HashSet;
use std::fmt::Write;

use super::{EmitOptions, Emitter};
use crate::ir::{ClassSchema, SchemaGraph, TypeDescriptor, TypeKind};

static KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
static RESERVED: &[&str] = &["crate", "self", "super", "Self"];

/// Types and derives the generated code names unqualified, plus `Self`.
static RESERVED_TYPES: &[&str] = &[
    "Self", "String", "Vec", "Option", "HashMap", "Box", "Result", "Serialize", "Deserialize",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RustEmitter;

impl Emitter for RustEmitter {
    fn display_name(&self) -> &'static str {
        "Rust"
    }

    fn file_extension(&self) -> &'static str {
        ".rs"
    }

    fn type_name(&self, ty: &TypeDescriptor, graph: &SchemaGraph, options: &EmitOptions) -> String {
        let name = match &ty.kind {
            // these already admit null
            TypeKind::Null | TypeKind::Anything | TypeKind::Unconstrained => {
                return "serde_json::Value".to_string();
            }
            TypeKind::Boolean => "bool".to_string(),
            TypeKind::Integer => "i32".to_string(),
            TypeKind::Long => "i64".to_string(),
            TypeKind::Float => "f64".to_string(),
            TypeKind::String | TypeKind::Date => "String".to_string(),
            TypeKind::Array(elem) => format!("Vec<{}>", self.type_name(elem, graph, options)),
            TypeKind::Dictionary(value) => format!("HashMap<String, {}>", self.type_name(value, graph, options)),
            TypeKind::Object(_) | TypeKind::EmptyObject => match graph.class_name_of(ty) {
                Some(class) => type_ident(class),
                None => return "serde_json::Value".to_string(),
            },
        };
        if ty.is_nullable() { format!("Option<{name}>") } else { name }
    }

    fn file_header(&self, graph: &SchemaGraph, _options: &EmitOptions) -> String {
        let mut out = String::from("use serde::{Deserialize, Serialize};\n");
        let has_maps = graph
            .classes()
            .flat_map(|c| &c.fields)
            .any(|f| contains_dictionary(&f.ty));
        if has_maps {
            out.push_str("use std::collections::HashMap;\n");
        }
        out
    }

    fn render(&self, class: &ClassSchema, graph: &SchemaGraph, options: &EmitOptions) -> String {
        let vis = if options.internal_visibility { "pub(crate)" } else { "pub" };
        let mut out = String::new();
        out.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
        let _ = writeln!(out, "{vis} struct {} {{", type_ident(&class.name));

        let mut used = HashSet::new();
        for field in &class.fields {
            let base = snake_case(&field.identifier);
            let mut name = base.clone();
            let mut i = 2u64;
            while !used.insert(name.clone()) {
                name = format!("{base}{i}");
                i += 1;
            }
            if name != field.source_key {
                let _ = writeln!(out, "    #[serde(rename = {:?})]", field.source_key);
            }
            let ty = self.type_name(&field.ty, graph, options);
            let _ = writeln!(out, "    {vis} {}: {ty},", field_ident(&name));
        }
        out.push_str("}\n");
        out
    }
}

fn contains_dictionary(ty: &TypeDescriptor) -> bool {
    match &ty.kind {
        TypeKind::Dictionary(_) => true,
        TypeKind::Array(elem) => contains_dictionary(elem),
        _ => false,
    }
}

fn snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    let mut prev: Option<char> = None;
    for c in ident.chars() {
        if c.is_uppercase() {
            if prev.is_some_and(|p| p.is_lowercase() || p.is_numeric()) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

fn field_ident(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{name}_")
    } else if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

fn type_ident(name: &str) -> String {
    if RESERVED_TYPES.contains(&name) { format!("{name}_") } else { name.to_string() }
}
