//! C# classes for Json.NET (`Newtonsoft.Json`).

use std::collections::HashSet;
use std::fmt::Write;
use std::path::PathBuf;

use super::{EmitOptions, Emitter};
use crate::ir::{ClassSchema, SchemaGraph, TypeDescriptor, TypeKind};

const NO_RENAME_ATTRIBUTE: &str = r#"[Obfuscation(Feature = "renaming", Exclude = true)]"#;
const NO_PRUNE_ATTRIBUTE: &str = r#"[Obfuscation(Feature = "trigger", Exclude = false)]"#;

static KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Types and attributes the generated code names unqualified. A class with
/// one of these names gets a `_` suffix; registry names never contain `_`,
/// so the result cannot collide with another class.
static RESERVED_TYPES: &[&str] = &[
    "DateTime", "Dictionary", "IList", "JsonProperty", "JsonPropertyAttribute", "Obfuscation",
    "ObfuscationAttribute", "System", "Newtonsoft",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpEmitter;

/// A field as it is declared in C#.
struct Member<'c> {
    name: String,
    source_key: &'c str,
    ty: &'c TypeDescriptor,
}

impl Member<'_> {
    fn is_renamed(&self) -> bool {
        self.name.trim_start_matches('@') != self.source_key
    }
}

impl CSharpEmitter {
    /// Member names for `class`, made distinct from the enclosing class name
    /// (CS0542) and, when classes nest inside the root, from every nested
    /// class (CS0102).
    fn members<'c>(class: &'c ClassSchema, graph: &SchemaGraph, options: &EmitOptions) -> Vec<Member<'c>> {
        let mut reserved: HashSet<String> = HashSet::from([class_ident(&class.name)]);
        if options.use_nested_classes && class.is_root {
            reserved.extend(graph.secondary.values().map(|c| class_ident(&c.name)));
        }
        let mut used = HashSet::new();
        class
            .fields
            .iter()
            .map(|field| {
                let base = member_name(&field.identifier);
                let mut name = base.clone();
                let mut i = 2u64;
                while reserved.contains(&name) || used.contains(&name) {
                    name = format!("{base}{i}");
                    i += 1;
                }
                used.insert(name.clone());
                Member { name, source_key: &field.source_key, ty: &field.ty }
            })
            .collect()
    }

    // a class whose members bind by name must keep those names
    fn needs_no_rename(class: &ClassSchema, graph: &SchemaGraph, options: &EmitOptions) -> bool {
        options.apply_obfuscation_attributes
            && Self::members(class, graph, options).iter().all(|m| !m.is_renamed())
    }

    fn needs_no_prune(options: &EmitOptions) -> bool {
        options.apply_obfuscation_attributes && options.use_properties
    }

    fn write_class_attributes(out: &mut String, indent: &str, class: &ClassSchema, graph: &SchemaGraph, options: &EmitOptions) {
        if Self::needs_no_rename(class, graph, options) {
            let _ = writeln!(out, "{indent}{NO_RENAME_ATTRIBUTE}");
        }
        if Self::needs_no_prune(options) {
            let _ = writeln!(out, "{indent}{NO_PRUNE_ATTRIBUTE}");
        }
    }

    fn write_members(&self, out: &mut String, indent: &str, class: &ClassSchema, graph: &SchemaGraph, options: &EmitOptions) {
        for member in Self::members(class, graph, options) {
            if member.is_renamed() {
                let _ = writeln!(out, "{indent}[JsonProperty(\"{}\")]", escape(member.source_key));
            }
            let ty = self.type_name(member.ty, graph, options);
            let name = &member.name;
            if options.use_properties {
                let _ = writeln!(out, "{indent}public {ty} {name} {{ get; set; }}");
            } else {
                let _ = writeln!(out, "{indent}public {ty} {name};");
            }
        }
    }
}

impl Emitter for CSharpEmitter {
    fn display_name(&self) -> &'static str {
        "C#"
    }

    fn file_extension(&self) -> &'static str {
        ".cs"
    }

    fn type_name(&self, ty: &TypeDescriptor, graph: &SchemaGraph, options: &EmitOptions) -> String {
        let value_type = match &ty.kind {
            TypeKind::Null | TypeKind::Anything | TypeKind::Unconstrained => return "object".to_string(),
            TypeKind::String => return "string".to_string(),
            TypeKind::Object(_) | TypeKind::EmptyObject => {
                return graph.class_name_of(ty).map_or_else(|| "object".to_string(), class_ident);
            }
            TypeKind::Array(elem) => {
                let elem = self.type_name(elem, graph, options);
                return if options.arrays_as_lists { format!("IList<{elem}>") } else { format!("{elem}[]") };
            }
            TypeKind::Dictionary(value) => {
                return format!("Dictionary<string, {}>", self.type_name(value, graph, options));
            }
            TypeKind::Boolean => "bool",
            TypeKind::Integer => "int",
            TypeKind::Long => "long",
            TypeKind::Float => "double",
            TypeKind::Date => "DateTime",
        };
        if ty.is_nullable() {
            format!("{value_type}?")
        } else {
            value_type.to_string()
        }
    }

    fn file_header(&self, graph: &SchemaGraph, options: &EmitOptions) -> String {
        let mut out = String::from("using System;\nusing System.Collections.Generic;\n");
        if Self::needs_no_prune(options) || graph.classes().any(|c| Self::needs_no_rename(c, graph, options)) {
            out.push_str("using System.Reflection;\n");
        }
        let has_renames = graph
            .classes()
            .any(|c| Self::members(c, graph, options).iter().any(Member::is_renamed));
        if has_renames {
            out.push_str("using Newtonsoft.Json;\n");
        }
        if let Some(secondary) = secondary_namespace(options) {
            if graph.len() > 1 {
                let _ = writeln!(out, "using {secondary};");
            }
        }
        out
    }

    fn render(&self, class: &ClassSchema, graph: &SchemaGraph, options: &EmitOptions) -> String {
        let visibility = if options.internal_visibility { "internal" } else { "public" };
        let nested = options.use_nested_classes;
        let namespace = match secondary_namespace(options) {
            Some(secondary) if !class.is_root => secondary,
            _ => &options.namespace,
        };
        let class_name = class_ident(&class.name);

        let mut out = String::new();
        let _ = writeln!(out, "namespace {namespace}\n{{");

        let inner_class = nested && !class.is_root;
        let indent = if inner_class {
            let _ = writeln!(out, "    {visibility} partial class {}\n    {{", class_ident(&graph.root.name));
            Self::write_class_attributes(&mut out, "        ", class, graph, options);
            let _ = writeln!(out, "        {visibility} class {class_name}\n        {{");
            "            "
        } else {
            Self::write_class_attributes(&mut out, "    ", class, graph, options);
            let partial = if nested { "partial " } else { "" };
            let _ = writeln!(out, "    {visibility} {partial}class {class_name}\n    {{");
            "        "
        };

        // CS0649: internal fields are never assigned outside the deserializer
        let suppress_unassigned = options.internal_visibility && !options.use_properties;
        if suppress_unassigned {
            out.push_str("#pragma warning disable 0649\n");
        }
        self.write_members(&mut out, indent, class, graph, options);
        if suppress_unassigned {
            out.push_str("#pragma warning restore 0649\n");
        }

        if inner_class {
            out.push_str("        }\n");
        }
        out.push_str("    }\n}\n");
        out
    }

    fn file_name(&self, class: &ClassSchema, graph: &SchemaGraph, options: &EmitOptions) -> String {
        let class_name = class_ident(&class.name);
        if options.use_nested_classes && !class.is_root {
            format!("{}.{class_name}{}", class_ident(&graph.root.name), self.file_extension())
        } else {
            format!("{class_name}{}", self.file_extension())
        }
    }

    /// Secondary classes in their own namespace go into a folder named after
    /// it, minus the root namespace prefix (`Example.Data` → `Data/`).
    fn output_path(&self, class: &ClassSchema, graph: &SchemaGraph, options: &EmitOptions) -> PathBuf {
        let file = self.file_name(class, graph, options);
        match secondary_namespace(options) {
            Some(secondary) if !class.is_root => {
                let prefix = format!("{}.", options.namespace);
                let folder = secondary.strip_prefix(&prefix).unwrap_or(secondary);
                PathBuf::from(folder).join(file)
            }
            _ => PathBuf::from(file),
        }
    }
}

/// The namespace secondary classes live in, when it differs from the root's.
/// Nested classes always share the root's namespace.
fn secondary_namespace(options: &EmitOptions) -> Option<&str> {
    options
        .secondary_namespace
        .as_deref()
        .filter(|s| !options.use_nested_classes && *s != options.namespace)
}

fn class_ident(name: &str) -> String {
    if RESERVED_TYPES.contains(&name) { format!("{name}_") } else { name.to_string() }
}

fn member_name(identifier: &str) -> String {
    if KEYWORDS.contains(&identifier) {
        format!("@{identifier}")
    } else {
        identifier.to_string()
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
