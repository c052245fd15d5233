//! CLI: samples → (schema graph | source code)
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use json_classgen::{AbsencePolicy, DatePolicy, Emitter, Language, SchemaGraph, Settings};

use crate::jq_exec::JqFilter;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer classes from example JSON/NDJSON documents and print the schema graph or generated code
#[derive(Parser, Debug)]
#[command(name = "json-classgen", version)]
pub struct CommandLineInterface {
    /// more logging: -v debug, -vv trace (RUST_LOG is used when absent)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and print the schema graph as JSON
    Schema(SchemaOut),
    /// infer and emit class declarations
    Generate(GenerateOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// jq filter applied to each document; every output becomes one example
    #[arg(long)]
    jq_expr: Option<String>,

    /// one or more inputs: literal paths, quoted glob patterns, or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct GeneratorFlags {
    /// JSON settings file; flags given on the command line win over it
    #[arg(long)]
    config: Option<PathBuf>,

    /// name of the root class
    #[arg(long)]
    root_name: Option<String>,

    /// title-case member identifiers (first_name → FirstName)
    #[arg(long)]
    pascal_case: bool,

    /// only keys first seen after the first example become nullable
    #[arg(long)]
    forward_only: bool,

    /// never classify strings as dates
    #[arg(long)]
    no_dates: bool,

    /// never read objects with machine-generated keys as dictionaries
    #[arg(long)]
    no_dictionaries: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generator: GeneratorFlags,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generator: GeneratorFlags,

    /// target language
    #[arg(long, value_enum)]
    lang: Option<Language>,

    #[arg(long)]
    namespace: Option<String>,

    /// namespace for every class except the root
    #[arg(long)]
    secondary_namespace: Option<String>,

    /// properties instead of fields (C#)
    #[arg(long)]
    properties: Option<bool>,

    /// internal (C#) or pub(crate) (Rust) visibility
    #[arg(long)]
    internal: bool,

    /// IList<T> instead of arrays (C#)
    #[arg(long)]
    lists: bool,

    /// nest secondary classes inside the root class (C#)
    #[arg(long)]
    nested: bool,

    /// add obfuscation exclusion attributes (C#)
    #[arg(long)]
    obfuscation: bool,

    /// single output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// write one file per class into this directory
    #[arg(long, conflicts_with = "out")]
    out_dir: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Reads every input, parses files in parallel, then applies the pointer
    /// and jq filter in input order.
    fn load_documents(&self) -> Result<Vec<Value>> {
        let sources = self.read_sources()?;
        let parsed = sources
            .par_iter()
            .map(|(label, text)| parse_source(label, text, self.ndjson))
            .collect::<Result<Vec<_>>>()?;

        let jq = self.jq_expr.as_deref().map(JqFilter::compile).transpose()?;

        let mut out = Vec::new();
        for ((label, _), docs) in sources.iter().zip(parsed) {
            for doc in docs {
                let doc = match self.json_pointer.as_deref() {
                    None => doc,
                    Some(pointer) => match doc.pointer(pointer) {
                        Some(node) => node.clone(),
                        None => bail!("JSON pointer `{pointer}` selects nothing in {label}"),
                    },
                };
                match jq.as_ref() {
                    None => out.push(doc),
                    Some(filter) => {
                        let results = filter
                            .run(&doc)
                            .with_context(|| format!("failed to apply jq expression to {label}"))?;
                        out.extend(results);
                    }
                }
            }
        }
        debug!(inputs = sources.len(), documents = out.len(), "inputs loaded");
        Ok(out)
    }

    fn read_sources(&self) -> Result<Vec<(String, String)>> {
        let mut sources = Vec::new();
        for pattern in &self.input {
            if pattern == "-" {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
                sources.push(("<stdin>".to_string(), text));
                continue;
            }
            for path in resolve_file_path_pattern(pattern)? {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read source file {}", path.display()))?;
                sources.push((path.display().to_string(), text));
            }
        }
        Ok(sources)
    }
}

fn parse_source(label: &str, text: &str, ndjson: bool) -> Result<Vec<Value>> {
    if !ndjson {
        let value = serde_json::from_str(text).with_context(|| format!("failed to parse JSON source file ({label})"))?;
        return Ok(vec![value]);
    }
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("failed to parse NDJSON line {} of {label}", i + 1))
        })
        .collect()
}

impl GeneratorFlags {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match self.config.as_deref() {
            Some(path) => Settings::load(path).with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };
        let generator = &mut settings.generator;
        if let Some(name) = &self.root_name {
            generator.root_name = name.clone();
        }
        if self.pascal_case {
            generator.use_pascal_case = true;
        }
        if self.forward_only {
            generator.absence = AbsencePolicy::ForwardOnly;
        }
        if self.no_dates {
            generator.dates = DatePolicy::disabled();
        }
        if self.no_dictionaries {
            generator.dictionaries.enabled = false;
        }
        Ok(settings)
    }
}

impl GenerateOut {
    fn apply_emit_flags(&self, settings: &mut Settings) {
        if let Some(lang) = self.lang {
            settings.language = lang;
        }
        let emit = &mut settings.emit;
        if let Some(namespace) = &self.namespace {
            emit.namespace = namespace.clone();
        }
        if let Some(namespace) = &self.secondary_namespace {
            emit.secondary_namespace = Some(namespace.clone());
        }
        if let Some(properties) = self.properties {
            emit.use_properties = properties;
        }
        emit.internal_visibility |= self.internal;
        emit.arrays_as_lists |= self.lists;
        emit.use_nested_classes |= self.nested;
        emit.apply_obfuscation_attributes |= self.obfuscation;
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Schema(target) => {
                let settings = target.generator.settings()?;
                let graph = infer(&target.input_settings, &settings)?;
                let schema_src = serde_json::to_string_pretty(&graph)?;
                write_output(target.out.as_deref(), &schema_src)?;
                summary(&graph, "schema");
            }
            Command::Generate(target) => {
                let mut settings = target.generator.settings()?;
                target.apply_emit_flags(&mut settings);
                let graph = infer(&target.input_settings, &settings)?;

                let emitter = settings.language.emitter();
                match target.out_dir.as_deref() {
                    Some(dir) => write_per_class(emitter.as_ref(), &graph, &settings, dir)?,
                    None => {
                        let src = emitter.render_graph(&graph, &settings.emit);
                        write_output(target.out.as_deref(), &src)?;
                    }
                }
                summary(&graph, emitter.display_name());
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn infer(input: &InputSettings, settings: &Settings) -> Result<SchemaGraph> {
    let documents = input.load_documents()?;
    info!(documents = documents.len(), "inferring classes");
    let graph = json_classgen::generate(&documents, &settings.generator)?;
    Ok(graph)
}

fn write_per_class(emitter: &dyn Emitter, graph: &SchemaGraph, settings: &Settings, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let header = emitter.file_header(graph, &settings.emit);
    for class in graph.classes() {
        let path = dir.join(emitter.output_path(class, graph, &settings.emit));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let src = format!("{header}\n{}", emitter.render(class, graph, &settings.emit));
        std::fs::write(&path, src).with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "wrote class file");
    }
    Ok(())
}

fn write_output(out: Option<&Path>, src: &str) -> Result<()> {
    let Some(out) = out else {
        println!("{src}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, src).with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}

fn summary(graph: &SchemaGraph, what: &str) {
    let names: Vec<&str> = graph.classes().map(|c| c.name.as_str()).collect();
    eprintln!(
        "{} {} {} ({})",
        "✓".green().bold(),
        what.bold(),
        format!("{} classes", graph.len()).cyan(),
        names.join(", ").dimmed(),
    );
}

/// Expands one `--input` value; glob patterns must match at least one file.
fn resolve_file_path_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    if !has_glob_chars(pattern) {
        return Ok(vec![PathBuf::from(pattern)]);
    }
    let mut out = Vec::new();
    for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
        out.push(entry?);
    }
    if out.is_empty() {
        bail!("glob pattern matched no files: {pattern}");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inputs(input: Vec<String>) -> InputSettings {
        InputSettings { ndjson: false, json_pointer: None, jq_expr: None, input }
    }

    #[test]
    fn ndjson_skips_blank_lines() {
        let docs = parse_source("t", "{\"a\": 1}\n\n{\"a\": 2}\n", true).unwrap();
        assert_eq!(docs, vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[test]
    fn ndjson_errors_name_the_line() {
        let err = parse_source("t.ndjson", "{\"a\": 1}\n{oops\n", true).unwrap_err();
        assert!(format!("{err:#}").contains("line 2 of t.ndjson"));
    }

    #[test]
    fn glob_inputs_keep_order_and_apply_pointer() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"data": {"x": 1}}"#).unwrap();
        std::fs::write(dir.path().join("b.json"), r#"{"data": {"x": 2}}"#).unwrap();
        let pattern = dir.path().join("*.json").display().to_string();

        let mut settings = inputs(vec![pattern]);
        settings.json_pointer = Some("/data".into());
        assert_eq!(settings.load_documents().unwrap(), vec![json!({"x": 1}), json!({"x": 2})]);
    }

    #[test]
    fn jq_fans_out_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.json");
        std::fs::write(&path, r#"{"rows": [{"x": 1}, {"x": 2}]}"#).unwrap();
        let mut settings = inputs(vec![path.display().to_string()]);
        settings.jq_expr = Some(".rows[]".into());
        assert_eq!(settings.load_documents().unwrap().len(), 2);
    }

    #[test]
    fn unmatched_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = dir.path().join("*.nothing").display().to_string();
        assert!(resolve_file_path_pattern(&pattern).is_err());
    }

    #[test]
    fn flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"generator": {"root_name": "Order"}, "emit": {"namespace": "Shop"}, "language": "rust"}"#).unwrap();

        let cli = CommandLineInterface::try_parse_from([
            "json-classgen", "generate", "-i", "x.json", "--config", path.to_str().unwrap(),
            "--pascal-case", "--lang", "csharp", "--properties", "false",
        ])
        .unwrap();
        let Command::Generate(target) = &cli.cmd else { panic!("expected generate") };
        let mut settings = target.generator.settings().unwrap();
        target.apply_emit_flags(&mut settings);
        assert_eq!(settings.generator.root_name, "Order");
        assert!(settings.generator.use_pascal_case);
        assert_eq!(settings.emit.namespace, "Shop");
        assert!(!settings.emit.use_properties);
        assert_eq!(settings.language, Language::CSharp);
    }

    #[test]
    fn secondary_namespace_classes_go_into_a_subfolder() {
        let dir = tempfile::tempdir().unwrap();
        let graph = json_classgen::generate(&[json!({"user": {"name": "a"}})], &Default::default()).unwrap();
        let mut settings = Settings::default();
        settings.emit.secondary_namespace = Some("Example.Data".into());

        write_per_class(Language::CSharp.emitter().as_ref(), &graph, &settings, dir.path()).unwrap();
        assert!(dir.path().join("Root.cs").is_file());
        let user = std::fs::read_to_string(dir.path().join("Data").join("User.cs")).unwrap();
        assert!(user.contains("namespace Example.Data\n"), "{user}");
        assert!(!dir.path().join("User.cs").exists());
    }

    #[test]
    fn out_and_out_dir_conflict() {
        let parsed = CommandLineInterface::try_parse_from([
            "json-classgen", "generate", "-i", "x.json", "--out", "a.cs", "--out-dir", "dir",
        ]);
        assert!(parsed.is_err());
    }
}
