use anyhow::{anyhow, Context, Result};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, Filter, Native, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// A jq program compiled once and run against every input document.
pub struct JqFilter {
    src: String,
    filter: Filter<Native<Val>>,
}

impl JqFilter {
    pub fn compile(src: &str) -> Result<Self> {
        let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
        let arena = load::Arena::default();
        let program = load::File { code: src, path: () };

        let modules = loader.load(&arena, program).map_err(format_parse_errors)?;

        let filter = Compiler::default()
            .with_funs(jaq_std::funs().chain(jaq_json::funs()))
            .compile(modules)
            .map_err(format_undefined_errors)?;

        Ok(Self { src: src.to_string(), filter })
    }

    /// Every output of the program; zero outputs drop the document.
    pub fn run(&self, input: &Value) -> Result<Vec<Value>> {
        let inputs = RcIter::new(core::iter::empty());
        let outputs = self.filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

        let mut out = Vec::new();
        for item in outputs {
            let v = item.map_err(|e| anyhow!("jq `{}` failed: {e:?}", self.src))?;
            // Val: Display -> JSON text
            let value = serde_json::from_str(&v.to_string())
                .with_context(|| format!("jq `{}` produced a non-JSON value", self.src))?;
            out.push(value);
        }
        Ok(out)
    }
}

fn format_parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> anyhow::Error {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    anyhow!(s)
}

fn format_undefined_errors(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> anyhow::Error {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    anyhow!(s)
}
