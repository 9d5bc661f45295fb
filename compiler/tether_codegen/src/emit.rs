//! Rust source emission.
//!
//! Renders a [`ResolverPlan`] as a self-contained module: one `use` per
//! concrete, a `Container` holding the singleton cache, and a `dispatch`
//! function that is a single `match` over every known id. Output depends only
//! on the plan and the options, so identical graphs produce identical bytes.

use std::fmt::{self, Write};

use tether_graph::Dependency;
use tether_ir::Lifetime;

use crate::{Branch, ResolverPlan};

/// Knobs for the emitted module.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmitOptions {
    /// Rust path that unit modules live under, e.g. `crate` or
    /// `crate::services`.
    pub crate_root: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            crate_root: "crate".to_string(),
        }
    }
}

/// Render `plan` as Rust source.
#[tracing::instrument(level = "debug", skip_all, fields(branches = plan.branches().len()))]
pub fn emit_rust(plan: &ResolverPlan, options: &EmitOptions) -> String {
    RustModule { plan, options }.to_string()
}

/// Rust module path segments for a unit path.
///
/// The extension is dropped and each segment becomes an identifier:
/// `log/console-sink.ts` gives `["log", "console_sink"]`.
pub fn module_path(unit_path: &str) -> Vec<String> {
    let trimmed = unit_path.trim_start_matches("./");
    let stem = match trimmed.rfind('.') {
        Some(dot) if dot > trimmed.rfind('/').map_or(0, |slash| slash + 1) => &trimmed[..dot],
        _ => trimmed,
    };
    stem.split('/')
        .filter(|segment| !segment.is_empty())
        .map(sanitize_ident)
        .collect()
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while",
];

/// Identifiers that cannot even be raw.
const RESERVED: &[&str] = &["crate", "self", "super", "Self"];

/// Turn an arbitrary name into a Rust identifier.
pub(crate) fn sanitize_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RESERVED.contains(&ident.as_str()) {
        ident.insert(0, '_');
    } else if KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }
    ident
}

struct RustModule<'a> {
    plan: &'a ResolverPlan,
    options: &'a EmitOptions,
}

impl fmt::Display for RustModule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.plan;
        writeln!(f, "// @generated by tether. Do not edit.")?;
        writeln!(f, "//")?;
        writeln!(
            f,
            "// Dispatch for {} identifiers across {} concretes.",
            plan.id_count(),
            plan.table().len()
        )?;
        writeln!(f)?;
        writeln!(f, "#![allow(unused_imports, unused_variables, clippy::all)]")?;
        writeln!(f)?;
        writeln!(
            f,
            "use tether_runtime::{{Arg, Construct, Instance, ResolveError, SingletonCache}};"
        )?;

        if !plan.table().is_empty() {
            writeln!(f)?;
        }
        for entry in plan.table() {
            let mut path = self.options.crate_root.clone();
            for segment in module_path(entry.concrete.unit_path()) {
                path.push_str("::");
                path.push_str(&segment);
            }
            writeln!(
                f,
                "use {path}::{} as {};",
                sanitize_ident(entry.concrete.name()),
                entry.alias
            )?;
        }

        writeln!(f)?;
        writeln!(f, "#[derive(Default)]")?;
        writeln!(f, "pub struct Container {{")?;
        writeln!(f, "    singletons: SingletonCache,")?;
        writeln!(f, "}}")?;
        writeln!(f)?;
        writeln!(f, "impl Container {{")?;
        writeln!(f, "    pub fn new() -> Self {{")?;
        writeln!(f, "        Self::default()")?;
        writeln!(f, "    }}")?;
        writeln!(f)?;
        writeln!(
            f,
            "    pub fn resolve(&mut self, id: &str) -> Result<Instance, ResolveError> {{"
        )?;
        writeln!(f, "        dispatch(&mut self.singletons, id)")?;
        writeln!(f, "    }}")?;
        writeln!(f, "}}")?;
        writeln!(f)?;
        writeln!(
            f,
            "fn dispatch(singletons: &mut SingletonCache, id: &str) -> Result<Instance, ResolveError> {{"
        )?;
        writeln!(f, "    match id {{")?;
        for branch in plan.branches() {
            self.branch(f, branch)?;
        }
        writeln!(f, "        _ => Err(ResolveError::Unknown(id.to_string())),")?;
        writeln!(f, "    }}")?;
        writeln!(f, "}}")
    }
}

impl RustModule<'_> {
    /// One match arm. Singletons are built inside the cache's
    /// `get_or_try_insert_with`, so every id of the branch shares one instance.
    fn branch(&self, f: &mut fmt::Formatter<'_>, branch: &Branch) -> fmt::Result {
        let pattern = branch
            .ids
            .iter()
            .map(|id| format!("\"{id}\""))
            .collect::<Vec<_>>()
            .join(" | ");
        let concrete = branch.concrete.id();
        let alias = self.plan.alias_for(concrete).unwrap_or("_");

        if branch.lifetime == Lifetime::Singleton {
            writeln!(
                f,
                "        {pattern} => singletons.get_or_try_insert_with::<ResolveError>(\"{concrete}\", |singletons| {{"
            )?;
        } else {
            writeln!(f, "        {pattern} => {{")?;
        }

        if branch.dependencies.is_empty() {
            writeln!(f, "            let args = Vec::new();")?;
        } else {
            writeln!(f, "            let args = vec![")?;
            for dependency in &branch.dependencies {
                writeln!(f, "                {},", render_arg(dependency))?;
            }
            writeln!(f, "            ];")?;
        }
        writeln!(f, "            Ok({alias}::construct(args))")?;

        if branch.lifetime == Lifetime::Singleton {
            writeln!(f, "        }}),")
        } else {
            writeln!(f, "        }}")
        }
    }
}

fn render_arg(dependency: &Dependency) -> String {
    match dependency {
        Dependency::Service(id) => format!("Arg::Service(dispatch(singletons, \"{id}\")?)"),
        Dependency::Null => "Arg::Null".to_string(),
        Dependency::All(ids) => {
            let mut out = String::from("Arg::All(vec![");
            for (i, id) in ids.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "dispatch(singletons, \"{id}\")?");
            }
            out.push_str("])");
            out
        }
    }
}
