//! Unit validation.
//!
//! Checks one unit's facts before anything reaches the graph. Every problem
//! is returned; nothing stops at the first one.

use rustc_hash::{FxHashMap, FxHashSet};
use tether_diagnostic::{Diagnostic, ErrorCode};
use tether_ir::{ParamType, Symbol, SymbolId, UnitFacts};

/// Knobs for validation.
#[derive(Clone, Debug, Default)]
pub struct ValidationOptions {
    /// Primitive parameter types injected as null instead of rejected.
    pub allowed_primitives: FxHashSet<String>,
}

impl ValidationOptions {
    pub fn allow_primitive(&mut self, name: impl Into<String>) {
        self.allowed_primitives.insert(name.into());
    }

    pub fn is_allowed(&self, primitive: &str) -> bool {
        self.allowed_primitives.contains(primitive)
    }
}

/// Validate the facts of one unit.
pub fn validate_unit(unit: &UnitFacts, options: &ValidationOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let mut per_owner: FxHashMap<&SymbolId, (&Symbol, usize)> = FxHashMap::default();
    for signature in &unit.constructors {
        per_owner
            .entry(signature.owner.id())
            .or_insert((&signature.owner, 0))
            .1 += 1;
    }
    let mut duplicated: Vec<(&Symbol, usize)> = per_owner
        .into_values()
        .filter(|(_, count)| *count > 1)
        .collect();
    duplicated.sort();
    for (owner, count) in duplicated {
        diagnostics.push(
            Diagnostic::error(ErrorCode::E0001)
                .with_message(format!("`{}` declares {count} constructors", owner.name()))
                .with_label(owner, "multiple constructors")
                .with_suggestion("keep a single constructor; overloads cannot be injected"),
        );
    }

    for signature in &unit.constructors {
        for (index, param) in signature.params.iter().enumerate() {
            let ParamType::Primitive(name) = param else {
                continue;
            };
            if options.is_allowed(name) {
                continue;
            }
            diagnostics.push(
                Diagnostic::error(ErrorCode::E0004)
                    .with_message(format!(
                        "constructor parameter #{} of `{}` has primitive type `{name}`",
                        index + 1,
                        signature.owner.name()
                    ))
                    .with_label(&signature.owner, format!("`{name}` cannot be injected"))
                    .with_suggestion(format!("pass `--allow-primitive={name}` to inject it as null")),
            );
        }
    }

    diagnostics
}
