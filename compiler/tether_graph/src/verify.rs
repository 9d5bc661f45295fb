//! Constructor verification.
//!
//! Works against a finalized [`ResolutionMap`]: a constructor parameter names
//! an abstract id, and the map says which concrete will be built for it. The
//! cycle search follows those concretes, so a loop that passes through an
//! interface is found just like a direct one.

use std::collections::BTreeSet;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use tether_diagnostic::{queue::DiagnosticQueue, Diagnostic, ErrorCode, ErrorGuaranteed};
use tether_ir::{ConstructorSignature, ParamType, Symbol, SymbolId};
use tracing::debug;

use crate::{HeritageTable, ResolutionGraph, ResolutionMap};

/// What the resolver passes for one constructor parameter.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Dependency {
    /// Resolve this id.
    Service(SymbolId),
    /// Pass nothing: an unresolvable union or a whitelisted primitive.
    Null,
    /// Resolve every id; the parameter receives all of them.
    All(Vec<SymbolId>),
}

impl Dependency {
    /// Ids that must be resolved to satisfy this parameter.
    pub fn ids(&self) -> &[SymbolId] {
        match self {
            Dependency::Service(id) => std::slice::from_ref(id),
            Dependency::Null => &[],
            Dependency::All(ids) => ids,
        }
    }
}

/// A constructor dependency loop. The first and last entries are the same.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConstructorCycle {
    chain: Vec<Symbol>,
}

impl ConstructorCycle {
    pub fn chain(&self) -> &[Symbol] {
        &self.chain
    }

    /// `Cyclical dependency detected: a.ts::A -> b.ts::B -> a.ts::A`
    pub fn report(&self) -> String {
        format!("Cyclical dependency detected: {self}")
    }
}

impl fmt::Display for ConstructorCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.chain.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", symbol.qualified())?;
        }
        Ok(())
    }
}

/// Constructor dependency computation and cycle detection.
pub struct ConstructorVerifier<'a> {
    heritage: &'a HeritageTable,
    resolutions: &'a ResolutionMap,
    signatures: FxHashMap<SymbolId, ConstructorSignature>,
    rejected: FxHashSet<SymbolId>,
}

impl<'a> ConstructorVerifier<'a> {
    pub fn new(graph: &'a ResolutionGraph, resolutions: &'a ResolutionMap) -> Self {
        ConstructorVerifier {
            heritage: graph.heritage(),
            resolutions,
            signatures: FxHashMap::default(),
            rejected: FxHashSet::default(),
        }
    }

    /// Ids whose failure to resolve was already reported. Parameters naming
    /// them are not reported again as unresolved.
    pub fn add_rejected<'i>(&mut self, ids: impl IntoIterator<Item = &'i SymbolId>) {
        self.rejected.extend(ids.into_iter().cloned());
    }

    /// Add constructor signatures. A later signature for the same owner
    /// replaces the earlier one.
    pub fn add_constructors(&mut self, signatures: impl IntoIterator<Item = ConstructorSignature>) {
        for signature in signatures {
            self.signatures
                .insert(signature.owner.id().clone(), signature);
        }
    }

    /// The signature that builds `id`: its own, else the nearest ancestor's.
    ///
    /// An inheritance loop ends the walk.
    pub fn effective_signature(&self, id: &SymbolId) -> Option<&ConstructorSignature> {
        let mut current = id.clone();
        let mut visited = FxHashSet::default();
        loop {
            if let Some(signature) = self.signatures.get(&current) {
                return Some(signature);
            }
            if !visited.insert(current.clone()) {
                return None;
            }
            let parent = self.heritage.class(&current)?.parent.as_ref()?;
            current = parent.id().clone();
        }
    }

    /// Dependencies to pass to the constructor of `id`, in parameter order.
    ///
    /// Empty when neither `id` nor any ancestor declares a constructor.
    pub fn resolve_constructor_params(&self, id: &SymbolId) -> Vec<Dependency> {
        let Some(signature) = self.effective_signature(id) else {
            return Vec::new();
        };
        signature
            .params
            .iter()
            .map(|param| self.dependency(param))
            .collect()
    }

    fn dependency(&self, param: &ParamType) -> Dependency {
        match param {
            ParamType::Single(symbol) => Dependency::Service(symbol.id().clone()),
            ParamType::Union(members) => members
                .iter()
                .find(|member| self.resolutions.contains(member.id()))
                .map_or(Dependency::Null, |member| {
                    Dependency::Service(member.id().clone())
                }),
            ParamType::Intersection(members) => {
                Dependency::All(members.iter().map(|m| m.id().clone()).collect())
            }
            ParamType::Primitive(_) => Dependency::Null,
        }
    }

    /// `Ok` when `id` can be built, or the path that loops back on itself.
    ///
    /// The returned path is every id visited from `id` up to and including
    /// the repeated one.
    pub fn is_constructible(&self, id: &SymbolId) -> Result<(), Vec<SymbolId>> {
        self.search(id, &mut Vec::new(), &mut FxHashSet::default())
    }

    fn search(
        &self,
        id: &SymbolId,
        visiting: &mut Vec<SymbolId>,
        clean: &mut FxHashSet<SymbolId>,
    ) -> Result<(), Vec<SymbolId>> {
        if clean.contains(id) {
            return Ok(());
        }
        let next = self.dependency_concretes(id);
        if next.is_empty() {
            clean.insert(id.clone());
            return Ok(());
        }
        if visiting.contains(id) {
            let mut cycle = visiting.clone();
            cycle.push(id.clone());
            return Err(cycle);
        }

        visiting.push(id.clone());
        for concrete in &next {
            if let Err(cycle) = self.search(concrete, visiting, clean) {
                visiting.pop();
                return Err(cycle);
            }
        }
        visiting.pop();
        clean.insert(id.clone());
        Ok(())
    }

    /// Concretes the constructor of `id` needs, in parameter order.
    ///
    /// Dependencies without a resolution are skipped; `verify` reports them.
    fn dependency_concretes(&self, id: &SymbolId) -> Vec<SymbolId> {
        self.resolve_constructor_params(id)
            .iter()
            .flat_map(|dep| dep.ids().iter())
            .filter_map(|dep| self.resolutions.get(dep))
            .map(|resolution| resolution.concrete.id().clone())
            .collect()
    }

    /// Depth-first walk from `id` that records a ring for every back edge
    /// and keeps going, so loops sharing a node are all found.
    fn collect_rings(
        &self,
        id: &SymbolId,
        stack: &mut Vec<SymbolId>,
        done: &mut FxHashSet<SymbolId>,
        rings: &mut Vec<Vec<SymbolId>>,
    ) {
        if done.contains(id) {
            return;
        }
        if let Some(start) = stack.iter().position(|on_stack| on_stack == id) {
            let mut ring = stack[start..].to_vec();
            ring.push(id.clone());
            rings.push(ring);
            return;
        }
        stack.push(id.clone());
        for concrete in self.dependency_concretes(id) {
            self.collect_rings(&concrete, stack, done, rings);
        }
        stack.pop();
        done.insert(id.clone());
    }

    /// Check every id and return each distinct loop once.
    ///
    /// Ids are walked in sorted order and every back edge yields a ring, so
    /// two loops through one shared constructor are both reported. Rings
    /// with the same members are reported once, from the first id that
    /// reaches them.
    pub fn verify_all<'i>(&self, ids: impl IntoIterator<Item = &'i SymbolId>) -> Vec<ConstructorCycle> {
        let mut ids: Vec<&SymbolId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();

        let mut done = FxHashSet::default();
        let mut rings = Vec::new();
        for id in ids {
            self.collect_rings(id, &mut Vec::new(), &mut done, &mut rings);
        }

        let mut seen: FxHashSet<BTreeSet<SymbolId>> = FxHashSet::default();
        rings
            .into_iter()
            .filter(|ring| seen.insert(ring.iter().cloned().collect()))
            .map(|ring| ConstructorCycle {
                chain: ring.iter().map(|id| self.symbol_for(id)).collect(),
            })
            .collect()
    }

    /// Run every check over the concretes in the map, reporting into `queue`.
    ///
    /// Reports cycles (E2001) and `Single` or `Intersection` dependencies
    /// with no resolution (E2002).
    #[tracing::instrument(level = "debug", skip_all, fields(constructors = self.signatures.len()))]
    pub fn verify(&self, queue: &mut DiagnosticQueue) -> Result<(), ErrorGuaranteed> {
        let concretes = self.resolutions.concretes();
        let mut failed = None;

        for concrete in &concretes {
            let Some(signature) = self.effective_signature(concrete.id()) else {
                continue;
            };
            for (index, param) in signature.params.iter().enumerate() {
                let required = match param {
                    ParamType::Single(_) | ParamType::Intersection(_) => param.symbols(),
                    ParamType::Union(_) | ParamType::Primitive(_) => &[],
                };
                for missing in required
                    .iter()
                    .filter(|s| !self.resolutions.contains(s.id()) && !self.rejected.contains(s.id()))
                {
                    let mut diag = Diagnostic::error(ErrorCode::E2002)
                        .with_message(format!(
                            "parameter #{} of `{}` needs `{}`, which nothing resolves",
                            index + 1,
                            concrete.name(),
                            missing.name()
                        ))
                        .with_label(concrete, "cannot be constructed")
                        .with_secondary_label(missing, "no registered concrete");
                    if signature.owner.id() != concrete.id() {
                        diag = diag.with_note(format!(
                            "constructor inherited from {}",
                            signature.owner.qualified()
                        ));
                    }
                    failed = Some(queue.emit_error(diag));
                }
            }
        }

        let cycles = self.verify_all(concretes.iter().map(|c| c.id()));
        for cycle in &cycles {
            let mut diag = Diagnostic::error(ErrorCode::E2001).with_message(cycle.report());
            if let Some((first, rest)) = cycle.chain.split_first() {
                diag = diag.with_label(first, "constructor depends on itself");
                for symbol in rest.iter().filter(|s| *s != first) {
                    diag = diag.with_secondary_label(symbol, "part of the cycle");
                }
            }
            failed = Some(queue.emit_error(diag));
        }

        debug!(checked = concretes.len(), cycles = cycles.len(), "verified constructors");
        match failed {
            Some(guarantee) => Err(guarantee),
            None => Ok(()),
        }
    }

    fn symbol_for(&self, id: &SymbolId) -> Symbol {
        if let Some(class) = self.heritage.class(id) {
            return class.symbol.clone();
        }
        match id.decode() {
            Some((path, name)) => Symbol::new(path, name),
            None => Symbol::new("", id.as_str()),
        }
    }
}
