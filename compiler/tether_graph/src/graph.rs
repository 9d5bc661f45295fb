//! Resolution graph construction.
//!
//! Registrations propagate along heritage: a registered class resolves for
//! its own id, every ancestor class id, every implemented interface id and,
//! transitively, every parent interface id.
//!
//! Propagation runs as a worklist. A step whose target has no heritage yet is
//! parked under the target's id; when heritage for that id arrives the
//! parked steps are replayed. Edges live in a set, so replaying a step that
//! already produced its edge stops there. Together these make the final
//! graph independent of the order facts arrive in.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use tether_diagnostic::{queue::DiagnosticQueue, Diagnostic, ErrorCode, ErrorGuaranteed};
use tether_ir::{ClassHeritage, InterfaceHeritage, Lifetime, RegistrationIntent, Symbol, SymbolId};
use tracing::{debug, trace};

use crate::{HeritageTable, Resolution, ResolutionMap};

/// What kind of declaration an abstract identifier names.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TargetKind {
    Class,
    Interface,
}

/// Every concrete recorded for one abstract identifier.
#[derive(Clone, Debug)]
struct EdgeSet {
    target: Symbol,
    kind: TargetKind,
    concretes: BTreeMap<SymbolId, Symbol>,
}

/// One unit of propagation work.
#[derive(Clone, Debug)]
enum Step {
    /// `concrete` resolves for class `target` and its ancestry.
    Class { target: Symbol, concrete: Symbol },
    /// `concrete` resolves for interface `target`.
    Interface { target: Symbol, concrete: Symbol },
    /// `concrete` resolves for the parents of interface `target`.
    InterfaceParents { target: Symbol, concrete: Symbol },
}

/// Steps parked on a symbol whose heritage is not known yet.
///
/// Keyed by the missing symbol id, then by the waiting concrete's id.
type Pending = FxHashMap<SymbolId, BTreeMap<SymbolId, Symbol>>;

/// Outcome of [`ResolutionGraph::finalize_partial`].
#[derive(Clone, Debug, Default)]
pub struct Finalized {
    /// Every id that reduced to exactly one concrete.
    pub map: ResolutionMap,
    /// Ids left out of `map` because of an error already reported.
    pub rejected: FxHashSet<SymbolId>,
    /// Set when at least one error was reported.
    pub failed: Option<ErrorGuaranteed>,
}

/// Builder for the abstract id → concrete mapping of one project.
///
/// All state lives in the value; tests construct isolated instances and the
/// incremental log replays into a fresh one on every run.
#[derive(Clone, Debug, Default)]
pub struct ResolutionGraph {
    heritage: HeritageTable,
    edges: FxHashMap<SymbolId, EdgeSet>,
    lifetimes: FxHashMap<SymbolId, Lifetime>,
    pending_classes: Pending,
    pending_interfaces: Pending,
}

impl ResolutionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heritage facts seen so far.
    #[inline]
    pub fn heritage(&self) -> &HeritageTable {
        &self.heritage
    }

    /// Merge class heritage records and replay registrations parked on them.
    pub fn add_classes(&mut self, records: impl IntoIterator<Item = ClassHeritage>) {
        let mut work = Vec::new();
        for record in records {
            let symbol = record.symbol.clone();
            self.heritage.insert_class(record);
            if let Some(waiting) = self.pending_classes.remove(symbol.id()) {
                debug!(class = %symbol, count = waiting.len(), "replaying parked class registrations");
                work.extend(waiting.into_values().map(|concrete| Step::Class {
                    target: symbol.clone(),
                    concrete,
                }));
            }
        }
        self.propagate(work);
    }

    /// Merge interface heritage records and replay propagation parked on them.
    pub fn add_interfaces(&mut self, records: impl IntoIterator<Item = InterfaceHeritage>) {
        let mut work = Vec::new();
        for record in records {
            let symbol = record.symbol.clone();
            self.heritage.insert_interface(record);
            if let Some(waiting) = self.pending_interfaces.remove(symbol.id()) {
                debug!(interface = %symbol, count = waiting.len(), "replaying parked interface registrations");
                work.extend(waiting.into_values().map(|concrete| Step::InterfaceParents {
                    target: symbol.clone(),
                    concrete,
                }));
            }
        }
        self.propagate(work);
    }

    /// Record a registration intent: merge its lifetime and register the
    /// class for its own id.
    pub fn register(&mut self, intent: &RegistrationIntent) {
        let id = intent.symbol.id().clone();
        let merged = match self.lifetimes.get(&id) {
            Some(prev) => prev.merge(intent.lifetime),
            None => intent.lifetime,
        };
        self.lifetimes.insert(id, merged);
        self.register_class(&intent.symbol, &intent.symbol);
    }

    /// Record that `concrete` resolves for class `target` and everything
    /// `target` inherits from.
    ///
    /// If `target` has no heritage yet the request is parked until it does.
    pub fn register_class(&mut self, target: &Symbol, concrete: &Symbol) {
        self.propagate(vec![Step::Class {
            target: target.clone(),
            concrete: concrete.clone(),
        }]);
    }

    /// Record that `concrete` resolves for interface `target` and every
    /// interface it extends.
    pub fn register_interface(&mut self, target: &Symbol, concrete: &Symbol) {
        self.propagate(vec![Step::Interface {
            target: target.clone(),
            concrete: concrete.clone(),
        }]);
    }

    fn propagate(&mut self, mut work: Vec<Step>) {
        while let Some(step) = work.pop() {
            match step {
                Step::Class { target, concrete } => {
                    let Some(heritage) = self.heritage.class(target.id()) else {
                        trace!(class = %target, concrete = %concrete, "class heritage unknown, parking");
                        park(&mut self.pending_classes, &target, concrete);
                        continue;
                    };
                    let parent = heritage.parent.clone();
                    let interfaces = heritage.interfaces.clone();
                    if !self.insert_edge(&target, TargetKind::Class, &concrete) {
                        continue;
                    }
                    if let Some(parent) = parent {
                        work.push(Step::Class {
                            target: parent,
                            concrete: concrete.clone(),
                        });
                    }
                    work.extend(interfaces.into_iter().map(|target| Step::Interface {
                        target,
                        concrete: concrete.clone(),
                    }));
                }
                Step::Interface { target, concrete } => {
                    if self.insert_edge(&target, TargetKind::Interface, &concrete) {
                        work.push(Step::InterfaceParents { target, concrete });
                    }
                }
                Step::InterfaceParents { target, concrete } => {
                    let Some(heritage) = self.heritage.interface(target.id()) else {
                        trace!(interface = %target, concrete = %concrete, "interface heritage unknown, parking");
                        park(&mut self.pending_interfaces, &target, concrete);
                        continue;
                    };
                    work.extend(heritage.parents.iter().map(|parent| Step::Interface {
                        target: parent.clone(),
                        concrete: concrete.clone(),
                    }));
                }
            }
        }
    }

    /// Insert `target.id → concrete`. Returns `false` if the edge existed.
    fn insert_edge(&mut self, target: &Symbol, kind: TargetKind, concrete: &Symbol) -> bool {
        let set = self
            .edges
            .entry(target.id().clone())
            .or_insert_with(|| EdgeSet {
                target: target.clone(),
                kind,
                concretes: BTreeMap::new(),
            });
        if set.concretes.contains_key(concrete.id()) {
            return false;
        }
        trace!(target = %target, concrete = %concrete, ?kind, "edge");
        set.concretes
            .insert(concrete.id().clone(), concrete.clone());
        true
    }

    /// Concretes currently recorded for `id`, in id order.
    pub fn concretes_for(&self, id: &SymbolId) -> Vec<&Symbol> {
        self.edges
            .get(id)
            .map(|set| set.concretes.values().collect())
            .unwrap_or_default()
    }

    /// Total number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|set| set.concretes.len()).sum()
    }

    /// Ids of classes with registrations parked on missing heritage.
    pub fn pending_classes(&self) -> impl Iterator<Item = &SymbolId> {
        self.pending_classes.keys()
    }

    /// Ids of interfaces whose parents could not be followed yet.
    pub fn pending_interfaces(&self) -> impl Iterator<Item = &SymbolId> {
        self.pending_interfaces.keys()
    }

    /// Kind of an abstract id. Heritage tables win over the edge record.
    fn kind_of(&self, id: &SymbolId, recorded: TargetKind) -> TargetKind {
        if self.heritage.is_interface(id) {
            TargetKind::Interface
        } else if self.heritage.is_class(id) {
            TargetKind::Class
        } else {
            recorded
        }
    }

    /// Reduce every abstract id to its single concrete.
    ///
    /// Interfaces with several concretes are warned about (W1001) and left
    /// out of the map. Classes with several concretes are errors (E1001);
    /// every one is reported before returning `Err`. Registrations whose own
    /// class heritage never arrived are warned about (W1002).
    pub fn finalize(&self, queue: &mut DiagnosticQueue) -> Result<ResolutionMap, ErrorGuaranteed> {
        let finalized = self.finalize_partial(queue);
        match finalized.failed {
            Some(guarantee) => Err(guarantee),
            None => Ok(finalized.map),
        }
    }

    /// Like [`finalize`](Self::finalize), but hands back the map of every id
    /// that did resolve even when some did not, so later checks can still
    /// run over it.
    #[tracing::instrument(level = "debug", skip_all, fields(edges = self.edge_count()))]
    pub fn finalize_partial(&self, queue: &mut DiagnosticQueue) -> Finalized {
        let mut ids: Vec<&SymbolId> = self.edges.keys().collect();
        ids.sort();

        let mut finalized = Finalized::default();

        for id in ids {
            let set = &self.edges[id];
            let mut concretes = set.concretes.values();
            let (Some(concrete), None) = (concretes.next(), concretes.next()) else {
                if let Some(diag) = self.ambiguity(set) {
                    if diag.is_error() {
                        finalized.failed = Some(queue.emit_error(diag));
                        finalized.rejected.insert(id.clone());
                    } else {
                        queue.add(diag);
                    }
                }
                continue;
            };
            let lifetime = self
                .lifetimes
                .get(concrete.id())
                .copied()
                .unwrap_or(Lifetime::Factory);
            finalized
                .map
                .insert(id.clone(), Resolution::new(concrete.clone(), lifetime));
        }

        let mut stranded: Vec<&Symbol> = self
            .pending_classes
            .iter()
            .filter_map(|(missing, waiting)| waiting.get(missing))
            .collect();
        stranded.sort();
        for symbol in stranded {
            queue.add(
                Diagnostic::warning(ErrorCode::W1002)
                    .with_message(format!("`{}` is registered but its declaration was never seen", symbol.name()))
                    .with_label(symbol, "registered here")
                    .with_note("the registration resolves nothing until the unit declaring the class is collected"),
            );
        }

        debug!(
            resolved = finalized.map.len(),
            rejected = finalized.rejected.len(),
            "finalized resolution map"
        );
        finalized
    }

    /// Diagnostic for an id with more than one concrete.
    fn ambiguity(&self, set: &EdgeSet) -> Option<Diagnostic> {
        if set.concretes.len() < 2 {
            return None;
        }
        let names = set
            .concretes
            .values()
            .map(Symbol::qualified)
            .collect::<Vec<_>>()
            .join(", ");
        let diag = match self.kind_of(set.target.id(), set.kind) {
            TargetKind::Interface => Diagnostic::warning(ErrorCode::W1001)
                .with_message(format!(
                    "interface `{}` has {} registered implementations and cannot be resolved",
                    set.target.name(),
                    set.concretes.len()
                ))
                .with_label(&set.target, "ambiguous interface")
                .with_note(format!("implemented by {names}")),
            TargetKind::Class => Diagnostic::error(ErrorCode::E1001)
                .with_message(format!(
                    "class `{}` is claimed by {} registered concretes",
                    set.target.name(),
                    set.concretes.len()
                ))
                .with_label(&set.target, "ambiguous class")
                .with_note(format!("claimed by {names}"))
                .with_suggestion("register only one of the subclasses"),
        };
        let diag = set.concretes.values().fold(diag, |diag, concrete| {
            diag.with_secondary_label(concrete, "registered here")
        });
        Some(diag)
    }
}

fn park(pending: &mut Pending, target: &Symbol, concrete: Symbol) {
    pending
        .entry(target.id().clone())
        .or_default()
        .insert(concrete.id().clone(), concrete);
}

#[cfg(test)]
impl ResolutionGraph {
    /// Sorted ids of every abstract target.
    fn targets(&self) -> std::collections::BTreeSet<&SymbolId> {
        self.edges.keys().collect()
    }
}
