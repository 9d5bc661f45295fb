//! Resolver plan.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tether_graph::{ConstructorVerifier, Dependency, ResolutionMap};
use tether_ir::{Lifetime, Symbol, SymbolId};
use tracing::debug;

use crate::emit::sanitize_ident;

/// One constructible concrete and the name it is imported under.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableEntry {
    pub concrete: Symbol,
    /// `Name_N`, numbered per bare name so equal names from different units
    /// never clash.
    pub alias: String,
}

/// One dispatch branch: every id that builds the same concrete the same way.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Branch {
    pub concrete: Symbol,
    pub lifetime: Lifetime,
    /// Ids dispatching here, sorted.
    pub ids: Vec<SymbolId>,
    /// Constructor arguments, in parameter order.
    pub dependencies: Vec<Dependency>,
}

/// Constructor table plus dispatch branches, in deterministic order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResolverPlan {
    table: Vec<TableEntry>,
    branches: Vec<Branch>,
}

impl ResolverPlan {
    #[tracing::instrument(level = "debug", skip_all, fields(resolutions = map.len()))]
    pub fn build(map: &ResolutionMap, verifier: &ConstructorVerifier<'_>) -> Self {
        let mut groups: BTreeMap<(&str, &str, Lifetime), Branch> = BTreeMap::new();
        for (id, resolution) in map.iter() {
            groups
                .entry((resolution.name(), resolution.unit_path(), resolution.lifetime))
                .or_insert_with(|| Branch {
                    concrete: resolution.concrete.clone(),
                    lifetime: resolution.lifetime,
                    ids: Vec::new(),
                    dependencies: verifier.resolve_constructor_params(resolution.concrete.id()),
                })
                .ids
                .push(id.clone());
        }
        let branches: Vec<Branch> = groups.into_values().collect();

        let mut concretes: Vec<&Symbol> = branches.iter().map(|b| &b.concrete).collect();
        concretes.sort_by(|a, b| (a.unit_path(), a.name()).cmp(&(b.unit_path(), b.name())));
        concretes.dedup();

        let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
        let table = concretes
            .into_iter()
            .map(|concrete| {
                let n = seen.entry(concrete.name()).or_insert(0);
                *n += 1;
                TableEntry {
                    concrete: concrete.clone(),
                    alias: format!("{}_{n}", sanitize_ident(concrete.name())),
                }
            })
            .collect::<Vec<_>>();

        debug!(branches = branches.len(), table = table.len(), "planned resolver");
        ResolverPlan { table, branches }
    }

    pub fn table(&self) -> &[TableEntry] {
        &self.table
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Import alias of a concrete.
    pub fn alias_for(&self, concrete: &SymbolId) -> Option<&str> {
        self.table
            .iter()
            .find(|entry| entry.concrete.id() == concrete)
            .map(|entry| entry.alias.as_str())
    }

    /// Number of ids with a branch.
    pub fn id_count(&self) -> usize {
        self.branches.iter().map(|b| b.ids.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tether_diagnostic::queue::DiagnosticQueue;
    use tether_graph::ResolutionGraph;
    use tether_ir::{ClassHeritage, InterfaceHeritage, RegistrationIntent};

    fn plan_for(graph: &ResolutionGraph) -> ResolverPlan {
        let mut queue = DiagnosticQueue::new();
        let map = graph
            .finalize(&mut queue)
            .unwrap_or_else(|_| panic!("finalize failed"));
        let verifier = ConstructorVerifier::new(graph, &map);
        ResolverPlan::build(&map, &verifier)
    }

    #[test]
    fn test_aliases_of_one_concrete_share_a_branch() {
        let api = Symbol::new("api.ts", "Api");
        let base = Symbol::new("api.ts", "Base");
        let svc = Symbol::new("svc.ts", "Service");
        let mut graph = ResolutionGraph::new();
        graph.add_interfaces([
            InterfaceHeritage::new(base.clone()),
            InterfaceHeritage::new(api.clone()).extending(base.clone()),
        ]);
        graph.add_classes([ClassHeritage::new(svc.clone()).implementing(api.clone())]);
        graph.register(&RegistrationIntent::singleton(svc.clone()));

        let plan = plan_for(&graph);
        assert_eq!(plan.branches().len(), 1);
        assert_eq!(
            plan.branches()[0].ids,
            vec![api.id().clone(), base.id().clone(), svc.id().clone()]
        );
        assert_eq!(plan.id_count(), 3);
    }

    #[test]
    fn test_same_name_in_two_units_gets_distinct_aliases() {
        let first = Symbol::new("a/logger.ts", "Logger");
        let second = Symbol::new("b/logger.ts", "Logger");
        let other = Symbol::new("c.ts", "Other");
        let mut graph = ResolutionGraph::new();
        for symbol in [&first, &second, &other] {
            graph.add_classes([ClassHeritage::new(symbol.clone())]);
            graph.register(&RegistrationIntent::factory(symbol.clone()));
        }

        let plan = plan_for(&graph);
        let aliases: Vec<_> = plan.table().iter().map(|e| e.alias.as_str()).collect();
        assert_eq!(aliases, vec!["Logger_1", "Logger_2", "Other_1"]);
        assert_eq!(plan.alias_for(second.id()), Some("Logger_2"));
    }

    #[test]
    fn test_branches_sorted_by_name_then_unit() {
        let z = Symbol::new("a.ts", "Zed");
        let a = Symbol::new("z.ts", "Alpha");
        let mut graph = ResolutionGraph::new();
        for symbol in [&z, &a] {
            graph.add_classes([ClassHeritage::new(symbol.clone())]);
            graph.register(&RegistrationIntent::factory(symbol.clone()));
        }
        let plan = plan_for(&graph);
        let names: Vec<_> = plan.branches().iter().map(|b| b.concrete.name()).collect();
        assert_eq!(names, vec!["Alpha", "Zed"]);
    }
}
