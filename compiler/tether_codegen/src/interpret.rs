//! In-process plan interpreter.
//!
//! Runs a [`ResolverPlan`] against a table of constructor closures with the
//! same dispatch rules as the emitted module. Useful where compiling the
//! generated source is not an option, and for exercising resolution
//! semantics directly.

use rustc_hash::FxHashMap;
use tether_graph::Dependency;
use tether_ir::{Lifetime, Symbol, SymbolId};
use tether_runtime::{Arg, Construct, Instance, ResolveError, SingletonCache};

use crate::{Branch, ResolverPlan};

/// Builds one concrete from its resolved arguments.
pub type ConstructorFn = Box<dyn Fn(Vec<Arg>) -> Instance>;

/// A container that interprets a plan.
pub struct PlanContainer<'p> {
    plan: &'p ResolverPlan,
    dispatch: FxHashMap<&'p str, usize>,
    constructors: FxHashMap<SymbolId, ConstructorFn>,
    singletons: SingletonCache,
}

impl<'p> PlanContainer<'p> {
    pub fn new(plan: &'p ResolverPlan) -> Self {
        let mut dispatch = FxHashMap::default();
        for (index, branch) in plan.branches().iter().enumerate() {
            for id in &branch.ids {
                dispatch.insert(id.as_str(), index);
            }
        }
        PlanContainer {
            plan,
            dispatch,
            constructors: FxHashMap::default(),
            singletons: SingletonCache::new(),
        }
    }

    /// Register the constructor closure for a concrete.
    pub fn provide(
        &mut self,
        concrete: &Symbol,
        construct: impl Fn(Vec<Arg>) -> Instance + 'static,
    ) -> &mut Self {
        self.constructors
            .insert(concrete.id().clone(), Box::new(construct));
        self
    }

    /// Register a [`Construct`] implementation for a concrete.
    pub fn provide_type<T: Construct + 'static>(&mut self, concrete: &Symbol) -> &mut Self {
        self.provide(concrete, T::construct)
    }

    /// Resolve `id`, building dependencies first.
    pub fn resolve(&mut self, id: &str) -> Result<Instance, ResolveError> {
        let tables = Tables {
            plan: self.plan,
            dispatch: &self.dispatch,
            constructors: &self.constructors,
        };
        tables.resolve(&mut self.singletons, id)
    }

    /// Number of singletons built so far.
    pub fn singleton_count(&self) -> usize {
        self.singletons.len()
    }
}

/// The read-only half of a container, borrowed apart from its singletons.
struct Tables<'a> {
    plan: &'a ResolverPlan,
    dispatch: &'a FxHashMap<&'a str, usize>,
    constructors: &'a FxHashMap<SymbolId, ConstructorFn>,
}

impl Tables<'_> {
    fn resolve(&self, singletons: &mut SingletonCache, id: &str) -> Result<Instance, ResolveError> {
        let Some(&index) = self.dispatch.get(id) else {
            return Err(ResolveError::Unknown(id.to_string()));
        };
        let branch = &self.plan.branches()[index];
        match branch.lifetime {
            Lifetime::Singleton => singletons
                .get_or_try_insert_with(branch.concrete.id().as_str(), |singletons| {
                    self.build(branch, singletons)
                }),
            Lifetime::Factory => self.build(branch, singletons),
        }
    }

    fn build(&self, branch: &Branch, singletons: &mut SingletonCache) -> Result<Instance, ResolveError> {
        let mut args = Vec::with_capacity(branch.dependencies.len());
        for dependency in &branch.dependencies {
            args.push(match dependency {
                Dependency::Service(dep) => Arg::Service(self.resolve(singletons, dep.as_str())?),
                Dependency::Null => Arg::Null,
                Dependency::All(deps) => Arg::All(
                    deps.iter()
                        .map(|dep| self.resolve(singletons, dep.as_str()))
                        .collect::<Result<_, _>>()?,
                ),
            });
        }

        let concrete = branch.concrete.id();
        let construct = self
            .constructors
            .get(concrete)
            .ok_or_else(|| ResolveError::MissingConstructor(concrete.to_string()))?;
        Ok(construct(args))
    }
}

#[cfg(test)]
mod tests;
