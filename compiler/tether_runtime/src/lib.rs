//! Runtime support for generated resolvers.
//!
//! A generated container (or the in-process interpreter) builds services
//! through these types: every service is an [`Instance`], constructor
//! arguments are [`Arg`]s, and singletons live in a [`SingletonCache`]
//! keyed by the concrete's id.

use std::any::Any;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// A constructed service.
pub type Instance = Rc<dyn Any>;

/// One constructor argument.
#[derive(Clone)]
pub enum Arg {
    Service(Instance),
    /// Unresolvable union or whitelisted primitive.
    Null,
    /// Every member of an intersection.
    All(Vec<Instance>),
}

impl Arg {
    /// Downcast a `Service` argument.
    pub fn service<T: 'static>(&self) -> Option<Rc<T>> {
        match self {
            Arg::Service(instance) => Rc::clone(instance).downcast::<T>().ok(),
            Arg::Null | Arg::All(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Arg::Null)
    }
}

impl std::fmt::Debug for Arg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::Service(_) => write!(f, "Service(..)"),
            Arg::Null => write!(f, "Null"),
            Arg::All(members) => write!(f, "All({} members)", members.len()),
        }
    }
}

/// Implemented by every type a generated resolver constructs.
pub trait Construct {
    fn construct(args: Vec<Arg>) -> Instance;
}

/// Singleton instances, keyed by concrete id.
#[derive(Default)]
pub struct SingletonCache {
    instances: FxHashMap<String, Instance>,
}

impl SingletonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, concrete: &str) -> Option<Instance> {
        self.instances.get(concrete).cloned()
    }

    pub fn insert(&mut self, concrete: impl Into<String>, instance: Instance) {
        self.instances.insert(concrete.into(), instance);
    }

    /// The cached instance for `concrete`, building it on first use.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        concrete: &str,
        build: impl FnOnce(&mut Self) -> Result<Instance, E>,
    ) -> Result<Instance, E> {
        if let Some(instance) = self.get(concrete) {
            return Ok(instance);
        }
        let instance = build(self)?;
        self.insert(concrete, Rc::clone(&instance));
        Ok(instance)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Failure to resolve an id at dispatch time.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot resolve {0}")]
    Unknown(String),
    #[error("no constructor registered for {0}")]
    MissingConstructor(String),
}
