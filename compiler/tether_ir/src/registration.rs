//! Registration intents.

use std::fmt;

use crate::Symbol;

/// How many instances of a concrete the resolver hands out.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifetime {
    /// One cached instance per concrete, shared by every id resolving to it.
    Singleton,
    /// A fresh instance per resolution.
    Factory,
}

impl Lifetime {
    /// Combine two intents declared for the same concrete.
    ///
    /// Singleton wins. The merge is commutative so the outcome does not
    /// depend on the order intents arrive in.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Lifetime) -> Lifetime {
        if self == Lifetime::Singleton || other == Lifetime::Singleton {
            Lifetime::Singleton
        } else {
            Lifetime::Factory
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Singleton => write!(f, "singleton"),
            Lifetime::Factory => write!(f, "factory"),
        }
    }
}

/// Source marked `symbol` for injection with the given lifetime.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct RegistrationIntent {
    pub symbol: Symbol,
    pub lifetime: Lifetime,
}

impl RegistrationIntent {
    pub fn singleton(symbol: Symbol) -> Self {
        RegistrationIntent {
            symbol,
            lifetime: Lifetime::Singleton,
        }
    }

    pub fn factory(symbol: Symbol) -> Self {
        RegistrationIntent {
            symbol,
            lifetime: Lifetime::Factory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_commutative() {
        use Lifetime::{Factory, Singleton};
        for a in [Singleton, Factory] {
            for b in [Singleton, Factory] {
                assert_eq!(a.merge(b), b.merge(a));
            }
        }
        assert_eq!(Factory.merge(Factory), Factory);
        assert_eq!(Factory.merge(Singleton), Singleton);
    }
}
