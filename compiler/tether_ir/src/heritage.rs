//! Heritage records.
//!
//! The parent-class / implemented-interface relationships of classes and the
//! parent-interface relationships of interfaces. Resolution eligibility
//! propagates along exactly these edges.

use crate::Symbol;

/// Heritage of one class declaration.
///
/// Replaced wholesale when its unit is re-extracted; never patched in place.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassHeritage {
    /// The class itself.
    pub symbol: Symbol,
    /// Declared parent class (`extends`), if any.
    pub parent: Option<Symbol>,
    /// Declared implemented interfaces, in source order.
    pub interfaces: Vec<Symbol>,
}

impl ClassHeritage {
    /// A class with no parent and no interfaces.
    pub fn new(symbol: Symbol) -> Self {
        ClassHeritage {
            symbol,
            parent: None,
            interfaces: Vec::new(),
        }
    }

    /// Set the parent class.
    #[must_use]
    pub fn with_parent(mut self, parent: Symbol) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Add an implemented interface.
    #[must_use]
    pub fn implementing(mut self, interface: Symbol) -> Self {
        self.interfaces.push(interface);
        self
    }
}

/// Heritage of one interface declaration.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceHeritage {
    /// The interface itself.
    pub symbol: Symbol,
    /// Interfaces this one extends, in source order.
    pub parents: Vec<Symbol>,
}

impl InterfaceHeritage {
    /// A root interface.
    pub fn new(symbol: Symbol) -> Self {
        InterfaceHeritage {
            symbol,
            parents: Vec::new(),
        }
    }

    /// Add a parent interface.
    #[must_use]
    pub fn extending(mut self, parent: Symbol) -> Self {
        self.parents.push(parent);
        self
    }
}
