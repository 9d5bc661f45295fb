//! Heritage lookup table.

use rustc_hash::FxHashMap;
use tether_ir::{ClassHeritage, InterfaceHeritage, SymbolId};

/// Latest heritage record per class and per interface.
///
/// A record for a symbol that is already present replaces the old one:
/// re-extracting a unit supersedes what it said before.
#[derive(Clone, Debug, Default)]
pub struct HeritageTable {
    classes: FxHashMap<SymbolId, ClassHeritage>,
    interfaces: FxHashMap<SymbolId, InterfaceHeritage>,
}

impl HeritageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_class(&mut self, class: ClassHeritage) {
        self.classes.insert(class.symbol.id().clone(), class);
    }

    pub fn insert_interface(&mut self, interface: InterfaceHeritage) {
        self.interfaces
            .insert(interface.symbol.id().clone(), interface);
    }

    #[inline]
    pub fn class(&self, id: &SymbolId) -> Option<&ClassHeritage> {
        self.classes.get(id)
    }

    #[inline]
    pub fn interface(&self, id: &SymbolId) -> Option<&InterfaceHeritage> {
        self.interfaces.get(id)
    }

    #[inline]
    pub fn is_interface(&self, id: &SymbolId) -> bool {
        self.interfaces.contains_key(id)
    }

    #[inline]
    pub fn is_class(&self, id: &SymbolId) -> bool {
        self.classes.contains_key(id)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }
}
