//! Per-unit fact bundle.

use crate::{
    ClassHeritage, ConstructorSignature, InterfaceHeritage, RegistrationIntent, Symbol,
};

/// Everything the extractor yields for one source unit.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitFacts {
    /// Unit path relative to the project root.
    pub path: String,
    pub classes: Vec<ClassHeritage>,
    pub interfaces: Vec<InterfaceHeritage>,
    pub constructors: Vec<ConstructorSignature>,
    pub registrations: Vec<RegistrationIntent>,
}

impl UnitFacts {
    /// An empty bundle for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        UnitFacts {
            path: path.into(),
            ..UnitFacts::default()
        }
    }

    /// Qualify a name declared in this unit.
    pub fn symbol(&self, name: &str) -> Symbol {
        Symbol::new(self.path.as_str(), name)
    }

    #[must_use]
    pub fn with_class(mut self, class: ClassHeritage) -> Self {
        self.classes.push(class);
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: InterfaceHeritage) -> Self {
        self.interfaces.push(interface);
        self
    }

    #[must_use]
    pub fn with_constructor(mut self, constructor: ConstructorSignature) -> Self {
        self.constructors.push(constructor);
        self
    }

    #[must_use]
    pub fn with_registration(mut self, registration: RegistrationIntent) -> Self {
        self.registrations.push(registration);
        self
    }

    /// True when the unit declares nothing tether cares about.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.interfaces.is_empty()
            && self.constructors.is_empty()
            && self.registrations.is_empty()
    }
}
