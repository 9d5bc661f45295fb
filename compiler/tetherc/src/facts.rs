//! The fact feed.
//!
//! An extractor describes every source unit as JSON:
//!
//! ```json
//! { "units": [ {
//!     "path": "svc/mailer.ts",
//!     "classes": [ { "name": "Mailer", "parent": { "path": "base.ts", "name": "Base" },
//!                    "interfaces": [ { "path": "api.ts", "name": "Sender" } ] } ],
//!     "interfaces": [],
//!     "constructors": [ { "owner": "Mailer",
//!                         "params": [ { "kind": "single", "type": { "path": "log.ts", "name": "Log" } } ] } ],
//!     "registrations": [ { "name": "Mailer", "lifetime": "singleton" } ]
//! } ] }
//! ```
//!
//! A reference without `path` names a declaration in the same unit. The feed
//! carries a little more than the graph needs (export flags, untyped
//! parameters) so malformed source can be reported here.

use serde::Deserialize;
use tether_diagnostic::{Diagnostic, ErrorCode};
use tether_ir::{
    ClassHeritage, ConstructorSignature, InterfaceHeritage, Lifetime, ParamType,
    RegistrationIntent, Symbol, UnitFacts,
};

/// The whole feed document.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactFeed {
    #[serde(default)]
    pub units: Vec<UnitDecl>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitDecl {
    pub path: String,
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceDecl>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDecl>,
    #[serde(default)]
    pub registrations: Vec<RegistrationDecl>,
}

/// A reference to a declaration, possibly in another unit.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymbolRef {
    #[serde(default)]
    pub path: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default = "exported_default")]
    pub exported: bool,
    #[serde(default)]
    pub parent: Option<SymbolRef>,
    #[serde(default)]
    pub interfaces: Vec<SymbolRef>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceDecl {
    pub name: String,
    #[serde(default = "exported_default")]
    pub exported: bool,
    #[serde(default)]
    pub parents: Vec<SymbolRef>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstructorDecl {
    pub owner: String,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParamDecl {
    Single {
        #[serde(rename = "type")]
        ty: SymbolRef,
    },
    Union {
        types: Vec<SymbolRef>,
    },
    Intersection {
        types: Vec<SymbolRef>,
    },
    Primitive {
        name: String,
    },
    /// A parameter the extractor found no type annotation for.
    Untyped {
        #[serde(default)]
        name: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifetimeDecl {
    Singleton,
    Factory,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationDecl {
    pub name: String,
    #[serde(default = "factory_default")]
    pub lifetime: LifetimeDecl,
}

fn exported_default() -> bool {
    true
}

fn factory_default() -> LifetimeDecl {
    LifetimeDecl::Factory
}

impl From<LifetimeDecl> for Lifetime {
    fn from(decl: LifetimeDecl) -> Self {
        match decl {
            LifetimeDecl::Singleton => Lifetime::Singleton,
            LifetimeDecl::Factory => Lifetime::Factory,
        }
    }
}

impl FactFeed {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Convert every unit, collecting feed-level problems.
    ///
    /// Untyped constructor parameters (E0002) and registrations of
    /// unexported declarations (E0003) are reported; the offending
    /// declarations are still converted so later checks can run.
    pub fn into_units(self) -> (Vec<UnitFacts>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let units = self
            .units
            .into_iter()
            .map(|unit| unit.into_facts(&mut diagnostics))
            .collect();
        (units, diagnostics)
    }
}

impl SymbolRef {
    fn resolve(&self, unit_path: &str) -> Symbol {
        Symbol::new(self.path.as_deref().unwrap_or(unit_path), self.name.as_str())
    }
}

impl UnitDecl {
    fn into_facts(self, diagnostics: &mut Vec<Diagnostic>) -> UnitFacts {
        let mut facts = UnitFacts::new(self.path.as_str());
        let path = self.path.as_str();

        for class in &self.classes {
            let mut heritage = ClassHeritage::new(facts.symbol(&class.name));
            heritage.parent = class.parent.as_ref().map(|p| p.resolve(path));
            heritage.interfaces = class.interfaces.iter().map(|i| i.resolve(path)).collect();
            facts.classes.push(heritage);
        }

        for interface in &self.interfaces {
            let mut heritage = InterfaceHeritage::new(facts.symbol(&interface.name));
            heritage.parents = interface.parents.iter().map(|p| p.resolve(path)).collect();
            facts.interfaces.push(heritage);
        }

        for ctor in &self.constructors {
            let owner = facts.symbol(&ctor.owner);
            let mut params = Vec::with_capacity(ctor.params.len());
            for (index, param) in ctor.params.iter().enumerate() {
                match param {
                    ParamDecl::Single { ty } => params.push(ParamType::Single(ty.resolve(path))),
                    ParamDecl::Union { types } => params.push(ParamType::Union(
                        types.iter().map(|t| t.resolve(path)).collect(),
                    )),
                    ParamDecl::Intersection { types } => params.push(ParamType::Intersection(
                        types.iter().map(|t| t.resolve(path)).collect(),
                    )),
                    ParamDecl::Primitive { name } => params.push(ParamType::Primitive(name.clone())),
                    ParamDecl::Untyped { name } => {
                        let shown = name
                            .as_deref()
                            .map_or_else(|| format!("#{}", index + 1), |n| format!("`{n}`"));
                        diagnostics.push(
                            Diagnostic::error(ErrorCode::E0002)
                                .with_message(format!(
                                    "constructor parameter {shown} of `{}` has no type",
                                    ctor.owner
                                ))
                                .with_label(&owner, "untyped parameter")
                                .with_suggestion("annotate the parameter with the type to inject"),
                        );
                    }
                }
            }
            facts.constructors.push(ConstructorSignature::new(owner, params));
        }

        for registration in &self.registrations {
            let symbol = facts.symbol(&registration.name);
            let unexported = self
                .classes
                .iter()
                .any(|c| c.name == registration.name && !c.exported);
            if unexported {
                diagnostics.push(
                    Diagnostic::error(ErrorCode::E0003)
                        .with_message(format!(
                            "`{}` is registered for injection but not exported",
                            registration.name
                        ))
                        .with_label(&symbol, "not exported")
                        .with_suggestion("export the class so the generated resolver can import it"),
                );
            }
            facts.registrations.push(RegistrationIntent {
                symbol,
                lifetime: registration.lifetime.into(),
            });
        }

        facts
    }
}
