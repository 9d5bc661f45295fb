//! Constructor signatures.

use crate::Symbol;

/// Declared type of one constructor parameter.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamType {
    /// A single named type.
    Single(Symbol),
    /// `A | B | ...`: the first resolvable member is injected.
    Union(Vec<Symbol>),
    /// `A & B & ...`: every member must resolve.
    Intersection(Vec<Symbol>),
    /// A primitive such as `string` or `number`.
    ///
    /// Rejected unless the build whitelists the name.
    Primitive(String),
}

impl ParamType {
    /// Every symbol mentioned by this parameter, in declaration order.
    pub fn symbols(&self) -> &[Symbol] {
        match self {
            ParamType::Single(symbol) => std::slice::from_ref(symbol),
            ParamType::Union(members) | ParamType::Intersection(members) => members,
            ParamType::Primitive(_) => &[],
        }
    }
}

/// The (single) constructor declared on a class.
///
/// A class without one either inherits its parent's or takes no arguments.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructorSignature {
    pub owner: Symbol,
    pub params: Vec<ParamType>,
}

impl ConstructorSignature {
    pub fn new(owner: Symbol, params: Vec<ParamType>) -> Self {
        ConstructorSignature { owner, params }
    }
}
