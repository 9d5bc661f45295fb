//! Tether IR - declaration facts for dependency-injection analysis
//!
//! This crate contains the value types every other tether crate speaks:
//! - `Symbol` / `SymbolId` for project-wide declaration identity
//! - Heritage records (`ClassHeritage`, `InterfaceHeritage`)
//! - Constructor signatures and their parameter types
//! - Registration intents with a declared `Lifetime`
//! - `UnitFacts`, the per-source-unit bundle produced by the extractor
//!
//! # Design Philosophy
//!
//! - **Immutable identity**: a `Symbol`'s id is derived from its unit path and
//!   name once, at construction, and never changes.
//! - **Plain data**: no behavior beyond construction helpers and equality.
//!   Propagation and verification live in `tether_graph`.
//!
//! With the `cache` feature every type derives serde traits so the
//! incremental log can persist it.

mod constructor;
mod heritage;
mod registration;
mod symbol;
mod unit;

pub use constructor::{ConstructorSignature, ParamType};
pub use heritage::{ClassHeritage, InterfaceHeritage};
pub use registration::{Lifetime, RegistrationIntent};
pub use symbol::{Symbol, SymbolId};
pub use unit::UnitFacts;
